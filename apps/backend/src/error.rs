use actix_web::error::ResponseError;
use actix_web::http::{header, StatusCode};
use actix_web::HttpResponse;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::auth::jwt::VerificationError;
use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind};
use crate::infra::db_errors::map_db_err;

/// JSON body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
}

/// The single HTTP-facing error type.
///
/// Expected rejections (auth, validation, credentials) carry their
/// client-visible message. Everything else is a fault: it is logged with its
/// detail and answered with a generic 500.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Token required")]
    TokenRequired,
    #[error("Token invalid")]
    TokenInvalid,
    #[error("This is not for you")]
    Forbidden,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Invalid login credentials")]
    InvalidLoginCredentials,
    #[error("Validation error: {detail}")]
    Validation { detail: String },
    #[error("Bad request: {detail}")]
    BadRequest { detail: String },
    #[error("Request body too large")]
    PayloadTooLarge,
    #[error("Not found: {detail}")]
    NotFound { detail: String },
    #[error("Conflict: {detail}")]
    Conflict { detail: String },
    #[error("Internal error: {detail}")]
    Internal { detail: String },
    #[error("Configuration error: {detail}")]
    Config { detail: String },
    #[error("Database unavailable")]
    DbUnavailable,
}

impl AppError {
    /// Message sent to the client.
    fn message(&self) -> String {
        match self {
            AppError::Validation { detail }
            | AppError::BadRequest { detail }
            | AppError::NotFound { detail }
            | AppError::Conflict { detail } => detail.clone(),
            AppError::Internal { .. } | AppError::Config { .. } | AppError::DbUnavailable => {
                "Internal server error".to_string()
            }
            other => other.to_string(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::TokenRequired => StatusCode::UNAUTHORIZED,
            AppError::TokenInvalid => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::InvalidLoginCredentials => StatusCode::NOT_FOUND,
            AppError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::DbUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn token_required() -> Self {
        Self::TokenRequired
    }

    pub fn token_invalid() -> Self {
        Self::TokenInvalid
    }

    pub fn forbidden() -> Self {
        Self::Forbidden
    }

    pub fn invalid_credentials() -> Self {
        Self::InvalidCredentials
    }

    pub fn invalid_login_credentials() -> Self {
        Self::InvalidLoginCredentials
    }

    pub fn validation(detail: impl Into<String>) -> Self {
        Self::Validation {
            detail: detail.into(),
        }
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::BadRequest {
            detail: detail.into(),
        }
    }

    pub fn payload_too_large() -> Self {
        Self::PayloadTooLarge
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::NotFound {
            detail: detail.into(),
        }
    }

    pub fn conflict(detail: impl Into<String>) -> Self {
        Self::Conflict {
            detail: detail.into(),
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal {
            detail: detail.into(),
        }
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }

    pub fn db_unavailable() -> Self {
        Self::DbUnavailable
    }
}

impl From<VerificationError> for AppError {
    fn from(_: VerificationError) -> Self {
        AppError::TokenInvalid
    }
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Conflict(ConflictKind::UniqueUsername, detail) => {
                AppError::conflict(detail)
            }
            DomainError::Conflict(kind, detail) => {
                AppError::conflict(format!("{detail} ({kind:?})"))
            }
            DomainError::NotFound(_, detail) => AppError::not_found(detail),
            DomainError::Infra(InfraErrorKind::DbUnavailable, _) => AppError::db_unavailable(),
            DomainError::Infra(kind, detail) => AppError::internal(format!("{kind:?}: {detail}")),
        }
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(e: sea_orm::DbErr) -> Self {
        AppError::from(map_db_err(e))
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status();

        if status.is_server_error() {
            error!(error = %self, status = status.as_u16(), "request failed");
        }

        let mut builder = HttpResponse::build(status);
        if matches!(self, AppError::TokenRequired | AppError::TokenInvalid) {
            builder.insert_header((header::WWW_AUTHENTICATE, "Bearer"));
        }

        builder.json(ErrorBody {
            message: self.message(),
        })
    }
}

#[cfg(test)]
mod tests {
    use actix_web::body::to_bytes;
    use actix_web::http::StatusCode;
    use actix_web::ResponseError;
    use serde_json::Value;

    use super::AppError;
    use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind, NotFoundKind};

    async fn body_of(err: AppError) -> (StatusCode, Value) {
        let resp = err.error_response();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body()).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[actix_web::test]
    async fn auth_failures_carry_fixed_messages() {
        let (status, body) = body_of(AppError::token_required()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Token required");

        let (status, body) = body_of(AppError::token_invalid()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Token invalid");

        let (status, body) = body_of(AppError::forbidden()).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["message"], "This is not for you");
    }

    #[actix_web::test]
    async fn credential_failures_keep_distinct_statuses() {
        let (status, body) = body_of(AppError::invalid_credentials()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Invalid credentials");

        let (status, body) = body_of(AppError::invalid_login_credentials()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Invalid login credentials");
    }

    #[actix_web::test]
    async fn oversized_body_answers_413_with_message() {
        let (status, body) = body_of(AppError::payload_too_large()).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body["message"], "Request body too large");
    }

    #[actix_web::test]
    async fn internal_detail_is_not_leaked() {
        let (status, body) = body_of(AppError::internal("db password is hunter2")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Internal server error");
    }

    #[test]
    fn token_errors_set_www_authenticate() {
        let resp = AppError::token_invalid().error_response();
        assert_eq!(
            resp.headers()
                .get(actix_web::http::header::WWW_AUTHENTICATE)
                .and_then(|v| v.to_str().ok()),
            Some("Bearer")
        );
    }

    #[test]
    fn domain_errors_map_to_http_statuses() {
        let conflict: AppError = DomainError::conflict(ConflictKind::UniqueUsername, "Username already taken").into();
        assert_eq!(conflict.status(), StatusCode::CONFLICT);

        let unavailable: AppError =
            DomainError::infra(InfraErrorKind::DbUnavailable, "pool closed").into();
        assert_eq!(unavailable.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let missing: AppError =
            DomainError::not_found(NotFoundKind::Other("Record".into()), "Record not found").into();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }
}
