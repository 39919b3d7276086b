use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest};

use crate::auth::claims::Claims;
use crate::error::AppError;

/// The authenticated caller, as decoded by `AuthGate`.
///
/// Only meaningful on routes behind the gate; elsewhere extraction fails
/// with 401 "Token required".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity(pub Claims);

impl Identity {
    pub fn user_id(&self) -> i64 {
        self.0.subject
    }

    pub fn role_name(&self) -> &str {
        &self.0.role_name
    }
}

impl FromRequest for Identity {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<Claims>()
                .cloned()
                .map(Identity)
                .ok_or_else(AppError::token_required),
        )
    }
}
