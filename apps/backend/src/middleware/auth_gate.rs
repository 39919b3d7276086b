//! Bearer-token gate for protected scopes.
//!
//! Verifies the token in `Authorization: <scheme> <token>` and stores the
//! decoded `Claims` in request extensions for `RoleGate` and the `Identity`
//! extractor. Rejections are answered here and never reach the handler.

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{self, HeaderValue};
use actix_web::{web, Error, HttpMessage};
use futures_util::future::{ready, LocalBoxFuture, Ready};
use tracing::debug;

use crate::auth::jwt::verify_access_token;
use crate::error::AppError;
use crate::state::app_state::AppState;

pub struct AuthGate;

impl<S, B> Transform<S, ServiceRequest> for AuthGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthGateMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthGateMiddleware { service }))
    }
}

pub struct AuthGateMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for AuthGateMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let Some(token) = bearer_token(req.headers().get(header::AUTHORIZATION)).map(str::to_owned)
        else {
            return reject(req, AppError::token_required());
        };

        let Some(app_state) = req.app_data::<web::Data<AppState>>().cloned() else {
            return Box::pin(async {
                Err(AppError::internal("AppState not available in AuthGate").into())
            });
        };

        match verify_access_token(&token, &app_state.security) {
            Ok(claims) => {
                req.extensions_mut().insert(claims);

                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
            }
            Err(reason) => {
                debug!(reason = %reason, path = %req.path(), "token rejected");
                reject(req, AppError::token_invalid())
            }
        }
    }
}

fn reject<B: 'static>(
    req: ServiceRequest,
    err: AppError,
) -> LocalBoxFuture<'static, Result<ServiceResponse<EitherBody<B>>, Error>> {
    let res = req.error_response(err).map_into_right_body();
    Box::pin(async move { Ok(res) })
}

/// Second space-separated segment of the header value.
///
/// The scheme is not inspected. A missing header, a value that is not
/// visible ASCII, or an empty second segment all yield `None`.
pub fn bearer_token(header_value: Option<&HeaderValue>) -> Option<&str> {
    header_value?
        .to_str()
        .ok()?
        .split(' ')
        .nth(1)
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use actix_web::http::header::HeaderValue;

    use super::bearer_token;

    fn token_of(raw: &str) -> Option<String> {
        let value = HeaderValue::from_str(raw).unwrap();
        bearer_token(Some(&value)).map(str::to_owned)
    }

    #[test]
    fn missing_header_has_no_token() {
        assert_eq!(bearer_token(None), None);
    }

    #[test]
    fn second_segment_is_the_token() {
        assert_eq!(token_of("Bearer abc.def.ghi").as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn scheme_is_not_checked() {
        assert_eq!(token_of("Token abc").as_deref(), Some("abc"));
        assert_eq!(token_of("bearer abc").as_deref(), Some("abc"));
    }

    #[test]
    fn single_segment_has_no_token() {
        assert_eq!(token_of("abc.def.ghi"), None);
        assert_eq!(token_of("Bearer"), None);
        assert_eq!(token_of("Bearer "), None);
    }

    #[test]
    fn double_space_leaves_second_segment_empty() {
        assert_eq!(token_of("Bearer  abc"), None);
    }

    #[test]
    fn non_ascii_header_has_no_token() {
        let value = HeaderValue::from_bytes(b"Bearer \xfftoken").unwrap();
        assert_eq!(bearer_token(Some(&value)), None);
    }
}
