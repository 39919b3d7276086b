use std::rc::Rc;

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, HttpMessage};
use futures_util::future::{ready, LocalBoxFuture, Ready};
use tracing::debug;

use crate::auth::claims::Claims;
use crate::error::AppError;

/// Admits only callers whose token carries exactly `required_role`.
///
/// Reads the claims left by `AuthGate`; without them the caller's role is
/// the empty string and the request is refused.
pub struct RoleGate {
    required_role: Rc<str>,
}

impl RoleGate {
    pub fn new(required_role: impl AsRef<str>) -> Self {
        Self {
            required_role: Rc::from(required_role.as_ref()),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RoleGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RoleGateMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RoleGateMiddleware {
            service,
            required_role: Rc::clone(&self.required_role),
        }))
    }
}

pub struct RoleGateMiddleware<S> {
    service: S,
    required_role: Rc<str>,
}

impl<S, B> Service<ServiceRequest> for RoleGateMiddleware<S>
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
        let role_name = req
            .extensions()
            .get::<Claims>()
            .map(|claims| claims.role_name.clone())
            .unwrap_or_default();

        if role_name != *self.required_role {
            debug!(
                role_name = %role_name,
                required_role = %self.required_role,
                "role mismatch"
            );
            let res = req
                .error_response(AppError::forbidden())
                .map_into_right_body();
            return Box::pin(async move { Ok(res) });
        }

        let fut = self.service.call(req);
        Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
    }
}
