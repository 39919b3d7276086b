#![allow(dead_code)]

// tests/common/mod.rs
pub mod proptest_prelude;

use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, web, App};
use auth_backend::infra::state::build_state;
use auth_backend::middleware::{RequestTrace, TraceSpan};
use auth_backend::routes;
use auth_backend::state::{AppState, SecurityConfig};
use serde_json::{json, Value};

// Logging is auto-installed for every test binary that declares `mod common`
#[ctor::ctor]
fn init_logging() {
    backend_test_support::logging::init();
}

pub const TEST_SECRET: &str = "test_secret_key_for_testing_purposes_only";

pub fn security() -> SecurityConfig {
    SecurityConfig::new(TEST_SECRET.as_bytes())
}

/// Fresh state over a private in-memory SQLite database with migrations applied.
pub async fn test_state() -> AppState {
    build_state()
        .with_db("sqlite::memory:")
        .with_security(security())
        .build()
        .await
        .expect("build test state")
}

/// Production routes and request middleware over `state`.
pub async fn init_app(
    state: AppState,
) -> impl Service<
    actix_http::Request,
    Response = ServiceResponse<impl MessageBody>,
    Error = actix_web::Error,
> {
    test::init_service(
        App::new()
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(web::Data::new(state))
            .configure(routes::configure),
    )
    .await
}

/// POST /api/auth/register and return (status, body).
pub async fn register<S, B>(app: &S, body: Value) -> (u16, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(body)
        .to_request();
    let resp = test::call_service(app, req).await;
    let status = resp.status().as_u16();
    (status, test::read_body_json(resp).await)
}

/// Register `username`/`password` with the default role and return the token.
pub async fn register_token<S, B>(app: &S, username: &str, password: &str) -> String
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let (status, body) = register(app, json!({ "username": username, "password": password })).await;
    assert_eq!(status, 201, "registration failed: {body}");
    body["token"].as_str().expect("token string").to_string()
}
