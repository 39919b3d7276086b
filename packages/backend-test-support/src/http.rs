//! Assertions over actix test responses.

use actix_web::body::MessageBody;
use actix_web::dev::ServiceResponse;
use actix_web::http::header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use actix_web::test;
use serde_json::Value;

/// `Authorization` header pair carrying `token` with the Bearer scheme.
pub fn bearer(token: &str) -> (actix_web::http::header::HeaderName, String) {
    (AUTHORIZATION, format!("Bearer {token}"))
}

/// Assert status and that the body is the JSON error `{"message": message}`.
pub async fn assert_message<B: MessageBody>(
    resp: ServiceResponse<B>,
    expected_status: u16,
    expected_message: &str,
) {
    assert_eq!(resp.status().as_u16(), expected_status);

    let content_type = resp.headers().get(CONTENT_TYPE).cloned();
    assert_eq!(
        content_type,
        Some(HeaderValue::from_static("application/json")),
        "error responses must be JSON"
    );

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], expected_message, "unexpected body: {body}");
}

/// Assert a 2xx-or-other status and return the JSON body.
pub async fn json_body<B: MessageBody>(resp: ServiceResponse<B>, expected_status: u16) -> Value {
    assert_eq!(resp.status().as_u16(), expected_status);
    test::read_body_json(resp).await
}
