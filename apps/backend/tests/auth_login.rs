mod common;

use actix_web::test;
use auth_backend::verify_access_token;
use backend_test_support::http::{assert_message, json_body};
use common::{init_app, register_token, security, test_state};
use serde_json::json;

#[actix_web::test]
async fn test_login_with_correct_password() {
    let app = init_app(test_state().await).await;
    let registered = register_token(&app, "anna", "1234").await;

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "username": "anna", "password": "1234" }))
        .to_request();
    let body = json_body(test::call_service(&app, req).await, 200).await;

    assert_eq!(body["message"], "anna is back!");
    let token = body["token"].as_str().unwrap();
    let claims = verify_access_token(token, &security()).unwrap();
    let registered_claims = verify_access_token(&registered, &security()).unwrap();
    assert_eq!(claims.payload(), registered_claims.payload());
}

#[actix_web::test]
async fn test_login_with_wrong_password_is_not_found() {
    let app = init_app(test_state().await).await;
    register_token(&app, "anna", "1234").await;

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "username": "anna", "password": "4321" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_message(resp, 404, "Invalid login credentials").await;
}

#[actix_web::test]
async fn test_login_with_unknown_username_is_unauthorized() {
    let app = init_app(test_state().await).await;

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "username": "ghost", "password": "1234" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_message(resp, 401, "Invalid credentials").await;
}

#[actix_web::test]
async fn test_login_username_is_case_sensitive() {
    let app = init_app(test_state().await).await;
    register_token(&app, "anna", "1234").await;

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "username": "Anna", "password": "1234" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_message(resp, 401, "Invalid credentials").await;
}

#[actix_web::test]
async fn test_login_token_opens_protected_routes() {
    let app = init_app(test_state().await).await;
    register_token(&app, "anna", "1234").await;

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "username": "anna", "password": "1234" }))
        .to_request();
    let body = json_body(test::call_service(&app, req).await, 200).await;
    let token = body["token"].as_str().unwrap();

    let req = test::TestRequest::get()
        .uri("/api/users")
        .insert_header(backend_test_support::http::bearer(token))
        .to_request();
    let users = json_body(test::call_service(&app, req).await, 200).await;
    assert_eq!(users.as_array().map(Vec::len), Some(1));
}
