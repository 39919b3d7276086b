mod common;

use std::time::SystemTime;

use actix_web::test;
use auth_backend::auth::{mint_access_token, TokenPayload};
use auth_backend::db::require_db;
use auth_backend::repos::users::{self, NewUser};
use backend_test_support::http::{assert_message, bearer, json_body};
use common::{init_app, register_token, security, test_state};

fn admin_token() -> String {
    let payload = TokenPayload {
        subject: 1,
        username: "root".to_string(),
        role_name: "admin".to_string(),
    };
    mint_access_token(&payload, SystemTime::now(), &security()).unwrap()
}

#[actix_web::test]
async fn test_list_requires_token() {
    let app = init_app(test_state().await).await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/api/users").to_request()).await;
    assert_message(resp, 401, "Token required").await;
}

#[actix_web::test]
async fn test_list_returns_users_in_id_order_without_passwords() {
    let app = init_app(test_state().await).await;
    let token = register_token(&app, "anna", "1234").await;
    register_token(&app, "bob", "5678").await;

    let req = test::TestRequest::get()
        .uri("/api/users")
        .insert_header(bearer(&token))
        .to_request();
    let body = json_body(test::call_service(&app, req).await, 200).await;

    let list = body.as_array().unwrap();
    let names: Vec<&str> = list.iter().map(|u| u["username"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["anna", "bob"]);
    assert!(list.iter().all(|u| u.get("password").is_none()));
    assert!(list[0]["user_id"].as_i64().unwrap() < list[1]["user_id"].as_i64().unwrap());
}

#[actix_web::test]
async fn test_get_user_by_id_is_admin_only() {
    let app = init_app(test_state().await).await;
    let student = register_token(&app, "anna", "1234").await;

    let req = test::TestRequest::get()
        .uri("/api/users/1")
        .insert_header(bearer(&student))
        .to_request();
    assert_message(test::call_service(&app, req).await, 403, "This is not for you").await;
}

#[actix_web::test]
async fn test_get_user_by_id_for_admin() {
    let state = test_state().await;
    let db = require_db(&state).unwrap().clone();
    let seeded = users::add(
        &db,
        NewUser {
            username: "root".to_string(),
            password_hash: "$argon2id$unused".to_string(),
            role_name: "admin".to_string(),
        },
    )
    .await
    .unwrap();
    let app = init_app(state).await;

    let req = test::TestRequest::get()
        .uri(&format!("/api/users/{}", seeded.user_id))
        .insert_header(bearer(&admin_token()))
        .to_request();
    let body = json_body(test::call_service(&app, req).await, 200).await;

    assert_eq!(body["username"], "root");
    assert_eq!(body["role_name"], "admin");
    assert!(body.get("password").is_none());
}

#[actix_web::test]
async fn test_get_unknown_user_is_not_found() {
    let app = init_app(test_state().await).await;

    let req = test::TestRequest::get()
        .uri("/api/users/999")
        .insert_header(bearer(&admin_token()))
        .to_request();
    assert_message(test::call_service(&app, req).await, 404, "User not found").await;
}

#[actix_web::test]
async fn test_role_gate_runs_after_auth_gate() {
    let app = init_app(test_state().await).await;

    let resp =
        test::call_service(&app, test::TestRequest::get().uri("/api/users/1").to_request()).await;
    assert_message(resp, 401, "Token required").await;
}

#[actix_web::test]
async fn test_list_is_open_to_every_role() {
    let app = init_app(test_state().await).await;
    let student = register_token(&app, "anna", "1234").await;

    for token in [student, admin_token()] {
        let req = test::TestRequest::get()
            .uri("/api/users")
            .insert_header(bearer(&token))
            .to_request();
        let body = json_body(test::call_service(&app, req).await, 200).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
    }
}
