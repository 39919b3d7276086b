use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::db::require_db;
use crate::error::AppError;
use crate::extractors::ValidatedJson;
use crate::repos::users::User;
use crate::services::role_name::validate_role_name;
use crate::services::users::{self as user_service, Registration};
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub role_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub data: User,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
}

async fn register(
    body: ValidatedJson<RegisterRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let RegisterRequest {
        username,
        password,
        role_name,
    } = body.into_inner();

    let role_name = validate_role_name(role_name.as_deref())?;
    let db = require_db(&app_state)?;

    let outcome = user_service::register(
        db,
        &app_state.security,
        Registration {
            username,
            password,
            role_name,
        },
    )
    .await?;

    Ok(HttpResponse::Created().json(RegisterResponse {
        data: outcome.user,
        token: outcome.token,
    }))
}

async fn login(
    body: ValidatedJson<LoginRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let LoginRequest { username, password } = body.into_inner();
    let db = require_db(&app_state)?;

    user_service::check_username_exists(db, &username).await?;
    let outcome = user_service::login(db, &app_state.security, &username, password).await?;

    Ok(HttpResponse::Ok().json(LoginResponse {
        message: format!("{} is back!", outcome.user.username),
        token: outcome.token,
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/register").route(web::post().to(register)))
        .service(web::resource("/login").route(web::post().to(login)));
}
