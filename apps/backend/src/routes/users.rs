use actix_web::{web, HttpResponse};
use tracing::debug;

use crate::db::require_db;
use crate::error::AppError;
use crate::extractors::Identity;
use crate::middleware::RoleGate;
use crate::repos::users;
use crate::state::app_state::AppState;

async fn list_users(
    identity: Identity,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let all = users::find_all(db).await?;

    debug!(
        caller = identity.user_id(),
        caller_role = %identity.role_name(),
        count = all.len(),
        "listed users"
    );
    Ok(HttpResponse::Ok().json(all))
}

async fn get_user(
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user_id = path.into_inner();
    let db = require_db(&app_state)?;

    let user = users::find_by_id(db, user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    Ok(HttpResponse::Ok().json(user))
}

/// Routes under `/api/users`; the caller wraps the scope in `AuthGate`.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("").route(web::get().to(list_users)))
        .service(
            web::resource("/{user_id}")
                .wrap(RoleGate::new("admin"))
                .route(web::get().to(get_user)),
        );
}
