//! `GET /health`: liveness plus the readiness of what token auth depends on.
//!
//! Always answers 200 while the process is serving. Each dependency is
//! reported separately and any failing one turns `status` into `"degraded"`.

use actix_web::{web, HttpResponse};
use migration::get_latest_migration_version;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::warn;

use crate::adapters::users_sea;
use crate::state::app_state::AppState;

/// Role that can only exist through the migration seed.
const SEEDED_ROLE: &str = "admin";

#[derive(Debug, Serialize)]
struct HealthReport {
    status: &'static str,
    version: &'static str,
    database: &'static str,
    schema: Option<String>,
    roles_seeded: bool,
    signing_key: &'static str,
    checked_at: String,
}

struct StorageCheck {
    database: &'static str,
    schema: Option<String>,
    roles_seeded: bool,
}

async fn check_storage(db: Option<&DatabaseConnection>) -> StorageCheck {
    let Some(db) = db else {
        return StorageCheck {
            database: "unavailable",
            schema: None,
            roles_seeded: false,
        };
    };

    if let Err(e) = db.ping().await {
        warn!(error = %e, "health: database ping failed");
        return StorageCheck {
            database: "unreachable",
            schema: None,
            roles_seeded: false,
        };
    }

    let schema = get_latest_migration_version(db).await.unwrap_or_else(|e| {
        warn!(error = %e, "health: reading applied migrations failed");
        None
    });
    let roles_seeded = match users_sea::find_role_by_name(db, SEEDED_ROLE).await {
        Ok(role) => role.is_some(),
        Err(e) => {
            warn!(error = %e, "health: role lookup failed");
            false
        }
    };

    StorageCheck {
        database: "ok",
        schema,
        roles_seeded,
    }
}

async fn health(app_state: web::Data<AppState>) -> HttpResponse {
    let storage = check_storage(app_state.db()).await;
    let signing_key = if app_state.security.jwt_secret.is_empty() {
        "missing"
    } else {
        "configured"
    };

    let healthy = storage.database == "ok" && storage.roles_seeded && signing_key == "configured";

    HttpResponse::Ok().json(HealthReport {
        status: if healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        database: storage.database,
        schema: storage.schema,
        roles_seeded: storage.roles_seeded,
        signing_key,
        checked_at: OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_else(|_| "unknown".to_string()),
    })
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health));
}
