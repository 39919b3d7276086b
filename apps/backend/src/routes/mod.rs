use actix_web::web;

use crate::middleware::AuthGate;

pub mod auth;
pub mod health;
pub mod users;

/// Register every route. Shared by `main.rs` and the integration tests so
/// both exercise the same gates.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // Health check: /health
    health::configure_routes(cfg);

    // Auth routes: /api/auth/** (no token needed)
    cfg.service(web::scope("/api/auth").configure(auth::configure_routes));

    // User routes: /api/users/** (token required)
    cfg.service(
        web::scope("/api/users")
            .wrap(AuthGate)
            .configure(users::configure_routes),
    );
}
