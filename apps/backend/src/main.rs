use actix_web::{web, App, HttpServer};
use auth_backend::config::AppConfig;
use auth_backend::infra::state::build_state;
use auth_backend::middleware::{RequestTrace, StructuredLogger, TraceSpan};
use auth_backend::routes;
use tracing::info;

mod telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment variables must be set by the runtime environment
    // (docker env_file, or `set -a; . ./.env; set +a` locally).
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    };

    let app_state = match build_state()
        .with_db(config.database_url.clone())
        .with_security(config.security())
        .build()
        .await
    {
        Ok(state) => state,
        Err(e) => {
            eprintln!("❌ Failed to build application state: {e}");
            std::process::exit(1);
        }
    };

    let (host, port) = config.bind_addr();
    info!(host = %host, port, "starting auth backend");

    let data = web::Data::new(app_state);

    HttpServer::new(move || {
        App::new()
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .wrap(StructuredLogger)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
