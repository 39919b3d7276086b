use std::time::Duration;

use migration::{migrate, MigrationCommand};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use tracing::info;

use crate::error::AppError;

/// Open a connection pool for `database_url`. Does NOT run migrations.
pub async fn connect_db(database_url: &str) -> Result<DatabaseConnection, AppError> {
    let mut options = ConnectOptions::new(database_url.to_owned());
    options
        .connect_timeout(Duration::from_secs(5))
        .sqlx_logging(false);

    // Every pooled connection to `:memory:` would otherwise see its own
    // empty database.
    if database_url.contains(":memory:") {
        options.max_connections(1).min_connections(1);
    }

    let conn = Database::connect(options)
        .await
        .map_err(|e| AppError::config(format!("Failed to connect to database: {e}")))?;
    Ok(conn)
}

/// Single entrypoint used by the state builder: connect, then migrate up.
pub async fn bootstrap_db(database_url: &str) -> Result<DatabaseConnection, AppError> {
    let conn = connect_db(database_url).await?;

    migrate(&conn, MigrationCommand::Up)
        .await
        .map_err(|e| AppError::config(format!("Failed to migrate database: {e}")))?;

    info!(backend = ?conn.get_database_backend(), "database ready");
    Ok(conn)
}
