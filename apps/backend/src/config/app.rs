use std::env;
use std::fmt;

use crate::error::AppError;
use crate::state::security_config::SecurityConfig;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 9000;
const DEFAULT_DATABASE_URL: &str = "sqlite://auth.db?mode=rwc";

/// Process configuration, read once from the environment at startup.
#[derive(Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub database_url: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let host = env::var("BACKEND_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let port = port()?;
        let jwt_secret = must_var("BACKEND_JWT_SECRET")?;
        if jwt_secret.trim().is_empty() {
            return Err(AppError::config(
                "Environment variable 'BACKEND_JWT_SECRET' must not be empty",
            ));
        }
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

        Ok(Self {
            host,
            port,
            jwt_secret,
            database_url,
        })
    }

    pub fn security(&self) -> SecurityConfig {
        SecurityConfig::new(self.jwt_secret.as_bytes())
    }

    pub fn bind_addr(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("jwt_secret", &"[REDACTED]")
            .field("database_url", &self.database_url)
            .finish()
    }
}

/// Get bind port from environment (defaults to 9000)
fn port() -> Result<u16, AppError> {
    match env::var("BACKEND_PORT") {
        Ok(raw) => raw.trim().parse::<u16>().map_err(|_| {
            AppError::config(format!("BACKEND_PORT must be a valid port number, got: '{raw}'"))
        }),
        Err(_) => Ok(DEFAULT_PORT),
    }
}

/// Get required environment variable or return error
fn must_var(name: &str) -> Result<String, AppError> {
    env::var(name)
        .map_err(|_| AppError::config(format!("Required environment variable '{name}' is not set")))
}
