use std::time::SystemTime;

use sea_orm::{DatabaseConnection, TransactionTrait};
use tracing::{debug, info};

use crate::auth::claims::TokenPayload;
use crate::auth::jwt::mint_access_token;
use crate::auth::password;
use crate::error::AppError;
use crate::repos::users::{self, NewUser, User};
use crate::state::security_config::SecurityConfig;

/// Registration input with an already-normalized role name.
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub password: String,
    pub role_name: String,
}

/// A user together with a freshly issued access token.
#[derive(Debug, Clone)]
pub struct Authenticated {
    pub user: User,
    pub token: String,
}

/// Sign a token carrying the user's id, username and role as of now.
pub fn issue_token(
    user: &User,
    now: SystemTime,
    security: &SecurityConfig,
) -> Result<String, AppError> {
    let payload = TokenPayload {
        subject: user.user_id,
        username: user.username.clone(),
        role_name: user.role_name.clone(),
    };
    mint_access_token(&payload, now, security)
}

/// Reject logins for usernames that have no account.
pub async fn check_username_exists(
    db: &DatabaseConnection,
    username: &str,
) -> Result<(), AppError> {
    match users::find_by_username(db, username).await? {
        Some(_) => Ok(()),
        None => {
            debug!(username = %username, "login for unknown username");
            Err(AppError::invalid_credentials())
        }
    }
}

/// Hash the password, store the user and issue its first token.
pub async fn register(
    db: &DatabaseConnection,
    security: &SecurityConfig,
    registration: Registration,
) -> Result<Authenticated, AppError> {
    let Registration {
        username,
        password,
        role_name,
    } = registration;

    if username.trim().is_empty() || password.is_empty() {
        return Err(AppError::bad_request("username and password are required"));
    }

    let password_hash = password::hash(password).await?;

    let txn = db.begin().await?;
    let user = users::add(
        &txn,
        NewUser {
            username,
            password_hash,
            role_name,
        },
    )
    .await?;
    txn.commit().await?;

    let token = issue_token(&user, SystemTime::now(), security)?;

    info!(
        user_id = user.user_id,
        username = %user.username,
        role_name = %user.role_name,
        "user registered"
    );

    Ok(Authenticated { user, token })
}

/// Check credentials and issue a token.
///
/// Unknown user and wrong password are reported identically.
pub async fn login(
    db: &DatabaseConnection,
    security: &SecurityConfig,
    username: &str,
    password: String,
) -> Result<Authenticated, AppError> {
    let Some(user) = users::find_by_username(db, username).await? else {
        return Err(AppError::invalid_login_credentials());
    };

    if !password::compare(password, user.password.clone()).await? {
        debug!(user_id = user.user_id, "password mismatch");
        return Err(AppError::invalid_login_credentials());
    }

    let token = issue_token(&user, SystemTime::now(), security)?;
    info!(user_id = user.user_id, username = %user.username, "user logged in");

    Ok(Authenticated { user, token })
}

#[cfg(test)]
mod tests {
    use std::time::SystemTime;

    use actix_web::http::StatusCode;

    use super::{check_username_exists, issue_token, login, register, Registration};
    use crate::auth::jwt::verify_access_token;
    use crate::infra::db::bootstrap_db;
    use crate::repos::users::User;
    use crate::state::security_config::SecurityConfig;

    fn registration(username: &str, password: &str) -> Registration {
        Registration {
            username: username.to_string(),
            password: password.to_string(),
            role_name: "student".to_string(),
        }
    }

    #[test]
    fn issued_token_carries_user_fields() {
        let security = SecurityConfig::default();
        let user = User {
            user_id: 3,
            username: "anna".to_string(),
            role_name: "student".to_string(),
            password: String::new(),
        };

        let token = issue_token(&user, SystemTime::now(), &security).unwrap();
        let claims = verify_access_token(&token, &security).unwrap();
        assert_eq!(claims.subject, 3);
        assert_eq!(claims.username, "anna");
        assert_eq!(claims.role_name, "student");
    }

    #[tokio::test]
    async fn register_stores_hash_not_plaintext() {
        let db = bootstrap_db("sqlite::memory:").await.unwrap();
        let security = SecurityConfig::default();

        let outcome = register(&db, &security, registration("anna", "1234"))
            .await
            .unwrap();

        assert_ne!(outcome.user.password, "1234");
        assert!(outcome.user.password.starts_with("$argon2"));
        assert!(verify_access_token(&outcome.token, &security).is_ok());
    }

    #[tokio::test]
    async fn register_rejects_blank_credentials() {
        let db = bootstrap_db("sqlite::memory:").await.unwrap();
        let security = SecurityConfig::default();

        let err = register(&db, &security, registration("  ", "1234"))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let err = register(&db, &security, registration("anna", ""))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn duplicate_registration_is_conflict() {
        let db = bootstrap_db("sqlite::memory:").await.unwrap();
        let security = SecurityConfig::default();

        register(&db, &security, registration("anna", "1234"))
            .await
            .unwrap();
        let err = register(&db, &security, registration("anna", "5678"))
            .await
            .unwrap_err();

        assert_eq!(err.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn login_outcomes() {
        let db = bootstrap_db("sqlite::memory:").await.unwrap();
        let security = SecurityConfig::default();
        register(&db, &security, registration("anna", "1234"))
            .await
            .unwrap();

        assert!(check_username_exists(&db, "anna").await.is_ok());
        let err = check_username_exists(&db, "bob").await.unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);

        let ok = login(&db, &security, "anna", "1234".to_string())
            .await
            .unwrap();
        assert_eq!(ok.user.username, "anna");

        let err = login(&db, &security, "anna", "wrong".to_string())
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }
}
