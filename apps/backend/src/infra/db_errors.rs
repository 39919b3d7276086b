//! SeaORM -> DomainError translation helpers.
//!
//! Adapters convert `sea_orm::DbErr` into `DomainError` here; higher layers
//! map `DomainError` to `AppError` via `From`.

use tracing::{error, warn};

use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind, NotFoundKind};

/// Extract table.column from SQLite "UNIQUE constraint failed: table.column" messages.
fn extract_sqlite_table_column(error_msg: &str) -> Option<&str> {
    let (_, rest) = error_msg.split_once("UNIQUE constraint failed: ")?;
    rest.split(|c: char| c.is_whitespace() || c == '"' || c == ',')
        .next()
        .filter(|s| !s.is_empty())
}

fn map_unique_violation(error_msg: &str) -> Option<(ConflictKind, &'static str)> {
    let sqlite_column = extract_sqlite_table_column(error_msg);

    if sqlite_column == Some("users.username") || error_msg.contains("users_username_key") {
        return Some((ConflictKind::UniqueUsername, "Username already taken"));
    }
    if sqlite_column == Some("roles.role_name") || error_msg.contains("roles_role_name_key") {
        return Some((ConflictKind::UniqueRoleName, "Role name already exists"));
    }
    None
}

fn is_unique_violation(error_msg: &str) -> bool {
    error_msg.contains("UNIQUE constraint failed")
        || error_msg.contains("23505")
        || error_msg.contains("duplicate key value")
}

fn is_connection_failure(e: &sea_orm::DbErr) -> bool {
    matches!(
        e,
        sea_orm::DbErr::Conn(_) | sea_orm::DbErr::ConnectionAcquire(_)
    )
}

/// Translate a `DbErr` into a `DomainError` with sanitized detail.
pub fn map_db_err(e: sea_orm::DbErr) -> DomainError {
    let error_msg = e.to_string();

    if let sea_orm::DbErr::RecordNotFound(_) = &e {
        return DomainError::not_found(NotFoundKind::Other("Record".into()), "Record not found");
    }

    if is_connection_failure(&e) {
        error!(error = %error_msg, "database connection failure");
        return DomainError::infra(InfraErrorKind::DbUnavailable, "Database unavailable");
    }

    if is_unique_violation(&error_msg) {
        if let Some((kind, detail)) = map_unique_violation(&error_msg) {
            warn!(kind = ?kind, "unique constraint violation");
            return DomainError::conflict(kind, detail);
        }
        warn!(error = %error_msg, "unmapped unique constraint violation");
        return DomainError::conflict(
            ConflictKind::Other("Unique".into()),
            "Unique constraint violation",
        );
    }

    error!(error = %error_msg, "unexpected database error");
    DomainError::infra(
        InfraErrorKind::Other("Database".into()),
        "Database operation failed",
    )
}

#[cfg(test)]
mod tests {
    use super::{extract_sqlite_table_column, map_db_err};
    use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind, NotFoundKind};

    #[test]
    fn extracts_sqlite_column() {
        assert_eq!(
            extract_sqlite_table_column("error returned from database: (code: 2067) UNIQUE constraint failed: users.username"),
            Some("users.username")
        );
        assert_eq!(extract_sqlite_table_column("some other failure"), None);
    }

    #[test]
    fn sqlite_username_violation_is_conflict() {
        let err = sea_orm::DbErr::Custom(
            "UNIQUE constraint failed: users.username".to_string(),
        );
        assert_eq!(
            map_db_err(err),
            DomainError::conflict(ConflictKind::UniqueUsername, "Username already taken")
        );
    }

    #[test]
    fn postgres_username_violation_is_conflict() {
        let err = sea_orm::DbErr::Custom(
            "duplicate key value violates unique constraint \"users_username_key\" (SQLSTATE 23505)"
                .to_string(),
        );
        assert!(matches!(
            map_db_err(err),
            DomainError::Conflict(ConflictKind::UniqueUsername, _)
        ));
    }

    #[test]
    fn record_not_found_maps_to_not_found() {
        let err = sea_orm::DbErr::RecordNotFound("users".to_string());
        assert!(matches!(
            map_db_err(err),
            DomainError::NotFound(NotFoundKind::Other(_), _)
        ));
    }

    #[test]
    fn other_errors_are_infra() {
        let err = sea_orm::DbErr::Custom("disk I/O error".to_string());
        assert!(matches!(
            map_db_err(err),
            DomainError::Infra(InfraErrorKind::Other(_), _)
        ));
    }
}
