use crate::error::AppError;

/// Role given to registrations that do not ask for one.
pub const DEFAULT_ROLE: &str = "student";
/// Role that can only be seeded, never registered.
pub const RESERVED_ROLE: &str = "admin";
pub const MAX_ROLE_NAME_CHARS: usize = 32;

/// Normalize the optional role name of a registration.
///
/// Trims whitespace; missing or blank becomes [`DEFAULT_ROLE`].
pub fn validate_role_name(role_name: Option<&str>) -> Result<String, AppError> {
    let trimmed = role_name.map(str::trim).unwrap_or_default();

    if trimmed.is_empty() {
        return Ok(DEFAULT_ROLE.to_string());
    }
    if trimmed == RESERVED_ROLE {
        return Err(AppError::validation("Role name can not be admin"));
    }
    if trimmed.chars().count() > MAX_ROLE_NAME_CHARS {
        return Err(AppError::validation(
            "Role name can not be longer than 32 chars",
        ));
    }

    Ok(trimmed.to_string())
}
