//! DTOs for users_sea adapter.

/// DTO for creating a new user.
#[derive(Debug, Clone)]
pub struct UserCreate {
    pub username: String,
    /// Already-hashed password
    pub password_hash: String,
    pub role_id: i64,
}

impl UserCreate {
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>, role_id: i64) -> Self {
        Self {
            username: username.into(),
            password_hash: password_hash.into(),
            role_id,
        }
    }
}
