//! Identity claims carried by access tokens.

use serde::{Deserialize, Serialize};

/// Who the caller is, as of the moment the token was issued.
///
/// Tokens are snapshots: later changes to the user record do not show up
/// here until a new token is issued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPayload {
    /// users.user_id
    pub subject: i64,
    pub username: String,
    pub role_name: String,
}

/// Everything that gets signed: the payload plus the standard time claims.
///
/// After a successful verification this is inserted into request extensions
/// by the auth gate and is what downstream stages read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub subject: i64,
    pub username: String,
    pub role_name: String,
    /// Issued-at (seconds since epoch)
    pub iat: i64,
    /// Expiry (seconds since epoch)
    pub exp: i64,
}

impl Claims {
    pub fn new(payload: TokenPayload, iat: i64, exp: i64) -> Self {
        Self {
            subject: payload.subject,
            username: payload.username,
            role_name: payload.role_name,
            iat,
            exp,
        }
    }

    pub fn payload(&self) -> TokenPayload {
        TokenPayload {
            subject: self.subject,
            username: self.username.clone(),
            role_name: self.role_name.clone(),
        }
    }
}
