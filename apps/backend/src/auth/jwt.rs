use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use crate::auth::claims::{Claims, TokenPayload};
use crate::state::security_config::SecurityConfig;
use crate::AppError;

/// Lifetime of an access token: exactly one day.
pub const ACCESS_TOKEN_TTL_SECS: i64 = 24 * 60 * 60;

/// Why a token was rejected.
///
/// Callers answer every variant the same way; the distinction only exists
/// for debug logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VerificationError {
    #[error("token expired")]
    Expired,
    #[error("signature mismatch")]
    InvalidSignature,
    #[error("malformed token")]
    Malformed,
}

fn unix_secs(at: SystemTime) -> Result<i64, AppError> {
    at.duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .map_err(|_| AppError::internal("System clock is before the Unix epoch".to_string()))
}

/// Mint a signed access token for `payload`, valid for 24 hours from `now`.
pub fn mint_access_token(
    payload: &TokenPayload,
    now: SystemTime,
    security: &SecurityConfig,
) -> Result<String, AppError> {
    let iat = unix_secs(now)?;
    let claims = Claims::new(payload.clone(), iat, iat + ACCESS_TOKEN_TTL_SECS);

    encode(
        &Header::new(security.algorithm),
        &claims,
        &EncodingKey::from_secret(&security.jwt_secret),
    )
    .map_err(|e| AppError::internal(format!("Failed to encode JWT: {e}")))
}

/// Verify a token against the current wall clock.
pub fn verify_access_token(
    token: &str,
    security: &SecurityConfig,
) -> Result<Claims, VerificationError> {
    verify_access_token_at(token, SystemTime::now(), security)
}

/// Verify signature, algorithm and expiry as of `now`.
///
/// A token stays valid up to and including its `exp` second; there is no
/// leeway.
pub fn verify_access_token_at(
    token: &str,
    now: SystemTime,
    security: &SecurityConfig,
) -> Result<Claims, VerificationError> {
    // Signature and algorithm are checked by the library, expiry below
    // against the caller-supplied clock.
    let mut validation = Validation::new(security.algorithm);
    validation.validate_exp = false;
    validation.leeway = 0;

    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(&security.jwt_secret),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::InvalidSignature => VerificationError::InvalidSignature,
        ErrorKind::ExpiredSignature => VerificationError::Expired,
        _ => VerificationError::Malformed,
    })?;

    let now = now
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0);
    if now > claims.exp {
        return Err(VerificationError::Expired);
    }

    Ok(claims)
}
