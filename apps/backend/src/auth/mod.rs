pub mod claims;
pub mod jwt;
pub mod password;

pub use claims::{Claims, TokenPayload};
pub use jwt::{mint_access_token, verify_access_token, verify_access_token_at, VerificationError};
