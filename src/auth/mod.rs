//! Authentication: password hashing, bearer tokens and request validation

pub mod extract;
pub mod jwt;
pub mod password;
pub mod validation;

use thiserror::Error;

/// Authentication errors
#[derive(Error, Debug, PartialEq)]
pub enum AuthError {
    /// Token signature is valid but it has expired
    #[error("Token expired")]
    Expired,

    /// Token is malformed, signed with another key, or of the wrong kind
    #[error("Invalid token")]
    Invalid,

    /// Password hashing failed
    #[error("Password hashing failed: {0}")]
    Hashing(String),

    /// Token signing failed
    #[error("Token signing failed: {0}")]
    Signing(String),
}

pub type AuthResult<T> = Result<T, AuthError>;

pub use extract::{bearer_token, AuthUser};
pub use jwt::{Claims, TokenIssuer, TokenKind};
pub use password::{hash_password, verify_password};
pub use validation::{normalize_email, Validator};
