//! Authentication error types.

use thiserror::Error;
use warden_core::error::WardenError;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("missing or malformed bearer token")]
    MissingOrMalformedToken,

    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("scope claim is missing or not a list")]
    MalformedScopeClaim,

    #[error("insufficient scope: {required} is required")]
    InsufficientScope { required: String },

    #[error("token carries no subject")]
    MissingSubject,

    #[error("cryptography error: {0}")]
    Crypto(String),
}

impl From<AuthError> for WardenError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingOrMalformedToken
            | AuthError::InvalidToken(_)
            | AuthError::MissingSubject => WardenError::AuthenticationFailed {
                reason: err.to_string(),
            },
            AuthError::MalformedScopeClaim | AuthError::InsufficientScope { .. } => {
                WardenError::AuthorizationDenied {
                    reason: err.to_string(),
                }
            }
            AuthError::Crypto(msg) => WardenError::Crypto(msg),
        }
    }
}
