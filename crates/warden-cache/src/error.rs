//! Cache-layer error types and conversions.

use warden_core::error::WardenError;

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("cache connection error: {0}")]
    Connection(String),

    #[error("cache command on {key} failed: {reason}")]
    Command { key: String, reason: String },

    #[error("unknown cache backend: {0}")]
    UnknownBackend(String),
}

impl From<CacheError> for WardenError {
    fn from(err: CacheError) -> Self {
        match err {
            CacheError::Command { key, reason } => WardenError::CacheInvalidation { key, reason },
            other => WardenError::Internal(other.to_string()),
        }
    }
}
