//! Error types for the Warden system.

use thiserror::Error;

/// Coarse error classification handed to the transport layer.
///
/// The handler layer maps each kind (plus [`WardenError::code`]) to a
/// status code; the core only decides which kind a failure is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input. Never retried; the caller must correct it.
    ValidationError,
    /// Missing, malformed, or insufficient credentials.
    AuthError,
    /// The referenced user or scope does not exist.
    NotFoundError,
    /// Persistence failure, including unique-constraint violations.
    StoreError,
    /// The durable write committed but the session marker could not be
    /// deleted. Re-invalidation may be needed; nothing is rolled back.
    CacheInvalidationError,
    Internal,
}

#[derive(Debug, Error)]
pub enum WardenError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Authentication failed: {reason}")]
    AuthenticationFailed { reason: String },

    #[error("Authorization denied: {reason}")]
    AuthorizationDenied { reason: String },

    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Entity already exists: {entity}")]
    AlreadyExists { entity: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Failed to create user: {source}")]
    CreateFailed {
        #[source]
        source: Box<WardenError>,
    },

    #[error("Session invalidation failed for {key}: {reason}")]
    CacheInvalidation { key: String, reason: String },

    #[error("Cryptography error: {0}")]
    Crypto(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl WardenError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } => ErrorKind::ValidationError,
            Self::AuthenticationFailed { .. } | Self::AuthorizationDenied { .. } => {
                ErrorKind::AuthError
            }
            Self::NotFound { .. } => ErrorKind::NotFoundError,
            Self::AlreadyExists { .. } | Self::Database(_) => ErrorKind::StoreError,
            // A failed create keeps the classification of whatever broke.
            Self::CreateFailed { source } => source.kind(),
            Self::CacheInvalidation { .. } => ErrorKind::CacheInvalidationError,
            Self::Crypto(_) | Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Stable machine-readable code for the `(success, code, message)`
    /// response envelope.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::AuthenticationFailed { .. } => "UNAUTHORIZED",
            Self::AuthorizationDenied { .. } => "FORBIDDEN",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::AlreadyExists { .. } => "CONFLICT",
            Self::Database(_) => "STORE_ERROR",
            Self::CreateFailed { source } => source.code(),
            Self::CacheInvalidation { .. } => "CACHE_INVALIDATION_FAILED",
            Self::Crypto(_) | Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

pub type WardenResult<T> = Result<T, WardenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_failed_inherits_cause_classification() {
        let dup = WardenError::CreateFailed {
            source: Box::new(WardenError::AlreadyExists {
                entity: "user".into(),
            }),
        };
        assert_eq!(dup.kind(), ErrorKind::StoreError);
        assert_eq!(dup.code(), "CONFLICT");

        let hash = WardenError::CreateFailed {
            source: Box::new(WardenError::Crypto("bad params".into())),
        };
        assert_eq!(hash.kind(), ErrorKind::Internal);
    }

    #[test]
    fn auth_variants_share_a_kind() {
        let unauth = WardenError::AuthenticationFailed {
            reason: "missing token".into(),
        };
        let denied = WardenError::AuthorizationDenied {
            reason: "insufficient scope".into(),
        };
        assert_eq!(unauth.kind(), ErrorKind::AuthError);
        assert_eq!(denied.kind(), ErrorKind::AuthError);
        assert_ne!(unauth.code(), denied.code());
    }

    #[test]
    fn cache_failure_is_distinct_from_store_failure() {
        let err = WardenError::CacheInvalidation {
            key: "refresh:abc".into(),
            reason: "connection refused".into(),
        };
        assert_eq!(err.kind(), ErrorKind::CacheInvalidationError);
        assert!(err.to_string().contains("refresh:abc"));
    }
}
