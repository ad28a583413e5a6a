//! Authentication configuration.

use jsonwebtoken::Algorithm;

/// Configuration for token verification and password hashing.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Shared HMAC secret the presented tokens are signed with.
    pub jwt_secret: String,
    /// Signature algorithm (default: HS256).
    pub jwt_algorithm: Algorithm,
    /// Clock skew tolerated on `exp`, in seconds (default: 0).
    pub leeway_secs: u64,
    /// Optional pepper prepended to passwords before Argon2id hashing.
    pub pepper: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            jwt_algorithm: Algorithm::HS256,
            leeway_secs: 0,
            pepper: None,
        }
    }
}
