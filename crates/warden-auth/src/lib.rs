//! Warden Auth — bearer-token scope verification and password hashing.

pub mod config;
pub mod error;
pub mod password;
pub mod token;

pub use config::AuthConfig;
pub use error::AuthError;
pub use token::{AuthenticatedSubject, JwtScopeVerifier, ScopeAuthorizer};
