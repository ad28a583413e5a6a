//! Bearer-token verification and scope authorization.
//!
//! Tokens are issued elsewhere; this module only checks them. The whole
//! path is pure computation: no store or cache is consulted.

use jsonwebtoken::{DecodingKey, Validation};
use serde_json::{Map, Value};

use crate::config::AuthConfig;
use crate::error::AuthError;

const BEARER_PREFIX: &str = "Bearer ";

/// Subject id of a request that passed the scope gate.
///
/// Handlers read it from request-scoped context; holding one proves the
/// token was verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedSubject(pub String);

/// Gate every protected request against a required scope.
pub trait ScopeAuthorizer: Send + Sync {
    /// Check the raw `Authorization` header value against
    /// `required_scope`. An empty `required_scope` only requires a valid
    /// token with a subject.
    fn authorize(
        &self,
        required_scope: &str,
        authorization: Option<&str>,
    ) -> Result<AuthenticatedSubject, AuthError>;
}

/// HMAC-signed JWT verifier built from [`AuthConfig`].
#[derive(Clone)]
pub struct JwtScopeVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtScopeVerifier {
    pub fn new(config: &AuthConfig) -> Result<Self, AuthError> {
        if config.jwt_secret.is_empty() {
            return Err(AuthError::Crypto("JWT secret must not be empty".into()));
        }

        let mut validation = Validation::new(config.jwt_algorithm);
        validation.leeway = config.leeway_secs;
        validation.validate_exp = true;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp"]);

        Ok(Self {
            key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        })
    }

    /// Verify signature and expiry, returning the raw claim map.
    fn decode(&self, token: &str) -> Result<Map<String, Value>, AuthError> {
        jsonwebtoken::decode::<Map<String, Value>>(token, &self.key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }
}

impl ScopeAuthorizer for JwtScopeVerifier {
    fn authorize(
        &self,
        required_scope: &str,
        authorization: Option<&str>,
    ) -> Result<AuthenticatedSubject, AuthError> {
        let token = extract_bearer(authorization)?;
        let claims = self.decode(token)?;

        let scopes = granted_scopes(&claims)?;
        if !required_scope.is_empty() && !scopes.contains(&required_scope) {
            return Err(AuthError::InsufficientScope {
                required: required_scope.to_string(),
            });
        }

        claims
            .get("sub")
            .and_then(Value::as_str)
            .map(|sub| AuthenticatedSubject(sub.to_string()))
            .ok_or(AuthError::MissingSubject)
    }
}

fn extract_bearer(authorization: Option<&str>) -> Result<&str, AuthError> {
    let token = authorization
        .and_then(|h| h.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .ok_or(AuthError::MissingOrMalformedToken)?;

    if token.is_empty() {
        return Err(AuthError::MissingOrMalformedToken);
    }
    Ok(token)
}

/// The string entries of the `scope` claim. Non-string entries are
/// skipped, not rejected.
fn granted_scopes(claims: &Map<String, Value>) -> Result<Vec<&str>, AuthError> {
    let raw = claims
        .get("scope")
        .and_then(Value::as_array)
        .ok_or(AuthError::MalformedScopeClaim)?;

    Ok(raw.iter().filter_map(Value::as_str).collect())
}
