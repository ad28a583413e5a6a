//! Process configuration read from the environment.

use std::net::SocketAddr;

use anyhow::{Context, Result, bail};
use jsonwebtoken::Algorithm;
use warden_auth::AuthConfig;
use warden_cache::{CacheBackendKind, CacheConfig};
use warden_db::DbConfig;

/// Server configuration sourced from `WARDEN_*` environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub auth: AuthConfig,
    pub db: DbConfig,
    pub cache: CacheConfig,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unset keys fall back to the
    /// defaults of each sub-config; only the JWT secret is mandatory.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let bind_addr = lookup("WARDEN_BIND")
            .unwrap_or_else(|| "0.0.0.0:8080".to_string())
            .parse()
            .with_context(|| "parse WARDEN_BIND")?;

        let jwt_secret = lookup("WARDEN_JWT_SECRET").unwrap_or_default();
        if jwt_secret.trim().is_empty() {
            bail!("WARDEN_JWT_SECRET must be set");
        }

        let mut auth = AuthConfig {
            jwt_secret,
            pepper: lookup("WARDEN_PASSWORD_PEPPER").filter(|p| !p.is_empty()),
            ..AuthConfig::default()
        };
        if let Some(alg) = lookup("WARDEN_JWT_ALGORITHM") {
            auth.jwt_algorithm = parse_hmac_algorithm(&alg)?;
        }
        if let Some(leeway) = lookup("WARDEN_JWT_LEEWAY_SECS") {
            auth.leeway_secs = leeway
                .parse()
                .with_context(|| "parse WARDEN_JWT_LEEWAY_SECS")?;
        }

        let mut db = DbConfig::default();
        if let Some(url) = lookup("WARDEN_DB_URL") {
            db.url = url;
        }
        if let Some(ns) = lookup("WARDEN_DB_NAMESPACE") {
            db.namespace = ns;
        }
        if let Some(name) = lookup("WARDEN_DB_DATABASE") {
            db.database = name;
        }
        if let Some(user) = lookup("WARDEN_DB_USER") {
            db.username = user;
        }
        if let Some(password) = lookup("WARDEN_DB_PASSWORD") {
            db.password = password;
        }
        if let Some(attempts) = lookup("WARDEN_DB_CONNECT_ATTEMPTS") {
            db.connect_attempts = attempts
                .parse()
                .with_context(|| "parse WARDEN_DB_CONNECT_ATTEMPTS")?;
        }

        let mut cache = CacheConfig::default();
        if let Some(backend) = lookup("WARDEN_CACHE_BACKEND") {
            cache.backend = backend
                .parse::<CacheBackendKind>()
                .with_context(|| "parse WARDEN_CACHE_BACKEND")?;
        }
        if let Some(url) = lookup("WARDEN_REDIS_URL") {
            cache.redis_url = url;
        }

        Ok(Self {
            bind_addr,
            auth,
            db,
            cache,
        })
    }
}

fn parse_hmac_algorithm(raw: &str) -> Result<Algorithm> {
    match raw.trim().to_ascii_uppercase().as_str() {
        "HS256" => Ok(Algorithm::HS256),
        "HS384" => Ok(Algorithm::HS384),
        "HS512" => Ok(Algorithm::HS512),
        other => bail!("unsupported WARDEN_JWT_ALGORITHM {other}: only HMAC algorithms are accepted"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn missing_secret_is_an_error() {
        assert!(ServerConfig::from_lookup(lookup(&[])).is_err());
        assert!(ServerConfig::from_lookup(lookup(&[("WARDEN_JWT_SECRET", "  ")])).is_err());
    }

    #[test]
    fn defaults_apply_when_only_secret_is_set() {
        let cfg = ServerConfig::from_lookup(lookup(&[("WARDEN_JWT_SECRET", "s3cret")])).unwrap();
        assert_eq!(cfg.bind_addr.port(), 8080);
        assert_eq!(cfg.auth.jwt_algorithm, Algorithm::HS256);
        assert_eq!(cfg.auth.leeway_secs, 0);
        assert!(cfg.auth.pepper.is_none());
        assert_eq!(cfg.db.namespace, "warden");
        assert_eq!(cfg.cache.backend, CacheBackendKind::Redis);
    }

    #[test]
    fn overrides_are_read() {
        let cfg = ServerConfig::from_lookup(lookup(&[
            ("WARDEN_JWT_SECRET", "s3cret"),
            ("WARDEN_BIND", "127.0.0.1:9000"),
            ("WARDEN_JWT_ALGORITHM", "hs512"),
            ("WARDEN_JWT_LEEWAY_SECS", "30"),
            ("WARDEN_PASSWORD_PEPPER", "pep"),
            ("WARDEN_DB_URL", "db:8000"),
            ("WARDEN_DB_CONNECT_ATTEMPTS", "10"),
            ("WARDEN_CACHE_BACKEND", "memory"),
        ]))
        .unwrap();
        assert_eq!(cfg.bind_addr.port(), 9000);
        assert_eq!(cfg.auth.jwt_algorithm, Algorithm::HS512);
        assert_eq!(cfg.auth.leeway_secs, 30);
        assert_eq!(cfg.auth.pepper.as_deref(), Some("pep"));
        assert_eq!(cfg.db.url, "db:8000");
        assert_eq!(cfg.db.connect_attempts, 10);
        assert_eq!(cfg.cache.backend, CacheBackendKind::Memory);
    }

    #[test]
    fn asymmetric_algorithms_are_rejected() {
        let result = ServerConfig::from_lookup(lookup(&[
            ("WARDEN_JWT_SECRET", "s3cret"),
            ("WARDEN_JWT_ALGORITHM", "RS256"),
        ]));
        assert!(result.is_err());
    }
}
