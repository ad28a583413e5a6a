//! Warden Cache — session-marker cache backends.
//!
//! Markers are written by the login flow (outside this service) and
//! deleted here whenever a user's authorization changes. Two backends
//! are provided: [`RedisSessionCache`] for deployments and
//! [`MemorySessionCache`] for single-process runs and tests.

mod config;
mod error;
mod memory;
mod redis_cache;

pub use config::{CacheBackendKind, CacheConfig};
pub use error::CacheError;
pub use memory::MemorySessionCache;
pub use redis_cache::RedisSessionCache;

use tracing::info;
use warden_core::cache::SessionCache;
use warden_core::error::WardenResult;

/// Runtime-selected cache backend.
#[derive(Clone)]
pub enum SessionCacheBackend {
    Redis(RedisSessionCache),
    Memory(MemorySessionCache),
}

impl SessionCacheBackend {
    /// Build the backend named by `config`, connecting to Redis if needed.
    pub async fn from_config(config: &CacheConfig) -> Result<Self, CacheError> {
        match config.backend {
            CacheBackendKind::Redis => {
                let cache = RedisSessionCache::connect(&config.redis_url).await?;
                info!(url = %config.redis_url, "session cache: redis");
                Ok(Self::Redis(cache))
            }
            CacheBackendKind::Memory => {
                info!("session cache: in-memory");
                Ok(Self::Memory(MemorySessionCache::new()))
            }
        }
    }
}

impl SessionCache for SessionCacheBackend {
    async fn delete(&self, key: &str) -> WardenResult<()> {
        match self {
            Self::Redis(cache) => cache.delete(key).await,
            Self::Memory(cache) => cache.delete(key).await,
        }
    }
}
