//! Redis-backed session cache.

use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use tracing::{debug, warn};
use warden_core::cache::SessionCache;
use warden_core::error::WardenResult;

use crate::error::CacheError;

/// Session cache over a multiplexed, auto-reconnecting Redis connection.
#[derive(Clone)]
pub struct RedisSessionCache {
    conn: ConnectionManager,
}

impl RedisSessionCache {
    pub async fn connect(redis_url: &str) -> Result<Self, CacheError> {
        let client =
            redis::Client::open(redis_url).map_err(|e| CacheError::Connection(e.to_string()))?;
        let conn = ConnectionManager::new(client)
            .await
            .map_err(|e| CacheError::Connection(e.to_string()))?;
        Ok(Self { conn })
    }
}

fn command_error(key: &str, err: redis::RedisError) -> CacheError {
    CacheError::Command {
        key: key.to_string(),
        reason: err.to_string(),
    }
}

impl SessionCache for RedisSessionCache {
    async fn delete(&self, key: &str) -> WardenResult<()> {
        let mut conn = self.conn.clone();
        let removed: i64 = conn.del(key).await.map_err(|e| {
            warn!(key, error = %e, "redis DEL failed");
            command_error(key, e)
        })?;
        debug!(key, removed, "session marker deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use warden_core::cache::session_marker_key;
    use warden_core::error::{ErrorKind, WardenError};

    #[test]
    fn failed_del_surfaces_as_cache_invalidation() {
        let redis_err = redis::RedisError::from((redis::ErrorKind::IoError, "connection reset"));
        let err: WardenError = command_error("refresh:42", redis_err).into();

        assert_eq!(err.kind(), ErrorKind::CacheInvalidationError);
        match err {
            WardenError::CacheInvalidation { key, reason } => {
                assert_eq!(key, "refresh:42");
                assert!(reason.contains("connection reset"), "reason: {reason}");
            }
            other => panic!("expected CacheInvalidation, got {other:?}"),
        }
    }

    /// Needs a live server: `WARDEN_TEST_REDIS_URL=redis://127.0.0.1:6379`.
    #[tokio::test]
    #[ignore]
    async fn delete_removes_marker_and_tolerates_absent_key() {
        let Ok(url) = std::env::var("WARDEN_TEST_REDIS_URL") else {
            return;
        };
        let cache = RedisSessionCache::connect(&url).await.unwrap();
        let key = session_marker_key(&uuid::Uuid::new_v4());

        let mut conn = cache.conn.clone();
        conn.set::<_, _, ()>(&key, 1u8).await.unwrap();

        cache.delete(&key).await.unwrap();
        let present: bool = conn.exists(&key).await.unwrap();
        assert!(!present);

        cache.delete(&key).await.unwrap();
    }
}
