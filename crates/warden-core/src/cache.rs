//! Session-marker cache contract.
//!
//! A session marker is a cache entry whose presence alone signals a live
//! session for a user. The core never reads or writes markers; it only
//! deletes them after an authorization change to force re-authentication.

use uuid::Uuid;

use crate::error::WardenResult;

const SESSION_MARKER_PREFIX: &str = "refresh:";

/// Cache key of the session marker for `user_id`.
pub fn session_marker_key(user_id: &Uuid) -> String {
    format!("{SESSION_MARKER_PREFIX}{user_id}")
}

pub trait SessionCache: Send + Sync {
    /// Delete `key`. Deleting an absent key succeeds.
    fn delete(&self, key: &str) -> impl Future<Output = WardenResult<()>> + Send;
}
