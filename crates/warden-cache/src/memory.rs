//! In-process session cache.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use warden_core::cache::SessionCache;
use warden_core::error::WardenResult;

/// Marker set shared between clones. Entries never expire.
#[derive(Clone, Default)]
pub struct MemorySessionCache {
    keys: Arc<Mutex<HashSet<String>>>,
}

impl MemorySessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn keys(&self) -> MutexGuard<'_, HashSet<String>> {
        self.keys.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn insert(&self, key: impl Into<String>) {
        self.keys().insert(key.into());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys().contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys().len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys().is_empty()
    }
}

impl SessionCache for MemorySessionCache {
    async fn delete(&self, key: &str) -> WardenResult<()> {
        self.keys().remove(key);
        Ok(())
    }
}
