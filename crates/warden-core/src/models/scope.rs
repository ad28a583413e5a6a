//! Scope domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named permission unit granted to users.
///
/// Two scopes are the same grant when their `id`s match; the name is
/// unique but only used for lookups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scope {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl PartialEq for Scope {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Scope {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateScope {
    pub name: String,
}
