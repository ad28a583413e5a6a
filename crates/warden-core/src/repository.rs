//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Implementations are shared,
//! long-lived handles that must be safe for concurrent use.

use uuid::Uuid;

use crate::error::WardenResult;
use crate::models::{
    role::UserRole,
    scope::{CreateScope, Scope},
    user::{CreateUser, User},
};

/// Pagination parameters for list queries.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 50,
        }
    }
}

/// A paginated result set.
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

// ---------------------------------------------------------------------------
// Scopes
// ---------------------------------------------------------------------------

pub trait ScopeRepository: Send + Sync {
    fn create(&self, input: CreateScope) -> impl Future<Output = WardenResult<Scope>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = WardenResult<Scope>> + Send;
    fn get_by_name(&self, name: &str) -> impl Future<Output = WardenResult<Scope>> + Send;

    /// Resolve a batch of names in a single unit of work.
    ///
    /// Either every name resolves and the scopes come back in request
    /// order (duplicates collapsed), or the call fails with `NotFound`
    /// for a missing name and nothing is returned.
    fn get_many_by_name(
        &self,
        names: &[String],
    ) -> impl Future<Output = WardenResult<Vec<Scope>>> + Send;

    fn list(&self) -> impl Future<Output = WardenResult<Vec<Scope>>> + Send;

    /// Delete a scope by name, removing every user association to it.
    /// Deleting an unknown name is not an error.
    fn delete(&self, name: &str) -> impl Future<Output = WardenResult<()>> + Send;
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

pub trait UserRepository: Send + Sync {
    /// Persist a new user with its initial scope set. The store assigns
    /// the id.
    fn create(&self, input: CreateUser) -> impl Future<Output = WardenResult<User>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = WardenResult<User>> + Send;
    fn list(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = WardenResult<PaginatedResult<User>>> + Send;

    /// Full replace: afterwards the user's persisted scope set is exactly
    /// `scope_ids`.
    fn replace_scopes(
        &self,
        user_id: Uuid,
        scope_ids: &[Uuid],
    ) -> impl Future<Output = WardenResult<()>> + Send;

    /// Single-field role update; leaves every other column untouched.
    fn update_role(
        &self,
        user_id: Uuid,
        role: UserRole,
    ) -> impl Future<Output = WardenResult<User>> + Send;

    /// Hard delete, cascading scope associations. Unknown ids are not an
    /// error.
    fn delete(&self, id: Uuid) -> impl Future<Output = WardenResult<()>> + Send;
}
