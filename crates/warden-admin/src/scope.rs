//! Scope administration.

use tracing::{error, info};
use warden_core::error::{WardenError, WardenResult};
use warden_core::models::scope::{CreateScope, Scope};
use warden_core::repository::ScopeRepository;

/// Scope catalogue service.
pub struct ScopeService<S: ScopeRepository> {
    scope_repo: S,
}

impl<S: ScopeRepository> ScopeService<S> {
    pub fn new(scope_repo: S) -> Self {
        Self { scope_repo }
    }

    pub async fn create(&self, name: &str) -> WardenResult<Scope> {
        let name = name.trim();
        if name.is_empty() {
            return Err(WardenError::validation("scope name must not be blank"));
        }

        let scope = self
            .scope_repo
            .create(CreateScope { name: name.into() })
            .await
            .inspect_err(|e| error!(scope = %name, error = %e, "failed to create scope"))?;

        info!(scope_id = %scope.id, scope = %scope.name, "scope created");
        Ok(scope)
    }

    pub async fn find_one(&self, name: &str) -> WardenResult<Scope> {
        self.scope_repo
            .get_by_name(name)
            .await
            .inspect_err(|e| error!(scope = %name, error = %e, "failed to find scope"))
    }

    /// Resolve every name or none: a single missing name fails the whole
    /// batch with `NotFound`.
    pub async fn find_many(&self, names: &[String]) -> WardenResult<Vec<Scope>> {
        if names.is_empty() {
            return Ok(Vec::new());
        }
        self.scope_repo
            .get_many_by_name(names)
            .await
            .inspect_err(|e| error!(count = names.len(), error = %e, "failed to resolve scopes"))
    }

    pub async fn find_all(&self) -> WardenResult<Vec<Scope>> {
        self.scope_repo
            .list()
            .await
            .inspect_err(|e| error!(error = %e, "failed to list scopes"))
    }

    /// Delete by name, dropping every user grant. Unknown names succeed.
    pub async fn delete(&self, name: &str) -> WardenResult<()> {
        self.scope_repo
            .delete(name)
            .await
            .inspect_err(|e| error!(scope = %name, error = %e, "failed to delete scope"))?;

        info!(scope = %name, "scope deleted");
        Ok(())
    }
}
