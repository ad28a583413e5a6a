//! Shared handler state.

use std::sync::Arc;

use surrealdb::Connection;
use warden_admin::{ScopeService, UserService};
use warden_auth::ScopeAuthorizer;
use warden_core::cache::SessionCache;
use warden_db::repository::{SurrealScopeRepository, SurrealUserRepository};

/// Shared handles injected into every handler.
pub struct AppState<C: Connection, K: SessionCache> {
    pub users: Arc<UserService<SurrealUserRepository<C>, K>>,
    pub scopes: Arc<ScopeService<SurrealScopeRepository<C>>>,
    pub authorizer: Arc<dyn ScopeAuthorizer>,
}

impl<C: Connection, K: SessionCache> AppState<C, K> {
    pub fn new(
        db: surrealdb::Surreal<C>,
        cache: K,
        pepper: Option<String>,
        authorizer: Arc<dyn ScopeAuthorizer>,
    ) -> Self {
        Self {
            users: Arc::new(UserService::new(
                SurrealUserRepository::new(db.clone()),
                cache,
                pepper,
            )),
            scopes: Arc::new(ScopeService::new(SurrealScopeRepository::new(db))),
            authorizer,
        }
    }
}

impl<C: Connection, K: SessionCache> Clone for AppState<C, K> {
    fn clone(&self) -> Self {
        Self {
            users: Arc::clone(&self.users),
            scopes: Arc::clone(&self.scopes),
            authorizer: Arc::clone(&self.authorizer),
        }
    }
}
