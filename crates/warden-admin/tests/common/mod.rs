//! In-memory fakes for the store and cache contracts.
//!
//! Each fake counts its calls so tests can assert on exactly which
//! collaborator was touched, and can be switched into a failing mode.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use uuid::Uuid;
use warden_core::cache::SessionCache;
use warden_core::error::{WardenError, WardenResult};
use warden_core::models::role::UserRole;
use warden_core::models::scope::{CreateScope, Scope};
use warden_core::models::user::{CreateUser, User};
use warden_core::repository::{PaginatedResult, Pagination, ScopeRepository, UserRepository};

pub fn scope(name: &str) -> Scope {
    Scope {
        id: Uuid::new_v4(),
        name: name.into(),
        created_at: Utc::now(),
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Clone, Default)]
pub struct FakeUserRepo {
    pub users: Arc<Mutex<HashMap<Uuid, User>>>,
    /// Every scope the fake knows about, so `replace_scopes` can resolve ids.
    pub catalogue: Arc<Mutex<HashMap<Uuid, Scope>>>,
    pub calls: Arc<AtomicUsize>,
    pub fail_writes: Arc<AtomicBool>,
}

impl FakeUserRepo {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    pub fn register_scope(&self, scope: &Scope) {
        self.catalogue
            .lock()
            .unwrap()
            .insert(scope.id, scope.clone());
    }

    /// Insert a user directly, bypassing the call counter.
    pub fn seed(&self, username: &str, scopes: Vec<Scope>) -> User {
        for s in &scopes {
            self.register_scope(s);
        }
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            username: username.into(),
            email: format!("{username}@example.com"),
            password_hash: "hash".into(),
            role: None,
            scopes,
            created_at: now,
            updated_at: now,
        };
        self.users.lock().unwrap().insert(user.id, user.clone());
        user
    }

    pub fn stored(&self, id: Uuid) -> Option<User> {
        self.users.lock().unwrap().get(&id).cloned()
    }

    fn write_guard(&self) -> WardenResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(WardenError::Database("injected write failure".into()));
        }
        Ok(())
    }
}

impl UserRepository for FakeUserRepo {
    async fn create(&self, input: CreateUser) -> WardenResult<User> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.write_guard()?;

        let mut users = self.users.lock().unwrap();
        if users.values().any(|u| u.username == input.username) {
            return Err(WardenError::AlreadyExists {
                entity: "user".into(),
            });
        }
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            username: input.username,
            email: input.email,
            password_hash: input.password_hash,
            role: None,
            scopes: input.scopes,
            created_at: now,
            updated_at: now,
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_by_id(&self, id: Uuid) -> WardenResult<User> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.stored(id)
            .ok_or_else(|| WardenError::not_found("user", id))
    }

    async fn list(&self, pagination: Pagination) -> WardenResult<PaginatedResult<User>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut all: Vec<User> = self.users.lock().unwrap().values().cloned().collect();
        all.sort_by_key(|u| u.created_at);
        let total = all.len() as u64;
        let items = all
            .into_iter()
            .skip(pagination.offset as usize)
            .take(pagination.limit as usize)
            .collect();
        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }

    async fn replace_scopes(&self, user_id: Uuid, scope_ids: &[Uuid]) -> WardenResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.write_guard()?;

        let catalogue = self.catalogue.lock().unwrap();
        let mut users = self.users.lock().unwrap();
        let user = users
            .get_mut(&user_id)
            .ok_or_else(|| WardenError::not_found("user", user_id))?;
        user.scopes = scope_ids
            .iter()
            .filter_map(|id| catalogue.get(id).cloned())
            .collect();
        user.updated_at = Utc::now();
        Ok(())
    }

    async fn update_role(&self, user_id: Uuid, role: UserRole) -> WardenResult<User> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.write_guard()?;

        let mut users = self.users.lock().unwrap();
        let user = users
            .get_mut(&user_id)
            .ok_or_else(|| WardenError::not_found("user", user_id))?;
        user.role = Some(role);
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn delete(&self, id: Uuid) -> WardenResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.write_guard()?;
        self.users.lock().unwrap().remove(&id);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Scopes
// ---------------------------------------------------------------------------

#[derive(Clone, Default)]
pub struct FakeScopeRepo {
    pub scopes: Arc<Mutex<Vec<Scope>>>,
    pub calls: Arc<AtomicUsize>,
}

impl FakeScopeRepo {
    pub fn with(names: &[&str]) -> Self {
        let repo = Self::default();
        {
            let mut scopes = repo.scopes.lock().unwrap();
            for name in names {
                scopes.push(scope(name));
            }
        }
        repo
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn by_name(&self, name: &str) -> Option<Scope> {
        self.scopes
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.name == name)
            .cloned()
    }
}

impl ScopeRepository for FakeScopeRepo {
    async fn create(&self, input: CreateScope) -> WardenResult<Scope> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.by_name(&input.name).is_some() {
            return Err(WardenError::AlreadyExists {
                entity: "scope".into(),
            });
        }
        let created = scope(&input.name);
        self.scopes.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn get_by_id(&self, id: Uuid) -> WardenResult<Scope> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.scopes
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or_else(|| WardenError::not_found("scope", id))
    }

    async fn get_by_name(&self, name: &str) -> WardenResult<Scope> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.by_name(name)
            .ok_or_else(|| WardenError::not_found("scope", format!("name={name}")))
    }

    async fn get_many_by_name(&self, names: &[String]) -> WardenResult<Vec<Scope>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut found: Vec<Scope> = Vec::new();
        for name in names {
            let scope = self
                .by_name(name)
                .ok_or_else(|| WardenError::not_found("scope", format!("name={name}")))?;
            if !found.contains(&scope) {
                found.push(scope);
            }
        }
        Ok(found)
    }

    async fn list(&self) -> WardenResult<Vec<Scope>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut all = self.scopes.lock().unwrap().clone();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(all)
    }

    async fn delete(&self, name: &str) -> WardenResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.scopes.lock().unwrap().retain(|s| s.name != name);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Cache
// ---------------------------------------------------------------------------

#[derive(Clone, Default)]
pub struct RecordingCache {
    pub deleted: Arc<Mutex<Vec<String>>>,
    pub fail: Arc<AtomicBool>,
}

impl RecordingCache {
    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }

    pub fn fail(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }
}

impl SessionCache for RecordingCache {
    async fn delete(&self, key: &str) -> WardenResult<()> {
        self.deleted.lock().unwrap().push(key.to_string());
        if self.fail.load(Ordering::SeqCst) {
            return Err(WardenError::CacheInvalidation {
                key: key.to_string(),
                reason: "connection refused".into(),
            });
        }
        Ok(())
    }
}
