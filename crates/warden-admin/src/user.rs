//! User administration: registration, scope and role changes, removal.
//!
//! Every mutation follows the same sequence: look the user up, compute
//! the new state, persist it, then delete the user's session marker so
//! the next request has to re-authenticate with fresh claims. A failure
//! at any step stops the sequence; a cache failure after a committed
//! write is reported but never rolls the write back.

use std::fmt;

use tracing::{error, info};
use uuid::Uuid;
use warden_auth::password;
use warden_core::cache::{SessionCache, session_marker_key};
use warden_core::error::{WardenError, WardenResult};
use warden_core::models::role::UserRole;
use warden_core::models::scope::Scope;
use warden_core::models::user::{CreateUser, User};
use warden_core::repository::{PaginatedResult, Pagination, UserRepository};

use crate::email;

/// Input for user registration. The password is plaintext here and is
/// hashed before anything reaches the store.
#[derive(Clone)]
pub struct CreateUserInput {
    pub username: String,
    pub password: String,
    pub email: String,
    pub scopes: Vec<Scope>,
}

impl fmt::Debug for CreateUserInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateUserInput")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("email", &self.email)
            .field("scopes", &self.scopes)
            .finish()
    }
}

/// User administration service.
///
/// Generic over the store and cache so that tests can run against
/// in-memory fakes.
pub struct UserService<U: UserRepository, C: SessionCache> {
    user_repo: U,
    cache: C,
    pepper: Option<String>,
}

impl<U: UserRepository, C: SessionCache> UserService<U, C> {
    pub fn new(user_repo: U, cache: C, pepper: Option<String>) -> Self {
        Self {
            user_repo,
            cache,
            pepper,
        }
    }

    /// Register a user with an initial scope set.
    pub async fn create(&self, input: CreateUserInput) -> WardenResult<User> {
        // Validate before hashing so a bad address costs nothing.
        let email = email::normalize(&input.email).inspect_err(|e| {
            error!(username = %input.username, error = %e, "failed to parse email");
        })?;

        let password_hash = password::hash_password(&input.password, self.pepper.as_deref())
            .map_err(|e| {
                error!(username = %input.username, error = %e, "failed to hash password");
                WardenError::CreateFailed {
                    source: Box::new(e.into()),
                }
            })?;

        let user = self
            .user_repo
            .create(CreateUser {
                username: input.username,
                email,
                password_hash,
                scopes: input.scopes,
            })
            .await
            .map_err(|e| {
                error!(error = %e, "failed to create user");
                WardenError::CreateFailed {
                    source: Box::new(e),
                }
            })?;

        info!(user_id = %user.id, username = %user.username, "new user registered");
        Ok(user)
    }

    /// Grant (`is_added`) or revoke `scope` for a user.
    ///
    /// The new set is computed from the set read in this call. Two
    /// concurrent calls on the same user can lose one of the updates.
    pub async fn update_scope(
        &self,
        user_id: Uuid,
        scope: &Scope,
        is_added: bool,
    ) -> WardenResult<()> {
        let user = self.find(user_id).await?;

        let mut scope_ids: Vec<Uuid> = user
            .scopes
            .iter()
            .map(|s| s.id)
            .filter(|id| *id != scope.id)
            .collect();
        if is_added {
            scope_ids.push(scope.id);
        }

        self.user_repo
            .replace_scopes(user_id, &scope_ids)
            .await
            .inspect_err(|e| {
                error!(%user_id, scope = %scope.name, error = %e, "failed to update user's scopes");
            })?;

        self.invalidate_session(user_id).await?;

        info!(%user_id, scope = %scope.name, is_added, "user's scopes updated");
        Ok(())
    }

    /// Replace the user's role.
    pub async fn update_role(&self, user_id: Uuid, role: UserRole) -> WardenResult<User> {
        self.find(user_id).await?;

        let user = self
            .user_repo
            .update_role(user_id, role)
            .await
            .inspect_err(|e| {
                error!(%user_id, %role, error = %e, "failed to update user's role");
            })?;

        self.invalidate_session(user_id).await?;

        info!(%user_id, %role, "user's role updated");
        Ok(user)
    }

    /// Remove a user. Unknown ids succeed and still clear the marker.
    pub async fn delete(&self, user_id: Uuid) -> WardenResult<()> {
        self.user_repo.delete(user_id).await.inspect_err(|e| {
            error!(%user_id, error = %e, "failed to delete user");
        })?;

        self.invalidate_session(user_id).await?;

        info!(%user_id, "user deleted");
        Ok(())
    }

    pub async fn find_one(&self, user_id: Uuid) -> WardenResult<User> {
        self.find(user_id).await
    }

    pub async fn find_all(&self, pagination: Pagination) -> WardenResult<PaginatedResult<User>> {
        self.user_repo.list(pagination).await.inspect_err(|e| {
            error!(error = %e, "failed to list users");
        })
    }

    async fn find(&self, user_id: Uuid) -> WardenResult<User> {
        self.user_repo.get_by_id(user_id).await.inspect_err(|e| {
            error!(%user_id, error = %e, "failed to find user by id");
        })
    }

    async fn invalidate_session(&self, user_id: Uuid) -> WardenResult<()> {
        let key = session_marker_key(&user_id);
        let Err(e) = self.cache.delete(&key).await else {
            return Ok(());
        };

        error!(%user_id, key = %key, error = %e, "failed to delete session marker");
        Err(match e {
            WardenError::CacheInvalidation { .. } => e,
            other => WardenError::CacheInvalidation {
                key,
                reason: other.to_string(),
            },
        })
    }
}
