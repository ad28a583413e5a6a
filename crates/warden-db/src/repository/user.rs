//! SurrealDB implementation of [`UserRepository`].
//!
//! A user's scope set is stored as `has_scope` edges
//! (`user -> has_scope -> scope`). Every write that touches both the user
//! record and its edges runs inside one transaction.

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::debug;
use uuid::Uuid;
use warden_core::error::WardenResult;
use warden_core::models::role::UserRole;
use warden_core::models::scope::Scope;
use warden_core::models::user::{CreateUser, User};
use warden_core::repository::{PaginatedResult, Pagination, UserRepository};

use super::scope::ScopeRowWithId;
use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct UserRow {
    username: String,
    email: String,
    password_hash: String,
    role: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct UserRowWithId {
    record_id: String,
    username: String,
    email: String,
    password_hash: String,
    role: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

fn parse_role(raw: Option<String>) -> Result<Option<UserRole>, DbError> {
    raw.map(|r| {
        r.parse::<UserRole>()
            .map_err(|_| DbError::Decode(format!("unknown user role: {r}")))
    })
    .transpose()
}

impl UserRow {
    fn into_user(self, id: Uuid, scopes: Vec<Scope>) -> Result<User, DbError> {
        Ok(User {
            id,
            username: self.username,
            email: self.email,
            password_hash: self.password_hash,
            role: parse_role(self.role)?,
            scopes,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl UserRowWithId {
    fn id(&self) -> Result<Uuid, DbError> {
        Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Decode(format!("invalid user UUID: {e}")))
    }

    fn try_into_user(self, scopes: Vec<Scope>) -> Result<User, DbError> {
        let id = self.id()?;
        Ok(User {
            id,
            username: self.username,
            email: self.email,
            password_hash: self.password_hash,
            role: parse_role(self.role)?,
            scopes,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// `RELATE` statements granting each scope in `scope_ids` to `user_id`.
/// Each edge is preceded by an existence guard, so a scope deleted
/// between lookup and write aborts the transaction instead of leaving a
/// dangling edge behind.
fn grant_statements(user_id: &str, scope_ids: &[Uuid]) -> String {
    scope_ids
        .iter()
        .map(|sid| {
            format!(
                "IF !record::exists(scope:`{sid}`) {{ THROW \"scope not found: {sid}\"; }}; \
                 RELATE user:`{user_id}` -> has_scope -> scope:`{sid}`; "
            )
        })
        .collect()
}

/// SurrealDB implementation of the User repository.
#[derive(Clone)]
pub struct SurrealUserRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealUserRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    /// Scopes granted to `user_id`, ordered by name. Edges that point at
    /// a missing scope record are skipped.
    async fn scopes_of(&self, user_id: &str) -> Result<Vec<Scope>, DbError> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM scope \
                 WHERE id IN (SELECT VALUE out FROM has_scope \
                     WHERE in = type::record('user', $id)) \
                 ORDER BY name ASC",
            )
            .bind(("id", user_id.to_string()))
            .await?;

        let rows: Vec<ScopeRowWithId> = result.take(0)?;
        rows.into_iter().map(|row| row.try_into_scope()).collect()
    }

    /// First id in `scope_ids` with no scope record, if any.
    async fn first_missing_scope(&self, scope_ids: &[Uuid]) -> Result<Option<Uuid>, DbError> {
        let ids: Vec<String> = scope_ids.iter().map(Uuid::to_string).collect();
        let mut result = self
            .db
            .query("SELECT VALUE meta::id(id) FROM scope WHERE meta::id(id) IN $ids")
            .bind(("ids", ids))
            .await?;

        let found: Vec<String> = result.take(0)?;
        Ok(scope_ids
            .iter()
            .copied()
            .find(|id| !found.contains(&id.to_string())))
    }

    /// Classify a failed grant transaction. The transaction has rolled
    /// back by now, so a scope that is missing at this point is the one
    /// the existence guard tripped on.
    async fn grant_failure(
        &self,
        entity: &str,
        err: surrealdb::Error,
        scope_ids: &[Uuid],
    ) -> DbError {
        let err = DbError::from_write(entity, err);
        if matches!(err, DbError::Conflict { .. }) || scope_ids.is_empty() {
            return err;
        }

        match self.first_missing_scope(scope_ids).await {
            Ok(Some(id)) => {
                debug!(scope_id = %id, "grant aborted, scope no longer exists");
                DbError::NotFound {
                    entity: "scope".into(),
                    id: id.to_string(),
                }
            }
            _ => err,
        }
    }
}

impl<C: Connection> UserRepository for SurrealUserRepository<C> {
    async fn create(&self, input: CreateUser) -> WardenResult<User> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();
        let scope_ids: Vec<Uuid> = input.scopes.iter().map(|s| s.id).collect();

        // The CREATE comes first so a unique-index failure is the first
        // error reported for the transaction.
        let query = format!(
            "BEGIN TRANSACTION; \
             CREATE type::record('user', $id) SET \
                 username = $username, \
                 email = $email, \
                 password_hash = $password_hash; \
             {relations}\
             COMMIT TRANSACTION;",
            relations = grant_statements(&id_str, &scope_ids),
        );

        let response = self
            .db
            .query(query)
            .bind(("id", id_str))
            .bind(("username", input.username))
            .bind(("email", input.email))
            .bind(("password_hash", input.password_hash))
            .await
            .map_err(DbError::from)?;
        if let Err(e) = response.check() {
            return Err(self.grant_failure("user", e, &scope_ids).await.into());
        }

        debug!(user_id = %id, scopes = scope_ids.len(), "user record created");
        self.get_by_id(id).await
    }

    async fn get_by_id(&self, id: Uuid) -> WardenResult<User> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('user', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user".into(),
            id: id_str.clone(),
        })?;

        let scopes = self.scopes_of(&id_str).await?;
        Ok(row.into_user(id, scopes)?)
    }

    async fn list(&self, pagination: Pagination) -> WardenResult<PaginatedResult<User>> {
        let mut count_result = self
            .db
            .query("SELECT count() AS total FROM user GROUP ALL")
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM user \
                 ORDER BY created_at ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRowWithId> = result.take(0).map_err(DbError::from)?;

        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            let scopes = self.scopes_of(&row.record_id).await?;
            items.push(row.try_into_user(scopes)?);
        }

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }

    async fn replace_scopes(&self, user_id: Uuid, scope_ids: &[Uuid]) -> WardenResult<()> {
        let id_str = user_id.to_string();

        let mut check = self
            .db
            .query("SELECT count() AS total FROM type::record('user', $id) GROUP ALL")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;
        let count: Vec<CountRow> = check.take(0).map_err(DbError::from)?;
        if count.first().map(|r| r.total).unwrap_or(0) == 0 {
            return Err(DbError::NotFound {
                entity: "user".into(),
                id: id_str,
            }
            .into());
        }

        let query = format!(
            "BEGIN TRANSACTION; \
             DELETE has_scope WHERE in = type::record('user', $id); \
             {relations}\
             UPDATE type::record('user', $id) SET updated_at = time::now(); \
             COMMIT TRANSACTION;",
            relations = grant_statements(&id_str, scope_ids),
        );

        let response = self
            .db
            .query(query)
            .bind(("id", id_str))
            .await
            .map_err(DbError::from)?;
        if let Err(e) = response.check() {
            return Err(self.grant_failure("has_scope", e, scope_ids).await.into());
        }

        debug!(%user_id, scopes = scope_ids.len(), "user scope set replaced");
        Ok(())
    }

    async fn update_role(&self, user_id: Uuid, role: UserRole) -> WardenResult<User> {
        let id_str = user_id.to_string();

        let result = self
            .db
            .query(
                "UPDATE type::record('user', $id) \
                 SET role = $role, updated_at = time::now() \
                 WHERE id != NONE",
            )
            .bind(("id", id_str.clone()))
            .bind(("role", role.as_str().to_string()))
            .await
            .map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::from_write("user", e))?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user".into(),
            id: id_str.clone(),
        })?;

        let scopes = self.scopes_of(&id_str).await?;
        Ok(row.into_user(user_id, scopes)?)
    }

    async fn delete(&self, id: Uuid) -> WardenResult<()> {
        self.db
            .query(
                "BEGIN TRANSACTION; \
                 DELETE has_scope WHERE in = type::record('user', $id); \
                 DELETE type::record('user', $id); \
                 COMMIT TRANSACTION;",
            )
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::from_write("user", e))?;

        Ok(())
    }
}
