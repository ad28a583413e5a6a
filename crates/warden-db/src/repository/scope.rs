//! SurrealDB implementation of [`ScopeRepository`].

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::debug;
use uuid::Uuid;
use warden_core::error::WardenResult;
use warden_core::models::scope::{CreateScope, Scope};
use warden_core::repository::ScopeRepository;

use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct ScopeRow {
    name: String,
    created_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
pub(crate) struct ScopeRowWithId {
    record_id: String,
    name: String,
    created_at: DateTime<Utc>,
}

impl ScopeRow {
    fn into_scope(self, id: Uuid) -> Scope {
        Scope {
            id,
            name: self.name,
            created_at: self.created_at,
        }
    }
}

impl ScopeRowWithId {
    pub(crate) fn try_into_scope(self) -> Result<Scope, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Decode(format!("invalid scope UUID: {e}")))?;
        Ok(Scope {
            id,
            name: self.name,
            created_at: self.created_at,
        })
    }
}

/// SurrealDB implementation of the Scope repository.
#[derive(Clone)]
pub struct SurrealScopeRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealScopeRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> ScopeRepository for SurrealScopeRepository<C> {
    async fn create(&self, input: CreateScope) -> WardenResult<Scope> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query("CREATE type::record('scope', $id) SET name = $name")
            .bind(("id", id_str.clone()))
            .bind(("name", input.name))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::from_write("scope", e))?;

        let rows: Vec<ScopeRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "scope".into(),
            id: id_str,
        })?;

        Ok(row.into_scope(id))
    }

    async fn get_by_id(&self, id: Uuid) -> WardenResult<Scope> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('scope', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ScopeRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "scope".into(),
            id: id_str,
        })?;

        Ok(row.into_scope(id))
    }

    async fn get_by_name(&self, name: &str) -> WardenResult<Scope> {
        let mut result = self
            .db
            .query("SELECT meta::id(id) AS record_id, * FROM scope WHERE name = $name")
            .bind(("name", name.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ScopeRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "scope".into(),
            id: format!("name={name}"),
        })?;

        Ok(row.try_into_scope()?)
    }

    async fn get_many_by_name(&self, names: &[String]) -> WardenResult<Vec<Scope>> {
        let mut seen = HashSet::new();
        let wanted: Vec<String> = names
            .iter()
            .filter(|n| seen.insert(n.as_str()))
            .cloned()
            .collect();
        if wanted.is_empty() {
            return Ok(Vec::new());
        }

        // One statement, one snapshot: every name is resolved against the
        // same committed state.
        let mut result = self
            .db
            .query("SELECT meta::id(id) AS record_id, * FROM scope WHERE name IN $names")
            .bind(("names", wanted.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ScopeRowWithId> = result.take(0).map_err(DbError::from)?;
        let mut by_name = HashMap::with_capacity(rows.len());
        for row in rows {
            let scope = row.try_into_scope()?;
            by_name.insert(scope.name.clone(), scope);
        }

        let mut scopes = Vec::with_capacity(wanted.len());
        for name in wanted {
            match by_name.remove(&name) {
                Some(scope) => scopes.push(scope),
                None => {
                    debug!(name = %name, "batch scope lookup missed");
                    return Err(DbError::NotFound {
                        entity: "scope".into(),
                        id: format!("name={name}"),
                    }
                    .into());
                }
            }
        }

        Ok(scopes)
    }

    async fn list(&self) -> WardenResult<Vec<Scope>> {
        let mut result = self
            .db
            .query("SELECT meta::id(id) AS record_id, * FROM scope ORDER BY name ASC")
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ScopeRowWithId> = result.take(0).map_err(DbError::from)?;

        rows.into_iter()
            .map(|row| row.try_into_scope())
            .collect::<Result<Vec<_>, DbError>>()
            .map_err(Into::into)
    }

    async fn delete(&self, name: &str) -> WardenResult<()> {
        // Grants go in the same transaction as the scope so no user is
        // left pointing at a deleted record.
        self.db
            .query(
                "BEGIN TRANSACTION; \
                 DELETE has_scope WHERE out IN \
                     (SELECT VALUE id FROM scope WHERE name = $name); \
                 DELETE scope WHERE name = $name; \
                 COMMIT TRANSACTION;",
            )
            .bind(("name", name.to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::from_write("scope", e))?;

        Ok(())
    }
}
