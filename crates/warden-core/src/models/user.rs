//! User domain model.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::role::UserRole;
use crate::models::scope::Scope;

#[derive(Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    /// Argon2id PHC string. Never serialized.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub role: Option<UserRole>,
    pub scopes: Vec<Scope>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn has_scope(&self, scope_id: Uuid) -> bool {
        self.scopes.iter().any(|s| s.id == scope_id)
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .field("role", &self.role)
            .field("scopes", &self.scopes)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

/// Store-level input for a new user. The password is already hashed.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub scopes: Vec<Scope>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            username: "alice".into(),
            email: "alice@example.com".into(),
            password_hash: "$argon2id$v=19$secret".into(),
            role: Some(UserRole::Manager),
            scopes: vec![Scope {
                id: Uuid::new_v4(),
                name: "read".into(),
                created_at: now,
            }],
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn hash_is_never_serialized() {
        let json = serde_json::to_value(sample()).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["role"], "manager");
    }

    #[test]
    fn hash_is_redacted_in_debug_output() {
        let out = format!("{:?}", sample());
        assert!(!out.contains("secret"));
        assert!(out.contains("<redacted>"));
    }

    #[test]
    fn scope_membership_is_by_id() {
        let user = sample();
        let held = user.scopes[0].id;
        assert!(user.has_scope(held));
        assert!(!user.has_scope(Uuid::new_v4()));
    }
}
