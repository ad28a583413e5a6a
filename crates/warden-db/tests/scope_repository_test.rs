//! Integration tests for the Scope repository using in-memory SurrealDB.

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use warden_core::error::WardenError;
use warden_core::models::scope::CreateScope;
use warden_core::models::user::CreateUser;
use warden_core::repository::{ScopeRepository, UserRepository};
use warden_db::repository::{SurrealScopeRepository, SurrealUserRepository};

async fn setup() -> Surreal<Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    warden_db::run_migrations(&db).await.unwrap();
    db
}

fn scope(name: &str) -> CreateScope {
    CreateScope { name: name.into() }
}

#[tokio::test]
async fn create_and_lookup_scope() {
    let repo = SurrealScopeRepository::new(setup().await);

    let created = repo.create(scope("user:manage")).await.unwrap();
    assert_eq!(created.name, "user:manage");

    let by_id = repo.get_by_id(created.id).await.unwrap();
    assert_eq!(by_id.name, "user:manage");

    let by_name = repo.get_by_name("user:manage").await.unwrap();
    assert_eq!(by_name.id, created.id);
}

#[tokio::test]
async fn duplicate_name_is_conflict() {
    let repo = SurrealScopeRepository::new(setup().await);
    repo.create(scope("read")).await.unwrap();

    let err = repo.create(scope("read")).await.unwrap_err();
    assert!(
        matches!(err, WardenError::AlreadyExists { .. }),
        "expected AlreadyExists, got {err:?}"
    );
}

#[tokio::test]
async fn unknown_name_is_not_found() {
    let repo = SurrealScopeRepository::new(setup().await);
    let err = repo.get_by_name("ghost").await.unwrap_err();
    assert!(matches!(err, WardenError::NotFound { .. }));
}

#[tokio::test]
async fn batch_lookup_keeps_request_order_and_collapses_duplicates() {
    let repo = SurrealScopeRepository::new(setup().await);
    for name in ["a", "b", "c"] {
        repo.create(scope(name)).await.unwrap();
    }

    let names: Vec<String> = ["c", "a", "c"].iter().map(|s| s.to_string()).collect();
    let found = repo.get_many_by_name(&names).await.unwrap();
    let got: Vec<&str> = found.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(got, vec!["c", "a"]);
}

#[tokio::test]
async fn batch_lookup_is_all_or_nothing() {
    let repo = SurrealScopeRepository::new(setup().await);
    repo.create(scope("a")).await.unwrap();

    let names = vec!["a".to_string(), "missing".to_string()];
    let err = repo.get_many_by_name(&names).await.unwrap_err();
    match err {
        WardenError::NotFound { entity, id } => {
            assert_eq!(entity, "scope");
            assert!(id.contains("missing"));
        }
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_batch_returns_empty() {
    let repo = SurrealScopeRepository::new(setup().await);
    assert!(repo.get_many_by_name(&[]).await.unwrap().is_empty());
}

#[tokio::test]
async fn list_is_sorted_by_name() {
    let repo = SurrealScopeRepository::new(setup().await);
    for name in ["write", "admin", "read"] {
        repo.create(scope(name)).await.unwrap();
    }

    let names: Vec<String> = repo
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert_eq!(names, vec!["admin", "read", "write"]);
}

#[tokio::test]
async fn delete_is_idempotent() {
    let repo = SurrealScopeRepository::new(setup().await);
    repo.create(scope("temp")).await.unwrap();

    repo.delete("temp").await.unwrap();
    repo.delete("temp").await.unwrap();
    repo.delete("never-existed").await.unwrap();

    assert!(repo.get_by_name("temp").await.is_err());
}

#[tokio::test]
async fn delete_removes_grants_from_users() {
    let db = setup().await;
    let scopes = SurrealScopeRepository::new(db.clone());
    let users = SurrealUserRepository::new(db);

    let read = scopes.create(scope("read")).await.unwrap();
    let write = scopes.create(scope("write")).await.unwrap();
    let user = users
        .create(CreateUser {
            username: "alice".into(),
            email: "alice@example.com".into(),
            password_hash: "hash".into(),
            scopes: vec![read, write],
        })
        .await
        .unwrap();
    assert_eq!(user.scopes.len(), 2);

    scopes.delete("read").await.unwrap();

    let user = users.get_by_id(user.id).await.unwrap();
    let names: Vec<&str> = user.scopes.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["write"]);
}
