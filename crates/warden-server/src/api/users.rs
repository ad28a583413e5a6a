//! User administration handlers.

use axum::{
    Extension, Json,
    extract::{Query, State, rejection::{JsonRejection, QueryRejection}},
    http::StatusCode,
    response::Response,
};
use serde::Deserialize;
use surrealdb::Connection;
use tracing::info;
use uuid::Uuid;
use warden_admin::CreateUserInput;
use warden_auth::AuthenticatedSubject;
use warden_core::cache::SessionCache;
use warden_core::models::role::UserRole;
use warden_core::repository::Pagination;

use super::response::{error_response, json_rejection, query_rejection, success};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    pub email: String,
    #[serde(default)]
    pub scopes: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateScopeRequest {
    pub user_id: Uuid,
    #[serde(default)]
    pub is_added: bool,
    #[serde(rename = "scopes", alias = "scope")]
    pub scope: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub user_id: Uuid,
    pub role: UserRole,
}

#[derive(Debug, Deserialize)]
pub struct DeleteRequest {
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

pub async fn create<C: Connection, K: SessionCache>(
    State(state): State<AppState<C, K>>,
    Extension(subject): Extension<AuthenticatedSubject>,
    body: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match body {
        Ok(body) => body,
        Err(rejection) => return json_rejection(rejection),
    };

    let scopes = match state.scopes.find_many(&req.scopes).await {
        Ok(scopes) => scopes,
        Err(e) => return error_response(&e, "Failed to find scopes"),
    };

    let input = CreateUserInput {
        username: req.username,
        password: req.password,
        email: req.email,
        scopes,
    };
    match state.users.create(input).await {
        Ok(user) => {
            info!(actor = %subject.0, user_id = %user.id, "user created via API");
            success(
                StatusCode::CREATED,
                "USER_CREATED",
                "New user created successfully",
                Some(user),
            )
        }
        Err(e) => error_response(&e, "Failed to register user"),
    }
}

pub async fn list<C: Connection, K: SessionCache>(
    State(state): State<AppState<C, K>>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return query_rejection(rejection),
    };
    let defaults = Pagination::default();
    let pagination = Pagination {
        offset: query.offset.unwrap_or(defaults.offset),
        limit: query.limit.unwrap_or(defaults.limit),
    };

    match state.users.find_all(pagination).await {
        Ok(page) => success(
            StatusCode::OK,
            "USERS_RETRIEVED",
            "Users retrieved successfully",
            Some(serde_json::json!({
                "items": page.items,
                "total": page.total,
                "offset": page.offset,
                "limit": page.limit,
            })),
        ),
        Err(e) => error_response(&e, "Failed to retrieve users"),
    }
}

pub async fn update_scope<C: Connection, K: SessionCache>(
    State(state): State<AppState<C, K>>,
    Extension(subject): Extension<AuthenticatedSubject>,
    body: Result<Json<UpdateScopeRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match body {
        Ok(body) => body,
        Err(rejection) => return json_rejection(rejection),
    };

    let scope = match state.scopes.find_one(&req.scope).await {
        Ok(scope) => scope,
        Err(e) => return error_response(&e, "Failed to find scope"),
    };

    match state
        .users
        .update_scope(req.user_id, &scope, req.is_added)
        .await
    {
        Ok(()) => {
            info!(
                actor = %subject.0,
                user_id = %req.user_id,
                scope = %scope.name,
                is_added = req.is_added,
                "user scope changed via API"
            );
            success::<()>(
                StatusCode::OK,
                "USER_SCOPE_UPDATED",
                "User scope updated successfully",
                None,
            )
        }
        Err(e) => error_response(&e, "Failed to update user scope"),
    }
}

pub async fn update_role<C: Connection, K: SessionCache>(
    State(state): State<AppState<C, K>>,
    Extension(subject): Extension<AuthenticatedSubject>,
    body: Result<Json<UpdateRoleRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match body {
        Ok(body) => body,
        Err(rejection) => return json_rejection(rejection),
    };

    match state.users.update_role(req.user_id, req.role).await {
        Ok(user) => {
            info!(actor = %subject.0, user_id = %user.id, role = %req.role, "user role changed via API");
            success(
                StatusCode::OK,
                "USER_ROLE_UPDATED",
                "User role updated successfully",
                Some(user),
            )
        }
        Err(e) => error_response(&e, "Failed to update user role"),
    }
}

pub async fn delete<C: Connection, K: SessionCache>(
    State(state): State<AppState<C, K>>,
    Extension(subject): Extension<AuthenticatedSubject>,
    body: Result<Json<DeleteRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match body {
        Ok(body) => body,
        Err(rejection) => return json_rejection(rejection),
    };

    match state.users.delete(req.user_id).await {
        Ok(()) => {
            info!(actor = %subject.0, user_id = %req.user_id, "user deleted via API");
            success::<()>(
                StatusCode::OK,
                "USER_DELETED",
                "User deleted successfully",
                None,
            )
        }
        Err(e) => error_response(&e, "Failed to delete user"),
    }
}
