//! Scope catalogue handlers.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::Response,
};
use serde::Deserialize;
use surrealdb::Connection;
use warden_core::cache::SessionCache;

use super::response::{error_response, json_rejection, success};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateScopeRequest {
    pub scope_name: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteScopeRequest {
    pub scope_name: String,
}

pub async fn create<C: Connection, K: SessionCache>(
    State(state): State<AppState<C, K>>,
    body: Result<Json<CreateScopeRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match body {
        Ok(body) => body,
        Err(rejection) => return json_rejection(rejection),
    };

    match state.scopes.create(&req.scope_name).await {
        Ok(scope) => success(
            StatusCode::CREATED,
            "SCOPE_CREATED",
            "New scope created successfully",
            Some(scope),
        ),
        Err(e) => error_response(&e, "Failed to create scope"),
    }
}

/// Lists scope names only, ordered by name.
pub async fn list<C: Connection, K: SessionCache>(State(state): State<AppState<C, K>>) -> Response {
    match state.scopes.find_all().await {
        Ok(scopes) => {
            let names: Vec<String> = scopes.into_iter().map(|s| s.name).collect();
            success(
                StatusCode::OK,
                "SCOPES_RETRIEVED",
                "All scopes retrieved successfully",
                Some(names),
            )
        }
        Err(e) => error_response(&e, "Failed to retrieve scopes"),
    }
}

pub async fn delete<C: Connection, K: SessionCache>(
    State(state): State<AppState<C, K>>,
    body: Result<Json<DeleteScopeRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match body {
        Ok(body) => body,
        Err(rejection) => return json_rejection(rejection),
    };

    match state.scopes.delete(&req.scope_name).await {
        Ok(()) => success::<()>(
            StatusCode::OK,
            "SCOPE_DELETED",
            "Scope deleted successfully",
            None,
        ),
        Err(e) => error_response(&e, "Failed to delete scope"),
    }
}
