//! Route table.
//!
//! - `response.rs`: the `{success, code, message, data?, error?}` envelope
//! - `users.rs` / `scopes.rs`: handlers and request DTOs per resource

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
};
use surrealdb::Connection;
use warden_core::cache::SessionCache;

use crate::middleware::{ScopeGate, require_scope};
use crate::state::AppState;

pub mod response;
pub mod scopes;
pub mod users;

/// Scope required for every `/users` route.
pub const USER_MANAGE: &str = "user:manage";
/// Scope required for every `/scopes` route.
pub const SCOPE_MANAGE: &str = "scope:manage";

/// Build the full HTTP router.
pub fn build_router<C, K>(state: AppState<C, K>) -> Router
where
    C: Connection + 'static,
    K: SessionCache + 'static,
{
    let user_routes = Router::new()
        .route("/users/create", post(users::create::<C, K>))
        .route("/users/list", get(users::list::<C, K>))
        .route("/users/update/scope", put(users::update_scope::<C, K>))
        .route("/users/update/role", put(users::update_role::<C, K>))
        .route("/users/delete", delete(users::delete::<C, K>))
        .route_layer(from_fn_with_state(
            ScopeGate {
                authorizer: state.authorizer.clone(),
                required: USER_MANAGE,
            },
            require_scope,
        ));

    let scope_routes = Router::new()
        .route("/scopes/create", post(scopes::create::<C, K>))
        .route("/scopes/list", get(scopes::list::<C, K>))
        .route("/scopes/delete", delete(scopes::delete::<C, K>))
        .route_layer(from_fn_with_state(
            ScopeGate {
                authorizer: state.authorizer.clone(),
                required: SCOPE_MANAGE,
            },
            require_scope,
        ));

    Router::new()
        .merge(user_routes)
        .merge(scope_routes)
        .with_state(state)
}
