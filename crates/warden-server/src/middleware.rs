//! Scope gate applied in front of each protected route group.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use tracing::warn;
use warden_auth::ScopeAuthorizer;
use warden_core::error::WardenError;

use crate::api::response::error_response;

/// Required scope for one group of routes.
#[derive(Clone)]
pub struct ScopeGate {
    pub authorizer: Arc<dyn ScopeAuthorizer>,
    pub required: &'static str,
}

/// Reject the request unless its bearer token carries `gate.required`.
/// On success the [`warden_auth::AuthenticatedSubject`] is stored in the
/// request extensions.
pub async fn require_scope(State(gate): State<ScopeGate>, mut req: Request, next: Next) -> Response {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    match gate.authorizer.authorize(gate.required, header) {
        Ok(subject) => {
            req.extensions_mut().insert(subject);
            next.run(req).await
        }
        Err(e) => {
            warn!(
                path = %req.uri().path(),
                required = gate.required,
                error = %e,
                "request rejected by scope gate"
            );
            error_response(&WardenError::from(e), "Request not authorized")
        }
    }
}
