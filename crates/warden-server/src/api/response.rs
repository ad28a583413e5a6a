//! Response envelope and error-to-status mapping.

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use warden_core::error::WardenError;

/// Uniform response body for every route.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub fn success<T: Serialize>(
    status: StatusCode,
    code: &'static str,
    message: &str,
    data: Option<T>,
) -> Response {
    let body = ApiResponse {
        success: true,
        code,
        message: message.to_string(),
        data,
        error: None,
    };
    (status, Json(body)).into_response()
}

/// HTTP status for an error, keyed on its stable code so wrapped
/// errors map the same way as their cause.
pub fn status_for(err: &WardenError) -> StatusCode {
    match err.code() {
        "VALIDATION_ERROR" => StatusCode::BAD_REQUEST,
        "UNAUTHORIZED" => StatusCode::UNAUTHORIZED,
        "FORBIDDEN" => StatusCode::FORBIDDEN,
        "NOT_FOUND" => StatusCode::NOT_FOUND,
        "CONFLICT" => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub fn error_response(err: &WardenError, message: &str) -> Response {
    let status = status_for(err);
    // Server-side failures keep their details in the logs.
    let detail = if status.is_server_error() {
        None
    } else {
        Some(err.to_string())
    };
    let body: ApiResponse<()> = ApiResponse {
        success: false,
        code: err.code(),
        message: message.to_string(),
        data: None,
        error: detail,
    };
    (status, Json(body)).into_response()
}

fn bad_request(detail: String) -> Response {
    let body: ApiResponse<()> = ApiResponse {
        success: false,
        code: "BAD_REQUEST",
        message: "Invalid request data".to_string(),
        data: None,
        error: Some(detail),
    };
    (StatusCode::BAD_REQUEST, Json(body)).into_response()
}

pub fn json_rejection(rejection: JsonRejection) -> Response {
    bad_request(rejection.body_text())
}

pub fn query_rejection(rejection: QueryRejection) -> Response {
    bad_request(rejection.body_text())
}
