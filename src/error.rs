//! Unified error types for the webhook server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Unified error type for the webhook server.
#[derive(Error, Debug)]
pub enum ServerError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// JSON parsing error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors surfaced at a route boundary.
///
/// Each variant renders the fixed JSON body its route contract promises;
/// internal detail is never leaked except for the connect-page message,
/// which includes the extraction error text.
#[derive(Error, Debug)]
pub enum ApiError {
    /// POST /webhook processing failed.
    #[error("failed to process webhook")]
    WebhookProcessing,

    /// POST /api/connect-page failed to read the request body.
    #[error("failed to connect page: {0}")]
    PageConnection(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match &self {
            ApiError::WebhookProcessing => json!({
                "error": "Failed to process webhook",
            }),
            ApiError::PageConnection(reason) => json!({
                "status": "error",
                "message": format!("Failed to connect page: {reason}"),
            }),
        };

        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn webhook_error_renders_contract_body() {
        let response = ApiError::WebhookProcessing.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn page_connection_error_includes_reason() {
        let err = ApiError::PageConnection("body too large".to_string());
        assert_eq!(err.to_string(), "failed to connect page: body too large");

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
