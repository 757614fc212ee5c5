//! HTTP API handlers.

use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Host, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::error::ApiError;
use crate::events::{self, WebhookPayload};

/// Application state shared with handlers.
///
/// Holds only the immutable startup configuration; there is no mutable
/// state anywhere in the request path.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Process configuration, fixed at startup.
    pub config: Arc<Config>,
}

impl AppState {
    /// Create new app state.
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

/// Static informational page served at `/`.
const HOME_PAGE: &str = "\
<h1>Facebook Webhook Server</h1>
<p>Webhook endpoint: /webhook</p>
<p>Status: Running</p>
";

/// Query parameters of the platform's verification handshake.
///
/// Both parameters are optional; an absent token never matches the secret.
#[derive(Debug, Deserialize)]
pub struct VerifyParams {
    /// Shared secret supplied by the platform.
    #[serde(rename = "hub.verify_token")]
    pub verify_token: Option<String>,

    /// Challenge value to echo back on success.
    #[serde(rename = "hub.challenge")]
    pub challenge: Option<String>,

    /// Subscription mode, `"subscribe"` when the platform registers.
    /// Logged but not enforced.
    #[serde(rename = "hub.mode")]
    pub mode: Option<String>,
}

/// Webhook acknowledgment response.
#[derive(Debug, Serialize)]
pub struct ReceivedResponse {
    /// Status: "received".
    pub status: &'static str,
}

/// Page connection response.
#[derive(Debug, Serialize)]
pub struct ConnectPageResponse {
    /// Status: "success".
    pub status: &'static str,
    /// Human-readable confirmation.
    pub message: &'static str,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status: "healthy".
    pub status: &'static str,
    /// Human-readable detail.
    pub message: &'static str,
}

/// Webhook configuration info response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookInfoResponse {
    /// Absolute URL the platform should call.
    pub webhook_url: String,
    /// The configured verify token.
    pub verify_token: String,
    /// Status: "ready".
    pub status: &'static str,
}

/// Home page handler - always returns 200 with a static HTML page.
pub async fn home() -> Html<&'static str> {
    Html(HOME_PAGE)
}

/// Verification handshake handler (GET /webhook).
///
/// Compares `hub.verify_token` byte-for-byte against the configured secret
/// and echoes `hub.challenge` as plain text on a match, 403 otherwise.
pub async fn verify_webhook(
    State(state): State<AppState>,
    Query(params): Query<VerifyParams>,
) -> Response {
    info!(
        "Verification request - mode: {:?}, token: {:?}, challenge: {:?}",
        params.mode, params.verify_token, params.challenge
    );

    let token = params.verify_token.as_deref().unwrap_or("");

    if token == state.config.verify_token {
        info!("Webhook verified successfully");
        let challenge = params.challenge.unwrap_or_default();
        (StatusCode::OK, challenge).into_response()
    } else {
        warn!("Verification failed - invalid token");
        (StatusCode::FORBIDDEN, "Invalid verification token").into_response()
    }
}

/// Event delivery handler (POST /webhook).
///
/// Parsing is tolerant: an empty or unparsable body is treated as an empty
/// payload and still acknowledged with 200, so a delivery is never retried
/// by the platform over a body we cannot read. The 500 contract body is
/// reserved for genuine processing failures.
pub async fn receive_webhook(body: Bytes) -> Result<Json<ReceivedResponse>, ApiError> {
    let payload = if body.is_empty() {
        WebhookPayload::default()
    } else {
        match serde_json::from_slice::<WebhookPayload>(&body) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("Unparsable webhook body, treating as empty: {e}");
                WebhookPayload::default()
            }
        }
    };

    debug!("Received webhook data: {}", String::from_utf8_lossy(&body));

    let seen = events::process_payload(&payload);
    if seen > 0 {
        info!("Processed {seen} messaging event(s)");
    }

    Ok(Json(ReceivedResponse { status: "received" }))
}

/// Page connection stub (POST /api/connect-page).
///
/// Acknowledges the request without performing any platform integration.
/// Subscribing to page webhooks via the Graph API and storing the page
/// access token would happen here.
pub async fn connect_page(
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ConnectPageResponse>, ApiError> {
    let Json(data) = body.map_err(|rejection| {
        error!("Error connecting page: {rejection}");
        ApiError::PageConnection(rejection.body_text())
    })?;

    info!("Page connection request: {data}");

    Ok(Json(ConnectPageResponse {
        status: "success",
        message: "Page connected successfully",
    }))
}

/// Health check handler - always returns 200.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        message: "Server is running",
    })
}

/// Webhook configuration info (GET /api/webhook-info).
///
/// Builds the public webhook URL from the Host header, honoring
/// `x-forwarded-proto` when running behind a proxy.
pub async fn webhook_info(
    State(state): State<AppState>,
    Host(host): Host,
    headers: HeaderMap,
) -> Json<WebhookInfoResponse> {
    let proto = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("http");

    Json(WebhookInfoResponse {
        webhook_url: format!("{proto}://{host}/webhook"),
        verify_token: state.config.verify_token.clone(),
        status: "ready",
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_state() -> AppState {
        AppState::new(Config {
            verify_token: "my_verify_token".to_string(),
            port: 3002,
            rust_log: "info".to_string(),
            verbose: false,
        })
    }

    #[test]
    fn app_state_is_cheap_to_clone() {
        let state = test_state();
        let clone = state.clone();
        assert!(Arc::ptr_eq(&state.config, &clone.config));
    }

    #[test]
    fn verify_params_deserialize_from_hub_keys() {
        let params: VerifyParams = serde_json::from_str(
            r#"{"hub.mode":"subscribe","hub.verify_token":"t","hub.challenge":"c"}"#,
        )
        .unwrap();

        assert_eq!(params.mode.as_deref(), Some("subscribe"));
        assert_eq!(params.verify_token.as_deref(), Some("t"));
        assert_eq!(params.challenge.as_deref(), Some("c"));
    }

    #[test]
    fn verify_params_tolerate_missing_keys() {
        let params: VerifyParams = serde_json::from_str("{}").unwrap();
        assert!(params.verify_token.is_none());
        assert!(params.challenge.is_none());
    }

    #[tokio::test]
    async fn receive_webhook_tolerates_garbage_body() {
        let result = receive_webhook(Bytes::from_static(b"not json at all")).await;
        assert!(result.is_ok());
    }
}
