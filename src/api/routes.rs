//! HTTP API route definitions.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::handlers::{
    connect_page, health, home, receive_webhook, verify_webhook, webhook_info, AppState,
};

/// Create the API router.
///
/// Cross-origin requests are permitted from any origin on all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Informational page
        .route("/", get(home))
        // Verification handshake + event deliveries
        .route("/webhook", get(verify_webhook).post(receive_webhook))
        // Page connection stub
        .route("/api/connect-page", post(connect_page))
        // Webhook configuration info
        .route("/api/webhook-info", get(webhook_info))
        // Health endpoint
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn test_state() -> AppState {
        AppState::new(Config {
            verify_token: "my_verify_token".to_string(),
            port: 3002,
            rust_log: "info".to_string(),
            verbose: false,
        })
    }

    #[tokio::test]
    async fn health_endpoint_returns_ok() {
        let app = create_router(test_state());

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn home_page_returns_html() {
        let app = create_router(test_state());

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers().get("content-type").unwrap();
        assert!(content_type.to_str().unwrap().starts_with("text/html"));
    }

    #[tokio::test]
    async fn webhook_verification_rejects_bad_token() {
        let app = create_router(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/webhook?hub.verify_token=wrong&hub.challenge=123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn unknown_route_returns_404() {
        let app = create_router(test_state());

        let response = app
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
