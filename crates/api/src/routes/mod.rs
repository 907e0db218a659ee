//! HTTP routes
//!
//! The board has no REST API: `/ws` carries every board event, `/health*`
//! serves infrastructure probes, and everything else is a static asset.

pub mod health;

use axum::{middleware, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::{security::security_headers_middleware, state::AppState, websocket::ws_handler};

/// Create all routes
pub fn create_router(state: AppState) -> Router {
    // Health check routes (at root level for infrastructure monitoring)
    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness));

    // `/` resolves to index.html in the public directory
    let static_files = ServeDir::new(&state.config.public_dir).append_index_html_on_directories(true);

    Router::new()
        .merge(health_routes)
        .route("/ws", get(ws_handler))
        .fallback_service(static_files)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(security_headers_middleware)),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use postboard_shared::{NewPost, Post, PostId, PostStore, StoreError, StoreResult};
    use std::{path::PathBuf, sync::Arc};
    use tower::ServiceExt;

    struct DownStore;

    #[async_trait]
    impl PostStore for DownStore {
        async fn insert(&self, _post: NewPost) -> StoreResult<Post> {
            Err(StoreError::Unavailable("down".into()))
        }

        async fn delete_by_id(&self, _id: PostId) -> StoreResult<()> {
            Err(StoreError::Unavailable("down".into()))
        }

        async fn find_recent(&self, _limit: Option<usize>) -> StoreResult<Vec<Post>> {
            Err(StoreError::Unavailable("down".into()))
        }

        async fn ping(&self) -> StoreResult<()> {
            Err(StoreError::Unavailable("down".into()))
        }
    }

    /// Public directory with a single index page
    fn public_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("postboard-public-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("index.html"), "<h1>Postboard</h1>").unwrap();
        dir
    }

    fn request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health_reports_store_and_connections() {
        let app = create_router(AppState::in_memory(Config::in_memory()));

        let response = app.oneshot(request("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["store"], "healthy");
        assert_eq!(json["activeConnections"], 0);
    }

    #[tokio::test]
    async fn test_health_with_store_down() {
        let state = AppState::new(Arc::new(DownStore), Config::in_memory());
        let app = create_router(state);

        let response = app.clone().oneshot(request("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let response = app.clone().oneshot(request("/health/ready")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        // The process itself is still alive
        let response = app.oneshot(request("/health/live")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_root_serves_index_document() {
        let dir = public_dir();
        let mut config = Config::in_memory();
        config.public_dir = dir.clone();
        let app = create_router(AppState::in_memory(config));

        let response = app.clone().oneshot(request("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get("X-Content-Type-Options").unwrap(), "nosniff");
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"<h1>Postboard</h1>");

        let response = app.oneshot(request("/missing.js")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        std::fs::remove_dir_all(dir).ok();
    }

    #[tokio::test]
    async fn test_ws_requires_upgrade() {
        let app = create_router(AppState::in_memory(Config::in_memory()));

        let response = app.oneshot(request("/ws")).await.unwrap();
        assert!(response.status().is_client_error());
    }
}
