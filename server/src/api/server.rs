//! API server initialization

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use axum::routing::get;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use super::middleware;
use super::openapi::openapi_json;
use super::routes::{health, recipes};
use crate::core::CoreApp;
use crate::core::config::PaginationConfig;
use crate::data::RecipeRepository;

const WELCOME: &str = "Welcome to the Recipe API";

pub struct ApiServer {
    app: CoreApp,
}

impl ApiServer {
    pub fn new(app: CoreApp) -> Self {
        Self { app }
    }

    /// Returns CoreApp for graceful shutdown
    pub async fn start(self) -> Result<CoreApp> {
        let Self { app } = self;

        let shutdown = app.shutdown.clone();
        let addr = SocketAddr::new(app.config.server.host.parse()?, app.config.server.port);

        let repository: Arc<dyn RecipeRepository> = app.database.clone();
        let router = router(repository, app.config.pagination);

        let listener = TcpListener::bind(addr).await?;
        tracing::info!(%addr, "Listening");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown.wait())
            .await?;

        Ok(app)
    }
}

/// Build the full application router
pub fn router(repository: Arc<dyn RecipeRepository>, pagination: PaginationConfig) -> Router {
    Router::new()
        .route("/", get(|| async { WELCOME }))
        .route(
            "/api/health",
            get(health::health).with_state(Arc::clone(&repository)),
        )
        .route("/api/openapi.json", get(openapi_json))
        .nest("/api/recipes", recipes::routes(repository, pagination))
        .fallback(middleware::handle_404)
        .layer(CompressionLayer::new())
        .layer(middleware::cors())
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    use crate::data::SqliteService;

    async fn test_router() -> Router {
        let db = SqliteService::in_memory().await.unwrap();
        router(Arc::new(db), PaginationConfig::default())
    }

    async fn fetch(router: Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn test_welcome() {
        let (status, body) = fetch(test_router().await, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, WELCOME.as_bytes());
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = fetch(test_router().await, "/api/health").await;
        assert_eq!(status, StatusCode::OK);

        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["recipes"], 0);
    }

    #[tokio::test]
    async fn test_nested_recipe_routes() {
        let (status, body) = fetch(test_router().await, "/api/recipes/search?title=x").await;
        assert_eq!(status, StatusCode::OK);

        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["total"], 0);

        let (status, _) = fetch(test_router().await, "/api/recipes").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_openapi_served() {
        let (status, body) = fetch(test_router().await, "/api/openapi.json").await;
        assert_eq!(status, StatusCode::OK);

        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["info"]["title"], "Recipebox API");
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let (status, body) = fetch(test_router().await, "/api/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "not_found");
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin() {
        let response = test_router()
            .await
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .header(header::ORIGIN, "http://example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
    }
}
