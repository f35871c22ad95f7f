//! HTTP middleware (CORS, 404 handler)

use axum::extract::Request;
use axum::http::{Method, header};
use axum::response::IntoResponse;
use tower_http::cors::{Any, CorsLayer};

use super::types::ApiError;

/// Create CORS layer
///
/// The API is public and read-only, so any origin may issue GET requests.
pub fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::HEAD, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::ORIGIN,
            header::CACHE_CONTROL,
        ])
}

/// Handle 404 Not Found with logging
pub async fn handle_404(req: Request) -> impl IntoResponse {
    tracing::debug!(method = %req.method(), uri = %req.uri(), "[404] No route");
    ApiError::not_found(
        "NOT_FOUND",
        format!("No route for {} {}", req.method(), req.uri().path()),
    )
}
