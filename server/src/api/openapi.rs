//! OpenAPI specification

use axum::http::header;
use axum::response::{IntoResponse, Json};
use utoipa::OpenApi;

use crate::api::routes::{health, recipes};
use crate::api::types::{RecipeDto, RecipePage};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Recipebox API",
        version = env!("CARGO_PKG_VERSION"),
        description = "Recipe catalog search"
    ),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "recipes", description = "Recipe listing and search")
    ),
    paths(
        health::health,
        recipes::list_recipes,
        recipes::search_recipes,
    ),
    components(schemas(
        health::HealthResponse,
        RecipeDto,
        RecipePage,
    ))
)]
pub struct ApiDoc;

/// Serve OpenAPI JSON specification
pub async fn openapi_json() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/json")],
        Json(ApiDoc::openapi()),
    )
}
