//! Health check endpoint
//!
//! Reports the service version and how many recipes the store holds. A store
//! that cannot be queried turns the check into a 503.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::types::ApiError;
use crate::data::RecipeRepository;

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// Number of recipes currently stored
    pub recipes: u64,
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "health",
    responses(
        (status = 200, description = "Service and recipe store are healthy", body = HealthResponse),
        (status = 503, description = "Recipe store unavailable")
    )
)]
pub async fn health(
    State(repository): State<Arc<dyn RecipeRepository>>,
) -> Result<Json<HealthResponse>, ApiError> {
    let recipes = repository.count_all().await.map_err(|e| {
        tracing::warn!(error = %e, "Health check failed");
        ApiError::unavailable("Recipe store unavailable")
    })?;

    Ok(Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        recipes,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    use crate::data::filters::RecipePredicate;
    use crate::data::types::Recipe;
    use crate::data::{DataError, SqliteService};

    struct ClosedStore;

    #[async_trait]
    impl RecipeRepository for ClosedStore {
        async fn count(&self, _: &RecipePredicate) -> Result<u64, DataError> {
            Err(DataError::Sqlite(sqlx::Error::PoolClosed))
        }

        async fn find(&self, _: &RecipePredicate, _: u64, _: u32) -> Result<Vec<Recipe>, DataError> {
            Err(DataError::Sqlite(sqlx::Error::PoolClosed))
        }

        async fn list_by_rating(&self, _: u64, _: u32) -> Result<Vec<Recipe>, DataError> {
            Err(DataError::Sqlite(sqlx::Error::PoolClosed))
        }

        async fn replace_all(&self, _: &[Recipe]) -> Result<u64, DataError> {
            Err(DataError::Sqlite(sqlx::Error::PoolClosed))
        }
    }

    #[tokio::test]
    async fn test_health_reports_recipe_count() {
        let db = SqliteService::in_memory().await.unwrap();
        db.replace_all(&[Recipe::default(), Recipe::default()])
            .await
            .unwrap();

        let Json(body) = health(State(Arc::new(db) as Arc<dyn RecipeRepository>))
            .await
            .unwrap();
        assert_eq!(body.status, "ok");
        assert_eq!(body.recipes, 2);
    }

    #[tokio::test]
    async fn test_health_unavailable_when_store_fails() {
        let err = health(State(Arc::new(ClosedStore) as Arc<dyn RecipeRepository>))
            .await
            .err()
            .unwrap();
        assert_eq!(
            err.into_response().status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
