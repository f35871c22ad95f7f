//! Shared API types
//!
//! Error responses and the paginated recipe envelope used by the listing
//! endpoints.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::data::DataError;
use crate::data::filters::Pagination;
use crate::data::types::Recipe;

/// Standard API error response
#[derive(Debug)]
pub enum ApiError {
    NotFound { code: String, message: String },
    Unavailable { message: String },
    Internal { message: String },
}

impl ApiError {
    pub fn not_found(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NotFound {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn from_data(e: DataError) -> Self {
        tracing::error!(error = %e, "Data error");
        if e.is_transient() {
            Self::unavailable("Database temporarily unavailable")
        } else {
            Self::internal("Database operation failed")
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, code, message) = match self {
            Self::NotFound { code, message } => (StatusCode::NOT_FOUND, "not_found", code, message),
            Self::Unavailable { message } => (
                StatusCode::SERVICE_UNAVAILABLE,
                "service_unavailable",
                "UNAVAILABLE".to_string(),
                message,
            ),
            Self::Internal { message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "INTERNAL".to_string(),
                message,
            ),
        };
        (
            status,
            Json(serde_json::json!({
                "error": error_type,
                "code": code,
                "message": message
            })),
        )
            .into_response()
    }
}

/// A recipe as returned by the listing endpoints
#[derive(Debug, Serialize, ToSchema)]
pub struct RecipeDto {
    /// 1-based position in the overall result
    pub id: u64,
    pub title: Option<String>,
    pub cuisine: Option<String>,
    pub rating: Option<f64>,
    pub prep_time: Option<i64>,
    pub cook_time: Option<i64>,
    pub total_time: Option<i64>,
    pub description: Option<String>,
    #[schema(value_type = Object)]
    pub nutrients: serde_json::Map<String, serde_json::Value>,
    pub serves: Option<String>,
}

impl RecipeDto {
    fn from_recipe(id: u64, recipe: Recipe) -> Self {
        Self {
            id,
            title: recipe.title,
            cuisine: recipe.cuisine,
            rating: recipe.rating,
            prep_time: recipe.prep_time,
            cook_time: recipe.cook_time,
            total_time: recipe.total_time,
            description: recipe.description,
            nutrients: recipe.nutrients,
            serves: recipe.serves,
        }
    }
}

/// Paginated recipe response
#[derive(Debug, Serialize, ToSchema)]
pub struct RecipePage {
    pub page: u32,
    pub limit: u32,
    /// Number of recipes matching the request across all pages
    pub total: u64,
    pub data: Vec<RecipeDto>,
}

impl RecipePage {
    pub fn new(pagination: Pagination, total: u64, recipes: Vec<Recipe>) -> Self {
        let skip = pagination.skip();
        let data = recipes
            .into_iter()
            .zip(1u64..)
            .map(|(recipe, n)| RecipeDto::from_recipe(skip + n, recipe))
            .collect();

        Self {
            page: pagination.page,
            limit: pagination.limit,
            total,
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn test_recipe_page_numbers_from_skip() {
        let pagination = Pagination { page: 3, limit: 2 };
        let recipes = vec![
            Recipe {
                title: Some("E".to_string()),
                ..Default::default()
            },
            Recipe {
                title: Some("F".to_string()),
                ..Default::default()
            },
        ];
        let page = RecipePage::new(pagination, 6, recipes);

        assert_eq!(page.total, 6);
        let ids: Vec<u64> = page.data.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![5, 6]);
    }

    #[test]
    fn test_recipe_page_serializes_envelope() {
        let page = RecipePage::new(Pagination::default(), 0, Vec::new());
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "page": 1, "limit": 10, "total": 0, "data": [] })
        );
    }

    #[tokio::test]
    async fn test_internal_error_response() {
        let response = ApiError::internal("boom").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "internal_error");
        assert_eq!(json["code"], "INTERNAL");
        assert_eq!(json["message"], "boom");
    }

    #[test]
    fn test_transient_data_error_is_unavailable() {
        let response = ApiError::from_data(DataError::Sqlite(sqlx::Error::PoolTimedOut))
            .into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let response =
            ApiError::from_data(DataError::Io(std::io::Error::other("disk gone"))).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_not_found_response() {
        let response = ApiError::not_found("NOT_FOUND", "No route").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
