//! Recipe API endpoints

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use crate::api::types::{ApiError, RecipePage};
use crate::core::config::PaginationConfig;
use crate::data::RecipeRepository;
use crate::data::filters::{Pagination, SearchParams, build_filter};

/// Shared state for Recipe API endpoints
#[derive(Clone)]
pub struct RecipesApiState {
    pub repository: Arc<dyn RecipeRepository>,
    pub pagination: PaginationConfig,
}

impl RecipesApiState {
    fn paginate(&self, page: Option<&str>, limit: Option<&str>) -> Pagination {
        Pagination::from_raw(
            page,
            limit,
            self.pagination.default_limit,
            self.pagination.max_limit,
        )
    }
}

/// Query parameters for the unfiltered listing
#[derive(Debug, Default, Deserialize)]
pub struct ListRecipesQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// Build Recipe API routes
pub fn routes(repository: Arc<dyn RecipeRepository>, pagination: PaginationConfig) -> Router<()> {
    let state = RecipesApiState {
        repository,
        pagination,
    };

    Router::new()
        .route("/", get(list_recipes))
        .route("/search", get(search_recipes))
        .with_state(state)
}

/// List all recipes, highest rated first
#[utoipa::path(
    get,
    path = "/api/recipes",
    tag = "recipes",
    params(
        ("page" = Option<String>, Query, description = "Page number (default 1)"),
        ("limit" = Option<String>, Query, description = "Items per page (default 10)")
    ),
    responses(
        (status = 200, description = "Page of recipes sorted by rating", body = RecipePage),
        (status = 500, description = "Store failure"),
        (status = 503, description = "Store temporarily unavailable")
    )
)]
pub async fn list_recipes(
    State(state): State<RecipesApiState>,
    Query(query): Query<ListRecipesQuery>,
) -> Result<Json<RecipePage>, ApiError> {
    let pagination = state.paginate(query.page.as_deref(), query.limit.as_deref());

    let (total, recipes) = tokio::try_join!(
        state.repository.count_all(),
        state
            .repository
            .list_by_rating(pagination.skip(), pagination.limit),
    )
    .map_err(ApiError::from_data)?;

    Ok(Json(RecipePage::new(pagination, total, recipes)))
}

/// Search recipes
///
/// Numeric parameters accept `<op><number>` with `op` one of `<`, `>`, `<=`,
/// `>=`, `=`, or a bare number for equality. Unparseable values are ignored.
#[utoipa::path(
    get,
    path = "/api/recipes/search",
    tag = "recipes",
    params(
        ("title" = Option<String>, Query, description = "Case-insensitive substring of the title"),
        ("cuisine" = Option<String>, Query, description = "Case-insensitive substring of the cuisine"),
        ("rating" = Option<String>, Query, description = "Rating comparison, e.g. >=4.5"),
        ("total_time" = Option<String>, Query, description = "Total time comparison in minutes, e.g. <=60"),
        ("calories" = Option<String>, Query, description = "Calories comparison, e.g. <400"),
        ("page" = Option<String>, Query, description = "Page number (default 1)"),
        ("limit" = Option<String>, Query, description = "Items per page (default 10)")
    ),
    responses(
        (status = 200, description = "Page of matching recipes", body = RecipePage),
        (status = 500, description = "Store failure"),
        (status = 503, description = "Store temporarily unavailable")
    )
)]
pub async fn search_recipes(
    State(state): State<RecipesApiState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<RecipePage>, ApiError> {
    let predicate = build_filter(&params);
    let pagination = state.paginate(params.page.as_deref(), params.limit.as_deref());
    tracing::debug!(
        predicate = ?predicate,
        page = pagination.page,
        limit = pagination.limit,
        "Searching recipes"
    );

    let (total, recipes) = tokio::try_join!(
        state.repository.count(&predicate),
        state
            .repository
            .find(&predicate, pagination.skip(), pagination.limit),
    )
    .map_err(ApiError::from_data)?;

    Ok(Json(RecipePage::new(pagination, total, recipes)))
}
