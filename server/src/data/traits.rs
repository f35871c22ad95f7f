//! Repository trait for the recipe store
//!
//! The HTTP layer only talks to the store through this trait; the SQLite
//! service is the shipped implementation.

use async_trait::async_trait;

use crate::data::error::DataError;
use crate::data::filters::RecipePredicate;
use crate::data::types::Recipe;

#[async_trait]
pub trait RecipeRepository: Send + Sync {
    /// Count recipes matching the predicate
    async fn count(&self, predicate: &RecipePredicate) -> Result<u64, DataError>;

    /// Fetch one page of matching recipes in insertion order
    async fn find(
        &self,
        predicate: &RecipePredicate,
        skip: u64,
        limit: u32,
    ) -> Result<Vec<Recipe>, DataError>;

    /// Fetch one page of all recipes, highest rated first (unrated last)
    async fn list_by_rating(&self, skip: u64, limit: u32) -> Result<Vec<Recipe>, DataError>;

    /// Replace the whole collection in one transaction, returning the count
    async fn replace_all(&self, recipes: &[Recipe]) -> Result<u64, DataError>;

    /// Count every recipe
    async fn count_all(&self) -> Result<u64, DataError> {
        self.count(&RecipePredicate::new()).await
    }
}
