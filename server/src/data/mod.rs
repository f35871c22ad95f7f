//! Data storage layer
//!
//! - `filters` - Search parameter parsing and predicate building
//! - `sqlite` - Recipe store backed by SQLite
//! - `seed` - Loading recipe collections from JSON files
//! - `types` - Recipe data types
//! - `traits` - Repository trait used by the HTTP layer
//! - `error` - Store error type

pub mod error;
pub mod filters;
pub mod seed;
pub mod sqlite;
pub mod traits;
pub mod types;

pub use error::DataError;
pub use seed::SeedError;
pub use sqlite::SqliteService;
pub use traits::RecipeRepository;
pub use types::Recipe;
