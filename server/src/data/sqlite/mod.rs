//! SQLite recipe store
//!
//! One connection pool is created at startup and shared by every request:
//! - WAL mode for concurrent reads during writes
//! - In-memory temp storage for fast queries
//! - Schema applied on first start

mod migrations;
pub mod schema;

pub use sqlx::SqlitePool;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::ConnectOptions;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::log::LevelFilter;

use crate::core::config::DatabaseConfig;
use crate::core::constants::{
    SQLITE_BUSY_TIMEOUT_SECS, SQLITE_CACHE_SIZE, SQLITE_CHECKPOINT_INTERVAL_SECS,
};
use crate::data::error::DataError;
use crate::data::filters::{RecipePredicate, SqlParams, SqlValue, fold_text, leading_number};
use crate::data::traits::RecipeRepository;
use crate::data::types::{Recipe, RecipeRow};

/// Columns read back into [`RecipeRow`]
const RECIPE_COLUMNS: &str =
    "id, title, cuisine, rating, prep_time, cook_time, total_time, description, nutrients, serves";

/// SQLite database service
///
/// Should be created once at server startup and shared across all handlers.
pub struct SqliteService {
    pool: SqlitePool,
}

impl SqliteService {
    /// Open (creating if needed) the database file and run migrations
    pub async fn init(config: &DatabaseConfig) -> Result<Self, DataError> {
        if let Some(parent) = config.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let options = SqliteConnectOptions::new()
            .filename(&config.path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(SQLITE_BUSY_TIMEOUT_SECS))
            .pragma("cache_size", SQLITE_CACHE_SIZE)
            .pragma("temp_store", "MEMORY")
            .log_statements(LevelFilter::Trace);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await?;

        migrations::run_migrations(&pool).await?;

        tracing::debug!(path = %config.path.display(), "SqliteService initialized");
        Ok(Self { pool })
    }

    /// Single-connection in-memory database (tests)
    #[cfg(test)]
    pub async fn in_memory() -> Result<Self, DataError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(":memory:")
            .await?;
        migrations::run_migrations(&pool).await?;
        Ok(Self { pool })
    }

    pub async fn checkpoint(&self) -> Result<(), DataError> {
        sqlx::query("PRAGMA wal_checkpoint(TRUNCATE)")
            .execute(&self.pool)
            .await?;
        tracing::debug!("WAL checkpoint completed");
        Ok(())
    }

    /// Close the connection pool gracefully
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::debug!("SQLite pool closed");
    }

    /// Periodically truncate the WAL until shutdown is signalled
    pub fn start_checkpoint_task(
        self: &Arc<Self>,
        mut shutdown_rx: watch::Receiver<bool>,
    ) -> JoinHandle<()> {
        let db = Arc::clone(self);
        tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(Duration::from_secs(SQLITE_CHECKPOINT_INTERVAL_SECS));
            // First tick fires immediately; skip it
            interval.tick().await;
            loop {
                tokio::select! {
                    biased;
                    _ = shutdown_rx.changed() => {
                        if *shutdown_rx.borrow() {
                            tracing::debug!("WAL checkpoint task shutting down");
                            break;
                        }
                    }
                    _ = interval.tick() => {
                        if let Err(e) = db.checkpoint().await {
                            tracing::warn!(error = %e, "WAL checkpoint failed");
                        }
                    }
                }
            }
        })
    }

    async fn fetch_page(
        &self,
        where_sql: &str,
        params: &SqlParams,
        order_by: &str,
        skip: u64,
        limit: u32,
    ) -> Result<Vec<Recipe>, DataError> {
        let sql = format!(
            "SELECT {} FROM recipes WHERE {} ORDER BY {} LIMIT ? OFFSET ?",
            RECIPE_COLUMNS, where_sql, order_by
        );
        let mut query = sqlx::query_as::<_, RecipeRow>(&sql);
        for value in &params.values {
            query = match value {
                SqlValue::Text(s) => query.bind(s.as_str()),
                SqlValue::Real(f) => query.bind(*f),
            };
        }
        let rows = query
            .bind(i64::from(limit))
            .bind(i64::try_from(skip).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Recipe::from).collect())
    }
}

#[async_trait]
impl RecipeRepository for SqliteService {
    async fn count(&self, predicate: &RecipePredicate) -> Result<u64, DataError> {
        let mut params = SqlParams::default();
        let where_sql = predicate.to_sql(&mut params);
        let sql = format!("SELECT COUNT(*) FROM recipes WHERE {}", where_sql);

        let mut query = sqlx::query_scalar::<_, i64>(&sql);
        for value in &params.values {
            query = match value {
                SqlValue::Text(s) => query.bind(s.as_str()),
                SqlValue::Real(f) => query.bind(*f),
            };
        }
        let total = query.fetch_one(&self.pool).await?;
        Ok(total.max(0) as u64)
    }

    async fn find(
        &self,
        predicate: &RecipePredicate,
        skip: u64,
        limit: u32,
    ) -> Result<Vec<Recipe>, DataError> {
        let mut params = SqlParams::default();
        let where_sql = predicate.to_sql(&mut params);
        self.fetch_page(&where_sql, &params, "id", skip, limit)
            .await
    }

    async fn list_by_rating(&self, skip: u64, limit: u32) -> Result<Vec<Recipe>, DataError> {
        self.fetch_page(
            "1=1",
            &SqlParams::default(),
            "rating IS NULL, rating DESC, id",
            skip,
            limit,
        )
        .await
    }

    async fn replace_all(&self, recipes: &[Recipe]) -> Result<u64, DataError> {
        let now = chrono::Utc::now().timestamp();
        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query("DELETE FROM recipes")
            .execute(&mut *tx)
            .await?
            .rows_affected();

        for recipe in recipes {
            let nutrients = serde_json::to_string(&recipe.nutrients)?;
            sqlx::query(
                r#"
                INSERT INTO recipes (
                    title, cuisine, rating, prep_time, cook_time, total_time,
                    description, nutrients, serves, created_at, updated_at,
                    title_folded, cuisine_folded, calories_value
                )
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&recipe.title)
            .bind(&recipe.cuisine)
            .bind(recipe.rating)
            .bind(recipe.prep_time)
            .bind(recipe.cook_time)
            .bind(recipe.total_time)
            .bind(&recipe.description)
            .bind(nutrients)
            .bind(&recipe.serves)
            .bind(now)
            .bind(now)
            .bind(recipe.title.as_deref().map(fold_text))
            .bind(recipe.cuisine.as_deref().map(fold_text))
            .bind(recipe.calories().and_then(leading_number))
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::debug!(deleted, inserted = recipes.len(), "Recipes replaced");
        Ok(recipes.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filters::{SearchParams, build_filter};

    fn recipe(title: &str, cuisine: &str, rating: Option<f64>, total: i64, kcal: &str) -> Recipe {
        let mut recipe = Recipe {
            title: Some(title.to_string()),
            cuisine: Some(cuisine.to_string()),
            rating,
            total_time: Some(total),
            ..Default::default()
        };
        recipe
            .nutrients
            .insert("calories".to_string(), serde_json::Value::from(kcal));
        recipe
    }

    fn with_calories(title: &str, calories: Option<serde_json::Value>) -> Recipe {
        let mut recipe = Recipe {
            title: Some(title.to_string()),
            ..Default::default()
        };
        if let Some(calories) = calories {
            recipe.nutrients.insert("calories".to_string(), calories);
        }
        recipe
    }

    async fn seeded() -> SqliteService {
        let db = SqliteService::in_memory().await.unwrap();
        db.replace_all(&[
            recipe("Tomato Soup", "Italian", Some(4.2), 30, "180 kcal"),
            recipe("Sweet Potato Pie", "Southern Recipes", Some(4.8), 115, "389 kcal"),
            recipe("soup of the day", "French", None, 45, "250 kcal"),
            recipe("Chili_Con_Carne", "Mexican", Some(3.9), 90, "520 kcal"),
        ])
        .await
        .unwrap();
        db
    }

    fn search(params: SearchParams) -> RecipePredicate {
        build_filter(&params)
    }

    fn titles(recipes: &[Recipe]) -> Vec<&str> {
        recipes.iter().filter_map(|r| r.title.as_deref()).collect()
    }

    #[tokio::test]
    async fn test_replace_all_and_count() {
        let db = seeded().await;
        assert_eq!(db.count_all().await.unwrap(), 4);

        let n = db
            .replace_all(&[recipe("Only", "Any", None, 1, "1 kcal")])
            .await
            .unwrap();
        assert_eq!(n, 1);
        assert_eq!(db.count_all().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_find_title_case_insensitive() {
        let db = seeded().await;
        let predicate = search(SearchParams {
            title: Some("SOUP".to_string()),
            ..Default::default()
        });

        assert_eq!(db.count(&predicate).await.unwrap(), 2);
        let found = db.find(&predicate, 0, 10).await.unwrap();
        assert_eq!(titles(&found), vec!["Tomato Soup", "soup of the day"]);
    }

    #[tokio::test]
    async fn test_find_title_underscore_is_literal() {
        let db = seeded().await;
        let predicate = search(SearchParams {
            title: Some("_".to_string()),
            ..Default::default()
        });
        let found = db.find(&predicate, 0, 10).await.unwrap();
        assert_eq!(titles(&found), vec!["Chili_Con_Carne"]);
    }

    #[tokio::test]
    async fn test_find_by_calories() {
        let db = seeded().await;
        let predicate = search(SearchParams {
            calories: Some(">=300".to_string()),
            ..Default::default()
        });
        let found = db.find(&predicate, 0, 10).await.unwrap();
        assert_eq!(titles(&found), vec!["Sweet Potato Pie", "Chili_Con_Carne"]);
    }

    #[tokio::test]
    async fn test_find_combined_filters() {
        let db = seeded().await;
        let predicate = search(SearchParams {
            rating: Some(">=4".to_string()),
            total_time: Some("<=60".to_string()),
            ..Default::default()
        });
        let found = db.find(&predicate, 0, 10).await.unwrap();
        assert_eq!(titles(&found), vec!["Tomato Soup"]);
    }

    async fn assert_sql_and_in_process_agree(db: &SqliteService, cases: Vec<SearchParams>) {
        let all = db.find(&RecipePredicate::new(), 0, 100).await.unwrap();

        for params in cases {
            let predicate = search(params);
            let from_sql = db.find(&predicate, 0, 100).await.unwrap();
            let in_process: Vec<Recipe> = all
                .iter()
                .filter(|r| predicate.matches(r))
                .cloned()
                .collect();
            assert_eq!(from_sql, in_process, "{predicate:?}");
            assert_eq!(db.count(&predicate).await.unwrap(), in_process.len() as u64);
        }
    }

    #[tokio::test]
    async fn test_sql_and_in_process_agree() {
        let db = seeded().await;
        assert_sql_and_in_process_agree(
            &db,
            vec![
                SearchParams {
                    calories: Some("<250".to_string()),
                    ..Default::default()
                },
                SearchParams {
                    calories: Some("250".to_string()),
                    ..Default::default()
                },
                SearchParams {
                    cuisine: Some("recipes".to_string()),
                    rating: Some(">4.5".to_string()),
                    ..Default::default()
                },
            ],
        )
        .await;
    }

    #[tokio::test]
    async fn test_sql_and_in_process_agree_on_odd_calories() {
        use serde_json::{Value, json};

        let db = SqliteService::in_memory().await.unwrap();
        db.replace_all(&[
            with_calories("nbsp", Some(Value::from("389\u{a0}kcal"))),
            with_calories("glued", Some(Value::from("389kcal"))),
            with_calories("missing", None),
            with_calories("integer", Some(json!(410))),
            with_calories("real", Some(json!(305.5))),
            with_calories("boolean", Some(json!(true))),
            with_calories("array", Some(json!([500]))),
            with_calories("tabbed", Some(Value::from("\t320\tkcal"))),
        ])
        .await
        .unwrap();

        let cases = [">=300", "<=1", "=410", ">0"]
            .into_iter()
            .map(|expr| SearchParams {
                calories: Some(expr.to_string()),
                ..Default::default()
            })
            .collect();
        assert_sql_and_in_process_agree(&db, cases).await;

        let predicate = search(SearchParams {
            calories: Some(">=300".to_string()),
            ..Default::default()
        });
        let found = db.find(&predicate, 0, 100).await.unwrap();
        assert_eq!(titles(&found), vec!["nbsp", "integer", "real", "tabbed"]);
    }

    #[tokio::test]
    async fn test_find_title_folds_unicode_case() {
        let db = SqliteService::in_memory().await.unwrap();
        db.replace_all(&[
            recipe("ÉCLAIR AU CHOCOLAT", "Française", Some(4.0), 90, "300 kcal"),
            recipe("Straße Pie", "ÖSTERREICHISCH", None, 60, "200 kcal"),
        ])
        .await
        .unwrap();

        let predicate = search(SearchParams {
            title: Some("éclair".to_string()),
            ..Default::default()
        });
        assert_eq!(db.count(&predicate).await.unwrap(), 1);
        let found = db.find(&predicate, 0, 10).await.unwrap();
        assert_eq!(titles(&found), vec!["ÉCLAIR AU CHOCOLAT"]);

        assert_sql_and_in_process_agree(
            &db,
            vec![
                SearchParams {
                    cuisine: Some("österreich".to_string()),
                    ..Default::default()
                },
                SearchParams {
                    cuisine: Some("FRANÇAISE".to_string()),
                    ..Default::default()
                },
                SearchParams {
                    title: Some("STRASSE".to_string()),
                    ..Default::default()
                },
            ],
        )
        .await;
    }

    #[tokio::test]
    async fn test_find_paginates() {
        let db = seeded().await;
        let page = db.find(&RecipePredicate::new(), 2, 1).await.unwrap();
        assert_eq!(titles(&page), vec!["soup of the day"]);

        let past_end = db.find(&RecipePredicate::new(), 10, 5).await.unwrap();
        assert!(past_end.is_empty());
    }

    #[tokio::test]
    async fn test_list_by_rating_puts_unrated_last() {
        let db = seeded().await;
        let listed = db.list_by_rating(0, 10).await.unwrap();
        assert_eq!(
            titles(&listed),
            vec![
                "Sweet Potato Pie",
                "Tomato Soup",
                "Chili_Con_Carne",
                "soup of the day"
            ]
        );
    }

    #[tokio::test]
    async fn test_nutrients_round_trip() {
        let db = seeded().await;
        let found = db.find(&RecipePredicate::new(), 0, 1).await.unwrap();
        assert_eq!(
            found[0].calories(),
            Some(&serde_json::Value::from("180 kcal"))
        );
    }

    #[tokio::test]
    async fn test_init_creates_database_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = DatabaseConfig {
            path: dir.path().join("nested").join("recipes.db"),
            max_connections: 2,
        };
        let db = SqliteService::init(&config).await.unwrap();
        assert_eq!(db.count_all().await.unwrap(), 0);
        db.checkpoint().await.unwrap();
        db.close().await;
        assert!(config.path.exists());
    }

    #[tokio::test]
    async fn test_checkpoint_task_stops_on_shutdown() {
        let db = Arc::new(SqliteService::in_memory().await.unwrap());
        let (tx, rx) = watch::channel(false);
        let handle = db.start_checkpoint_task(rx);

        tx.send(true).unwrap();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .unwrap()
            .unwrap();
    }
}
