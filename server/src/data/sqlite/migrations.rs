//! Database migration system
//!
//! Version 1 is the initial schema; later versions are applied in order.

use sqlx::SqlitePool;

use super::schema::{SCHEMA, SCHEMA_VERSION};
use crate::data::error::DataError;

/// Run all pending migrations
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), DataError> {
    let table_exists: bool = sqlx::query_scalar(
        "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name='schema_version'",
    )
    .fetch_one(pool)
    .await?;

    if !table_exists {
        tracing::debug!(
            "Initializing database with schema version {}",
            SCHEMA_VERSION
        );
        return apply_initial_schema(pool).await;
    }

    let current_version: i32 =
        sqlx::query_scalar("SELECT version FROM schema_version WHERE id = 1")
            .fetch_optional(pool)
            .await?
            .unwrap_or(0);

    if current_version > SCHEMA_VERSION {
        return Err(DataError::migration_failed(
            current_version,
            "unknown",
            format!(
                "Database schema version {} is newer than supported version {}",
                current_version, SCHEMA_VERSION
            ),
        ));
    }

    if current_version < SCHEMA_VERSION {
        // No incremental migrations exist yet; version 1 is the only schema
        return Err(DataError::migration_failed(
            current_version + 1,
            "unknown",
            format!("Unknown migration version: {}", current_version + 1),
        ));
    }

    tracing::debug!(
        "Database schema is up to date (version {})",
        current_version
    );
    Ok(())
}

async fn apply_initial_schema(pool: &SqlitePool) -> Result<(), DataError> {
    let start = std::time::Instant::now();

    let mut tx = pool.begin().await?;

    sqlx::query(SCHEMA)
        .execute(&mut *tx)
        .await
        .map_err(|e| DataError::migration_failed(SCHEMA_VERSION, "initial_schema", e.to_string()))?;

    let now = chrono::Utc::now().timestamp();
    sqlx::query(
        "INSERT INTO schema_version (id, version, applied_at, description) VALUES (1, ?, ?, 'Initial schema')",
    )
    .bind(SCHEMA_VERSION)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::debug!(
        "Applied initial schema in {}ms",
        start.elapsed().as_millis()
    );
    Ok(())
}
