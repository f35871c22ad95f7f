//! SQLite schema definitions

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// Complete schema SQL
///
/// `nutrients` holds the raw JSON object. The `*_folded` and `calories_value`
/// columns are search keys written alongside each recipe: lowercased text for
/// substring matching and the leading number of `nutrients.calories`, so that
/// calorie filters compare numbers instead of strings like `"389 kcal"`.
pub const SCHEMA: &str = r#"
-- =============================================================================
-- Infrastructure: Schema version tracking
-- =============================================================================
CREATE TABLE IF NOT EXISTS schema_version (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    version INTEGER NOT NULL,
    applied_at INTEGER NOT NULL,
    description TEXT
);

-- =============================================================================
-- Recipes
-- =============================================================================
CREATE TABLE IF NOT EXISTS recipes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT,
    cuisine TEXT,
    rating REAL,
    prep_time INTEGER,
    cook_time INTEGER,
    total_time INTEGER,
    description TEXT,
    nutrients TEXT CHECK(nutrients IS NULL OR json_valid(nutrients)),
    serves TEXT,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL,
    title_folded TEXT,
    cuisine_folded TEXT,
    calories_value REAL
);

CREATE INDEX IF NOT EXISTS idx_recipes_rating ON recipes(rating DESC);
CREATE INDEX IF NOT EXISTS idx_recipes_total_time ON recipes(total_time);
CREATE INDEX IF NOT EXISTS idx_recipes_calories ON recipes(calories_value);
"#;
