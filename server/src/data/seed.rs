//! Recipe seed files
//!
//! A seed file is JSON whose top level is either an object of recipes (keys
//! are ignored, values taken in document order) or an array of recipes.

use std::path::Path;

use serde_json::Value;
use thiserror::Error;

use crate::data::types::Recipe;

#[derive(Error, Debug)]
pub enum SeedError {
    #[error("Failed to read seed file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse seed file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Seed file must contain an object or array of recipes, found {0}")]
    UnexpectedShape(&'static str),

    #[error("Recipe {key} is invalid: {source}")]
    InvalidRecipe {
        key: String,
        source: serde_json::Error,
    },
}

/// Read and parse a seed file
pub async fn load_seed_file(path: &Path) -> Result<Vec<Recipe>, SeedError> {
    tracing::debug!(path = %path.display(), "Loading seed file");
    let content = tokio::fs::read_to_string(path).await?;
    parse_seed(&content)
}

/// Parse seed JSON into recipes, preserving document order
pub fn parse_seed(content: &str) -> Result<Vec<Recipe>, SeedError> {
    let root: Value = serde_json::from_str(content)?;

    let entries: Vec<(String, Value)> = match root {
        Value::Object(map) => map.into_iter().collect(),
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, v)| (i.to_string(), v))
            .collect(),
        other => return Err(SeedError::UnexpectedShape(json_kind(&other))),
    };

    let mut recipes = Vec::with_capacity(entries.len());
    for (key, value) in entries {
        let recipe: Recipe = serde_json::from_value(value)
            .map_err(|source| SeedError::InvalidRecipe {
                key: key.clone(),
                source,
            })?;

        let unknown = recipe.unknown_nutrient_keys();
        if !unknown.is_empty() {
            tracing::warn!(
                key = %key,
                nutrients = %unknown.join(", "),
                "Recipe has unrecognised nutrient keys"
            );
        }
        recipes.push(recipe);
    }

    tracing::debug!(count = recipes.len(), "Parsed seed recipes");
    Ok(recipes)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
