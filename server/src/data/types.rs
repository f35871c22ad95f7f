//! Recipe data types shared by the store and the API layer

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Nutrient keys found in the recipe collection.
///
/// Values are free-form and usually carry a unit (`"389 kcal"`, `"12 g"`).
pub const NUTRIENT_KEYS: &[&str] = &[
    "calories",
    "carbohydrateContent",
    "cholesterolContent",
    "fiberContent",
    "proteinContent",
    "saturatedFatContent",
    "sodiumContent",
    "sugarContent",
    "fatContent",
];

/// Nutrient mapping as stored (JSON object, no fixed schema)
pub type Nutrients = Map<String, Value>;

/// A recipe document
///
/// Every field is optional: the seed data is sparse and inconsistently typed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub cuisine: Option<String>,
    #[serde(default, deserialize_with = "de_opt_finite")]
    pub rating: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_minutes")]
    pub prep_time: Option<i64>,
    #[serde(default, deserialize_with = "de_opt_minutes")]
    pub cook_time: Option<i64>,
    #[serde(default, deserialize_with = "de_opt_minutes")]
    pub total_time: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "de_nutrients")]
    pub nutrients: Nutrients,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub serves: Option<String>,
}

impl Recipe {
    /// Raw `nutrients.calories` value, if present
    pub fn calories(&self) -> Option<&Value> {
        self.nutrients.get("calories")
    }

    /// Nutrient keys outside [`NUTRIENT_KEYS`]
    pub fn unknown_nutrient_keys(&self) -> Vec<&str> {
        self.nutrients
            .keys()
            .map(String::as_str)
            .filter(|k| !NUTRIENT_KEYS.contains(k))
            .collect()
    }
}

/// Stored recipe row as read back from SQLite
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RecipeRow {
    pub id: i64,
    pub title: Option<String>,
    pub cuisine: Option<String>,
    pub rating: Option<f64>,
    pub prep_time: Option<i64>,
    pub cook_time: Option<i64>,
    pub total_time: Option<i64>,
    pub description: Option<String>,
    pub nutrients: Option<String>,
    pub serves: Option<String>,
}

impl From<RecipeRow> for Recipe {
    fn from(row: RecipeRow) -> Self {
        let nutrients = row
            .nutrients
            .as_deref()
            .and_then(|raw| match serde_json::from_str::<Nutrients>(raw) {
                Ok(map) => Some(map),
                Err(e) => {
                    tracing::warn!(id = row.id, error = %e, "Stored nutrients are not a JSON object");
                    None
                }
            })
            .unwrap_or_default();

        Self {
            title: row.title,
            cuisine: row.cuisine,
            rating: row.rating,
            prep_time: row.prep_time,
            cook_time: row.cook_time,
            total_time: row.total_time,
            description: row.description,
            nutrients,
            serves: row.serves,
        }
    }
}

/// Numbers that are NaN in the source export arrive as `null`; anything
/// non-numeric is treated the same way.
fn de_opt_finite<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.as_f64()).filter(|f| f.is_finite()))
}

fn de_opt_minutes<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.round() as i64)),
        _ => None,
    })
}

fn de_opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn de_nutrients<'de, D>(deserializer: D) -> Result<Nutrients, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Object(map)) => map,
        _ => Nutrients::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipe_parse_full() {
        let json = r#"{
            "title": "Sweet Potato Pie",
            "cuisine": "Southern Recipes",
            "rating": 4.8,
            "prep_time": 15,
            "cook_time": 100,
            "total_time": 115,
            "description": "Shared from a Southern recipe",
            "nutrients": { "calories": "389 kcal", "fatContent": "21 g" },
            "serves": "8 servings"
        }"#;
        let recipe: Recipe = serde_json::from_str(json).unwrap();

        assert_eq!(recipe.title.as_deref(), Some("Sweet Potato Pie"));
        assert_eq!(recipe.rating, Some(4.8));
        assert_eq!(recipe.total_time, Some(115));
        assert_eq!(recipe.calories(), Some(&Value::from("389 kcal")));
        assert_eq!(recipe.serves.as_deref(), Some("8 servings"));
    }

    #[test]
    fn test_recipe_parse_sparse_and_null() {
        let json = r#"{ "title": "Toast", "rating": null, "prep_time": null, "nutrients": null }"#;
        let recipe: Recipe = serde_json::from_str(json).unwrap();

        assert_eq!(recipe.rating, None);
        assert_eq!(recipe.prep_time, None);
        assert!(recipe.nutrients.is_empty());
        assert_eq!(recipe.cuisine, None);
    }

    #[test]
    fn test_recipe_parse_loose_types() {
        let json = r#"{ "serves": 4, "cook_time": 12.6, "rating": "n/a" }"#;
        let recipe: Recipe = serde_json::from_str(json).unwrap();

        assert_eq!(recipe.serves.as_deref(), Some("4"));
        assert_eq!(recipe.cook_time, Some(13));
        assert_eq!(recipe.rating, None);
    }

    #[test]
    fn test_unknown_nutrient_keys() {
        let json = r#"{ "nutrients": { "calories": "100 kcal", "vitaminC": "2 mg" } }"#;
        let recipe: Recipe = serde_json::from_str(json).unwrap();
        assert_eq!(recipe.unknown_nutrient_keys(), vec!["vitaminC"]);
    }

    #[test]
    fn test_row_into_recipe() {
        let row = RecipeRow {
            id: 7,
            title: Some("Chili".to_string()),
            cuisine: None,
            rating: Some(4.1),
            prep_time: Some(10),
            cook_time: Some(50),
            total_time: Some(60),
            description: None,
            nutrients: Some(r#"{"calories":"520 kcal"}"#.to_string()),
            serves: Some("6".to_string()),
        };
        let recipe = Recipe::from(row);

        assert_eq!(recipe.title.as_deref(), Some("Chili"));
        assert_eq!(recipe.calories(), Some(&Value::from("520 kcal")));
    }

    #[test]
    fn test_row_with_corrupt_nutrients() {
        let row = RecipeRow {
            id: 1,
            title: None,
            cuisine: None,
            rating: None,
            prep_time: None,
            cook_time: None,
            total_time: None,
            description: None,
            nutrients: Some("[1,2]".to_string()),
            serves: None,
        };
        assert!(Recipe::from(row).nutrients.is_empty());
    }
}
