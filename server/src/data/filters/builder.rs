//! Predicate builder
//!
//! Turns loosely-typed search parameters into a [`RecipePredicate`] and
//! resolves pagination separately from it.

use serde::Deserialize;

use super::parser::{normalize_expression, parse_numeric_filter};
use super::types::{Clause, NumberField, RecipePredicate, TextField};

/// Default page number
pub const DEFAULT_PAGE: u32 = 1;
/// Default items per page
pub const DEFAULT_LIMIT: u32 = 10;

/// Raw search parameters, exactly as received
///
/// All values are strings so that malformed input never rejects a request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SearchParams {
    pub title: Option<String>,
    pub cuisine: Option<String>,
    pub rating: Option<String>,
    pub total_time: Option<String>,
    pub calories: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// Build the predicate for a search request.
///
/// Text fields become literal case-insensitive substring matches; numeric
/// fields go through the expression parser and are omitted when it finds
/// nothing. Calories compare against the leading number of
/// `nutrients.calories`. Pagination parameters are ignored here.
pub fn build_filter(params: &SearchParams) -> RecipePredicate {
    let mut predicate = RecipePredicate::new();

    for (field, raw) in [
        (TextField::Title, &params.title),
        (TextField::Cuisine, &params.cuisine),
    ] {
        if let Some(value) = non_empty(raw) {
            predicate.push(Clause::Text {
                field,
                value: value.to_string(),
            });
        }
    }

    for (field, raw) in [
        (NumberField::Rating, &params.rating),
        (NumberField::TotalTime, &params.total_time),
    ] {
        let Some(expr) = non_empty(raw) else {
            continue;
        };
        match parse_numeric_filter(&normalize_expression(expr)) {
            Some(filter) => predicate.push(Clause::Number { field, filter }),
            None => {
                tracing::debug!(field = field.column(), value = %expr, "Ignoring unparseable filter")
            }
        }
    }

    if let Some(expr) = non_empty(&params.calories) {
        match parse_numeric_filter(&normalize_expression(expr)) {
            Some(filter) => predicate.push(Clause::DerivedCalories { filter }),
            None => tracing::debug!(field = "calories", value = %expr, "Ignoring unparseable filter"),
        }
    }

    predicate
}

fn non_empty(raw: &Option<String>) -> Option<&str> {
    raw.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Resolved pagination window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
}

impl Pagination {
    /// Resolve raw `page`/`limit` values.
    ///
    /// Absent, non-numeric and non-positive values fall back to the defaults;
    /// leading digits are honoured (`"3abc"` is page 3). `limit` is clamped
    /// to `max_limit`.
    pub fn from_raw(
        page: Option<&str>,
        limit: Option<&str>,
        default_limit: u32,
        max_limit: u32,
    ) -> Self {
        let page = parse_positive(page).unwrap_or(DEFAULT_PAGE);
        let limit = parse_positive(limit)
            .unwrap_or(default_limit)
            .min(max_limit.max(1));
        Self { page, limit }
    }

    /// Number of records to skip before this page
    pub fn skip(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Parse the leading decimal digits of `raw` as a positive integer
fn parse_positive(raw: Option<&str>) -> Option<u32> {
    let raw = raw?.trim();
    let digits_end = raw
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(raw.len());
    let digits = &raw[..digits_end];
    if digits.is_empty() {
        return None;
    }
    // Overflowing values saturate rather than fall back
    let value = digits.parse::<u32>().unwrap_or(u32::MAX);
    (value > 0).then_some(value)
}
