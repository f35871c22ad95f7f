//! Filter type definitions
//!
//! A [`RecipePredicate`] is an AND of clauses. It can be evaluated in process
//! against a [`Recipe`] or rendered to a SQLite `WHERE` fragment. The SQL form
//! only reads search keys that the store derives from a recipe with
//! [`fold_text`] and [`leading_number`], so both paths share the same semantics.

use serde_json::Value;

use crate::data::types::Recipe;
use crate::utils::sql::contains_pattern;

/// Numeric comparison operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberOp {
    Eq,
    Gt,
    Lt,
    Gte,
    Lte,
}

impl NumberOp {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "=" => Some(Self::Eq),
            ">" => Some(Self::Gt),
            "<" => Some(Self::Lt),
            ">=" => Some(Self::Gte),
            "<=" => Some(Self::Lte),
            _ => None,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Gt => ">",
            Self::Lt => "<",
            Self::Gte => ">=",
            Self::Lte => "<=",
        }
    }

    /// Apply the operator as `lhs <op> rhs`
    pub fn compare(&self, lhs: f64, rhs: f64) -> bool {
        match self {
            Self::Eq => lhs == rhs,
            Self::Gt => lhs > rhs,
            Self::Lt => lhs < rhs,
            Self::Gte => lhs >= rhs,
            Self::Lte => lhs <= rhs,
        }
    }
}

/// A parsed filter expression such as `>=4.5`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericFilter {
    pub op: NumberOp,
    pub value: f64,
}

impl NumericFilter {
    pub fn new(op: NumberOp, value: f64) -> Self {
        Self { op, value }
    }

    pub fn matches(&self, candidate: f64) -> bool {
        self.op.compare(candidate, self.value)
    }
}

/// Text columns that support substring search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    Title,
    Cuisine,
}

impl TextField {
    pub const fn column(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Cuisine => "cuisine",
        }
    }

    /// Column holding the [`fold_text`] form of the field
    pub const fn folded_column(&self) -> &'static str {
        match self {
            Self::Title => "title_folded",
            Self::Cuisine => "cuisine_folded",
        }
    }

    fn get<'a>(&self, recipe: &'a Recipe) -> Option<&'a str> {
        match self {
            Self::Title => recipe.title.as_deref(),
            Self::Cuisine => recipe.cuisine.as_deref(),
        }
    }
}

/// Numeric columns that accept filter expressions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberField {
    Rating,
    TotalTime,
}

impl NumberField {
    pub const fn column(&self) -> &'static str {
        match self {
            Self::Rating => "rating",
            Self::TotalTime => "total_time",
        }
    }

    fn get(&self, recipe: &Recipe) -> Option<f64> {
        match self {
            Self::Rating => recipe.rating,
            Self::TotalTime => recipe.total_time.map(|t| t as f64),
        }
    }
}

/// Column holding [`leading_number`] of `nutrients.calories`
pub const CALORIES_VALUE_COLUMN: &str = "calories_value";

/// One condition of a predicate
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    /// Case-insensitive literal substring match
    Text { field: TextField, value: String },
    /// Numeric comparison against a numeric column
    Number {
        field: NumberField,
        filter: NumericFilter,
    },
    /// Comparison against the leading numeric token of `nutrients.calories`
    DerivedCalories { filter: NumericFilter },
}

impl Clause {
    /// Field name this clause constrains
    pub fn field_name(&self) -> &'static str {
        match self {
            Self::Text { field, .. } => field.column(),
            Self::Number { field, .. } => field.column(),
            Self::DerivedCalories { .. } => "calories",
        }
    }

    pub fn matches(&self, recipe: &Recipe) -> bool {
        match self {
            Self::Text { field, value } => field
                .get(recipe)
                .is_some_and(|text| fold_text(text).contains(&fold_text(value))),
            Self::Number { field, filter } => field.get(recipe).is_some_and(|v| filter.matches(v)),
            Self::DerivedCalories { filter } => recipe
                .calories()
                .and_then(leading_number)
                .is_some_and(|v| filter.matches(v)),
        }
    }

    pub fn to_sql(&self, params: &mut SqlParams) -> String {
        match self {
            Self::Text { field, value } => {
                params
                    .values
                    .push(SqlValue::Text(contains_pattern(&fold_text(value))));
                format!("{} LIKE ? ESCAPE '\\'", field.folded_column())
            }
            Self::Number { field, filter } => {
                params.values.push(SqlValue::Real(filter.value));
                format!("{} {} ?", field.column(), filter.op.as_str())
            }
            Self::DerivedCalories { filter } => {
                params.values.push(SqlValue::Real(filter.value));
                format!("{} {} ?", CALORIES_VALUE_COLUMN, filter.op.as_str())
            }
        }
    }
}

/// Case-fold text for substring search (full Unicode lowercasing)
pub fn fold_text(text: &str) -> String {
    text.to_lowercase()
}

/// Extract the leading numeric token of a nutrient value.
///
/// `"389 kcal"` yields 389. The first token, split on any Unicode whitespace,
/// must consist of digits with at most one decimal point; anything else
/// (`"n/a"`, `"-5"`, `"1e3"`) yields `None`. Bare JSON numbers go through the
/// same rule. Booleans, arrays and objects yield `None`.
pub fn leading_number(value: &Value) -> Option<f64> {
    let text = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    let token = text.split_whitespace().next()?;

    let well_formed = token.chars().all(|c| c.is_ascii_digit() || c == '.')
        && token.chars().any(|c| c.is_ascii_digit())
        && token.matches('.').count() <= 1;
    if !well_formed {
        return None;
    }
    token.parse::<f64>().ok()
}

/// Bound SQL parameter
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Text(String),
    Real(f64),
}

/// Collects SQL parameters during query building (maintains insertion order)
#[derive(Debug, Default)]
pub struct SqlParams {
    pub values: Vec<SqlValue>,
}

/// AND-combined set of clauses, at most one per field
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipePredicate {
    clauses: Vec<Clause>,
}

impl RecipePredicate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a clause, replacing any existing clause on the same field
    pub fn push(&mut self, clause: Clause) {
        let field = clause.field_name();
        self.clauses.retain(|c| c.field_name() != field);
        self.clauses.push(clause);
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Clause on the given field name, if any
    pub fn clause_for(&self, field: &str) -> Option<&Clause> {
        self.clauses.iter().find(|c| c.field_name() == field)
    }

    /// True when the recipe satisfies every clause
    pub fn matches(&self, recipe: &Recipe) -> bool {
        self.clauses.iter().all(|c| c.matches(recipe))
    }

    /// Generate a SQL WHERE fragment with ? placeholders
    pub fn to_sql(&self, params: &mut SqlParams) -> String {
        if self.clauses.is_empty() {
            return "1=1".to_string();
        }
        self.clauses
            .iter()
            .map(|c| c.to_sql(params))
            .collect::<Vec<_>>()
            .join(" AND ")
    }
}
