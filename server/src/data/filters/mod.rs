//! Recipe search filters
//!
//! Translates raw query parameters into a store predicate. Numeric fields use
//! a small expression language (`>=4.5`, `<30`, `=4`, or a bare number for
//! equality); text fields are literal case-insensitive substring matches.
//!
//! ## Usage
//!
//! ```
//! use recipebox_server::data::filters::{SearchParams, SqlParams, build_filter};
//!
//! let params = SearchParams {
//!     title: Some("soup".to_string()),
//!     calories: Some("<400".to_string()),
//!     ..Default::default()
//! };
//! let predicate = build_filter(&params);
//! let mut sql_params = SqlParams::default();
//! let sql = predicate.to_sql(&mut sql_params);
//! assert_eq!(sql, r"title LIKE ? ESCAPE '\' AND calories_value < ?");
//! ```

mod builder;
mod parser;
mod types;

pub use builder::{DEFAULT_LIMIT, DEFAULT_PAGE, Pagination, SearchParams, build_filter};
pub use parser::{normalize_expression, parse_numeric_filter};
pub use types::{
    CALORIES_VALUE_COLUMN, Clause, NumberField, NumberOp, NumericFilter, RecipePredicate,
    SqlParams, SqlValue, TextField, fold_text, leading_number,
};
