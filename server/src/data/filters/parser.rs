//! Filter expression parsing
//!
//! Parses operator-prefixed numeric expressions (`>=4.5`, `<30`, `=4`) into
//! [`NumericFilter`] values. Unparseable input yields `None`: callers drop the
//! field rather than fail the request.

use std::sync::OnceLock;

use regex::Regex;

use super::types::{NumberOp, NumericFilter};

/// Two-character operators come first so `<=5` never reads as `<` then `=5`
const EXPRESSION_PATTERN: &str = r"(<=|>=|=|<|>)(\d+(?:\.\d+)?)";

fn expression_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(EXPRESSION_PATTERN).expect("Invalid regex"))
}

/// Parse the first `<op><number>` occurrence in `input`.
///
/// Leading and trailing characters around the match are ignored. A bare
/// number without an operator is not a match; see [`normalize_expression`].
pub fn parse_numeric_filter(input: &str) -> Option<NumericFilter> {
    let caps = expression_regex().captures(input)?;
    let op = NumberOp::from_symbol(caps.get(1)?.as_str())?;
    let value = caps.get(2)?.as_str().parse::<f64>().ok()?;
    Some(NumericFilter::new(op, value))
}

/// Treat a bare number as an equality filter (`"4"` becomes `"=4"`).
///
/// Input that already starts with something other than a digit is returned
/// trimmed but otherwise unchanged.
pub fn normalize_expression(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.starts_with(|c: char| c.is_ascii_digit()) {
        format!("={}", trimmed)
    } else {
        trimmed.to_string()
    }
}
