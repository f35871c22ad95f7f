//! SQL utility functions

/// Escape SQL LIKE metacharacters (%, _, \) in user input
///
/// Patterns built from the result must be used with `ESCAPE '\'`.
///
/// ```
/// use recipebox_server::utils::sql::escape_like_pattern;
///
/// assert_eq!(escape_like_pattern("50%_off"), "50\\%\\_off");
/// ```
pub fn escape_like_pattern(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Build a `%...%` LIKE pattern that matches `s` literally anywhere in a value
pub fn contains_pattern(s: &str) -> String {
    format!("%{}%", escape_like_pattern(s))
}
