//! String predicates and small message helpers

use commonutil_core::{Error, Result};
use regex::Regex;
use std::fmt::Display;

/// True when `field` is empty or contains only whitespace
pub fn is_blank(field: &str) -> bool {
    field.trim().is_empty()
}

/// True when `field` contains something other than whitespace
pub fn is_not_blank(field: &str) -> bool {
    !is_blank(field)
}

/// True when `field` is non-empty; whitespace counts as content
///
/// ```
/// use commonutil_utils::string::has_length;
///
/// assert!(!has_length(""));
/// assert!(has_length(" "));
/// assert!(has_length("Hello"));
/// ```
pub fn has_length(field: &str) -> bool {
    !field.is_empty()
}

/// Both fields are non-blank and equal (case sensitive)
pub fn equals(field1: &str, field2: &str) -> bool {
    is_not_blank(field1) && is_not_blank(field2) && field1 == field2
}

/// Both fields are non-blank and equal ignoring case
pub fn equals_ignore_case(field1: &str, field2: &str) -> bool {
    is_not_blank(field1)
        && is_not_blank(field2)
        && field1
            .chars()
            .flat_map(char::to_lowercase)
            .eq(field2.chars().flat_map(char::to_lowercase))
}

/// True when `value` matches at least one of `patterns` in full
///
/// A blank `value` never matches. Patterns are compiled in order and the
/// search stops at the first match, so an invalid pattern after a match is
/// never seen.
pub fn matches_any<S: AsRef<str>>(value: &str, patterns: &[S]) -> Result<bool> {
    if is_blank(value) {
        return Ok(false);
    }

    for pattern in patterns {
        let pattern = pattern.as_ref();
        let regex = Regex::new(&format!("^(?:{pattern})$"))
            .map_err(|e| Error::invalid_pattern(pattern, e.to_string()))?;
        if regex.is_match(value) {
            return Ok(true);
        }
    }

    Ok(false)
}

/// True when `msg` ends with `:`, `;`, `,` or `.`
pub fn ends_with_separator(msg: &str) -> bool {
    msg.ends_with([':', ';', ',', '.'])
}

/// Append `type_name` to `msg`, inserting `": "` unless `msg` ends with a space
pub fn message_with_type_name(msg: &str, type_name: impl Display) -> String {
    if msg.ends_with(' ') {
        format!("{msg}{type_name}")
    } else {
        format!("{msg}: {type_name}")
    }
}

/// True when `field` is non-blank and made only of decimal digits
///
/// `"50"` is numeric; `"101.12"` and `" "` are not.
pub fn is_numeric(field: &str) -> bool {
    is_not_blank(field) && field.chars().all(|c| c.is_ascii_digit())
}
