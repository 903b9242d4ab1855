//! Validation for free-text answers.

use std::sync::LazyLock;

use regex::Regex;

static PHONE_SEPARATORS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[()\s-]").unwrap());
static PHONE_SHAPE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\+?\d{7,}$").unwrap());

/// Checks whether the input looks like a phone number.
///
/// Spaces, hyphens and parentheses are stripped first; what remains must be
/// at least seven digits with an optional leading `+`. The raw input is what
/// gets stored, this only gates it.
pub fn is_valid_phone(input: &str) -> bool {
    let cleaned = PHONE_SEPARATORS.replace_all(input, "");
    PHONE_SHAPE.is_match(&cleaned)
}
