//! Helpers for case-insensitive substring search.

/// Build an `ILIKE` pattern matching any value that contains `search`.
///
/// `%`, `_` and `\` in the input are escaped, so they match literally.
pub fn contains_pattern(search: &str) -> String {
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for c in search.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// In-process equivalent of `haystack ILIKE contains_pattern(needle)`
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
