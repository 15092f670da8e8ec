//! Character-overlap similarity between a password and account attributes.

use std::collections::HashMap;

/// Upper bound on the overlap ratio `2 * M / (len(a) + len(b))`, where `M`
/// counts characters the two strings share regardless of position.
///
/// Returns `0.0` when both strings are empty.
pub fn quick_ratio(a: &str, b: &str) -> f64 {
    let total = a.chars().count() + b.chars().count();
    if total == 0 {
        return 0.0;
    }

    let mut available: HashMap<char, usize> = HashMap::new();
    for c in b.chars() {
        *available.entry(c).or_default() += 1;
    }

    let mut matches = 0usize;
    for c in a.chars() {
        if let Some(n) = available.get_mut(&c) {
            if *n > 0 {
                *n -= 1;
                matches += 1;
            }
        }
    }

    2.0 * matches as f64 / total as f64
}

/// Whether `password` is too close to `value` or any of its non-word-separated parts.
///
/// Comparison is case-insensitive.
pub fn too_similar(password: &str, value: &str, max_similarity: f64) -> bool {
    let password = password.to_lowercase();
    let value = value.to_lowercase();

    value
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|part| !part.is_empty())
        .chain(std::iter::once(value.as_str()))
        .any(|part| quick_ratio(&password, part) >= max_similarity)
}
