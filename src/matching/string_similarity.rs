//! String similarity for component name matching.

use strsim::normalized_levenshtein;

/// Case-insensitive normalized Levenshtein similarity (0.0 - 1.0).
///
/// Two empty names are considered identical.
#[must_use]
pub fn name_similarity(a: &str, b: &str) -> f64 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    normalized_levenshtein(&a, &b)
}
