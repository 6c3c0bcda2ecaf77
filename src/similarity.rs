// src/similarity.rs
//
// Case-insensitive Levenshtein similarity, normalized to a 0-100 score.

/// Edit distance with unit insert, delete and substitute costs, counted in
/// Unicode scalar values.
pub fn levenshtein(a: &str, b: &str) -> usize {
    strsim::levenshtein(a, b)
}

/// Similarity score in [0, 100]: `100 * (1 - distance / longest length)`.
///
/// Comparison ignores case. Two empty strings score 100.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();

    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 100.0;
    }

    let distance = levenshtein(&a, &b);
    100.0 * (1.0 - distance as f64 / max_len as f64)
}
