/// Similarity of two strings on a 0..=100 scale from their Indel distance
/// (insertions and deletions only), normalized by the combined length.
/// Identical strings, including two empty ones, score 100.
pub fn similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 100.0;
    }
    rapidfuzz::fuzz::ratio(a.chars(), b.chars()) * 100.0
}

/// `similarity` rounded half-to-even to a whole point, the granularity
/// contested files are decided at.
pub fn rounded_similarity(a: &str, b: &str) -> f64 {
    similarity(a, b).round_ties_even()
}
