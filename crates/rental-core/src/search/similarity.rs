//! Cosine similarity between a query vector and the catalog matrix

/// Cosine similarity of two vectors
///
/// Returns 0 when either vector has zero magnitude, when the lengths differ,
/// or when the arithmetic produces a non-finite value. The result is clamped to
/// `[0, 1]` since TF-IDF weights are never negative.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    let score = dot / (norm_a * norm_b);
    if score.is_finite() {
        score.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Score every catalog row against the query, in catalog order
pub fn score_all(matrix: &[Vec<f32>], query: &[f32]) -> Vec<f32> {
    matrix
        .iter()
        .map(|row| cosine_similarity(row, query))
        .collect()
}
