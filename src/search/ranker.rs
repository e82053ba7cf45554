//! Cosine-similarity ranking with threshold/fallback semantics

use super::embedding::cosine_similarity;

/// Candidates at or above this similarity are kept.
pub const SIMILARITY_THRESHOLD: f32 = 0.70;

/// When nothing clears the threshold, the top K candidates are returned
/// instead, so a non-empty catalog always yields something.
pub const FALLBACK_TOP_K: usize = 5;

/// Rank candidate vectors against a query vector.
///
/// Returns candidate indices sorted by similarity descending, ties broken
/// by original order. Keeps everything >= [`SIMILARITY_THRESHOLD`]; when
/// that set is empty, falls back to the top [`FALLBACK_TOP_K`] of the full
/// ordering. An empty candidate list stays empty — no fallback applies.
pub fn rank(query: &[f32], candidates: &[Vec<f32>]) -> Vec<usize> {
    let mut sims: Vec<(f32, usize)> = candidates
        .iter()
        .enumerate()
        .map(|(idx, vec)| (cosine_similarity(query, vec), idx))
        .collect();

    // Stable sort keeps catalog order for equal similarities.
    sims.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

    let above: Vec<usize> = sims
        .iter()
        .filter(|(sim, _)| *sim >= SIMILARITY_THRESHOLD)
        .map(|(_, idx)| *idx)
        .collect();

    if above.is_empty() {
        sims.into_iter()
            .take(FALLBACK_TOP_K)
            .map(|(_, idx)| idx)
            .collect()
    } else {
        above
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(x: f32, y: f32) -> Vec<f32> {
        let norm = (x * x + y * y).sqrt();
        vec![x / norm, y / norm]
    }

    #[test]
    fn test_identical_vector_ranks_first() {
        let query = unit(1.0, 0.0);
        let candidates = vec![unit(0.0, 1.0), unit(1.0, 0.0), unit(1.0, 1.0)];
        let ranked = rank(&query, &candidates);
        assert_eq!(ranked[0], 1);
        assert!((cosine_similarity(&query, &candidates[1]) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_keeps_everything_above_threshold() {
        let query = unit(1.0, 0.0);
        // Similarities: 1.0, ~0.95, ~0.0
        let candidates = vec![unit(1.0, 0.0), unit(1.0, 0.3), unit(0.0, 1.0)];
        let ranked = rank(&query, &candidates);
        assert_eq!(ranked, vec![0, 1]);
    }

    #[test]
    fn test_fallback_returns_min_top_k() {
        let query = unit(1.0, 0.0);
        // All near-orthogonal, everything below the threshold.
        let candidates = vec![unit(0.1, 1.0), unit(-0.1, 1.0), unit(0.0, 1.0)];
        let ranked = rank(&query, &candidates);
        assert_eq!(ranked.len(), FALLBACK_TOP_K.min(candidates.len()));
        assert_eq!(ranked.len(), 3);
        // Still sorted by similarity descending.
        assert_eq!(ranked[0], 0);
    }

    #[test]
    fn test_fallback_caps_at_top_k() {
        let query = unit(1.0, 0.0);
        let candidates: Vec<Vec<f32>> = (0..8).map(|i| unit(0.01 * i as f32, 1.0)).collect();
        let ranked = rank(&query, &candidates);
        assert_eq!(ranked.len(), FALLBACK_TOP_K);
    }

    #[test]
    fn test_ties_keep_original_order() {
        let query = unit(1.0, 0.0);
        let same = unit(1.0, 1.0);
        let candidates = vec![same.clone(), same.clone(), same];
        let ranked = rank(&query, &candidates);
        assert_eq!(ranked, vec![0, 1, 2]);
    }

    #[test]
    fn test_empty_candidates_stay_empty() {
        let query = unit(1.0, 0.0);
        assert!(rank(&query, &[]).is_empty());
    }
}
