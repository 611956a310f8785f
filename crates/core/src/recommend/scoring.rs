//! Signal blending for hybrid recommendations

/// Weights for the two similarity signals
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    /// Weight for tag similarity (default: 0.60)
    pub content: f64,
    /// Weight for interaction similarity (default: 0.40)
    pub behavior: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        super::DEFAULT_WEIGHTS
    }
}

/// The single place content and behavior similarity are combined.
#[derive(Debug, Clone, Copy, Default)]
pub struct HybridScorer {
    weights: ScoringWeights,
}

impl HybridScorer {
    /// Create a scorer with default weights
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom weights
    pub fn with_weights(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> ScoringWeights {
        self.weights
    }

    pub fn score(&self, content_similarity: f64, behavior_similarity: f64) -> f64 {
        self.weights.content * content_similarity + self.weights.behavior * behavior_similarity
    }
}

#[cfg(test)]
mod tests {
    use super::{HybridScorer, ScoringWeights};

    #[test]
    fn default_weights_favor_content() {
        let scorer = HybridScorer::new();

        assert!((scorer.score(1.0, 0.0) - 0.6).abs() < 1e-12);
        assert!((scorer.score(0.0, 1.0) - 0.4).abs() < 1e-12);
        assert!((scorer.score(1.0, 1.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn blended_score_matches_weighted_sum() {
        let scorer = HybridScorer::new();
        // 0.6 * 0.5 + 0.4 * 0.25 = 0.30 + 0.10
        assert!((scorer.score(0.5, 0.25) - 0.40).abs() < 1e-12);
    }

    #[test]
    fn custom_weights_are_applied() {
        let scorer = HybridScorer::with_weights(ScoringWeights { content: 0.2, behavior: 0.8 });

        assert!((scorer.score(1.0, 0.5) - 0.6).abs() < 1e-12);
        assert_eq!(scorer.weights().behavior, 0.8);
    }
}
