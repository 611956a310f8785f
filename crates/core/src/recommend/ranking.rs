use std::cmp::Ordering;

use crate::domain::item::ItemId;

/// Immutable (item, score) pair produced while ranking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredCandidate {
    pub item_id: ItemId,
    pub score: f64,
}

impl ScoredCandidate {
    pub fn new(item_id: ItemId, score: f64) -> Self {
        Self { item_id, score }
    }
}

/// Order candidates by descending score, ties by ascending item id, and keep
/// the first `limit`.
pub fn rank(mut candidates: Vec<ScoredCandidate>, limit: usize) -> Vec<ScoredCandidate> {
    candidates.sort_by(compare);
    candidates.truncate(limit);
    candidates
}

fn compare(a: &ScoredCandidate, b: &ScoredCandidate) -> Ordering {
    b.score.total_cmp(&a.score).then_with(|| a.item_id.cmp(&b.item_id))
}
