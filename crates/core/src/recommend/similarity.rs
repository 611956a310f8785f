//! Set and vector similarity measures used by the hybrid scorer.

use std::collections::{BTreeSet, HashMap};
use std::hash::Hash;

/// Jaccard index `|A ∩ B| / |A ∪ B|`; `0.0` when both sets are empty.
pub fn content_similarity(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }

    let intersection = a.intersection(b).count();
    intersection as f64 / union as f64
}

/// Cosine similarity between two sparse vectors.
///
/// Returns `0.0` when either vector is absent or has zero norm.
pub fn behavior_similarity<K>(a: Option<&HashMap<K, f64>>, b: Option<&HashMap<K, f64>>) -> f64
where
    K: Eq + Hash,
{
    let (Some(a), Some(b)) = (a, b) else {
        return 0.0;
    };

    let norm_a = norm(a);
    let norm_b = norm(b);
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    // Iterate the smaller map; only shared keys contribute.
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let dot: f64 = small
        .iter()
        .filter_map(|(key, weight)| large.get(key).map(|other| weight * other))
        .sum();

    (dot / (norm_a * norm_b)).min(1.0)
}

fn norm<K>(vector: &HashMap<K, f64>) -> f64 {
    vector.values().map(|weight| weight * weight).sum::<f64>().sqrt()
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeSet, HashMap};

    use super::{behavior_similarity, content_similarity};

    fn tags(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    fn vector(entries: &[(i64, f64)]) -> HashMap<i64, f64> {
        entries.iter().copied().collect()
    }

    #[test]
    fn jaccard_of_empty_sets_is_zero() {
        assert_eq!(content_similarity(&BTreeSet::new(), &BTreeSet::new()), 0.0);
    }

    #[test]
    fn jaccard_of_identical_sets_is_one() {
        let a = tags(&["leather", "biker"]);
        assert_eq!(content_similarity(&a, &a), 1.0);
    }

    #[test]
    fn jaccard_is_symmetric_and_bounded() {
        let cases = [
            (tags(&["leather", "biker"]), tags(&["leather", "bomber"])),
            (tags(&["denim"]), tags(&["leather", "bomber", "black"])),
            (tags(&[]), tags(&["wool"])),
            (tags(&["a", "b", "c"]), tags(&["b", "c", "d", "e"])),
        ];

        for (a, b) in &cases {
            let forward = content_similarity(a, b);
            let backward = content_similarity(b, a);
            assert_eq!(forward, backward);
            assert!((0.0..=1.0).contains(&forward));
        }
    }

    #[test]
    fn jaccard_counts_shared_tags_over_union() {
        let score = content_similarity(&tags(&["leather", "biker"]), &tags(&["leather", "bomber"]));
        assert!((score - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn cosine_of_absent_or_empty_vectors_is_zero() {
        let populated = vector(&[(1, 5.0)]);
        let empty = HashMap::new();

        assert_eq!(behavior_similarity(None, Some(&populated)), 0.0);
        assert_eq!(behavior_similarity(Some(&populated), None), 0.0);
        assert_eq!(behavior_similarity(Some(&empty), Some(&populated)), 0.0);
    }

    #[test]
    fn cosine_of_zero_norm_vector_is_zero() {
        let zero = vector(&[(1, 0.0), (2, 0.0)]);
        let populated = vector(&[(1, 3.0)]);

        assert_eq!(behavior_similarity(Some(&zero), Some(&populated)), 0.0);
    }

    #[test]
    fn cosine_of_parallel_vectors_is_one() {
        let a = vector(&[(1, 1.0), (2, 2.0)]);
        let b = vector(&[(1, 2.0), (2, 4.0)]);

        assert!((behavior_similarity(Some(&a), Some(&b)) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn cosine_ignores_keys_not_shared() {
        let a = vector(&[(1, 3.0), (2, 4.0)]);
        let b = vector(&[(1, 1.0), (3, 7.0)]);

        let expected = 3.0 / (5.0 * 50f64.sqrt());
        let score = behavior_similarity(Some(&a), Some(&b));
        assert!((score - expected).abs() < 1e-12);
        assert_eq!(score, behavior_similarity(Some(&b), Some(&a)));
    }

    #[test]
    fn cosine_of_disjoint_vectors_is_zero() {
        let a = vector(&[(1, 3.0)]);
        let b = vector(&[(2, 3.0)]);

        assert_eq!(behavior_similarity(Some(&a), Some(&b)), 0.0);
    }
}
