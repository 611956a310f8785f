//! Hybrid product recommendations
//!
//! Scores catalog items by blending tag overlap (content) with aggregated
//! user interaction vectors (behavior), and ranks complementary cart items by
//! co-occurrence within the cart's user cohort.

pub mod cache;
mod engine;
mod profile;
mod ranking;
mod scoring;
pub mod similarity;
pub mod sources;
pub mod tags;

pub use cache::ProfileCache;
pub use engine::{Recommendation, RecommendationEngine};
pub use profile::{build_item_vectors, ItemVector, ItemVectors};
pub use ranking::{rank, ScoredCandidate};
pub use scoring::{HybridScorer, ScoringWeights};
pub use sources::{Catalog, InteractionLog};

use crate::errors::ApplicationError;

/// Result type for recommendation operations
pub type RecommendResult<T> = Result<T, ApplicationError>;

/// Weight applied to tag (Jaccard) similarity
pub const W_CONTENT: f64 = 0.6;

/// Weight applied to interaction (cosine) similarity
pub const W_BEHAVIOR: f64 = 0.4;

/// Default scoring weights
pub const DEFAULT_WEIGHTS: ScoringWeights =
    ScoringWeights { content: W_CONTENT, behavior: W_BEHAVIOR };
