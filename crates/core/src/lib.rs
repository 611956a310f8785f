pub mod config;
pub mod domain;
pub mod errors;
pub mod recommend;

pub use domain::interaction::{ActionKind, InteractionEvent, UserId};
pub use domain::item::{Item, ItemId};
pub use errors::{ApplicationError, InterfaceError};
pub use recommend::{
    Catalog, HybridScorer, InteractionLog, ProfileCache, Recommendation, RecommendationEngine,
    ScoringWeights,
};
