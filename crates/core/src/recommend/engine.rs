//! Recommendation engine implementation

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use super::cache::ProfileCache;
use super::profile::{build_item_vectors, ItemVectors};
use super::ranking::{rank, ScoredCandidate};
use super::scoring::{HybridScorer, ScoringWeights};
use super::similarity::{behavior_similarity, content_similarity};
use super::sources::{Catalog, InteractionLog};
use super::RecommendResult;
use crate::domain::interaction::UserId;
use crate::domain::item::{Item, ItemId};

/// A ranked item together with the score it was ranked by.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub item: Item,
    pub score: f64,
}

/// Entry point for related-item, homepage and cart recommendations.
///
/// Every call reads a fresh snapshot from the collaborators and holds no
/// state between calls, unless a [`ProfileCache`] is attached.
#[derive(Clone)]
pub struct RecommendationEngine {
    catalog: Arc<dyn Catalog>,
    interactions: Arc<dyn InteractionLog>,
    scorer: HybridScorer,
    profile_cache: Option<Arc<ProfileCache>>,
}

impl RecommendationEngine {
    /// Create an engine with default weights and no caching
    pub fn new(catalog: Arc<dyn Catalog>, interactions: Arc<dyn InteractionLog>) -> Self {
        Self { catalog, interactions, scorer: HybridScorer::new(), profile_cache: None }
    }

    /// Use custom weights
    pub fn with_weights(mut self, weights: ScoringWeights) -> Self {
        self.scorer = HybridScorer::with_weights(weights);
        self
    }

    /// Reuse item vectors across calls until the cache is invalidated
    pub fn with_profile_cache(mut self, cache: Arc<ProfileCache>) -> Self {
        self.profile_cache = Some(cache);
        self
    }

    pub fn weights(&self) -> ScoringWeights {
        self.scorer.weights()
    }

    pub async fn recommend_related(&self, item_id: ItemId, k: usize) -> RecommendResult<Vec<Item>> {
        Ok(into_items(self.recommend_related_scored(item_id, k).await?))
    }

    pub async fn recommend_for_homepage(
        &self,
        user_id: UserId,
        k: usize,
    ) -> RecommendResult<Vec<Item>> {
        Ok(into_items(self.recommend_for_homepage_scored(user_id, k).await?))
    }

    pub async fn recommend_for_cart(
        &self,
        cart_item_ids: &[ItemId],
        k: usize,
    ) -> RecommendResult<Vec<Item>> {
        Ok(into_items(self.recommend_for_cart_scored(cart_item_ids, k).await?))
    }

    /// Items most similar to `item_id`, never including the item itself.
    pub async fn recommend_related_scored(
        &self,
        item_id: ItemId,
        k: usize,
    ) -> RecommendResult<Vec<Recommendation>> {
        if k == 0 {
            return Ok(Vec::new());
        }

        let Some(target) = self.catalog.find_by_id(item_id).await? else {
            debug!(
                event_name = "recommend.related.unknown_item",
                item_id = item_id.0,
                "target item not found; returning no recommendations"
            );
            return Ok(Vec::new());
        };

        let items = self.catalog.find_all().await?;
        let vectors = self.item_vectors().await?;

        let target_tags = target.tags();
        let target_vector = vectors.get(&target.id);

        let candidates = items
            .iter()
            .filter(|item| item.id != target.id)
            .map(|item| {
                let content = content_similarity(&target_tags, &item.tags());
                let behavior = behavior_similarity(target_vector, vectors.get(&item.id));
                ScoredCandidate::new(item.id, self.scorer.score(content, behavior))
            })
            .collect::<Vec<_>>();

        let candidate_count = candidates.len();
        let recommendations = attach_items(rank(candidates, k), items);

        debug!(
            event_name = "recommend.related.completed",
            item_id = item_id.0,
            candidate_count,
            returned = recommendations.len(),
            "related recommendations ranked"
        );
        Ok(recommendations)
    }

    /// Items the user has not interacted with, scored by their average hybrid
    /// similarity to the items the user has interacted with.
    ///
    /// A user without resolvable history gets every candidate at `0.0`, which
    /// leaves the order to the ascending-id tie-break.
    pub async fn recommend_for_homepage_scored(
        &self,
        user_id: UserId,
        k: usize,
    ) -> RecommendResult<Vec<Recommendation>> {
        if k == 0 {
            return Ok(Vec::new());
        }

        let history = self.interactions.find_by_user_id(user_id).await?;
        let interacted: BTreeSet<ItemId> = history.iter().map(|event| event.item_id).collect();
        let interacted_ids = interacted.iter().copied().collect::<Vec<_>>();

        let mut profile_items = if interacted_ids.is_empty() {
            Vec::new()
        } else {
            self.catalog.find_by_ids(&interacted_ids).await?
        };
        // Fixed summation order keeps averages bit-identical across calls.
        profile_items.sort_by_key(|item| item.id);
        profile_items.dedup_by_key(|item| item.id);

        let items = self.catalog.find_all().await?;
        let vectors = self.item_vectors().await?;

        let profile = profile_items
            .iter()
            .map(|item| (item.tags(), vectors.get(&item.id)))
            .collect::<Vec<_>>();

        let candidates = items
            .iter()
            .filter(|item| !interacted.contains(&item.id))
            .map(|item| {
                let score = if profile.is_empty() {
                    0.0
                } else {
                    let tags = item.tags();
                    let vector = vectors.get(&item.id);
                    let total: f64 = profile
                        .iter()
                        .map(|(profile_tags, profile_vector)| {
                            self.scorer.score(
                                content_similarity(&tags, profile_tags),
                                behavior_similarity(vector, *profile_vector),
                            )
                        })
                        .sum();
                    total / profile.len() as f64
                };
                ScoredCandidate::new(item.id, score)
            })
            .collect::<Vec<_>>();

        let candidate_count = candidates.len();
        let recommendations = attach_items(rank(candidates, k), items);

        debug!(
            event_name = "recommend.homepage.completed",
            user_id = user_id.0,
            history_items = interacted.len(),
            resolved_history_items = profile.len(),
            candidate_count,
            returned = recommendations.len(),
            "homepage recommendations ranked"
        );
        Ok(recommendations)
    }

    /// Items that co-occur with the cart in other users' histories.
    ///
    /// Each matching event counts once, so a cohort user interacting with an
    /// item repeatedly raises its count. The score is that count.
    pub async fn recommend_for_cart_scored(
        &self,
        cart_item_ids: &[ItemId],
        k: usize,
    ) -> RecommendResult<Vec<Recommendation>> {
        if k == 0 || cart_item_ids.is_empty() {
            return Ok(Vec::new());
        }

        let cart: HashSet<ItemId> = cart_item_ids.iter().copied().collect();
        let events = self.interactions.find_all().await?;

        let cohort: HashSet<UserId> = events
            .iter()
            .filter(|event| cart.contains(&event.item_id))
            .map(|event| event.user_id)
            .collect();

        let mut co_occurrences: HashMap<ItemId, u32> = HashMap::new();
        for event in &events {
            if !cart.contains(&event.item_id) && cohort.contains(&event.user_id) {
                *co_occurrences.entry(event.item_id).or_insert(0) += 1;
            }
        }

        let candidates = co_occurrences
            .into_iter()
            .map(|(item_id, count)| ScoredCandidate::new(item_id, f64::from(count)))
            .collect::<Vec<_>>();
        let candidate_count = candidates.len();
        let ranked = rank(candidates, k);

        let ranked_ids = ranked.iter().map(|candidate| candidate.item_id).collect::<Vec<_>>();
        let items = if ranked_ids.is_empty() {
            Vec::new()
        } else {
            self.catalog.find_by_ids(&ranked_ids).await?
        };
        let recommendations = attach_items(ranked, items);

        debug!(
            event_name = "recommend.cart.completed",
            cart_size = cart.len(),
            cohort_size = cohort.len(),
            candidate_count,
            returned = recommendations.len(),
            "cart recommendations ranked"
        );
        Ok(recommendations)
    }

    async fn item_vectors(&self) -> RecommendResult<Arc<ItemVectors>> {
        let Some(cache) = &self.profile_cache else {
            let events = self.interactions.find_all().await?;
            return Ok(Arc::new(build_item_vectors(&events)));
        };

        if let Some(vectors) = cache.get() {
            return Ok(vectors);
        }

        let generation = cache.generation();
        let events = self.interactions.find_all().await?;
        debug!(
            event_name = "recommend.profile_cache.rebuild",
            generation,
            event_count = events.len(),
            "rebuilding cached item vectors"
        );
        Ok(cache.store(generation, build_item_vectors(&events)))
    }
}

/// Pair ranked candidates with their items, preserving rank order and
/// dropping ids the catalog could not resolve.
fn attach_items(ranked: Vec<ScoredCandidate>, items: Vec<Item>) -> Vec<Recommendation> {
    let mut by_id: HashMap<ItemId, Item> = items.into_iter().map(|item| (item.id, item)).collect();

    ranked
        .into_iter()
        .filter_map(|candidate| {
            by_id
                .remove(&candidate.item_id)
                .map(|item| Recommendation { item, score: candidate.score })
        })
        .collect()
}

fn into_items(recommendations: Vec<Recommendation>) -> Vec<Item> {
    recommendations.into_iter().map(|recommendation| recommendation.item).collect()
}
