//! Read-only collaborators the engine pulls its snapshot from.

use async_trait::async_trait;

use crate::domain::interaction::{InteractionEvent, UserId};
use crate::domain::item::{Item, ItemId};

use super::RecommendResult;

#[async_trait]
pub trait Catalog: Send + Sync {
    async fn find_all(&self) -> RecommendResult<Vec<Item>>;

    async fn find_by_id(&self, id: ItemId) -> RecommendResult<Option<Item>>;

    /// Batched lookup. Unknown ids are skipped and result order is unspecified.
    async fn find_by_ids(&self, ids: &[ItemId]) -> RecommendResult<Vec<Item>>;
}

#[async_trait]
pub trait InteractionLog: Send + Sync {
    async fn find_all(&self) -> RecommendResult<Vec<InteractionEvent>>;

    async fn find_by_user_id(&self, user_id: UserId) -> RecommendResult<Vec<InteractionEvent>>;

    async fn find_by_item_id(&self, item_id: ItemId) -> RecommendResult<Vec<InteractionEvent>>;
}
