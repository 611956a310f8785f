use std::collections::BTreeMap;

use tokio::sync::RwLock;

use recommend_core::domain::interaction::{InteractionEvent, UserId};
use recommend_core::domain::item::{Item, ItemId};
use recommend_core::recommend::{Catalog, InteractionLog, RecommendResult};

#[derive(Default)]
pub struct InMemoryCatalog {
    items: RwLock<BTreeMap<ItemId, Item>>,
}

impl InMemoryCatalog {
    pub async fn save(&self, item: Item) {
        let mut items = self.items.write().await;
        items.insert(item.id, item);
    }
}

#[async_trait::async_trait]
impl Catalog for InMemoryCatalog {
    async fn find_all(&self) -> RecommendResult<Vec<Item>> {
        let items = self.items.read().await;
        Ok(items.values().cloned().collect())
    }

    async fn find_by_id(&self, id: ItemId) -> RecommendResult<Option<Item>> {
        let items = self.items.read().await;
        Ok(items.get(&id).cloned())
    }

    async fn find_by_ids(&self, ids: &[ItemId]) -> RecommendResult<Vec<Item>> {
        let items = self.items.read().await;
        Ok(ids.iter().filter_map(|id| items.get(id).cloned()).collect())
    }
}

#[derive(Default)]
pub struct InMemoryInteractionLog {
    events: RwLock<Vec<InteractionEvent>>,
}

impl InMemoryInteractionLog {
    pub async fn append(&self, event: InteractionEvent) {
        let mut events = self.events.write().await;
        events.push(event);
    }
}

#[async_trait::async_trait]
impl InteractionLog for InMemoryInteractionLog {
    async fn find_all(&self) -> RecommendResult<Vec<InteractionEvent>> {
        let events = self.events.read().await;
        Ok(events.clone())
    }

    async fn find_by_user_id(&self, user_id: UserId) -> RecommendResult<Vec<InteractionEvent>> {
        let events = self.events.read().await;
        Ok(events.iter().filter(|event| event.user_id == user_id).cloned().collect())
    }

    async fn find_by_item_id(&self, item_id: ItemId) -> RecommendResult<Vec<InteractionEvent>> {
        let events = self.events.read().await;
        Ok(events.iter().filter(|event| event.item_id == item_id).cloned().collect())
    }
}
