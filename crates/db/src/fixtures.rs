use chrono::{DateTime, Duration, TimeZone, Utc};

use recommend_core::domain::interaction::{ActionKind, InteractionEvent, UserId};
use recommend_core::domain::item::{Item, ItemId};

use crate::connection::DbPool;
use crate::repositories::RepositoryError;

#[derive(Debug, Clone, Copy)]
struct ItemSeed {
    id: i64,
    name: &'static str,
    description: &'static str,
}

const ITEM_SEEDS: &[ItemSeed] = &[
    ItemSeed { id: 1, name: "Classic Biker Jacket", description: "leather, biker, black" },
    ItemSeed { id: 2, name: "Flight Bomber", description: "leather, bomber, brown" },
    ItemSeed { id: 3, name: "Trucker Jacket", description: "denim, blue" },
    ItemSeed { id: 4, name: "Leather Gloves", description: "leather, gloves, black" },
    ItemSeed { id: 5, name: "Merino Scarf", description: "wool, scarf" },
    ItemSeed { id: 6, name: "Selvedge Jeans", description: "denim, jeans, blue" },
    ItemSeed { id: 7, name: "Engineer Boots", description: "leather, boots, biker" },
    ItemSeed { id: 8, name: "Gift Card", description: "" },
];

#[derive(Debug, Clone, Copy)]
struct EventSeed {
    id: i64,
    user_id: i64,
    item_id: i64,
    action: ActionKind,
    days_after_epoch: i64,
}

const EVENT_SEEDS: &[EventSeed] = &[
    EventSeed { id: 1, user_id: 101, item_id: 1, action: ActionKind::Purchase, days_after_epoch: 0 },
    EventSeed { id: 2, user_id: 101, item_id: 4, action: ActionKind::AddToCart, days_after_epoch: 1 },
    EventSeed { id: 3, user_id: 101, item_id: 7, action: ActionKind::View, days_after_epoch: 2 },
    EventSeed { id: 4, user_id: 102, item_id: 1, action: ActionKind::View, days_after_epoch: 2 },
    EventSeed { id: 5, user_id: 102, item_id: 2, action: ActionKind::Purchase, days_after_epoch: 3 },
    EventSeed { id: 6, user_id: 102, item_id: 4, action: ActionKind::Purchase, days_after_epoch: 3 },
    EventSeed { id: 7, user_id: 103, item_id: 3, action: ActionKind::Purchase, days_after_epoch: 4 },
    EventSeed { id: 8, user_id: 103, item_id: 6, action: ActionKind::AddToCart, days_after_epoch: 5 },
    EventSeed { id: 9, user_id: 103, item_id: 6, action: ActionKind::Purchase, days_after_epoch: 6 },
    EventSeed { id: 10, user_id: 104, item_id: 5, action: ActionKind::View, days_after_epoch: 6 },
    EventSeed { id: 11, user_id: 104, item_id: 3, action: ActionKind::View, days_after_epoch: 7 },
];

/// Deterministic apparel catalog with a handful of shoppers.
///
/// Loading is idempotent: items are upserted and events carry fixed ids.
pub struct DemoDataset;

impl DemoDataset {
    pub fn items() -> Vec<Item> {
        ITEM_SEEDS
            .iter()
            .map(|seed| Item {
                id: ItemId(seed.id),
                name: seed.name.to_owned(),
                description: Some(seed.description.to_owned()),
            })
            .collect()
    }

    pub fn events() -> Vec<InteractionEvent> {
        EVENT_SEEDS
            .iter()
            .map(|seed| {
                InteractionEvent::from_action(
                    UserId(seed.user_id),
                    ItemId(seed.item_id),
                    seed.action,
                    seed_epoch() + Duration::days(seed.days_after_epoch),
                )
            })
            .collect()
    }

    /// Load the dataset in one transaction.
    pub async fn load(pool: &DbPool) -> Result<SeedResult, RepositoryError> {
        let mut tx = pool.begin().await?;

        for item in Self::items() {
            sqlx::query(
                "INSERT INTO item (id, name, description)
                 VALUES (?, ?, ?)
                 ON CONFLICT(id) DO UPDATE SET name = excluded.name, description = excluded.description",
            )
            .bind(item.id.0)
            .bind(&item.name)
            .bind(&item.description)
            .execute(&mut *tx)
            .await?;
        }

        for (seed, event) in EVENT_SEEDS.iter().zip(Self::events()) {
            sqlx::query(
                "INSERT OR IGNORE INTO interaction_event
                    (id, user_id, item_id, action_score, occurred_at)
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind(seed.id)
            .bind(event.user_id.0)
            .bind(event.item_id.0)
            .bind(i64::from(event.action_score))
            .bind(event.occurred_at.to_rfc3339())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(SeedResult { items_seeded: ITEM_SEEDS.len(), events_seeded: EVENT_SEEDS.len() })
    }

    /// Remove the dataset's rows, leaving other data untouched.
    pub async fn clean(pool: &DbPool) -> Result<(), RepositoryError> {
        let mut tx = pool.begin().await?;

        for seed in EVENT_SEEDS {
            sqlx::query("DELETE FROM interaction_event WHERE id = ?")
                .bind(seed.id)
                .execute(&mut *tx)
                .await?;
        }
        for seed in ITEM_SEEDS {
            sqlx::query("DELETE FROM item WHERE id = ?").bind(seed.id).execute(&mut *tx).await?;
        }

        tx.commit().await?;
        Ok(())
    }
}

fn seed_epoch() -> DateTime<Utc> {
    Utc.timestamp_opt(1_704_067_200, 0).single().unwrap_or_default()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedResult {
    pub items_seeded: usize,
    pub events_seeded: usize,
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use recommend_core::domain::interaction::UserId;
    use recommend_core::domain::item::ItemId;
    use recommend_core::recommend::{Catalog, InteractionLog, RecommendationEngine};

    use super::DemoDataset;
    use crate::repositories::{SqlInteractionRepository, SqlItemRepository};
    use crate::{connect_with_settings, migrations, DbPool};

    async fn pool() -> DbPool {
        let pool = connect_with_settings("sqlite::memory:", 1, 5).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrations");
        pool
    }

    #[tokio::test]
    async fn load_is_idempotent() {
        let pool = pool().await;

        let first = DemoDataset::load(&pool).await.expect("first load");
        let second = DemoDataset::load(&pool).await.expect("second load");
        assert_eq!(first, second);

        let items = SqlItemRepository::new(pool.clone()).find_all().await.expect("items");
        let events = SqlInteractionRepository::new(pool).find_all().await.expect("events");
        assert_eq!(items.len(), first.items_seeded);
        assert_eq!(events, DemoDataset::events());
    }

    #[tokio::test]
    async fn clean_removes_seeded_rows() {
        let pool = pool().await;
        DemoDataset::load(&pool).await.expect("load");
        DemoDataset::clean(&pool).await.expect("clean");

        assert!(SqlItemRepository::new(pool.clone()).find_all().await.expect("items").is_empty());
        assert!(SqlInteractionRepository::new(pool).find_all().await.expect("events").is_empty());
    }

    #[tokio::test]
    async fn seeded_dataset_drives_all_three_recommendations() {
        let pool = pool().await;
        DemoDataset::load(&pool).await.expect("load");
        let engine = RecommendationEngine::new(
            Arc::new(SqlItemRepository::new(pool.clone())),
            Arc::new(SqlInteractionRepository::new(pool)),
        );

        let related = engine.recommend_related(ItemId(1), 3).await.expect("related");
        assert_eq!(related.len(), 3);
        assert!(related.iter().all(|item| item.id != ItemId(1)));

        let feed = engine.recommend_for_homepage(UserId(103), 10).await.expect("homepage");
        assert!(feed.iter().all(|item| item.id != ItemId(3) && item.id != ItemId(6)));
        assert_eq!(feed.len(), 6);

        // Shopper 101 bought the biker jacket and 102 viewed it; both also took gloves.
        let cart = engine.recommend_for_cart(&[ItemId(1)], 2).await.expect("cart");
        assert_eq!(cart.first().map(|item| item.id), Some(ItemId(4)));
    }
}
