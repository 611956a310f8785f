use chrono::{DateTime, Utc};
use sqlx::Row;

use recommend_core::domain::interaction::{InteractionEvent, UserId};
use recommend_core::domain::item::ItemId;
use recommend_core::recommend::{InteractionLog, RecommendResult};

use super::RepositoryError;
use crate::DbPool;

const SELECT_EVENTS: &str =
    "SELECT user_id, item_id, action_score, occurred_at FROM interaction_event";

pub struct SqlInteractionRepository {
    pool: DbPool,
}

impl SqlInteractionRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Append one event. The log is append-only; nothing is ever updated.
    pub async fn append(&self, event: &InteractionEvent) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO interaction_event (user_id, item_id, action_score, occurred_at)
             VALUES (?, ?, ?, ?)",
        )
        .bind(event.user_id.0)
        .bind(event.item_id.0)
        .bind(i64::from(event.action_score))
        .bind(event.occurred_at.to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn fetch_all(&self) -> Result<Vec<InteractionEvent>, RepositoryError> {
        let rows = sqlx::query(&format!("{SELECT_EVENTS} ORDER BY id"))
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(row_to_event).collect()
    }

    async fn fetch_by_user(&self, user_id: UserId) -> Result<Vec<InteractionEvent>, RepositoryError> {
        let rows = sqlx::query(&format!("{SELECT_EVENTS} WHERE user_id = ? ORDER BY id"))
            .bind(user_id.0)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(row_to_event).collect()
    }

    async fn fetch_by_item(&self, item_id: ItemId) -> Result<Vec<InteractionEvent>, RepositoryError> {
        let rows = sqlx::query(&format!("{SELECT_EVENTS} WHERE item_id = ? ORDER BY id"))
            .bind(item_id.0)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(row_to_event).collect()
    }
}

fn row_to_event(row: &sqlx::sqlite::SqliteRow) -> Result<InteractionEvent, RepositoryError> {
    let user_id: i64 = row.try_get("user_id").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let item_id: i64 = row.try_get("item_id").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let action_score: i64 =
        row.try_get("action_score").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let occurred_at: String =
        row.try_get("occurred_at").map_err(|e| RepositoryError::Decode(e.to_string()))?;

    let action_score = u32::try_from(action_score).map_err(|_| {
        RepositoryError::Decode(format!("action_score out of range: {action_score}"))
    })?;
    let occurred_at = DateTime::parse_from_rfc3339(&occurred_at)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Decode(format!("occurred_at `{occurred_at}`: {e}")))?;

    Ok(InteractionEvent { user_id: UserId(user_id), item_id: ItemId(item_id), action_score, occurred_at })
}

#[async_trait::async_trait]
impl InteractionLog for SqlInteractionRepository {
    async fn find_all(&self) -> RecommendResult<Vec<InteractionEvent>> {
        self.fetch_all().await.map_err(RepositoryError::into_interaction_log_error)
    }

    async fn find_by_user_id(&self, user_id: UserId) -> RecommendResult<Vec<InteractionEvent>> {
        self.fetch_by_user(user_id).await.map_err(RepositoryError::into_interaction_log_error)
    }

    async fn find_by_item_id(&self, item_id: ItemId) -> RecommendResult<Vec<InteractionEvent>> {
        self.fetch_by_item(item_id).await.map_err(RepositoryError::into_interaction_log_error)
    }
}
