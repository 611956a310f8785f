use std::collections::BTreeSet;

use sqlx::{QueryBuilder, Row, Sqlite};

use recommend_core::domain::item::{Item, ItemId};
use recommend_core::recommend::{Catalog, RecommendResult};

use super::RepositoryError;
use crate::DbPool;

/// Ids bound per `IN (...)` query, kept well under SQLite's bind-variable limit.
const LOOKUP_CHUNK_SIZE: usize = 500;

pub struct SqlItemRepository {
    pool: DbPool,
}

impl SqlItemRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Insert or replace an item by id.
    pub async fn save(&self, item: &Item) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO item (id, name, description)
             VALUES (?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET name = excluded.name, description = excluded.description",
        )
        .bind(item.id.0)
        .bind(&item.name)
        .bind(&item.description)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn fetch_all(&self) -> Result<Vec<Item>, RepositoryError> {
        let rows = sqlx::query("SELECT id, name, description FROM item ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(row_to_item).collect()
    }

    async fn fetch_by_id(&self, id: ItemId) -> Result<Option<Item>, RepositoryError> {
        let row = sqlx::query("SELECT id, name, description FROM item WHERE id = ?")
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(row_to_item).transpose()
    }

    async fn fetch_by_ids(&self, ids: &[ItemId]) -> Result<Vec<Item>, RepositoryError> {
        let unique: Vec<i64> =
            ids.iter().map(|id| id.0).collect::<BTreeSet<_>>().into_iter().collect();

        let mut items = Vec::with_capacity(unique.len());
        for chunk in unique.chunks(LOOKUP_CHUNK_SIZE) {
            let mut query =
                QueryBuilder::<Sqlite>::new("SELECT id, name, description FROM item WHERE id IN (");
            let mut separated = query.separated(", ");
            for id in chunk {
                separated.push_bind(*id);
            }
            separated.push_unseparated(") ORDER BY id");

            let rows = query.build().fetch_all(&self.pool).await?;
            for row in &rows {
                items.push(row_to_item(row)?);
            }
        }
        Ok(items)
    }
}

fn row_to_item(row: &sqlx::sqlite::SqliteRow) -> Result<Item, RepositoryError> {
    let id: i64 = row.try_get("id").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let name: String = row.try_get("name").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let description: Option<String> =
        row.try_get("description").map_err(|e| RepositoryError::Decode(e.to_string()))?;

    Ok(Item { id: ItemId(id), name, description })
}

#[async_trait::async_trait]
impl Catalog for SqlItemRepository {
    async fn find_all(&self) -> RecommendResult<Vec<Item>> {
        self.fetch_all().await.map_err(RepositoryError::into_catalog_error)
    }

    async fn find_by_id(&self, id: ItemId) -> RecommendResult<Option<Item>> {
        self.fetch_by_id(id).await.map_err(RepositoryError::into_catalog_error)
    }

    async fn find_by_ids(&self, ids: &[ItemId]) -> RecommendResult<Vec<Item>> {
        self.fetch_by_ids(ids).await.map_err(RepositoryError::into_catalog_error)
    }
}
