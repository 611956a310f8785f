use sqlx::migrate::{MigrateError, Migrator};
use tracing::debug;

use crate::DbPool;

pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

pub async fn run_pending(pool: &DbPool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await?;
    debug!(
        event_name = "db.migrations.applied",
        known_migrations = MIGRATOR.iter().count(),
        "schema is up to date"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use sqlx::Row;

    use super::run_pending;
    use crate::connect_with_settings;

    const MANAGED_SCHEMA_OBJECTS: &[&str] = &[
        "item",
        "interaction_event",
        "idx_interaction_event_user_id",
        "idx_interaction_event_item_id",
    ];

    #[tokio::test]
    async fn migrations_create_managed_schema_objects() {
        let pool = connect_with_settings("sqlite::memory:", 1, 5).await.expect("connect");
        run_pending(&pool).await.expect("migrations");

        let rows = sqlx::query("SELECT name FROM sqlite_master WHERE type IN ('table', 'index')")
            .fetch_all(&pool)
            .await
            .expect("schema query");
        let names: Vec<String> = rows.iter().map(|row| row.get::<String, _>("name")).collect();

        for object in MANAGED_SCHEMA_OBJECTS {
            assert!(names.iter().any(|name| name == object), "missing schema object {object}");
        }
    }

    #[tokio::test]
    async fn migrations_are_idempotent() {
        let pool = connect_with_settings("sqlite::memory:", 1, 5).await.expect("connect");
        run_pending(&pool).await.expect("first run");
        run_pending(&pool).await.expect("second run");
    }
}
