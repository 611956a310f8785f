pub mod config;
pub mod migrate;
pub mod record;
pub mod recommend;
pub mod seed;

use std::sync::Arc;

use recommend_core::config::{AppConfig, LoadOptions};
use recommend_core::recommend::{ProfileCache, RecommendationEngine};
use recommend_db::repositories::{SqlInteractionRepository, SqlItemRepository};
use recommend_db::{connect_with_settings, migrations, DbPool};
use serde::Serialize;
use tokio::runtime::Runtime;

pub const EXIT_CONFIG: u8 = 2;
pub const EXIT_RUNTIME: u8 = 3;
pub const EXIT_DB: u8 = 4;
pub const EXIT_MIGRATION: u8 = 5;
pub const EXIT_QUERY: u8 = 6;
pub const EXIT_INVALID_REQUEST: u8 = 7;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
}

/// Error class, message and exit code of a failed step.
pub(crate) type StepFailure = (&'static str, String, u8);

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
        };
        Self { exit_code: 0, output: serialize_payload(&payload) }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
        };
        Self { exit_code, output: serialize_payload(&payload) }
    }

    pub(crate) fn from_step_failure(command: &str, failure: StepFailure) -> Self {
        let (error_class, message, exit_code) = failure;
        Self::failure(command, error_class, message, exit_code)
    }
}

pub(crate) fn serialize_payload<T: Serialize>(payload: &T) -> String {
    serde_json::to_string(payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}

/// Load configuration and build a single-threaded runtime for one command.
pub(crate) fn prepare(command: &str) -> Result<(AppConfig, Runtime), CommandResult> {
    let config = AppConfig::load(LoadOptions::default()).map_err(|error| {
        CommandResult::failure(
            command,
            "config_validation",
            format!("configuration issue: {error}"),
            EXIT_CONFIG,
        )
    })?;

    let runtime =
        tokio::runtime::Builder::new_current_thread().enable_all().build().map_err(|error| {
            CommandResult::failure(
                command,
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                EXIT_RUNTIME,
            )
        })?;

    Ok((config, runtime))
}

pub(crate) async fn open_database(config: &AppConfig) -> Result<DbPool, StepFailure> {
    let pool = connect_with_settings(
        &config.database.url,
        config.database.max_connections,
        config.database.timeout_secs,
    )
    .await
    .map_err(|error| ("db_connectivity", error.to_string(), EXIT_DB))?;

    migrations::run_pending(&pool)
        .await
        .map_err(|error| ("migration", error.to_string(), EXIT_MIGRATION))?;

    Ok(pool)
}

pub(crate) fn build_engine(config: &AppConfig, pool: &DbPool) -> RecommendationEngine {
    let engine = RecommendationEngine::new(
        Arc::new(SqlItemRepository::new(pool.clone())),
        Arc::new(SqlInteractionRepository::new(pool.clone())),
    )
    .with_weights(config.engine.weights());

    if config.engine.cache_profiles {
        engine.with_profile_cache(Arc::new(ProfileCache::new()))
    } else {
        engine
    }
}
