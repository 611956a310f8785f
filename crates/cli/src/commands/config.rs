use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use recommend_core::config::{AppConfig, LoadOptions};
use serde::Serialize;
use toml::Value;

use crate::commands::{serialize_payload, CommandResult, EXIT_CONFIG};

#[derive(Debug, Serialize)]
struct ConfigReport {
    command: &'static str,
    status: &'static str,
    precedence: &'static str,
    fields: Vec<ConfigField>,
}

#[derive(Debug, Serialize)]
struct ConfigField {
    key: &'static str,
    value: String,
    source: String,
}

pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "config",
                "config_validation",
                format!("configuration issue: {error}"),
                EXIT_CONFIG,
            )
        }
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    // Env keys are listed in the order `AppConfig` consults them.
    let fields: [(&'static str, &[&str], String); 9] = [
        ("database.url", &["RECOMMEND_DATABASE_URL"], config.database.url.clone()),
        (
            "database.max_connections",
            &["RECOMMEND_DATABASE_MAX_CONNECTIONS"],
            config.database.max_connections.to_string(),
        ),
        (
            "database.timeout_secs",
            &["RECOMMEND_DATABASE_TIMEOUT_SECS"],
            config.database.timeout_secs.to_string(),
        ),
        (
            "engine.content_weight",
            &["RECOMMEND_ENGINE_CONTENT_WEIGHT"],
            config.engine.content_weight.to_string(),
        ),
        (
            "engine.behavior_weight",
            &["RECOMMEND_ENGINE_BEHAVIOR_WEIGHT"],
            config.engine.behavior_weight.to_string(),
        ),
        (
            "engine.default_limit",
            &["RECOMMEND_ENGINE_DEFAULT_LIMIT"],
            config.engine.default_limit.to_string(),
        ),
        (
            "engine.cache_profiles",
            &["RECOMMEND_ENGINE_CACHE_PROFILES"],
            config.engine.cache_profiles.to_string(),
        ),
        (
            "logging.level",
            &["RECOMMEND_LOGGING_LEVEL", "RECOMMEND_LOG_LEVEL"],
            config.logging.level.clone(),
        ),
        (
            "logging.format",
            &["RECOMMEND_LOGGING_FORMAT", "RECOMMEND_LOG_FORMAT"],
            format!("{:?}", config.logging.format).to_ascii_lowercase(),
        ),
    ];

    let fields = fields
        .into_iter()
        .map(|(key, env_keys, value)| ConfigField {
            key,
            value,
            source: field_source(
                key,
                env_keys,
                config_file_doc.as_ref(),
                config_file_path.as_deref(),
            ),
        })
        .collect();

    let report = ConfigReport {
        command: "config",
        status: "ok",
        precedence: "env > file > default",
        fields,
    };
    CommandResult { exit_code: 0, output: serialize_payload(&report) }
}

fn detect_config_path() -> Option<PathBuf> {
    let root = PathBuf::from("recommend.toml");
    if root.exists() {
        return Some(root);
    }

    let nested = PathBuf::from("config/recommend.toml");
    if nested.exists() {
        return Some(nested);
    }

    None
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env_is_set(key)) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

/// Blank values are ignored by the loader, so they do not count as a source.
fn env_is_set(key: &str) -> bool {
    env::var(key).is_ok_and(|value| !value.trim().is_empty())
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}
