use std::env;
use std::sync::{Mutex, OnceLock};

use recommend_cli::commands::{config, migrate, recommend, record, seed};
use serde_json::Value;
use tempfile::TempDir;

#[test]
fn migrate_returns_success_against_fresh_database() {
    with_database(&[], || {
        let result = migrate::run();
        assert_eq!(result.exit_code, 0, "expected successful migrate run");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "migrate");
        assert_eq!(payload["status"], "ok");
    });
}

#[test]
fn invalid_weights_return_config_failure() {
    with_database(&[("RECOMMEND_ENGINE_CONTENT_WEIGHT", "-1")], || {
        let result = migrate::run();
        assert_eq!(result.exit_code, 2, "expected config validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "config_validation");
    });
}

#[test]
fn seed_is_repeatable() {
    with_database(&[], || {
        let first = seed::run();
        let second = seed::run();
        assert_eq!(first.exit_code, 0);
        assert_eq!(first.output, second.output);

        let payload = parse_payload(&first.output);
        assert_eq!(payload["command"], "seed");
        assert_eq!(payload["message"], "loaded demo dataset (8 items, 11 interaction events)");
    });
}

#[test]
fn related_excludes_source_and_honors_limit() {
    with_database(&[], || {
        assert_eq!(seed::run().exit_code, 0);

        let result = recommend::related(1, Some(3));
        assert_eq!(result.exit_code, 0, "unexpected output: {}", result.output);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "related");
        assert_eq!(payload["limit"], 3);
        let ids = item_ids(&payload);
        assert_eq!(ids.len(), 3);
        assert!(!ids.contains(&1));
    });
}

#[test]
fn related_uses_configured_default_limit() {
    with_database(&[("RECOMMEND_ENGINE_DEFAULT_LIMIT", "2")], || {
        assert_eq!(seed::run().exit_code, 0);

        let payload = parse_payload(&recommend::related(1, None).output);
        assert_eq!(payload["limit"], 2);
        assert_eq!(item_ids(&payload).len(), 2);
    });
}

#[test]
fn related_with_zero_limit_is_empty() {
    with_database(&[], || {
        assert_eq!(seed::run().exit_code, 0);

        let payload = parse_payload(&recommend::related(1, Some(0)).output);
        assert_eq!(payload["status"], "ok");
        assert!(item_ids(&payload).is_empty());
    });
}

#[test]
fn homepage_skips_items_the_user_touched() {
    with_database(&[], || {
        assert_eq!(seed::run().exit_code, 0);

        let payload = parse_payload(&recommend::homepage(103, Some(10)).output);
        let ids = item_ids(&payload);
        assert_eq!(ids.len(), 6);
        assert!(!ids.contains(&3));
        assert!(!ids.contains(&6));
    });
}

#[test]
fn cart_ranks_cohort_items_by_frequency() {
    with_database(&[], || {
        assert_eq!(seed::run().exit_code, 0);

        let payload = parse_payload(&recommend::cart(vec![1], Some(2)).output);
        assert_eq!(item_ids(&payload), vec![4, 2]);

        let empty = parse_payload(&recommend::cart(Vec::new(), Some(5)).output);
        assert_eq!(empty["status"], "ok");
        assert!(item_ids(&empty).is_empty());
    });
}

#[test]
fn record_appends_event_by_action_kind() {
    with_database(&[], || {
        assert_eq!(migrate::run().exit_code, 0);

        let result = record::run(7, 42, Some("purchase".to_string()), None);
        assert_eq!(result.exit_code, 0, "unexpected output: {}", result.output);
        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "record");
        assert_eq!(payload["status"], "ok");
    });
}

#[test]
fn record_without_action_or_score_is_invalid_request() {
    with_database(&[], || {
        let result = record::run(7, 42, None, None);
        assert_eq!(result.exit_code, 7);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "invalid_request");
    });
}

#[test]
fn record_with_unknown_action_is_invalid_request() {
    with_database(&[], || {
        let result = record::run(7, 42, Some("wishlist".to_string()), None);
        assert_eq!(result.exit_code, 7);
    });
}

#[test]
fn config_reports_env_sources() {
    with_database(&[("RECOMMEND_ENGINE_DEFAULT_LIMIT", "4")], || {
        let result = config::run();
        assert_eq!(result.exit_code, 0, "unexpected output: {}", result.output);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "config");
        assert_eq!(payload["status"], "ok");

        let limit = config_field(&payload, "engine.default_limit");
        assert_eq!(limit["value"], "4");
        assert_eq!(limit["source"], "env (RECOMMEND_ENGINE_DEFAULT_LIMIT)");

        let weight = config_field(&payload, "engine.content_weight");
        assert_eq!(weight["value"], "0.6");
        assert_eq!(weight["source"], "default");
    });
}

#[test]
fn config_attributes_log_aliases_and_ignores_blank_env() {
    with_database(
        &[("RECOMMEND_LOG_LEVEL", "warn"), ("RECOMMEND_LOGGING_FORMAT", "  ")],
        || {
            let payload = parse_payload(&config::run().output);

            let level = config_field(&payload, "logging.level");
            assert_eq!(level["value"], "warn");
            assert_eq!(level["source"], "env (RECOMMEND_LOG_LEVEL)");

            let format = config_field(&payload, "logging.format");
            assert_eq!(format["value"], "compact");
            assert_eq!(format["source"], "default");
        },
    );
}

#[test]
fn config_with_invalid_values_returns_config_failure() {
    with_database(&[("RECOMMEND_ENGINE_CONTENT_WEIGHT", "-1")], || {
        let result = config::run();
        assert_eq!(result.exit_code, 2, "expected config validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "config");
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "config_validation");
    });
}

fn config_field<'a>(payload: &'a Value, key: &str) -> &'a Value {
    payload["fields"]
        .as_array()
        .expect("fields array")
        .iter()
        .find(|field| field["key"] == key)
        .expect("field present")
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn item_ids(payload: &Value) -> Vec<i64> {
    payload["recommendations"]
        .as_array()
        .expect("recommendations array")
        .iter()
        .map(|entry| entry["item_id"].as_i64().expect("item id"))
        .collect()
}

/// Run `test_fn` against a fresh on-disk database with only `vars` set.
fn with_database(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().unwrap_or_else(|poison| poison.into_inner());

    let dir = TempDir::new().expect("temp dir");
    let url = format!("sqlite://{}", dir.path().join("recommend.db").display());

    let keys = [
        "RECOMMEND_DATABASE_URL",
        "RECOMMEND_DATABASE_MAX_CONNECTIONS",
        "RECOMMEND_DATABASE_TIMEOUT_SECS",
        "RECOMMEND_ENGINE_CONTENT_WEIGHT",
        "RECOMMEND_ENGINE_BEHAVIOR_WEIGHT",
        "RECOMMEND_ENGINE_DEFAULT_LIMIT",
        "RECOMMEND_ENGINE_CACHE_PROFILES",
        "RECOMMEND_LOGGING_LEVEL",
        "RECOMMEND_LOGGING_FORMAT",
        "RECOMMEND_LOG_LEVEL",
        "RECOMMEND_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    env::set_var("RECOMMEND_DATABASE_URL", &url);
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
