use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::recommend::{ScoringWeights, W_BEHAVIOR, W_CONTENT};

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub engine: EngineConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct EngineConfig {
    pub content_weight: f64,
    pub behavior_weight: f64,
    pub default_limit: usize,
    pub cache_profiles: bool,
}

impl EngineConfig {
    pub fn weights(&self) -> ScoringWeights {
        ScoringWeights { content: self.content_weight, behavior: self.behavior_weight }
    }
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub database_url: Option<String>,
    pub log_level: Option<String>,
    pub content_weight: Option<f64>,
    pub behavior_weight: Option<f64>,
    pub default_limit: Option<usize>,
    pub cache_profiles: Option<bool>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "sqlite://recommend.db".to_string(),
                max_connections: 5,
                timeout_secs: 30,
            },
            engine: EngineConfig {
                content_weight: W_CONTENT,
                behavior_weight: W_BEHAVIOR,
                default_limit: 10,
                cache_profiles: false,
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected =
                options.config_path.unwrap_or_else(|| PathBuf::from("recommend.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(database) = patch.database {
            if let Some(url) = database.url {
                self.database.url = url;
            }
            if let Some(max_connections) = database.max_connections {
                self.database.max_connections = max_connections;
            }
            if let Some(timeout_secs) = database.timeout_secs {
                self.database.timeout_secs = timeout_secs;
            }
        }

        if let Some(engine) = patch.engine {
            if let Some(content_weight) = engine.content_weight {
                self.engine.content_weight = content_weight;
            }
            if let Some(behavior_weight) = engine.behavior_weight {
                self.engine.behavior_weight = behavior_weight;
            }
            if let Some(default_limit) = engine.default_limit {
                self.engine.default_limit = default_limit;
            }
            if let Some(cache_profiles) = engine.cache_profiles {
                self.engine.cache_profiles = cache_profiles;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("RECOMMEND_DATABASE_URL") {
            self.database.url = value;
        }
        if let Some(value) = read_env("RECOMMEND_DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections =
                parse_value("RECOMMEND_DATABASE_MAX_CONNECTIONS", &value)?;
        }
        if let Some(value) = read_env("RECOMMEND_DATABASE_TIMEOUT_SECS") {
            self.database.timeout_secs = parse_value("RECOMMEND_DATABASE_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = read_env("RECOMMEND_ENGINE_CONTENT_WEIGHT") {
            self.engine.content_weight = parse_value("RECOMMEND_ENGINE_CONTENT_WEIGHT", &value)?;
        }
        if let Some(value) = read_env("RECOMMEND_ENGINE_BEHAVIOR_WEIGHT") {
            self.engine.behavior_weight = parse_value("RECOMMEND_ENGINE_BEHAVIOR_WEIGHT", &value)?;
        }
        if let Some(value) = read_env("RECOMMEND_ENGINE_DEFAULT_LIMIT") {
            self.engine.default_limit = parse_value("RECOMMEND_ENGINE_DEFAULT_LIMIT", &value)?;
        }
        if let Some(value) = read_env("RECOMMEND_ENGINE_CACHE_PROFILES") {
            self.engine.cache_profiles = parse_value("RECOMMEND_ENGINE_CACHE_PROFILES", &value)?;
        }

        let log_level =
            read_env("RECOMMEND_LOGGING_LEVEL").or_else(|| read_env("RECOMMEND_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("RECOMMEND_LOGGING_FORMAT").or_else(|| read_env("RECOMMEND_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(database_url) = overrides.database_url {
            self.database.url = database_url;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(content_weight) = overrides.content_weight {
            self.engine.content_weight = content_weight;
        }
        if let Some(behavior_weight) = overrides.behavior_weight {
            self.engine.behavior_weight = behavior_weight;
        }
        if let Some(default_limit) = overrides.default_limit {
            self.engine.default_limit = default_limit;
        }
        if let Some(cache_profiles) = overrides.cache_profiles {
            self.engine.cache_profiles = cache_profiles;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_database(&self.database)?;
        validate_engine(&self.engine)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("recommend.toml"), PathBuf::from("config/recommend.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_database(database: &DatabaseConfig) -> Result<(), ConfigError> {
    let url = database.url.trim();
    let sqlite_url =
        url.starts_with("sqlite://") || url.starts_with("sqlite::") || url == ":memory:";
    if !sqlite_url {
        return Err(ConfigError::Validation(
            "database.url must be a sqlite URL (`sqlite://...`, `sqlite::...`, or `:memory:`)"
                .to_string(),
        ));
    }

    if database.max_connections == 0 {
        return Err(ConfigError::Validation(
            "database.max_connections must be greater than zero".to_string(),
        ));
    }

    if database.timeout_secs == 0 || database.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "database.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    Ok(())
}

fn validate_engine(engine: &EngineConfig) -> Result<(), ConfigError> {
    for (key, weight) in
        [("engine.content_weight", engine.content_weight), ("engine.behavior_weight", engine.behavior_weight)]
    {
        if !weight.is_finite() || weight < 0.0 {
            return Err(ConfigError::Validation(format!(
                "{key} must be a finite, non-negative number (got {weight})"
            )));
        }
    }

    if engine.content_weight + engine.behavior_weight == 0.0 {
        return Err(ConfigError::Validation(
            "engine.content_weight and engine.behavior_weight cannot both be zero".to_string(),
        ));
    }

    if engine.default_limit == 0 {
        return Err(ConfigError::Validation(
            "engine.default_limit must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse::<T>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    database: Option<DatabasePatch>,
    engine: Option<EnginePatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct DatabasePatch {
    url: Option<String>,
    max_connections: Option<u32>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct EnginePatch {
    content_weight: Option<f64>,
    behavior_weight: Option<f64>,
    default_limit: Option<usize>,
    cache_profiles: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
