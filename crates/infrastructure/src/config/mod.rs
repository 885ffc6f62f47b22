//! Application configuration
//!
//! Layered as: built-in defaults, then an optional `config.toml`, then
//! `TOMATO_CLASSIFIER_*` environment variables, then `MODEL_PATH`.

mod server;

use std::{fmt, path::Path};

use ai_core::ClassifierConfig;
use serde::{Deserialize, Serialize};

pub use server::ServerConfig;

/// Prefix for environment overrides, e.g. `TOMATO_CLASSIFIER_SERVER__PORT=9000`
pub const ENV_PREFIX: &str = "TOMATO_CLASSIFIER";

/// Environment variable naming the model artifact
pub const MODEL_PATH_ENV: &str = "MODEL_PATH";

const CONFIG_FILE: &str = "config";

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive (e.g. "info", "tomato_classifier_server=debug,tower_http=info").
    /// `RUST_LOG` takes precedence when set.
    #[serde(default = "default_log_filter")]
    pub filter: String,

    /// Output format
    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_filter() -> String {
    "info,tower_http=info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            format: LogFormat::default(),
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Model configuration
    #[serde(default)]
    pub classifier: ClassifierConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from `config.toml` (optional) and the environment
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_with(config::File::with_name(CONFIG_FILE).required(false))
    }

    /// Load configuration from an explicit file and the environment
    pub fn load_from_path(path: &Path) -> Result<Self, config::ConfigError> {
        Self::load_with(config::File::from(path).required(true))
    }

    fn load_with<S>(file: S) -> Result<Self, config::ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let builder = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.allowed_origins")
                    .try_parsing(true),
            );

        let mut config: Self = builder.build()?.try_deserialize()?;
        config.apply_model_path_override(std::env::var(MODEL_PATH_ENV).ok());
        Ok(config)
    }

    /// Let a `MODEL_PATH` value win over every other source
    pub fn apply_model_path_override(&mut self, model_path: Option<String>) {
        if let Some(path) = model_path.filter(|p| !p.trim().is_empty()) {
            self.classifier.model_path = path;
        }
    }
}
