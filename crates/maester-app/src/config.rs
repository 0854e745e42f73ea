// Configuration loading (config/maester.toml plus environment overrides).

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use maester_api::{ApiConfig, MAX_K, MIN_K};
use maester_core::source::DEFAULT_DOCUMENT_PATH;

/// Config file location relative to the working directory.
pub const CONFIG_FILE: &str = "config/maester.toml";

/// Citations requested per query unless the user changes it.
pub const DEFAULT_K: u8 = 2;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },
}

// ---------------------------------------------------------------------------
// Config structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub default_k: u8,
    /// Path of the source PDF on the backend host.
    pub document_path: String,
    /// Suggestions shown on the welcome screen.
    pub sample_questions: Vec<String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            default_k: DEFAULT_K,
            document_path: DEFAULT_DOCUMENT_PATH.to_string(),
            sample_questions: default_sample_questions(),
        }
    }
}

fn default_sample_questions() -> Vec<String> {
    [
        "What are the laws regarding succession?",
        "What is the punishment for stealing?",
        "Can a noble refuse a summons from the King?",
        "What are the duties of the Night's Watch?",
    ]
    .iter()
    .map(|q| q.to_string())
    .collect()
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load `config/maester.toml` under `base_dir` (built-in defaults when the
/// file is absent), then apply overrides from `lookup`, then validate.
pub(crate) fn load_config_from(
    base_dir: &Path,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<Config, ConfigError> {
    let path = base_dir.join(CONFIG_FILE);

    let mut config = if path.exists() {
        let text = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
            path: path.clone(),
            source: e,
        })?;
        toml::from_str(&text).map_err(|e| ConfigError::ParseError {
            path: path.clone(),
            source: e,
        })?
    } else {
        Config::default()
    };

    config.api.apply_overrides(lookup);
    validate(&config)?;
    Ok(config)
}

/// Convenience wrapper: loads config relative to the current working
/// directory with overrides from the process environment.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|e| ConfigError::ReadError {
        path: PathBuf::from("."),
        source: e,
    })?;
    load_config_from(&cwd, |key| std::env::var(key).ok())
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    let base_url = config.api.base_url.trim();
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        return Err(ConfigError::ValidationError {
            field: "api.base_url".into(),
            message: format!("must start with http:// or https://, got {base_url:?}"),
        });
    }

    if !(MIN_K..=MAX_K).contains(&config.ui.default_k) {
        return Err(ConfigError::ValidationError {
            field: "ui.default_k".into(),
            message: format!(
                "must be between {MIN_K} and {MAX_K}, got {}",
                config.ui.default_k
            ),
        });
    }

    if !config.ui.document_path.starts_with('/') {
        return Err(ConfigError::ValidationError {
            field: "ui.document_path".into(),
            message: "must start with '/'".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
