// Backend endpoint settings.

use serde::Deserialize;

/// Local development backend.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
/// Development-only credential; real deployments must override it.
pub const DEFAULT_API_KEY: &str = "default-api-key-change-in-production";

/// Environment variable overriding `base_url`.
pub const ENV_BASE_URL: &str = "MAESTER_API_URL";
/// Environment variable overriding `api_key`.
pub const ENV_API_KEY: &str = "MAESTER_API_KEY";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub api_key: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: DEFAULT_API_KEY.to_string(),
        }
    }
}

impl ApiConfig {
    /// Apply `MAESTER_API_URL` / `MAESTER_API_KEY` from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary lookup. Blank values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(url) = non_blank(ENV_BASE_URL) {
            self.base_url = url.trim().to_string();
        }
        if let Some(key) = non_blank(ENV_API_KEY) {
            self.api_key = key;
        }
    }

    pub fn uses_default_key(&self) -> bool {
        self.api_key == DEFAULT_API_KEY
    }

    /// Join an endpoint path onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_point_at_local_backend() {
        let config = ApiConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert!(config.uses_default_key());
    }

    #[test]
    fn overrides_replace_both_fields() {
        let env: HashMap<&str, &str> = [
            (ENV_BASE_URL, "https://laws.example.test/"),
            (ENV_API_KEY, "secret"),
        ]
        .into_iter()
        .collect();

        let mut config = ApiConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.base_url, "https://laws.example.test/");
        assert_eq!(config.api_key, "secret");
        assert!(!config.uses_default_key());
        assert_eq!(config.endpoint("/query"), "https://laws.example.test/query");
    }

    #[test]
    fn blank_overrides_are_ignored() {
        let mut config = ApiConfig::default();
        config.apply_overrides(|_| Some("  ".to_string()));
        assert_eq!(config, ApiConfig::default());
    }
}
