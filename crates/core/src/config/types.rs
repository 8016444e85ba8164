use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::api::ApiConfig;
use crate::poller::PollerConfig;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub poller: PollerConfig,
    #[serde(default)]
    pub credentials: CredentialsConfig,
}

/// Location of the persisted credential record
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CredentialsConfig {
    #[serde(default = "default_credentials_path")]
    pub path: PathBuf,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            path: default_credentials_path(),
        }
    }
}

fn default_credentials_path() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join("faredesk").join("credentials.json"))
        .unwrap_or_else(|| PathBuf::from("faredesk-credentials.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.api.base_url.is_empty());
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.poller.interval_ms, 2000);
        assert!(config
            .credentials
            .path
            .to_string_lossy()
            .contains("credentials"));
    }

    #[test]
    fn test_deserialize_minimal() {
        let toml = r#"
            [api]
            base_url = "https://api.example.test"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.api.base_url, "https://api.example.test");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.poller.interval_ms, 2000);
    }

    #[test]
    fn test_deserialize_full() {
        let toml = r#"
            [api]
            base_url = "https://api.example.test"
            timeout_secs = 10

            [poller]
            interval_ms = 500

            [credentials]
            path = "/tmp/creds.json"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.poller.interval_ms, 500);
        assert_eq!(config.credentials.path, PathBuf::from("/tmp/creds.json"));
    }
}
