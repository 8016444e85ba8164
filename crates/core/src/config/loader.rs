use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Load configuration from file with environment variable overrides
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let config: Config = Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed("FAREDESK_").split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    Ok(config)
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_from_str_valid() {
        let toml = r#"
[api]
base_url = "https://api.example.test"

[poller]
interval_ms = 1000
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.api.base_url, "https://api.example.test");
        assert_eq!(config.poller.interval_ms, 1000);
    }

    #[test]
    fn test_load_config_from_str_malformed() {
        let result = load_config_from_str("not valid toml [");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn test_env_overrides_file_values() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "faredesk.toml",
                r#"
[api]
base_url = "https://api.example.test"

[poller]
interval_ms = 1000
"#,
            )?;
            // Double underscore separates the section from the key.
            jail.set_env("FAREDESK_POLLER__INTERVAL_MS", "250");
            jail.set_env("FAREDESK_API__TIMEOUT_SECS", "5");

            let config = load_config(Path::new("faredesk.toml")).expect("config should load");
            assert_eq!(config.poller.interval_ms, 250);
            assert_eq!(config.api.timeout_secs, 5);
            assert_eq!(config.api.base_url, "https://api.example.test");
            Ok(())
        });
    }

    #[test]
    fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[api]
base_url = "https://api.example.test"
timeout_secs = 5
"#
        )
        .unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.api.base_url, "https://api.example.test");
        assert_eq!(config.api.timeout_secs, 5);
    }
}
