//! `qir.toml` configuration.
//!
//! ```toml
//! [sql]
//! flavor = "postgres"
//! timezone = "Europe/Prague"
//!
//! [dynamodb]
//! partition_key = "pk"
//! sort_key = "sk"
//! ```

use crate::error::{QirError, QirResult};
use crate::transpiler::{Dialect, DynamoOptions, FlavorOptions};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "qir.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct QirConfig {
    pub sql: SqlConfig,
    pub dynamodb: DynamoOptions,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SqlConfig {
    pub flavor: Dialect,
    /// IANA zone name used when rendering dates.
    pub timezone: Option<String>,
}

impl QirConfig {
    pub fn from_toml(text: &str) -> QirResult<Self> {
        toml::from_str(text).map_err(|e| QirError::Config(e.to_string()))
    }

    pub fn from_file(path: &Path) -> QirResult<Self> {
        let text = std::fs::read_to_string(path)?;
        toml::from_str(&text)
            .map_err(|e| QirError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Load the first configuration found. An explicit path must exist;
    /// otherwise `./qir.toml` and then `<config dir>/qir/config.toml` are
    /// tried, falling back to defaults.
    pub fn load(explicit: Option<&Path>) -> QirResult<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        for path in Self::search_paths() {
            if path.is_file() {
                tracing::debug!("Loading configuration from {}", path.display());
                return Self::from_file(&path);
            }
        }
        Ok(Self::default())
    }

    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(CONFIG_FILE)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("qir").join("config.toml"));
        }
        paths
    }

    pub fn flavor_options(&self) -> QirResult<FlavorOptions> {
        match &self.sql.timezone {
            Some(name) => FlavorOptions::parse_timezone(name),
            None => Ok(FlavorOptions::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_full_config() {
        let config = QirConfig::from_toml(
            r#"
            [sql]
            flavor = "postgres"
            timezone = "Europe/Prague"

            [dynamodb]
            partition_key = "pk"
            sort_key = "sk"
            force_scan = true
            "#,
        )
        .unwrap();
        assert_eq!(config.sql.flavor, Dialect::Postgres);
        assert_eq!(
            config.dynamodb,
            DynamoOptions::new().partition_key("pk").sort_key("sk").force_scan(true)
        );
        assert!(config.flavor_options().unwrap().timezone.is_some());
    }

    #[test]
    fn test_empty_config_is_default() {
        let config = QirConfig::from_toml("").unwrap();
        assert_eq!(config, QirConfig::default());
        assert_eq!(config.sql.flavor, Dialect::MySql);
        assert_eq!(config.flavor_options().unwrap(), FlavorOptions::default());
    }

    #[test]
    fn test_bad_values_are_config_errors() {
        let err = QirConfig::from_toml("[sql]\nflavor = \"oracle\"").unwrap_err();
        assert!(matches!(err, QirError::Config(_)));

        let config = QirConfig::from_toml("[sql]\ntimezone = \"Mars/Olympus\"").unwrap();
        let err = config.flavor_options().unwrap_err();
        assert_eq!(err.to_string(), "Configuration error: Unknown time zone: Mars/Olympus");
    }

    #[test]
    fn test_explicit_path_must_exist() {
        let missing = std::env::temp_dir().join("qir-missing-config.toml");
        let err = QirConfig::load(Some(&missing)).unwrap_err();
        assert!(matches!(err, QirError::Io(_)));
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("qir-config-{}.toml", std::process::id()));
        std::fs::write(&path, "[sql]\nflavor = \"sqlite\"\n").unwrap();
        let config = QirConfig::load(Some(&path)).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(config.sql.flavor, Dialect::Sqlite);
    }
}
