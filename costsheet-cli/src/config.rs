use config::{Config, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct CliConfig {
    pub database: Option<DatabaseConfig>,
    pub display: Option<DisplayConfig>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct DatabaseConfig {
    pub path: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DisplayConfig {
    pub currency_symbol: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            currency_symbol: "$".to_string(),
        }
    }
}

const DEFAULT_CONFIG: &str = r#"
[database]
# Defaults to the platform data directory, e.g. ~/.local/share/costsheet/projects.sqlite3
# path = "/path/to/projects.sqlite3"

[display]
currency_symbol = "$"
"#;

impl CliConfig {
    pub fn load() -> Result<(Self, PathBuf), ConfigError> {
        let config_path = get_config_path();
        let config = Self::load_from(&config_path)?;
        Ok((config, config_path))
    }

    /// Read `config_path`, writing the default file first if it is missing.
    pub fn load_from(config_path: &Path) -> Result<Self, ConfigError> {
        // Create config directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ConfigError::Message(format!("Failed to create config directory: {e}"))
            })?;
        }

        if !config_path.exists() {
            std::fs::write(config_path, DEFAULT_CONFIG).map_err(|e| {
                ConfigError::Message(format!("Failed to write default config: {e}"))
            })?;
        }

        let builder = Config::builder()
            .add_source(File::from(config_path.to_path_buf()))
            .build()?;

        builder.try_deserialize()
    }

    pub fn database_path(&self) -> Option<PathBuf> {
        self.database
            .as_ref()
            .and_then(|db| db.path.as_ref())
            .map(PathBuf::from)
    }

    pub fn currency_symbol(&self) -> String {
        self.display.clone().unwrap_or_default().currency_symbol
    }
}

pub fn get_config_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("costsheet").join("costsheet.toml")
    } else {
        PathBuf::from("costsheet.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_written_and_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("costsheet").join("costsheet.toml");

        let config = CliConfig::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.database_path(), None);
        assert_eq!(config.currency_symbol(), "$");
    }

    #[test]
    fn test_custom_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("costsheet.toml");
        std::fs::write(
            &path,
            "[database]\npath = \"/tmp/costs.sqlite3\"\n\n[display]\ncurrency_symbol = \"NT$\"\n",
        )
        .unwrap();

        let config = CliConfig::load_from(&path).unwrap();
        assert_eq!(
            config.database_path(),
            Some(PathBuf::from("/tmp/costs.sqlite3"))
        );
        assert_eq!(config.currency_symbol(), "NT$");
    }

    #[test]
    fn test_missing_sections_fall_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("costsheet.toml");
        std::fs::write(&path, "").unwrap();

        let config = CliConfig::load_from(&path).unwrap();
        assert_eq!(config.currency_symbol(), "$");
    }
}
