//! # Application Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                            │
//! │     TALLY_DB_PATH, TALLY_EXPORT_DIR, TALLY_TAX_MODE, TALLY_LOG          │
//! │                                                                         │
//! │  2. TOML Config File                                                    │
//! │     ~/.config/tally/tally.toml (Linux)                                  │
//! │     ~/Library/Application Support/com.tally.invoices/tally.toml (macOS) │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                    │
//! │     data dir database, taxed invoices                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [database]
//! path = "/var/lib/tally/tally.db"
//! max_connections = 5
//!
//! [invoice]
//! export_dir = "/home/me/Invoices"
//! default_tax_mode = "untaxed"
//!
//! [logging]
//! filter = "info,tally=debug,sqlx=warn"
//! ```

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tally_core::TaxMode;
use tracing::{debug, info, warn};

use crate::error::ConfigError;
use crate::logging::DEFAULT_FILTER;
use crate::pool::DbConfig;

const DATABASE_FILE: &str = "tally.db";
const CONFIG_FILE: &str = "tally.toml";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "tally", "invoices")
}

// =============================================================================
// Sections
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// Database file. Defaults to the platform data directory.
    #[serde(default)]
    pub path: Option<PathBuf>,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: None,
            max_connections: default_max_connections(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceSettings {
    /// Where exported invoices are written. Defaults to `exports/` under
    /// the platform data directory.
    #[serde(default)]
    pub export_dir: Option<PathBuf>,

    #[serde(default)]
    pub default_tax_mode: TaxMode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// `tracing_subscriber::EnvFilter` directives. `RUST_LOG` still wins.
    #[serde(default = "default_filter")]
    pub filter: String,
}

fn default_filter() -> String {
    DEFAULT_FILTER.to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            filter: default_filter(),
        }
    }
}

// =============================================================================
// App Config
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub invoice: InvoiceSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

impl AppConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (explicit path, else `tally.toml` in the config dir)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = match config_path.or_else(Self::default_config_path) {
            Some(path) if path.exists() => {
                info!(path = %path.display(), "Loading config from file");
                Self::from_file(&path)?
            }
            Some(path) => {
                debug!(path = %path.display(), "Config file not found, using defaults");
                Self::default()
            }
            None => Self::default(),
        };

        config.apply_overrides_from(|key| std::env::var(key).ok())?;
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load config: {}. Using defaults.", e);
            Self::default()
        })
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "database.max_connections must be greater than 0".into(),
            ));
        }

        if self.logging.filter.trim().is_empty() {
            return Err(ConfigError::Invalid("logging.filter must not be empty".into()));
        }

        Ok(())
    }

    /// Applies `TALLY_*` overrides read through `lookup`.
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("TALLY_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = Some(PathBuf::from(path));
        }

        if let Some(dir) = lookup("TALLY_EXPORT_DIR") {
            self.invoice.export_dir = Some(PathBuf::from(dir));
        }

        if let Some(mode) = lookup("TALLY_TAX_MODE") {
            self.invoice.default_tax_mode = mode
                .parse()
                .map_err(|e| ConfigError::Invalid(format!("TALLY_TAX_MODE: {}", e)))?;
        }

        if let Some(filter) = lookup("TALLY_LOG") {
            self.logging.filter = filter;
        }

        Ok(())
    }

    /// `tally.toml` in the platform config directory.
    pub fn default_config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Configured database file, else `tally.db` in the data directory,
    /// else the working directory.
    pub fn database_path(&self) -> PathBuf {
        self.database.path.clone().unwrap_or_else(|| {
            project_dirs()
                .map(|dirs| dirs.data_dir().join(DATABASE_FILE))
                .unwrap_or_else(|| PathBuf::from(DATABASE_FILE))
        })
    }

    pub fn export_dir(&self) -> PathBuf {
        self.invoice.export_dir.clone().unwrap_or_else(|| {
            project_dirs()
                .map(|dirs| dirs.data_dir().join("exports"))
                .unwrap_or_else(|| PathBuf::from("exports"))
        })
    }

    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(self.database_path()).max_connections(self.database.max_connections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.invoice.default_tax_mode, TaxMode::Taxed);
        assert_eq!(config.logging.filter, DEFAULT_FILTER);
        assert!(config.database_path().ends_with("tally.db"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tally.toml");
        std::fs::write(
            &path,
            "[invoice]\ndefault_tax_mode = \"untaxed\"\n\n[database]\npath = \"/data/books.db\"\n",
        )
        .unwrap();

        let config = AppConfig::from_file(&path).unwrap();

        assert_eq!(config.invoice.default_tax_mode, TaxMode::Untaxed);
        assert_eq!(config.database_path(), PathBuf::from("/data/books.db"));
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.logging.filter, DEFAULT_FILTER);
    }

    #[test]
    fn test_bad_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tally.toml");
        std::fs::write(&path, "[invoice]\ndefault_tax_mode = \"sometimes\"\n").unwrap();

        assert!(matches!(AppConfig::from_file(&path), Err(ConfigError::Parse(_))));
        assert!(matches!(
            AppConfig::load(Some(path.clone())),
            Err(ConfigError::Parse(_))
        ));
        assert_eq!(AppConfig::load_or_default(Some(path)), AppConfig::default());
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("TALLY_DB_PATH", "/tmp/override.db"),
            ("TALLY_EXPORT_DIR", "/tmp/out"),
            ("TALLY_TAX_MODE", "non-gst"),
            ("TALLY_LOG", "warn"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config
            .apply_overrides_from(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.database_path(), PathBuf::from("/tmp/override.db"));
        assert_eq!(config.export_dir(), PathBuf::from("/tmp/out"));
        assert_eq!(config.invoice.default_tax_mode, TaxMode::Untaxed);
        assert_eq!(config.logging.filter, "warn");

        let mut config = AppConfig::default();
        let bad = config.apply_overrides_from(|key| {
            (key == "TALLY_TAX_MODE").then(|| "maybe".to_string())
        });
        assert!(matches!(bad, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_validation() {
        let mut config = AppConfig::default();
        config.database.max_connections = 0;
        assert!(config.validate().is_err());

        let config = AppConfig {
            logging: LoggingSettings {
                filter: " ".to_string(),
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_serialization() {
        let toml_str = toml::to_string_pretty(&AppConfig::default()).unwrap();
        assert!(toml_str.contains("[database]"));
        assert!(toml_str.contains("[invoice]"));
        assert!(toml_str.contains("default_tax_mode = \"taxed\""));
    }
}
