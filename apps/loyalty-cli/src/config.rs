//! # CLI Configuration
//!
//! Where the data files live and how much to log.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Command-line flags (highest priority)                              │
//! │     --data-dir ./demo  -v                                              │
//! │                                                                         │
//! │  2. Environment Variables                                              │
//! │     LOYALTY_DATA_DIR=/srv/loyalty                                      │
//! │     LOYALTY_LOG=debug                                                  │
//! │                                                                         │
//! │  3. TOML Config File                                                   │
//! │     --config <path>, else                                              │
//! │     ~/.config/loyalty/loyalty.toml (Linux)                             │
//! │                                                                         │
//! │  4. Default Values (lowest priority)                                   │
//! │     ./data, products.hnt / coupons.hnt / cards.hnt, info               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # loyalty.toml
//! [data]
//! dir = "data"
//! products = "products.hnt"
//! coupons = "coupons.hnt"
//! cards = "cards.hnt"
//!
//! [logging]
//! filter = "info"   # any tracing EnvFilter directive
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{CliError, CliResult};
use loyalty_store::loader::{CARDS_FILE, COUPONS_FILE, PRODUCTS_FILE};
use loyalty_store::DataFiles;

/// Environment variable overriding `[data] dir`.
pub const ENV_DATA_DIR: &str = "LOYALTY_DATA_DIR";
/// Environment variable overriding `[logging] filter`.
pub const ENV_LOG: &str = "LOYALTY_LOG";

// =============================================================================
// Data Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSettings {
    /// Directory holding the data files.
    #[serde(default = "default_data_dir")]
    pub dir: PathBuf,

    #[serde(default = "default_products")]
    pub products: String,

    #[serde(default = "default_coupons")]
    pub coupons: String,

    #[serde(default = "default_cards")]
    pub cards: String,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_products() -> String {
    PRODUCTS_FILE.to_string()
}

fn default_coupons() -> String {
    COUPONS_FILE.to_string()
}

fn default_cards() -> String {
    CARDS_FILE.to_string()
}

impl Default for DataSettings {
    fn default() -> Self {
        DataSettings {
            dir: default_data_dir(),
            products: default_products(),
            coupons: default_coupons(),
            cards: default_cards(),
        }
    }
}

// =============================================================================
// Logging Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// `tracing_subscriber::EnvFilter` directive, used when `RUST_LOG` is unset.
    #[serde(default = "default_filter")]
    pub filter: String,
}

fn default_filter() -> String {
    "info".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            filter: default_filter(),
        }
    }
}

// =============================================================================
// App Configuration
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub data: DataSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

impl AppConfig {
    /// Loads configuration: defaults, then the TOML file, then environment.
    ///
    /// An explicit `config_path` must exist. The platform default path is
    /// optional; if it is missing the defaults are used.
    pub fn load(config_path: Option<&Path>) -> CliResult<Self> {
        let mut config = match config_path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                Some(path) => {
                    debug!(?path, "Config file not found, using defaults");
                    Self::default()
                }
                None => Self::default(),
            },
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Parses a TOML config file.
    pub fn from_file(path: &Path) -> CliResult<Self> {
        info!(?path, "Loading config from file");
        let contents = std::fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> CliResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Applies `LOYALTY_*` overrides read through `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = lookup(ENV_DATA_DIR) {
            debug!(dir = %dir, "Overriding data directory from environment");
            self.data.dir = PathBuf::from(dir);
        }

        if let Some(filter) = lookup(ENV_LOG) {
            debug!(filter = %filter, "Overriding log filter from environment");
            self.logging.filter = filter;
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> CliResult<()> {
        if self.data.dir.as_os_str().is_empty() {
            return Err(CliError::Config("data directory must not be empty".into()));
        }

        for (name, file) in [
            ("products", &self.data.products),
            ("coupons", &self.data.coupons),
            ("cards", &self.data.cards),
        ] {
            if file.trim().is_empty() {
                return Err(CliError::Config(format!("{name} file name must not be empty")));
            }
        }

        if self.logging.filter.trim().is_empty() {
            return Err(CliError::Config("log filter must not be empty".into()));
        }

        Ok(())
    }

    /// The data file names, for the store loader.
    pub fn data_files(&self) -> DataFiles {
        DataFiles {
            products: PathBuf::from(&self.data.products),
            coupons: PathBuf::from(&self.data.coupons),
            cards: PathBuf::from(&self.data.cards),
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "honesta", "loyalty")
            .map(|dirs| dirs.config_dir().join("loyalty.toml"))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.data.dir, PathBuf::from("data"));
        assert_eq!(config.data_files(), DataFiles::default());
        assert_eq!(config.logging.filter, "info");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = AppConfig::from_toml_str("[data]\ndir = \"/srv/loyalty\"\n").unwrap();
        assert_eq!(config.data.dir, PathBuf::from("/srv/loyalty"));
        assert_eq!(config.data.products, "products.hnt");
        assert_eq!(config.logging.filter, "info");
    }

    #[test]
    fn test_bad_toml_is_error() {
        assert!(matches!(
            AppConfig::from_toml_str("[data\n"),
            Err(CliError::Toml(_))
        ));
    }

    #[test]
    fn test_env_overrides_apply_after_file() {
        let mut config = AppConfig::from_toml_str("[data]\ndir = \"from-file\"\n").unwrap();
        let env: HashMap<&str, &str> = [(ENV_DATA_DIR, "from-env"), (ENV_LOG, "debug")].into();

        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.data.dir, PathBuf::from("from-env"));
        assert_eq!(config.logging.filter, "debug");
    }

    #[test]
    fn test_empty_paths_fail_validation() {
        let mut config = AppConfig::default();
        config.data.dir = PathBuf::new();
        assert!(matches!(config.validate(), Err(CliError::Config(_))));

        let mut config = AppConfig::default();
        config.data.cards = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("loyalty.toml");
        std::fs::write(&path, "[logging]\nfilter = \"warn\"\n").unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.logging.filter, "warn");

        assert!(AppConfig::from_file(&dir.path().join("missing.toml")).is_err());
    }
}
