//! # CLI Configuration
//!
//! Where the document lives and how amounts are printed.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     MOTOCASH_BACKEND=json                                              │
//! │     MOTOCASH_DATA_PATH=/data/motocash.json                             │
//! │     MOTOCASH_CURRENCY_SYMBOL=€                                         │
//! │                                                                         │
//! │  2. TOML Config File (--config, or the platform default)               │
//! │     ~/.config/motocash/motocash.toml (Linux)                           │
//! │     ~/Library/Application Support/app.motocash.motocash/... (macOS)    │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     SQLite in the platform data dir, "R$" with a decimal comma         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [storage]
//! backend = "sqlite"   # sqlite | json
//! path = "/home/rider/motocash.db"
//!
//! [display]
//! currency_symbol = "R$"
//! decimal_separator = ","
//! ```

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult};
use crate::format::MoneyFormat;

// =============================================================================
// Storage
// =============================================================================

/// Which persistence backend holds the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    /// SQLite database, one row per document section.
    #[default]
    Sqlite,

    /// A single pretty-printed JSON file.
    Json,
}

impl Backend {
    /// File name used when no path is configured.
    pub fn default_file_name(&self) -> &'static str {
        match self {
            Backend::Sqlite => "motocash.db",
            Backend::Json => "motocash.json",
        }
    }
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Backend::Sqlite => write!(f, "sqlite"),
            Backend::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for Backend {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sqlite" | "db" => Ok(Backend::Sqlite),
            "json" | "file" => Ok(Backend::Json),
            other => Err(AppError::Config(format!(
                "Unknown backend: '{}'. Valid options: sqlite, json",
                other
            ))),
        }
    }
}

/// Storage settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageSettings {
    #[serde(default)]
    pub backend: Backend,

    /// Database or JSON file; defaults to the platform data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

// =============================================================================
// Display
// =============================================================================

/// Terminal formatting settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplaySettings {
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,

    /// `","` (1.234,56) or `"."` (1,234.56).
    #[serde(default = "default_decimal_separator")]
    pub decimal_separator: String,
}

fn default_currency_symbol() -> String {
    "R$".to_string()
}

fn default_decimal_separator() -> String {
    ",".to_string()
}

impl Default for DisplaySettings {
    fn default() -> Self {
        DisplaySettings {
            currency_symbol: default_currency_symbol(),
            decimal_separator: default_decimal_separator(),
        }
    }
}

// =============================================================================
// App Configuration
// =============================================================================

/// Complete CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub display: DisplaySettings,
}

impl AppConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (motocash.toml)
    /// 3. Environment variables
    ///
    /// An explicitly given `config_path` must exist; the platform default
    /// may be missing.
    pub fn load(config_path: Option<PathBuf>) -> AppResult<Self> {
        let explicit = config_path.is_some();
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)
                    .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;
                config = toml::from_str(&contents)?;
            } else if explicit {
                return Err(AppError::Config(format!("{} does not exist", path.display())));
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;

        Ok(config)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> AppResult<()> {
        if self.display.currency_symbol.trim().is_empty() {
            return Err(AppError::Config("currency_symbol must not be empty".into()));
        }

        if !matches!(self.display.decimal_separator.as_str(), "," | ".") {
            return Err(AppError::Config(format!(
                "decimal_separator must be \",\" or \".\", got: {:?}",
                self.display.decimal_separator
            )));
        }

        if let Some(path) = &self.storage.path {
            if path.as_os_str().is_empty() {
                return Err(AppError::Config("storage path must not be empty".into()));
            }
        }

        Ok(())
    }

    /// Applies environment overrides read through `lookup`.
    fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> AppResult<()> {
        if let Some(backend) = lookup("MOTOCASH_BACKEND") {
            debug!(backend = %backend, "Overriding backend from environment");
            self.storage.backend = backend.parse()?;
        }

        if let Some(path) = lookup("MOTOCASH_DATA_PATH") {
            debug!(path = %path, "Overriding data path from environment");
            self.storage.path = Some(PathBuf::from(path));
        }

        if let Some(symbol) = lookup("MOTOCASH_CURRENCY_SYMBOL") {
            self.display.currency_symbol = symbol;
        }

        Ok(())
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("app", "motocash", "motocash").map(|dirs| dirs.config_dir().join("motocash.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Path of the database or JSON file.
    ///
    /// Falls back to the working directory when the platform has no data
    /// directory (no home directory set).
    pub fn data_path(&self) -> PathBuf {
        if let Some(path) = &self.storage.path {
            return path.clone();
        }

        let file_name = self.storage.backend.default_file_name();
        match ProjectDirs::from("app", "motocash", "motocash") {
            Some(dirs) => dirs.data_dir().join(file_name),
            None => {
                warn!("No platform data directory, using the working directory");
                PathBuf::from(file_name)
            }
        }
    }

    /// Money formatter for terminal output.
    pub fn money_format(&self) -> MoneyFormat {
        MoneyFormat::new(&self.display.currency_symbol, self.display.decimal_separator == ",")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.storage.backend, Backend::Sqlite);
        assert_eq!(config.display.currency_symbol, "R$");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_backend_parsing() {
        assert_eq!("sqlite".parse::<Backend>().unwrap(), Backend::Sqlite);
        assert_eq!("JSON".parse::<Backend>().unwrap(), Backend::Json);
        assert!("sheets".parse::<Backend>().is_err());
    }

    #[test]
    fn test_toml_sections() {
        let config: AppConfig = toml::from_str(
            r#"
            [storage]
            backend = "json"
            path = "/data/motocash.json"

            [display]
            decimal_separator = "."
            "#,
        )
        .unwrap();

        assert_eq!(config.storage.backend, Backend::Json);
        assert_eq!(config.data_path(), PathBuf::from("/data/motocash.json"));
        assert_eq!(config.display.currency_symbol, "R$");
        assert_eq!(config.display.decimal_separator, ".");
    }

    #[test]
    fn test_env_overrides_take_precedence() {
        let mut config: AppConfig = toml::from_str("[storage]\nbackend = \"sqlite\"").unwrap();
        config
            .apply_env_overrides(env(&[
                ("MOTOCASH_BACKEND", "json"),
                ("MOTOCASH_DATA_PATH", "/tmp/x.json"),
                ("MOTOCASH_CURRENCY_SYMBOL", "€"),
            ]))
            .unwrap();

        assert_eq!(config.storage.backend, Backend::Json);
        assert_eq!(config.storage.path, Some(PathBuf::from("/tmp/x.json")));
        assert_eq!(config.display.currency_symbol, "€");

        assert!(config.apply_env_overrides(env(&[("MOTOCASH_BACKEND", "cloud")])).is_err());
    }

    #[test]
    fn test_validation() {
        let mut config = AppConfig::default();
        config.display.decimal_separator = ";".to_string();
        assert!(config.validate().is_err());

        config.display.decimal_separator = ",".to_string();
        config.display.currency_symbol = " ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("motocash.toml");
        std::fs::write(&path, "[display]\ncurrency_symbol = \"US$\"\ndecimal_separator = \".\"\n").unwrap();

        let config = AppConfig::load(Some(path)).unwrap();
        assert_eq!(config.display.decimal_separator, ".");

        let missing = AppConfig::load(Some(dir.path().join("missing.toml")));
        assert!(matches!(missing, Err(AppError::Config(_))));
    }

    #[test]
    fn test_toml_round_trip_for_print() {
        let config = AppConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        assert!(text.contains("backend = \"sqlite\""));
        assert_eq!(toml::from_str::<AppConfig>(&text).unwrap(), config);
    }
}
