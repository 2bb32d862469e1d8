//! # Configuration State
//!
//! Application configuration, resolved once at startup.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Command-line flags (highest priority)                              │
//! │     --data-url / --data-dir                                            │
//! │                                                                         │
//! │  2. Environment Variables                                              │
//! │     STRATO_DATA_URL=http://localhost:5173/data                         │
//! │     STRATO_DATA_DIR=/srv/strato/data                                   │
//! │     STRATO_CURRENCY_SYMBOL=€                                           │
//! │                                                                         │
//! │  3. TOML Config File                                                   │
//! │     --config <path>, else the platform config dir:                     │
//! │     ~/.config/stratocore-services/config.toml (Linux)                  │
//! │                                                                         │
//! │  4. Default Values (lowest priority)                                   │
//! │     data dir ./data, "$", 2 decimals                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [data]
//! url = "http://localhost:5173/data"   # wins over `dir` when set
//! dir = "./data"
//!
//! [display]
//! currency_symbol = "$"
//! currency_decimals = 2
//! ```
//!
//! Read-only after startup, so no lock is needed around it.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ConfigError;

// =============================================================================
// Sections
// =============================================================================

/// Where the JSON datasets live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    /// Base URL the datasets are served under.
    #[serde(default)]
    pub url: Option<String>,

    /// Local directory holding the datasets. Used when no URL is set.
    #[serde(default = "default_data_dir")]
    pub dir: PathBuf,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

impl Default for DataConfig {
    fn default() -> Self {
        DataConfig {
            url: None,
            dir: default_data_dir(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,

    /// Decimal places shown for amounts (0..=2).
    #[serde(default = "default_currency_decimals")]
    pub currency_decimals: u8,
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

fn default_currency_decimals() -> u8 {
    2
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            currency_symbol: default_currency_symbol(),
            currency_decimals: default_currency_decimals(),
        }
    }
}

/// Resolved dataset location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataLocation {
    Http(String),
    Dir(PathBuf),
}

// =============================================================================
// App Config
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub display: DisplayConfig,
}

impl AppConfig {
    /// Platform config file location.
    pub fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "stratocore", "stratocore-services")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Loads defaults, then the config file, then environment overrides.
    ///
    /// An explicit `config_path` must exist; the platform default is optional.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
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

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        info!(?path, "Loading config from file");
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Applies `STRATO_*` environment variables.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("STRATO_DATA_URL").filter(|v| !v.is_empty()) {
            debug!(%url, "Data URL from environment");
            self.data.url = Some(url);
        }

        if let Some(dir) = lookup("STRATO_DATA_DIR").filter(|v| !v.is_empty()) {
            debug!(%dir, "Data directory from environment");
            self.data.dir = PathBuf::from(dir);
        }

        if let Some(symbol) = lookup("STRATO_CURRENCY_SYMBOL") {
            self.display.currency_symbol = symbol;
        }
    }

    /// Points the data location at a URL, overriding every other source.
    pub fn override_data_url(&mut self, url: String) {
        self.data.url = Some(url);
    }

    /// Points the data location at a directory, overriding every other source.
    pub fn override_data_dir(&mut self, dir: PathBuf) {
        self.data.url = None;
        self.data.dir = dir;
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.display.currency_decimals > 2 {
            return Err(ConfigError::Invalid(format!(
                "currency_decimals must be 0, 1 or 2, got {}",
                self.display.currency_decimals
            )));
        }

        if let Some(url) = &self.data.url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::Invalid(format!(
                    "Data URL must start with http:// or https://, got: {}",
                    url
                )));
            }
        }

        Ok(())
    }

    pub fn data_location(&self) -> DataLocation {
        match &self.data.url {
            Some(url) => DataLocation::Http(url.clone()),
            None => DataLocation::Dir(self.data.dir.clone()),
        }
    }

    /// Formats a cent amount as a currency string.
    ///
    /// ## Example
    /// ```rust
    /// use strato_cli::state::AppConfig;
    ///
    /// let config = AppConfig::default();
    /// assert_eq!(config.format_currency(1234), "$12.34");
    /// ```
    pub fn format_currency(&self, cents: i64) -> String {
        let decimals = u32::from(self.display.currency_decimals.min(2));
        let step = 10_i64.pow(2 - decimals);

        // round half away from zero to the displayed precision
        let units = (cents.abs() + step / 2) / step;
        let divisor = 10_i64.pow(decimals);
        let whole = units / divisor;
        let frac = units % divisor;

        format!(
            "{}{}{}",
            if cents < 0 && units != 0 { "-" } else { "" },
            self.display.currency_symbol,
            if decimals > 0 {
                format!("{}.{:0width$}", whole, frac, width = decimals as usize)
            } else {
                whole.to_string()
            }
        )
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
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.data_location(), DataLocation::Dir(PathBuf::from("./data")));
        assert_eq!(config.display.currency_symbol, "$");
        assert_eq!(config.display.currency_decimals, 2);
    }

    #[test]
    fn test_format_currency() {
        let config = AppConfig::default();
        assert_eq!(config.format_currency(1234), "$12.34");
        assert_eq!(config.format_currency(100), "$1.00");
        assert_eq!(config.format_currency(1), "$0.01");
        assert_eq!(config.format_currency(0), "$0.00");
        assert_eq!(config.format_currency(-1234), "-$12.34");
        assert_eq!(config.format_currency(123456789), "$1234567.89");
    }

    #[test]
    fn test_format_currency_whole_units() {
        let mut config = AppConfig::default();
        config.display.currency_decimals = 0;
        config.display.currency_symbol = "€".to_string();
        assert_eq!(config.format_currency(4550), "€46");
        assert_eq!(config.format_currency(4549), "€45");
        assert_eq!(config.format_currency(-20), "€0");
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
            [data]
            url = "http://localhost:5173/data"

            [display]
            currency_symbol = "CHF "
            "#,
        )
        .unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(
            config.data_location(),
            DataLocation::Http("http://localhost:5173/data".to_string())
        );
        assert_eq!(config.display.currency_decimals, 2);
        assert_eq!(config.format_currency(500), "CHF 5.00");
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppConfig::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[display]\ncurrency_decimals = \"two\"").unwrap();
        assert!(matches!(
            AppConfig::from_file(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut config = AppConfig::default();
        config.data.dir = PathBuf::from("/from/file");

        config.apply_overrides(env(&[
            ("STRATO_DATA_DIR", "/from/env"),
            ("STRATO_CURRENCY_SYMBOL", "£"),
        ]));

        assert_eq!(config.data_location(), DataLocation::Dir(PathBuf::from("/from/env")));
        assert_eq!(config.format_currency(250), "£2.50");
    }

    #[test]
    fn test_url_wins_over_dir() {
        let mut config = AppConfig::default();
        config.apply_overrides(env(&[
            ("STRATO_DATA_DIR", "/from/env"),
            ("STRATO_DATA_URL", "https://shop.example.com/data"),
        ]));
        assert!(matches!(config.data_location(), DataLocation::Http(_)));

        // an explicit directory flag beats everything
        config.override_data_dir(PathBuf::from("/flag"));
        assert_eq!(config.data_location(), DataLocation::Dir(PathBuf::from("/flag")));
    }

    #[test]
    fn test_validate() {
        let mut config = AppConfig::default();
        config.display.currency_decimals = 3;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.override_data_url("ftp://example.com".to_string());
        assert!(config.validate().is_err());
    }
}
