//! # Tally Configuration
//!
//! Where files live, how big generated datasets are, and the log filter.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Command-line flags (highest priority, applied by main)             │
//! │                                                                         │
//! │  2. Environment Variables                                              │
//! │     TALLY_SALES_DIR=/data/sales                                        │
//! │     TALLY_SEED=42                                                      │
//! │                                                                         │
//! │  3. TOML Config File                                                   │
//! │     --config PATH, else the platform config dir, else ./tally.toml     │
//! │     ~/.config/tally/tally.toml (Linux)                                 │
//! │                                                                         │
//! │  4. Default Values (lowest priority)                                   │
//! │     files/info/*.csv, files/salesmen, files/reports/*.csv              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [input]
//! salesmen_file = "files/info/salesmen_info.csv"
//! products_file = "files/info/products.csv"
//! sales_dir = "files/salesmen"
//!
//! [output]
//! salesmen_report = "files/reports/salesmen_report.csv"
//! products_report = "files/reports/products_report.csv"
//!
//! [generator]
//! salesmen = 10
//! products = 50
//! sales_per_salesman = 10
//! seed = 42            # omit for a clock-derived seed
//! document_type = "CC"
//!
//! [logging]
//! filter = "info,tally=debug"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tally_io::{GeneratorSettings, Layout};
use thiserror::Error;
use tracing::debug;

/// Name of the config file looked up in the default locations.
const CONFIG_FILE_NAME: &str = "tally.toml";

// =============================================================================
// Errors
// =============================================================================

/// Configuration errors. Any of these ends the process with a non-zero code.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: &'static str, message: String },
}

impl ConfigError {
    fn invalid(key: &'static str, message: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            key,
            message: message.into(),
        }
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Sections
// =============================================================================

/// Input file locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub salesmen_file: PathBuf,
    pub products_file: PathBuf,
    pub sales_dir: PathBuf,
}

impl Default for InputConfig {
    fn default() -> Self {
        let layout = Layout::default();
        InputConfig {
            salesmen_file: layout.salesmen_file,
            products_file: layout.products_file,
            sales_dir: layout.sales_dir,
        }
    }
}

/// Report file locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub salesmen_report: PathBuf,
    pub products_report: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        let layout = Layout::default();
        OutputConfig {
            salesmen_report: layout.salesmen_report,
            products_report: layout.products_report,
        }
    }
}

/// Synthetic dataset sizes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub salesmen: usize,
    pub products: usize,
    pub sales_per_salesman: usize,

    /// Fixed seed for reproducible datasets. Absent means clock-derived.
    pub seed: Option<u64>,

    pub document_type: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        let settings = GeneratorSettings::default();
        GeneratorConfig {
            salesmen: settings.salesmen,
            products: settings.products,
            sales_per_salesman: settings.sales_per_salesman,
            seed: None,
            document_type: settings.document_type,
        }
    }
}

/// Log filter used when `RUST_LOG` is not set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            filter: "info,tally=debug".to_string(),
        }
    }
}

// =============================================================================
// Tally Configuration
// =============================================================================

/// Complete configuration of the `tally` binary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TallyConfig {
    #[serde(default)]
    pub input: InputConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub generator: GeneratorConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl TallyConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file: `config_path` if given (must exist), else the first
    ///    existing default location
    /// 3. Environment variables
    ///
    /// Flags are applied by the caller, which validates afterwards.
    pub fn load(config_path: Option<&Path>) -> ConfigResult<Self> {
        let mut config = match config_path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_config_paths().into_iter().find(|p| p.is_file()) {
                Some(path) => Self::from_file(&path)?,
                None => {
                    debug!("No config file found, using defaults");
                    Self::default()
                }
            },
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Parses one TOML file; missing sections and keys take their defaults.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        debug!(path = %path.display(), "Loading config file");
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Applies `TALLY_*` overrides read through `lookup`.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<()> {
        let paths: [(&str, &mut PathBuf); 5] = [
            ("TALLY_SALESMEN_FILE", &mut self.input.salesmen_file),
            ("TALLY_PRODUCTS_FILE", &mut self.input.products_file),
            ("TALLY_SALES_DIR", &mut self.input.sales_dir),
            ("TALLY_SALESMEN_REPORT", &mut self.output.salesmen_report),
            ("TALLY_PRODUCTS_REPORT", &mut self.output.products_report),
        ];
        for (key, slot) in paths {
            if let Some(value) = lookup(key) {
                debug!(key, value = %value, "Overriding path from environment");
                *slot = PathBuf::from(value);
            }
        }

        if let Some(seed) = lookup("TALLY_SEED") {
            let seed = seed
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::invalid("TALLY_SEED", format!("'{seed}' is not an unsigned integer")))?;
            self.generator.seed = Some(seed);
        }

        if let Some(filter) = lookup("TALLY_LOG") {
            self.logging.filter = filter;
        }

        Ok(())
    }

    /// Validates the file locations shared by every command.
    pub fn validate(&self) -> ConfigResult<()> {
        let paths = [
            ("input.salesmen_file", &self.input.salesmen_file),
            ("input.products_file", &self.input.products_file),
            ("input.sales_dir", &self.input.sales_dir),
            ("output.salesmen_report", &self.output.salesmen_report),
            ("output.products_report", &self.output.products_report),
        ];
        for (key, path) in paths {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::invalid(key, "path must not be empty"));
            }
        }

        Ok(())
    }

    /// Validates the `[generator]` section; only `tally generate` reads it.
    pub fn validate_generator(&self) -> ConfigResult<()> {
        if self.generator.products == 0 {
            return Err(ConfigError::invalid(
                "generator.products",
                "must be greater than 0",
            ));
        }

        let document_type = &self.generator.document_type;
        if document_type.is_empty() || document_type.contains(';') {
            return Err(ConfigError::invalid(
                "generator.document_type",
                "must be non-empty and free of ';'",
            ));
        }

        Ok(())
    }

    /// Default config file candidates, most specific first.
    fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::with_capacity(2);
        if let Some(dirs) = directories::ProjectDirs::from("com", "tally", "tally") {
            paths.push(dirs.config_dir().join(CONFIG_FILE_NAME));
        }
        paths.push(PathBuf::from(CONFIG_FILE_NAME));
        paths
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// File layout for a report run or dataset generation.
    pub fn layout(&self) -> Layout {
        Layout {
            salesmen_file: self.input.salesmen_file.clone(),
            products_file: self.input.products_file.clone(),
            sales_dir: self.input.sales_dir.clone(),
            salesmen_report: self.output.salesmen_report.clone(),
            products_report: self.output.products_report.clone(),
        }
    }

    /// Dataset sizes for the generator.
    pub fn generator_settings(&self) -> GeneratorSettings {
        GeneratorSettings {
            salesmen: self.generator.salesmen,
            products: self.generator.products,
            sales_per_salesman: self.generator.sales_per_salesman,
            document_type: self.generator.document_type.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::tempdir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = TallyConfig::default();
        assert_eq!(config.input.sales_dir, PathBuf::from("files/salesmen"));
        assert_eq!(config.generator.products, 50);
        assert_eq!(config.generator.seed, None);
        assert_eq!(config.logging.filter, "info,tally=debug");
        assert_eq!(config.layout(), Layout::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tally.toml");
        fs::write(&path, "[input]\nsales_dir = \"/data/sales\"\n\n[generator]\nseed = 7\n").unwrap();

        let config = TallyConfig::from_file(&path).unwrap();
        assert_eq!(config.input.sales_dir, PathBuf::from("/data/sales"));
        assert_eq!(config.input.products_file, PathBuf::from("files/info/products.csv"));
        assert_eq!(config.generator.seed, Some(7));
        assert_eq!(config.generator.salesmen, 10);
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = tempdir().unwrap();
        let err = TallyConfig::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tally.toml");
        fs::write(&path, "[generator]\nproducts = \"many\"\n").unwrap();

        let err = TallyConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = TallyConfig::default();
        config
            .apply_overrides(env(&[
                ("TALLY_SALES_DIR", "/tmp/sales"),
                ("TALLY_PRODUCTS_REPORT", "/tmp/out/products.csv"),
                ("TALLY_SEED", " 99 "),
                ("TALLY_LOG", "warn"),
            ]))
            .unwrap();

        assert_eq!(config.input.sales_dir, PathBuf::from("/tmp/sales"));
        assert_eq!(config.output.products_report, PathBuf::from("/tmp/out/products.csv"));
        assert_eq!(config.generator.seed, Some(99));
        assert_eq!(config.logging.filter, "warn");
        assert_eq!(config.input.salesmen_file, PathBuf::from("files/info/salesmen_info.csv"));
    }

    #[test]
    fn test_invalid_seed_override() {
        let mut config = TallyConfig::default();
        let err = config.apply_overrides(env(&[("TALLY_SEED", "abc")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "TALLY_SEED", .. }));
    }

    #[test]
    fn test_config_validation() {
        let mut config = TallyConfig::default();
        config.output.salesmen_report = PathBuf::new();
        assert!(config.validate().is_err());

        let mut config = TallyConfig::default();
        config.generator.document_type = "C;C".into();
        assert!(config.validate_generator().is_err());
    }

    #[test]
    fn test_generator_settings_do_not_affect_path_validation() {
        let mut config = TallyConfig::default();
        config.generator.products = 0;
        assert!(config.validate().is_ok());
        assert!(matches!(
            config.validate_generator(),
            Err(ConfigError::InvalidValue {
                key: "generator.products",
                ..
            })
        ));
    }

    #[test]
    fn test_toml_serialization() {
        let config = TallyConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[input]"));
        assert!(toml_str.contains("[generator]"));
        assert_eq!(toml::from_str::<TallyConfig>(&toml_str).unwrap(), config);
    }
}
