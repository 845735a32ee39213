//! Configuration types for the ETL pipeline.
//!
//! This module provides configuration options using the builder pattern
//! for flexible and ergonomic pipeline setup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default sentinel substituted for missing categorical values.
pub const DEFAULT_MISSING_CATEGORY: &str = "Unknown";

/// Configuration for the ETL pipeline.
///
/// Use [`EtlConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use printshop_etl::config::EtlConfig;
///
/// let config = EtlConfig::builder()
///     .data_dir("data")
///     .seed(7)
///     .sample_rows(250)
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EtlConfig {
    /// Root data directory holding `raw/` and `processed/`.
    /// Default: "data"
    pub data_dir: PathBuf,

    /// Source file to extract from. When None, synthetic data is generated.
    /// Default: None
    pub input_file: Option<PathBuf>,

    /// File name of the processed dataset inside `processed/`.
    /// Default: "processed_jobs.csv"
    pub output_file: String,

    /// Seed for the synthetic job generator.
    /// Default: 42
    pub seed: u64,

    /// Number of rows produced by the synthetic job generator.
    /// Default: 1000
    pub sample_rows: usize,

    /// Fraction of imputable cells the generator leaves empty (0.0 - 1.0).
    /// Default: 0.0
    pub missing_rate: f64,

    /// Sentinel used for missing categorical values.
    /// Default: "Unknown"
    pub missing_category: String,
}

impl Default for EtlConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            input_file: None,
            output_file: "processed_jobs.csv".to_string(),
            seed: 42,
            sample_rows: 1000,
            missing_rate: 0.0,
            missing_category: DEFAULT_MISSING_CATEGORY.to_string(),
        }
    }
}

impl EtlConfig {
    /// Create a new configuration builder.
    pub fn builder() -> EtlConfigBuilder {
        EtlConfigBuilder::default()
    }

    /// Load a configuration from a JSON file and validate it.
    ///
    /// Missing fields take their default values.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigValidationError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigValidationError::Unreadable(format!("{}: {}", path.display(), e))
        })?;
        let config: EtlConfig = serde_json::from_str(&content).map_err(|e| {
            ConfigValidationError::Unreadable(format!("{}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Directory for raw input files.
    pub fn raw_dir(&self) -> PathBuf {
        self.data_dir.join("raw")
    }

    /// Directory for processed output files.
    pub fn processed_dir(&self) -> PathBuf {
        self.data_dir.join("processed")
    }

    /// Full path of the processed dataset.
    pub fn destination(&self) -> PathBuf {
        self.processed_dir().join(&self.output_file)
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let output = Path::new(&self.output_file);
        let is_bare_name = output.file_name().map(|n| n == output.as_os_str()) == Some(true);
        let is_csv = output.extension().is_some_and(|ext| ext == "csv");
        if self.output_file.trim().is_empty() || !is_bare_name || !is_csv {
            return Err(ConfigValidationError::InvalidOutputFile(
                self.output_file.clone(),
            ));
        }

        if self.sample_rows == 0 {
            return Err(ConfigValidationError::InvalidSampleRows(self.sample_rows));
        }

        if !(0.0..=1.0).contains(&self.missing_rate) {
            return Err(ConfigValidationError::InvalidMissingRate(self.missing_rate));
        }

        if self.missing_category.trim().is_empty() {
            return Err(ConfigValidationError::EmptyMissingCategory);
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid output file '{0}' (must be a bare file name ending in .csv)")]
    InvalidOutputFile(String),

    #[error("Invalid sample rows: {0} (must be at least 1)")]
    InvalidSampleRows(usize),

    #[error("Invalid missing rate: {0} (must be between 0.0 and 1.0)")]
    InvalidMissingRate(f64),

    #[error("Missing category sentinel must not be empty")]
    EmptyMissingCategory,

    #[error("Could not read configuration: {0}")]
    Unreadable(String),
}

/// Builder for [`EtlConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct EtlConfigBuilder {
    data_dir: Option<PathBuf>,
    input_file: Option<PathBuf>,
    output_file: Option<String>,
    seed: Option<u64>,
    sample_rows: Option<usize>,
    missing_rate: Option<f64>,
    missing_category: Option<String>,
}

impl EtlConfigBuilder {
    /// Start from an existing configuration instead of the defaults.
    pub fn from_config(config: EtlConfig) -> Self {
        Self {
            data_dir: Some(config.data_dir),
            input_file: config.input_file,
            output_file: Some(config.output_file),
            seed: Some(config.seed),
            sample_rows: Some(config.sample_rows),
            missing_rate: Some(config.missing_rate),
            missing_category: Some(config.missing_category),
        }
    }

    /// Set the root data directory.
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(path.into());
        self
    }

    /// Set the source file to extract from.
    pub fn input_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.input_file = Some(path.into());
        self
    }

    /// Set the output file name (inside `processed/`).
    pub fn output_file(mut self, name: impl Into<String>) -> Self {
        self.output_file = Some(name.into());
        self
    }

    /// Set the synthetic generator seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the number of synthetic rows.
    pub fn sample_rows(mut self, rows: usize) -> Self {
        self.sample_rows = Some(rows);
        self
    }

    /// Set the fraction of cells the generator leaves empty.
    ///
    /// # Arguments
    /// * `rate` - Value between 0.0 and 1.0 (e.g., 0.05 = 5%)
    pub fn missing_rate(mut self, rate: f64) -> Self {
        self.missing_rate = Some(rate);
        self
    }

    /// Set the sentinel for missing categorical values.
    pub fn missing_category(mut self, sentinel: impl Into<String>) -> Self {
        self.missing_category = Some(sentinel.into());
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `EtlConfig` or an error if validation fails.
    pub fn build(self) -> Result<EtlConfig, ConfigValidationError> {
        let defaults = EtlConfig::default();
        let config = EtlConfig {
            data_dir: self.data_dir.unwrap_or(defaults.data_dir),
            input_file: self.input_file,
            output_file: self.output_file.unwrap_or(defaults.output_file),
            seed: self.seed.unwrap_or(defaults.seed),
            sample_rows: self.sample_rows.unwrap_or(defaults.sample_rows),
            missing_rate: self.missing_rate.unwrap_or(defaults.missing_rate),
            missing_category: self.missing_category.unwrap_or(defaults.missing_category),
        };

        config.validate()?;
        Ok(config)
    }
}
