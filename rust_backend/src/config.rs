//! Analysis configuration file support.
//!
//! Reads `elongation.toml`. Every section and field is optional; missing
//! values fall back to the defaults of the research setup (20 epochs of four
//! Metonic cycles from 1971-01-01, sampled every 400 minutes).
//!
//! ```toml
//! [astronomy]
//! synodic_month_days = 29.530588
//!
//! [batch]
//! initial_time = "1971-01-01T00:00:00Z"
//! epoch_count = 20
//! metonic_multiplier = 4
//!
//! [storage]
//! type = "file"
//! data_dir = "data"
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::services::SamplerConfig;
use crate::store::StoreType;

/// Years of sampling per Metonic cycle when no duration is configured.
pub const YEARS_PER_METONIC_CYCLE: f64 = 19.01;

/// Error type for configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub astronomy: AstronomySettings,
    #[serde(default)]
    pub sampling: SamplingSettings,
    #[serde(default)]
    pub batch: BatchSettings,
    #[serde(default)]
    pub storage: StorageSettings,
}

/// Calendar constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AstronomySettings {
    #[serde(default = "default_synodic_month_days")]
    pub synodic_month_days: f64,
    #[serde(default = "default_days_per_year")]
    pub days_per_year: f64,
    #[serde(default = "default_metonic_cycle_months")]
    pub metonic_cycle_months: u32,
}

/// Sampling window settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplingSettings {
    /// Span of each epoch in years. Defaults to 19.01 years per Metonic cycle
    /// of the batch multiplier.
    #[serde(default)]
    pub duration_years: Option<f64>,
    #[serde(default = "default_resolution_minutes")]
    pub resolution_minutes: u32,
}

/// Batch of Metonic-aligned epochs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSettings {
    #[serde(default = "default_initial_time")]
    pub initial_time: DateTime<Utc>,
    #[serde(default = "default_epoch_count")]
    pub epoch_count: u32,
    #[serde(default = "default_metonic_multiplier")]
    pub metonic_multiplier: u32,
}

/// Distribution store settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageSettings {
    #[serde(rename = "type", default = "default_store_type")]
    pub store_type: String,
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_create_data_dir")]
    pub create_data_dir: bool,
}

fn default_synodic_month_days() -> f64 {
    crate::services::SYNODIC_MONTH_DAYS
}

fn default_days_per_year() -> f64 {
    crate::services::DAYS_PER_YEAR
}

fn default_metonic_cycle_months() -> u32 {
    235
}

fn default_resolution_minutes() -> u32 {
    400
}

fn default_initial_time() -> DateTime<Utc> {
    // 1971-01-01T00:00:00Z
    DateTime::<Utc>::UNIX_EPOCH + Duration::days(365)
}

fn default_epoch_count() -> u32 {
    20
}

fn default_metonic_multiplier() -> u32 {
    4
}

fn default_store_type() -> String {
    "file".to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_create_data_dir() -> bool {
    true
}

impl Default for AstronomySettings {
    fn default() -> Self {
        Self {
            synodic_month_days: default_synodic_month_days(),
            days_per_year: default_days_per_year(),
            metonic_cycle_months: default_metonic_cycle_months(),
        }
    }
}

impl Default for SamplingSettings {
    fn default() -> Self {
        Self {
            duration_years: None,
            resolution_minutes: default_resolution_minutes(),
        }
    }
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            initial_time: default_initial_time(),
            epoch_count: default_epoch_count(),
            metonic_multiplier: default_metonic_multiplier(),
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            store_type: default_store_type(),
            data_dir: default_data_dir(),
            create_data_dir: default_create_data_dir(),
        }
    }
}

impl AnalysisConfig {
    /// Load and validate configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(AnalysisConfig)` if the file was read, parsed and is valid
    /// * `Err(ConfigError)` otherwise
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: AnalysisConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the default location.
    ///
    /// Searches for `elongation.toml` in:
    /// 1. Current directory
    /// 2. `rust_backend/` directory
    /// 3. Parent directory
    ///
    /// # Returns
    /// * `Ok(Some(config))` if a file was found and is valid
    /// * `Ok(None)` if no file exists in any standard location
    pub fn from_default_location() -> Result<Option<Self>, ConfigError> {
        let search_paths = [
            PathBuf::from("elongation.toml"),
            PathBuf::from("rust_backend/elongation.toml"),
            PathBuf::from("../elongation.toml"),
        ];

        for path in search_paths {
            if path.is_file() {
                log::info!("Loading configuration from {}", path.display());
                return Self::from_file(&path).map(Some);
            }
        }

        Ok(None)
    }

    /// Check value ranges and the store type.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| -> Result<(), ConfigError> {
            Err(ConfigError::ValidationError(msg))
        };

        let astronomy = &self.astronomy;
        if !(astronomy.synodic_month_days.is_finite() && astronomy.synodic_month_days > 0.0) {
            return invalid(format!(
                "astronomy.synodic_month_days must be positive, got {}",
                astronomy.synodic_month_days
            ));
        }
        if !(astronomy.days_per_year.is_finite() && astronomy.days_per_year > 0.0) {
            return invalid(format!(
                "astronomy.days_per_year must be positive, got {}",
                astronomy.days_per_year
            ));
        }
        if astronomy.metonic_cycle_months == 0 {
            return invalid("astronomy.metonic_cycle_months must be positive".to_string());
        }

        if let Some(years) = self.sampling.duration_years {
            if !(years.is_finite() && years > 0.0) {
                return invalid(format!(
                    "sampling.duration_years must be positive, got {}",
                    years
                ));
            }
        }
        if self.sampling.resolution_minutes == 0 {
            return invalid("sampling.resolution_minutes must be positive".to_string());
        }

        if self.batch.metonic_multiplier == 0 {
            return invalid("batch.metonic_multiplier must be positive".to_string());
        }

        StoreType::from_str(&self.storage.store_type).map_err(ConfigError::ValidationError)?;

        Ok(())
    }

    /// Sampling span in years, falling back to 19.01 years per Metonic cycle.
    pub fn duration_years(&self) -> f64 {
        self.sampling.duration_years.unwrap_or(
            YEARS_PER_METONIC_CYCLE * f64::from(self.batch.metonic_multiplier),
        )
    }

    /// Calendar constants for the sampler.
    pub fn sampler_config(&self) -> SamplerConfig {
        SamplerConfig {
            synodic_month_days: self.astronomy.synodic_month_days,
            days_per_year: self.astronomy.days_per_year,
        }
    }
}
