//! TOML-based settings: profile table locations and estimation parameters.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::fold::LeapDayPolicy;
use crate::profile::{DEFAULT_OPERATOR, DEFAULT_REFERENCE_YEAR};
use crate::units::{DEFAULT_KWH_PER_M3, UnitConverter};

/// Top-level settings parsed from TOML.
///
/// All fields have defaults. Load from TOML with
/// [`Settings::from_toml_file`] or use [`Settings::default`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Where the RLP tables live.
    #[serde(default)]
    pub data: DataConfig,
    /// Folding and conversion parameters.
    #[serde(default)]
    pub estimation: EstimationConfig,
    /// HTTP server parameters (`api` feature).
    #[serde(default)]
    pub server: ServerConfig,
}

/// Locations of the profile tables.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DataConfig {
    /// Electricity table (`GRD,date,value`).
    pub electricity_csv: PathBuf,
    /// Gas table (`date,value`).
    pub gas_csv: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            electricity_csv: PathBuf::from("data/elec.csv"),
            gas_csv: PathBuf::from("data/gaz.csv"),
        }
    }
}

/// Estimation parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EstimationConfig {
    /// Year the profile tables are expressed in.
    pub reference_year: i32,
    /// Gas calorific conversion (kWh per m3, must be > 0).
    pub kwh_per_m3: f64,
    /// Electricity operator used when none or an unknown one is given.
    pub default_operator: String,
    /// Handling of 29 February when the reference year is not a leap year.
    pub leap_day: LeapDayPolicy,
}

impl Default for EstimationConfig {
    fn default() -> Self {
        Self {
            reference_year: DEFAULT_REFERENCE_YEAR,
            kwh_per_m3: DEFAULT_KWH_PER_M3,
            default_operator: DEFAULT_OPERATOR.to_string(),
            leap_day: LeapDayPolicy::default(),
        }
    }
}

impl EstimationConfig {
    /// Converter for the configured factor.
    ///
    /// # Errors
    ///
    /// Fails if `kwh_per_m3` is not a positive number.
    pub fn converter(&self) -> Result<UnitConverter, crate::error::EstimateError> {
        UnitConverter::new(self.kwh_per_m3)
    }
}

/// HTTP server parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 3000 }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"estimation.kwh_per_m3"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {}: {}", self.field, self.message)
    }
}

impl Settings {
    /// Parses settings from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "config".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses settings from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if the settings are valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let d = &self.data;
        if d.electricity_csv.as_os_str().is_empty() {
            errors.push(ConfigError {
                field: "data.electricity_csv".into(),
                message: "must not be empty".into(),
            });
        }
        if d.gas_csv.as_os_str().is_empty() {
            errors.push(ConfigError {
                field: "data.gas_csv".into(),
                message: "must not be empty".into(),
            });
        }

        let e = &self.estimation;
        if !(1900..=2200).contains(&e.reference_year) {
            errors.push(ConfigError {
                field: "estimation.reference_year".into(),
                message: format!("must be in [1900, 2200], got {}", e.reference_year),
            });
        }
        if !e.kwh_per_m3.is_finite() || e.kwh_per_m3 <= 0.0 {
            errors.push(ConfigError {
                field: "estimation.kwh_per_m3".into(),
                message: "must be > 0".into(),
            });
        }
        if e.default_operator.trim().is_empty() {
            errors.push(ConfigError {
                field: "estimation.default_operator".into(),
                message: "must not be empty".into(),
            });
        }

        errors
    }
}
