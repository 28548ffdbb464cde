//! Energy carriers, metering units, and the gas volume conversion.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EstimateError;

/// Calorific conversion used for Belgian gas meters (kWh per m3).
pub const DEFAULT_KWH_PER_M3: f64 = 10.1888;

/// Energy carrier being estimated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Energy {
    Electricity,
    Gas,
}

impl Energy {
    /// Units a meter for this carrier may be read in.
    pub fn supports(self, unit: Unit) -> bool {
        match self {
            Energy::Electricity => unit == Unit::Kwh,
            Energy::Gas => true,
        }
    }
}

impl fmt::Display for Energy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Energy::Electricity => write!(f, "electricity"),
            Energy::Gas => write!(f, "gas"),
        }
    }
}

impl FromStr for Energy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "electricity" | "elec" => Ok(Energy::Electricity),
            "gas" | "gaz" => Ok(Energy::Gas),
            other => Err(format!(
                "unknown energy \"{other}\", expected \"electricity\" or \"gas\""
            )),
        }
    }
}

/// Unit a meter index is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    Kwh,
    M3,
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unit::Kwh => write!(f, "kWh"),
            Unit::M3 => write!(f, "m3"),
        }
    }
}

impl FromStr for Unit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "kwh" => Ok(Unit::Kwh),
            "m3" => Ok(Unit::M3),
            other => Err(format!("unknown unit \"{other}\", expected \"kwh\" or \"m3\"")),
        }
    }
}

/// Stateless kWh <-> m3 converter with a fixed calorific factor.
///
/// # Examples
///
/// ```
/// use rlp_estimate::units::{Unit, UnitConverter};
///
/// let conv = UnitConverter::new(10.1888).unwrap();
/// assert!((conv.to_kwh(100.0, Unit::M3) - 1018.88).abs() < 1e-9);
/// assert_eq!(conv.to_kwh(42.0, Unit::Kwh), 42.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitConverter {
    kwh_per_m3: f64,
}

impl UnitConverter {
    /// Creates a converter.
    ///
    /// # Errors
    ///
    /// Returns [`EstimateError::InvalidConversionFactor`] if the factor is not
    /// a finite positive number.
    pub fn new(kwh_per_m3: f64) -> Result<Self, EstimateError> {
        if !kwh_per_m3.is_finite() || kwh_per_m3 <= 0.0 {
            return Err(EstimateError::InvalidConversionFactor(kwh_per_m3));
        }
        Ok(Self { kwh_per_m3 })
    }

    pub fn kwh_per_m3(&self) -> f64 {
        self.kwh_per_m3
    }

    /// Normalizes a quantity expressed in `unit` to kWh.
    pub fn to_kwh(&self, value: f64, unit: Unit) -> f64 {
        match unit {
            Unit::Kwh => value,
            Unit::M3 => value * self.kwh_per_m3,
        }
    }

    pub fn to_m3(&self, kwh: f64) -> f64 {
        kwh / self.kwh_per_m3
    }
}

impl Default for UnitConverter {
    fn default() -> Self {
        Self {
            kwh_per_m3: DEFAULT_KWH_PER_M3,
        }
    }
}
