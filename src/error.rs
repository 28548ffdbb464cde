//! Error types for profile loading and estimation.

use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime};

use crate::units::{Energy, Unit};

/// Why a billing period was rejected before any folding happens.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// The first reading is not strictly before the second one.
    #[error("reading dates out of order: {start} must be before {end}")]
    DatesOutOfOrder { start: NaiveDate, end: NaiveDate },
    /// Meter indexes must strictly increase between readings.
    #[error("meter index must increase: {start} must be below {end}")]
    IndexNotIncreasing { start: f64, end: f64 },
    /// NaN or infinite index value.
    #[error("meter index must be a finite number")]
    NonFiniteIndex,
    /// Both indexes are finite but their difference overflows.
    #[error("meter index difference is not a finite number")]
    NonFiniteDelta,
    #[error("billing period spans {days} days, at most {max_days} are accepted")]
    PeriodTooLong { days: i64, max_days: i64 },
    #[error("{unit} readings are not supported for {energy}")]
    UnitNotSupported { energy: Energy, unit: Unit },
}

/// Errors surfaced by an estimation request.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EstimateError {
    #[error("invalid billing period: {0}")]
    Validation(#[from] ValidationError),
    /// The profile carries no weight over the billing period, so the annual
    /// estimate would be a division by zero.
    #[error("profile \"{profile}\" has no weight over the billing period")]
    ZeroCoverage { profile: String },
    /// Covered weight is positive but so small that the annual estimate
    /// overflows.
    #[error("annual estimate for profile \"{profile}\" is not a finite number")]
    NonFiniteEstimate { profile: String },
    #[error("conversion factor must be > 0, got {0}")]
    InvalidConversionFactor(f64),
    #[error("reference year {0} is not a valid calendar year")]
    InvalidReferenceYear(i32),
    /// Coverage and profile were built for different reference years.
    #[error("coverage for {coverage} cannot be matched against a {profile} profile")]
    ReferenceYearMismatch { coverage: i32, profile: i32 },
}

/// Fatal errors while loading the reference profile tables.
#[derive(Debug, thiserror::Error)]
pub enum ProfileLoadError {
    #[error("cannot read \"{path}\": {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed CSV at line {line}: {source}")]
    Csv {
        line: u64,
        #[source]
        source: csv::Error,
    },
    #[error("line {line}: invalid date \"{value}\"")]
    InvalidDate { line: u64, value: String },
    #[error("line {line}: weight must be finite and >= 0, got {weight}")]
    InvalidWeight { line: u64, weight: f64 },
    #[error("line {line}: duplicate timestamp {timestamp}")]
    DuplicateTimestamp {
        line: u64,
        timestamp: NaiveDateTime,
    },
    #[error("line {line}: {date} lies outside reference year {reference_year}")]
    OutsideReferenceYear {
        line: u64,
        date: NaiveDate,
        reference_year: i32,
    },
    #[error("profile \"{key}\" uses reference year {found}, expected {expected}")]
    ReferenceYearMismatch {
        key: String,
        found: i32,
        expected: i32,
    },
    #[error("reference year {0} is not a valid calendar year")]
    InvalidReferenceYear(i32),
    #[error("profile table \"{0}\" contains no rows")]
    Empty(String),
    #[error("default operator \"{0}\" is missing from the electricity table")]
    MissingDefaultOperator(String),
}
