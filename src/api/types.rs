//! API response and query types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::units::Energy;

/// Profile catalogue.
#[derive(Debug, Serialize)]
pub struct ProfilesResponse {
    pub reference_year: i32,
    pub default_operator: String,
    /// Electricity operator keys, sorted.
    pub operators: Vec<String>,
}

/// Query for the weight curve endpoint.
#[derive(Debug, Deserialize)]
pub struct CurveQuery {
    pub energy: Energy,
    /// Ignored for gas; falls back to the default operator when absent or unknown.
    pub operator: Option<String>,
}

/// One day of a profile curve.
#[derive(Debug, Serialize)]
pub struct CurvePoint {
    pub date: NaiveDate,
    pub weight: f64,
}

/// Daily weight curve of the resolved profile.
#[derive(Debug, Serialize)]
pub struct CurveResponse {
    pub profile: String,
    pub points: Vec<CurvePoint>,
}

/// Error response body for 4xx/5xx errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Machine-readable category: `validation`, `zero_coverage`, or `internal`.
    pub kind: &'static str,
    /// Human-readable error message.
    pub error: String,
}
