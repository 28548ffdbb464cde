//! Reference-year load profiles (RLP) and the process-wide profile store.
//!
//! A [`ReferenceProfile`] is one year of relative consumption weights for a
//! single profile key. The [`ProfileStore`] holds every electricity profile
//! (one per distribution grid operator) plus the single gas profile. It is
//! built once at startup and only ever read afterwards, so it can be shared
//! behind an `Arc` without locking.

pub mod loader;

use std::collections::{BTreeMap, HashSet};

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::error::ProfileLoadError;
use crate::units::Energy;

/// Key under which the gas profile is stored and reported.
pub const GAS_PROFILE_KEY: &str = "gas";

/// Operator used when the caller does not know theirs.
pub const DEFAULT_OPERATOR: &str = "ORES (Namur)";

/// Canonical reference year of the published RLP tables.
pub const DEFAULT_REFERENCE_YEAR: i32 = 2022;

/// Number of days in `year`, or `None` for years chrono cannot represent.
pub fn days_in_year(year: i32) -> Option<usize> {
    NaiveDate::from_ymd_opt(year, 12, 31).map(|d| d.ordinal() as usize)
}

pub fn is_leap_year(year: i32) -> bool {
    NaiveDate::from_ymd_opt(year, 2, 29).is_some()
}

/// One weighted instant of the reference year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProfilePoint {
    pub timestamp: NaiveDateTime,
    pub weight: f64,
}

impl ProfilePoint {
    pub fn new(timestamp: NaiveDateTime, weight: f64) -> Self {
        Self { timestamp, weight }
    }

    /// Daily point at midnight.
    pub fn daily(date: NaiveDate, weight: f64) -> Self {
        Self {
            timestamp: date.and_time(chrono::NaiveTime::MIN),
            weight,
        }
    }
}

/// Weight curve of one profile key over the reference year.
///
/// Points are kept sorted by timestamp and no two share one. Days without any
/// point carry an implicit zero weight; sub-daily points are summed into
/// their day.
#[derive(Debug, Clone)]
pub struct ReferenceProfile {
    key: String,
    reference_year: i32,
    points: Vec<ProfilePoint>,
    /// Summed weight per day, indexed by zero-based ordinal.
    daily: Vec<f64>,
}

impl ReferenceProfile {
    /// Builds a profile from unsorted points.
    ///
    /// `line` in the returned errors is the 1-based position of the offending
    /// point in `points`.
    ///
    /// # Errors
    ///
    /// Fails if the reference year is unrepresentable, if a weight is negative
    /// or not finite, if a point falls outside the reference year, or if two
    /// points share a timestamp.
    pub fn new(
        key: impl Into<String>,
        reference_year: i32,
        mut points: Vec<ProfilePoint>,
    ) -> Result<Self, ProfileLoadError> {
        let key = key.into();
        let len = days_in_year(reference_year)
            .ok_or(ProfileLoadError::InvalidReferenceYear(reference_year))?;
        if points.is_empty() {
            return Err(ProfileLoadError::Empty(key));
        }

        let mut daily = vec![0.0; len];
        let mut seen = HashSet::with_capacity(points.len());
        for (i, p) in points.iter().enumerate() {
            let line = i as u64 + 1;
            if !p.weight.is_finite() || p.weight < 0.0 {
                return Err(ProfileLoadError::InvalidWeight {
                    line,
                    weight: p.weight,
                });
            }
            let date = p.timestamp.date();
            if date.year() != reference_year {
                return Err(ProfileLoadError::OutsideReferenceYear {
                    line,
                    date,
                    reference_year,
                });
            }
            if !seen.insert(p.timestamp) {
                return Err(ProfileLoadError::DuplicateTimestamp {
                    line,
                    timestamp: p.timestamp,
                });
            }
            daily[date.ordinal0() as usize] += p.weight;
        }
        points.sort_by_key(|p| p.timestamp);

        Ok(Self {
            key,
            reference_year,
            points,
            daily,
        })
    }

    /// Convenience constructor from one weight per calendar day, starting on
    /// 1 January of `reference_year`.
    ///
    /// # Errors
    ///
    /// Same as [`ReferenceProfile::new`]; also fails if there are more
    /// weights than days in the year.
    pub fn from_daily_weights(
        key: impl Into<String>,
        reference_year: i32,
        weights: &[f64],
    ) -> Result<Self, ProfileLoadError> {
        let first = NaiveDate::from_ymd_opt(reference_year, 1, 1)
            .ok_or(ProfileLoadError::InvalidReferenceYear(reference_year))?;
        // points past 31 December are rejected by `new`
        let points = first
            .iter_days()
            .zip(weights)
            .map(|(d, &w)| ProfilePoint::daily(d, w))
            .collect();
        Self::new(key, reference_year, points)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn reference_year(&self) -> i32 {
        self.reference_year
    }

    pub fn points(&self) -> &[ProfilePoint] {
        &self.points
    }

    /// Per-day weights, one entry per day of the reference year.
    pub fn daily_weights(&self) -> &[f64] {
        &self.daily
    }

    /// Summed weight of `date` (zero outside the reference year).
    pub fn weight_on(&self, date: NaiveDate) -> f64 {
        if date.year() != self.reference_year {
            return 0.0;
        }
        self.daily
            .get(date.ordinal0() as usize)
            .copied()
            .unwrap_or(0.0)
    }

    /// Sum of all weights; 1.0 for a normalized RLP table.
    pub fn total_weight(&self) -> f64 {
        self.daily.iter().sum()
    }

    /// Days of the reference year with no point at all.
    pub fn missing_days(&self) -> usize {
        let mut seen = vec![false; self.daily.len()];
        for p in &self.points {
            seen[p.timestamp.date().ordinal0() as usize] = true;
        }
        seen.iter().filter(|s| !**s).count()
    }
}

/// Every profile known to the process, keyed by operator.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    reference_year: i32,
    electricity: BTreeMap<String, ReferenceProfile>,
    gas: ReferenceProfile,
    default_operator: String,
}

impl ProfileStore {
    /// Assembles a store from already built profiles.
    ///
    /// # Errors
    ///
    /// Fails if a profile uses another reference year than `reference_year`,
    /// if there is no electricity profile, or if `default_operator` is not
    /// one of them.
    pub fn new(
        reference_year: i32,
        electricity: Vec<ReferenceProfile>,
        gas: ReferenceProfile,
        default_operator: impl Into<String>,
    ) -> Result<Self, ProfileLoadError> {
        let default_operator = default_operator.into();
        for p in electricity.iter().chain(std::iter::once(&gas)) {
            if p.reference_year() != reference_year {
                return Err(ProfileLoadError::ReferenceYearMismatch {
                    key: p.key().to_string(),
                    found: p.reference_year(),
                    expected: reference_year,
                });
            }
        }
        if electricity.is_empty() {
            return Err(ProfileLoadError::Empty("electricity".to_string()));
        }

        let electricity: BTreeMap<String, ReferenceProfile> = electricity
            .into_iter()
            .map(|p| (p.key().to_string(), p))
            .collect();
        if !electricity.contains_key(&default_operator) {
            return Err(ProfileLoadError::MissingDefaultOperator(default_operator));
        }

        Ok(Self {
            reference_year,
            electricity,
            gas,
            default_operator,
        })
    }

    pub fn reference_year(&self) -> i32 {
        self.reference_year
    }

    pub fn default_operator(&self) -> &str {
        &self.default_operator
    }

    /// Known electricity operator keys, sorted.
    pub fn operators(&self) -> impl Iterator<Item = &str> {
        self.electricity.keys().map(String::as_str)
    }

    pub fn gas(&self) -> &ReferenceProfile {
        &self.gas
    }

    /// Exact electricity profile lookup, without fallback.
    pub fn electricity(&self, operator: &str) -> Option<&ReferenceProfile> {
        self.electricity.get(operator)
    }

    /// Picks the profile for a request.
    ///
    /// Gas always resolves to the single gas profile. For electricity, a
    /// missing or unknown operator falls back to the default operator; the
    /// returned profile's [`key`](ReferenceProfile::key) tells which one was
    /// used.
    pub fn resolve(&self, energy: Energy, operator: Option<&str>) -> &ReferenceProfile {
        match energy {
            Energy::Gas => &self.gas,
            Energy::Electricity => {
                if let Some(profile) = operator.and_then(|op| self.electricity.get(op)) {
                    return profile;
                }
                if let Some(op) = operator {
                    tracing::warn!(
                        operator = op,
                        fallback = %self.default_operator,
                        "unknown grid operator, using default profile"
                    );
                }
                // presence checked in `new`
                &self.electricity[&self.default_operator]
            }
        }
    }
}
