//! CSV loaders for the published RLP tables.
//!
//! Electricity: `GRD,date,value`, one row per reference day (or finer) per
//! distribution grid operator. Gas: `date,value`, a single profile.
//! Dates may be plain `YYYY-MM-DD` or carry a time of day.

use std::collections::{BTreeMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::Deserialize;

use super::{GAS_PROFILE_KEY, ProfilePoint, ProfileStore, ReferenceProfile};
use crate::config::Settings;
use crate::error::ProfileLoadError;

#[derive(Debug, Deserialize)]
struct ElectricityRow {
    #[serde(alias = "GRD", alias = "grd", alias = "profile_key")]
    operator: String,
    date: String,
    value: f64,
}

#[derive(Debug, Deserialize)]
struct GasRow {
    date: String,
    value: f64,
}

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Parses a table timestamp; a bare date means midnight.
fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
}

fn checked_point(
    line: u64,
    date: &str,
    weight: f64,
    reference_year: i32,
) -> Result<ProfilePoint, ProfileLoadError> {
    let timestamp = parse_timestamp(date).ok_or_else(|| ProfileLoadError::InvalidDate {
        line,
        value: date.to_string(),
    })?;
    if !weight.is_finite() || weight < 0.0 {
        return Err(ProfileLoadError::InvalidWeight { line, weight });
    }
    if timestamp.date().year() != reference_year {
        return Err(ProfileLoadError::OutsideReferenceYear {
            line,
            date: timestamp.date(),
            reference_year,
        });
    }
    Ok(ProfilePoint::new(timestamp, weight))
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
}

fn csv_error(e: csv::Error) -> ProfileLoadError {
    let line = e.position().map_or(0, csv::Position::line);
    ProfileLoadError::Csv { line, source: e }
}

/// Reads the electricity table, one profile per operator key.
///
/// # Errors
///
/// Returns a [`ProfileLoadError`] on malformed rows or if the table is empty.
pub fn read_electricity<R: Read>(
    reader: R,
    reference_year: i32,
) -> Result<Vec<ReferenceProfile>, ProfileLoadError> {
    let mut rdr = csv_reader(reader);
    let headers = rdr.headers().map_err(csv_error)?.clone();
    let mut by_operator: BTreeMap<String, Vec<ProfilePoint>> = BTreeMap::new();
    let mut seen = HashSet::new();

    for record in rdr.records() {
        let record = record.map_err(csv_error)?;
        let line = record.position().map_or(0, csv::Position::line);
        let row: ElectricityRow = record.deserialize(Some(&headers)).map_err(csv_error)?;
        let point = checked_point(line, &row.date, row.value, reference_year)?;
        if !seen.insert((row.operator.clone(), point.timestamp)) {
            return Err(ProfileLoadError::DuplicateTimestamp {
                line,
                timestamp: point.timestamp,
            });
        }
        by_operator.entry(row.operator).or_default().push(point);
    }

    if by_operator.is_empty() {
        return Err(ProfileLoadError::Empty("electricity".to_string()));
    }

    by_operator
        .into_iter()
        .map(|(op, points)| ReferenceProfile::new(op, reference_year, points))
        .collect()
}

/// Reads the single-profile gas table.
///
/// # Errors
///
/// Returns a [`ProfileLoadError`] on malformed rows or if the table is empty.
pub fn read_gas<R: Read>(
    reader: R,
    reference_year: i32,
) -> Result<ReferenceProfile, ProfileLoadError> {
    let mut rdr = csv_reader(reader);
    let headers = rdr.headers().map_err(csv_error)?.clone();
    let mut points = Vec::new();
    let mut seen = HashSet::new();

    for record in rdr.records() {
        let record = record.map_err(csv_error)?;
        let line = record.position().map_or(0, csv::Position::line);
        let row: GasRow = record.deserialize(Some(&headers)).map_err(csv_error)?;
        let point = checked_point(line, &row.date, row.value, reference_year)?;
        if !seen.insert(point.timestamp) {
            return Err(ProfileLoadError::DuplicateTimestamp {
                line,
                timestamp: point.timestamp,
            });
        }
        points.push(point);
    }

    ReferenceProfile::new(GAS_PROFILE_KEY, reference_year, points)
}

fn open(path: &Path) -> Result<File, ProfileLoadError> {
    File::open(path).map_err(|source| ProfileLoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn log_profile(p: &ReferenceProfile) {
    let missing = p.missing_days();
    if missing > 0 {
        tracing::warn!(
            profile = p.key(),
            missing_days = missing,
            "profile does not cover every reference day"
        );
    }
    tracing::debug!(
        profile = p.key(),
        points = p.points().len(),
        weight_sum = p.total_weight(),
        "profile loaded"
    );
}

impl ProfileStore {
    /// Loads both tables named in `settings`.
    ///
    /// # Errors
    ///
    /// Any [`ProfileLoadError`]; the process cannot serve estimates without
    /// its reference data, so callers should treat this as fatal.
    pub fn load(settings: &Settings) -> Result<Self, ProfileLoadError> {
        let year = settings.estimation.reference_year;

        let elec_path = &settings.data.electricity_csv;
        let electricity = read_electricity(open(elec_path)?, year)?;
        electricity.iter().for_each(log_profile);
        tracing::info!(
            path = %elec_path.display(),
            operators = electricity.len(),
            "electricity profiles loaded"
        );

        let gas_path = &settings.data.gas_csv;
        let gas = read_gas(open(gas_path)?, year)?;
        log_profile(&gas);
        tracing::info!(
            path = %gas_path.display(),
            points = gas.points().len(),
            "gas profile loaded"
        );

        Self::new(
            year,
            electricity,
            gas,
            settings.estimation.default_operator.clone(),
        )
    }
}
