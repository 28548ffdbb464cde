//! CSV export of the monthly breakdown and the per-day coverage series.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::fold::CoverageSeries;
use crate::profile::ReferenceProfile;
use crate::report::EstimationReport;

/// Column header for the monthly export.
const MONTHLY_HEADER: &str = "month,kwh,typical_kwh";

/// Column header for the coverage export.
const COVERAGE_HEADER: &str = "date,weight,count";

/// Exports the monthly breakdown to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_monthly_csv(report: &EstimationReport, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_monthly_csv(report, io::BufWriter::new(file))
}

/// Writes one row per reference month: coverage-weighted and typical kWh.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_monthly_csv(report: &EstimationReport, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(MONTHLY_HEADER.split(','))?;

    for m in &report.result.monthly {
        wtr.write_record(&[
            m.month.to_string(),
            format!("{:.4}", m.kwh),
            format!("{:.4}", m.typical_kwh),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Exports the coverage series next to the profile curve to a CSV file.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_coverage_csv(
    coverage: &CoverageSeries,
    profile: &ReferenceProfile,
    path: &Path,
) -> io::Result<()> {
    let file = File::create(path)?;
    write_coverage_csv(coverage, profile, io::BufWriter::new(file))
}

/// Writes one row per reference day: date, profile weight, coverage count.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_coverage_csv(
    coverage: &CoverageSeries,
    profile: &ReferenceProfile,
    writer: impl Write,
) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(COVERAGE_HEADER.split(','))?;

    for (date, count) in coverage.iter() {
        wtr.write_record(&[
            date.format("%Y-%m-%d").to_string(),
            format!("{:.8}", profile.weight_on(date)),
            count.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
