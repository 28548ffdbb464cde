//! Estimation report handed to the presentation layer.

use std::fmt;

use serde::Serialize;

use crate::estimate::EstimationResult;
use crate::fold::{CoverageSegment, CoverageSeries};
use crate::units::Energy;

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Everything a caller needs to display or chart one estimate.
#[derive(Debug, Clone, Serialize)]
pub struct EstimationReport {
    pub energy: Energy,
    /// Profile key actually used, after any operator fallback.
    pub profile: String,
    /// Days elapsed between the two readings.
    pub days: i64,
    /// Metered delta normalized to kWh.
    pub delta_kwh: f64,
    /// Metered delta in m3, gas only.
    pub delta_m3: Option<f64>,
    pub result: EstimationResult,
    /// Chart overlay: reference-year runs tagged with their coverage count.
    pub segments: Vec<CoverageSegment>,
    pub coverage: CoverageSeries,
}

impl fmt::Display for EstimationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Consumption Estimate ---")?;
        writeln!(f, "Energy:                {}", self.energy)?;
        writeln!(f, "Profile:               {}", self.profile)?;
        match self.delta_m3 {
            Some(m3) => writeln!(
                f,
                "Metered:               {} days, {:.2} kWh, {:.2} m3",
                self.days, self.delta_kwh, m3
            )?,
            None => writeln!(
                f,
                "Metered:               {} days, {:.2} kWh",
                self.days, self.delta_kwh
            )?,
        }
        writeln!(
            f,
            "Covered share:         {:.2}%",
            self.result.covered_percent()
        )?;
        match self.result.annual_m3 {
            Some(m3) => writeln!(
                f,
                "Annual estimate:       {:.2} kWh = {:.2} m3",
                self.result.annual_kwh, m3
            )?,
            None => writeln!(f, "Annual estimate:       {:.2} kWh", self.result.annual_kwh)?,
        }
        writeln!(f)?;
        writeln!(f, "Month   covered kWh   typical kWh")?;
        for m in &self.result.monthly {
            let name = MONTHS
                .get(m.month as usize - 1)
                .copied()
                .unwrap_or("?");
            writeln!(f, "{name:<5} {:>13.2} {:>13.2}", m.kwh, m.typical_kwh)?;
        }
        write!(f, "Coverage segments:     {}", self.segments.len())
    }
}
