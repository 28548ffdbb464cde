//! Folding of an arbitrary billing period onto the reference year.
//!
//! Every calendar year touched by the period is intersected with the period
//! and its days are projected onto the reference year by replacing the year
//! component. The result counts, per reference day, how many real days were
//! mapped onto it.

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::EstimateError;
use crate::profile::{days_in_year, is_leap_year};
use crate::reading::BillingPeriod;

/// What happens to 29 February when the reference year has no such day.
///
/// With a leap reference year both policies map 29 February onto itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeapDayPolicy {
    /// The day is dropped: it contributes no coverage.
    #[default]
    Skip,
    /// The day is counted on 28 February, so no real day is lost.
    FoldToFeb28,
}

/// Projects one real date onto `reference_year`.
///
/// Returns `None` only for 29 February under [`LeapDayPolicy::Skip`] when the
/// reference year is not a leap year.
pub fn project(date: NaiveDate, reference_year: i32, policy: LeapDayPolicy) -> Option<NaiveDate> {
    if let Some(d) = date.with_year(reference_year) {
        return Some(d);
    }
    match policy {
        LeapDayPolicy::Skip => None,
        LeapDayPolicy::FoldToFeb28 => NaiveDate::from_ymd_opt(reference_year, 2, 28),
    }
}

/// Per reference day coverage count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoverageSeries {
    reference_year: i32,
    counts: Vec<u32>,
}

/// Maximal run of consecutive reference days sharing one non-zero count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CoverageSegment {
    /// First day of the run.
    pub start: NaiveDate,
    /// Day after the last day of the run.
    pub end: NaiveDate,
    pub count: u32,
}

impl CoverageSeries {
    /// All-zero series for `reference_year`.
    ///
    /// # Errors
    ///
    /// Returns [`EstimateError::InvalidReferenceYear`] for years chrono
    /// cannot represent.
    pub fn empty(reference_year: i32) -> Result<Self, EstimateError> {
        let len =
            days_in_year(reference_year).ok_or(EstimateError::InvalidReferenceYear(reference_year))?;
        Ok(Self {
            reference_year,
            counts: vec![0; len],
        })
    }

    pub fn reference_year(&self) -> i32 {
        self.reference_year
    }

    /// Counts indexed by zero-based ordinal of the reference year.
    pub fn counts(&self) -> &[u32] {
        &self.counts
    }

    /// Count of one reference day; zero for dates outside the reference year.
    pub fn count(&self, date: NaiveDate) -> u32 {
        if date.year() != self.reference_year {
            return 0;
        }
        self.counts[date.ordinal0() as usize]
    }

    /// Total number of real days folded in.
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| u64::from(c)).sum()
    }

    pub fn max_count(&self) -> u32 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }

    /// `(reference day, count)` for every day of the reference year.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, u32)> + '_ {
        self.counts.iter().enumerate().filter_map(|(i, &c)| {
            NaiveDate::from_yo_opt(self.reference_year, i as u32 + 1).map(|d| (d, c))
        })
    }

    /// Runs of equal non-zero coverage, for charting which parts of the
    /// reference year were used and how often.
    pub fn segments(&self) -> Vec<CoverageSegment> {
        let mut segments = Vec::new();
        let mut run: Option<(NaiveDate, u64, u32)> = None;

        for (date, count) in self.iter() {
            match run {
                Some((start, len, c)) if c == count => run = Some((start, len + 1, c)),
                _ => {
                    if let Some(seg) = run.take().and_then(close_segment) {
                        segments.push(seg);
                    }
                    if count > 0 {
                        run = Some((date, 1, count));
                    }
                }
            }
        }
        if let Some(seg) = run.and_then(close_segment) {
            segments.push(seg);
        }
        segments
    }

    fn bump(&mut self, date: NaiveDate) {
        self.counts[date.ordinal0() as usize] += 1;
    }
}

fn close_segment((start, len, count): (NaiveDate, u64, u32)) -> Option<CoverageSegment> {
    start
        .checked_add_days(Days::new(len))
        .map(|end| CoverageSegment { start, end, count })
}

/// Folds `period` onto `reference_year`.
///
/// Both reading days are included. Under [`LeapDayPolicy::FoldToFeb28`],
/// `total()` equals the number of calendar days in the period; under
/// [`LeapDayPolicy::Skip`] it is that number minus the skipped 29 Februaries.
///
/// # Errors
///
/// Returns [`EstimateError::InvalidReferenceYear`] for years chrono cannot
/// represent.
pub fn fold(
    period: &BillingPeriod,
    reference_year: i32,
    policy: LeapDayPolicy,
) -> Result<CoverageSeries, EstimateError> {
    let mut series = CoverageSeries::empty(reference_year)?;
    let (start, end) = (period.start().date, period.end().date);

    for year in start.year()..=end.year() {
        let Some((begin, finish)) = intersect_with_year(start, end, year) else {
            continue;
        };
        for day in begin.iter_days().take_while(|d| *d <= finish) {
            if let Some(r) = project(day, reference_year, policy) {
                series.bump(r);
            }
        }
    }

    tracing::trace!(
        reference_year,
        leap_year = is_leap_year(reference_year),
        days = series.total(),
        "period folded"
    );
    Ok(series)
}

/// Clamps `[start, end]` to the calendar year `year`.
fn intersect_with_year(start: NaiveDate, end: NaiveDate, year: i32) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, 1, 1)?;
    let last = NaiveDate::from_ymd_opt(year, 12, 31)?;
    let begin = start.max(first);
    let finish = end.min(last);
    (begin <= finish).then_some((begin, finish))
}
