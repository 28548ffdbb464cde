//! Meter readings and the billing period they delimit.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Longest accepted billing period, roughly one century.
pub const MAX_PERIOD_DAYS: i64 = 36_525;

/// One index read off the meter on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeterReading {
    pub date: NaiveDate,
    pub value: f64,
}

impl MeterReading {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// Two readings with `start.date < end.date` and `start.value < end.value`.
///
/// Only constructible through [`BillingPeriod::new`], so every instance has
/// passed validation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BillingPeriod {
    start: MeterReading,
    end: MeterReading,
}

impl BillingPeriod {
    /// Validates and builds a billing period.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if either index or their difference is
    /// not finite, if the dates are not strictly increasing or more than
    /// [`MAX_PERIOD_DAYS`] apart, or if the index does not strictly increase.
    pub fn new(start: MeterReading, end: MeterReading) -> Result<Self, ValidationError> {
        if !start.value.is_finite() || !end.value.is_finite() {
            return Err(ValidationError::NonFiniteIndex);
        }
        if start.date >= end.date {
            return Err(ValidationError::DatesOutOfOrder {
                start: start.date,
                end: end.date,
            });
        }
        let days = (end.date - start.date).num_days();
        if days > MAX_PERIOD_DAYS {
            return Err(ValidationError::PeriodTooLong {
                days,
                max_days: MAX_PERIOD_DAYS,
            });
        }
        if start.value >= end.value {
            return Err(ValidationError::IndexNotIncreasing {
                start: start.value,
                end: end.value,
            });
        }
        if !(end.value - start.value).is_finite() {
            return Err(ValidationError::NonFiniteDelta);
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> MeterReading {
        self.start
    }

    pub fn end(&self) -> MeterReading {
        self.end
    }

    /// Index difference, in the unit the meter was read in.
    pub fn delta(&self) -> f64 {
        self.end.value - self.start.value
    }

    /// Days elapsed between the two readings (`end - start`).
    pub fn elapsed_days(&self) -> i64 {
        (self.end.date - self.start.date).num_days()
    }

    /// Calendar days touched by the period, both reading days included.
    pub fn inclusive_days(&self) -> i64 {
        self.elapsed_days() + 1
    }
}
