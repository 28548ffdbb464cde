//! Annual and monthly consumption estimation from folded coverage.

use chrono::Datelike;
use serde::Serialize;

use crate::error::EstimateError;
use crate::fold::CoverageSeries;
use crate::profile::ReferenceProfile;

/// Consumption allocated to one reference month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthlyEstimate {
    /// Calendar month, 1 to 12.
    pub month: u32,
    /// Share of the metered delta that fell in this month, counting each
    /// reference day as many times as the period covered it.
    pub kwh: f64,
    /// Profile share of the annual estimate for this month, independent of
    /// the billing period.
    pub typical_kwh: f64,
}

/// Outcome of one estimation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EstimationResult {
    /// Portion of the annual profile consumed by the period. Exceeds 1.0
    /// when the period spans more than a year.
    pub covered_fraction: f64,
    pub annual_kwh: f64,
    /// Annual volume, set for gas only.
    pub annual_m3: Option<f64>,
    /// Twelve entries, January first.
    pub monthly: Vec<MonthlyEstimate>,
}

impl EstimationResult {
    pub fn covered_percent(&self) -> f64 {
        self.covered_fraction * 100.0
    }

    /// Sum of the coverage-weighted monthly kWh; equals the metered delta.
    pub fn monthly_total_kwh(&self) -> f64 {
        self.monthly.iter().map(|m| m.kwh).sum()
    }
}

/// Weighted sum `Σ weight(t) × coverage(t)` over the reference year.
///
/// # Errors
///
/// Returns [`EstimateError::ReferenceYearMismatch`] if the two series were
/// built for different reference years.
pub fn covered_fraction(
    coverage: &CoverageSeries,
    profile: &ReferenceProfile,
) -> Result<f64, EstimateError> {
    if coverage.reference_year() != profile.reference_year() {
        return Err(EstimateError::ReferenceYearMismatch {
            coverage: coverage.reference_year(),
            profile: profile.reference_year(),
        });
    }
    Ok(profile
        .daily_weights()
        .iter()
        .zip(coverage.counts())
        .map(|(w, &c)| w * f64::from(c))
        .sum())
}

/// Backs out annual and monthly consumption from a metered delta.
///
/// # Arguments
///
/// * `coverage` - Folded billing period
/// * `profile` - Reference profile for the meter's energy and operator
/// * `delta_kwh` - Consumption metered over the period, in kWh
///
/// # Errors
///
/// Returns [`EstimateError::ZeroCoverage`] when the profile carries no weight
/// over the covered days, [`EstimateError::NonFiniteEstimate`] when the annual
/// estimate overflows, and [`EstimateError::ReferenceYearMismatch`] when the
/// inputs disagree on the reference year.
pub fn estimate(
    coverage: &CoverageSeries,
    profile: &ReferenceProfile,
    delta_kwh: f64,
) -> Result<EstimationResult, EstimateError> {
    let fraction = covered_fraction(coverage, profile)?;
    if fraction <= 0.0 || !fraction.is_finite() {
        return Err(EstimateError::ZeroCoverage {
            profile: profile.key().to_string(),
        });
    }
    let annual_kwh = delta_kwh / fraction;
    if !annual_kwh.is_finite() {
        return Err(EstimateError::NonFiniteEstimate {
            profile: profile.key().to_string(),
        });
    }

    let mut monthly: Vec<MonthlyEstimate> = (1..=12)
        .map(|month| MonthlyEstimate {
            month,
            kwh: 0.0,
            typical_kwh: 0.0,
        })
        .collect();
    let weights = profile.daily_weights();
    for (i, (date, count)) in coverage.iter().enumerate() {
        let share = weights[i] * annual_kwh;
        let m = &mut monthly[date.month0() as usize];
        m.typical_kwh += share;
        m.kwh += share * f64::from(count);
    }

    tracing::debug!(
        profile = profile.key(),
        days = coverage.total(),
        covered_fraction = fraction,
        annual_kwh,
        "estimate computed"
    );

    Ok(EstimationResult {
        covered_fraction: fraction,
        annual_kwh,
        annual_m3: None,
        monthly,
    })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::fold::{LeapDayPolicy, fold};
    use crate::reading::{BillingPeriod, MeterReading};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    fn uniform() -> ReferenceProfile {
        ReferenceProfile::from_daily_weights("uniform", 2022, &[1.0 / 365.0; 365])
            .expect("profile")
    }

    fn coverage(start: NaiveDate, end: NaiveDate) -> CoverageSeries {
        let p = BillingPeriod::new(MeterReading::new(start, 0.0), MeterReading::new(end, 1.0))
            .expect("period");
        fold(&p, 2022, LeapDayPolicy::Skip).expect("fold")
    }

    #[test]
    fn half_year_on_uniform_profile() {
        let cov = coverage(date(2024, 1, 1), date(2024, 7, 1));
        let r = estimate(&cov, &uniform(), 1000.0).expect("estimate");
        assert!((r.covered_fraction - 182.0 / 365.0).abs() < 1e-12);
        assert!((r.annual_kwh - 2005.494_505_494_5).abs() < 1e-6);
        assert!((r.covered_percent() - 49.863).abs() < 1e-3);
    }

    #[test]
    fn full_year_returns_delta() {
        let cov = coverage(date(2023, 1, 1), date(2023, 12, 31));
        let r = estimate(&cov, &uniform(), 3500.0).expect("estimate");
        assert!((r.covered_fraction - 1.0).abs() < 1e-12);
        assert!((r.annual_kwh - 3500.0).abs() < 1e-9);
    }

    #[test]
    fn monthly_kwh_sums_to_delta() {
        let cov = coverage(date(2021, 10, 12), date(2023, 2, 3));
        let r = estimate(&cov, &uniform(), 4321.0).expect("estimate");
        assert_eq!(r.monthly.len(), 12);
        assert!((r.monthly_total_kwh() - 4321.0).abs() < 1e-6);
        let typical: f64 = r.monthly.iter().map(|m| m.typical_kwh).sum();
        assert!((typical - r.annual_kwh).abs() < 1e-6);
    }

    #[test]
    fn monthly_counts_multiplicity() {
        // January covered twice, everything else once
        let cov = coverage(date(2022, 1, 1), date(2023, 1, 31));
        let r = estimate(&cov, &uniform(), 396.0).expect("estimate");
        let jan = r.monthly[0];
        let feb = r.monthly[1];
        assert!((jan.kwh - 2.0 * jan.typical_kwh).abs() < 1e-9);
        assert!((feb.kwh - feb.typical_kwh).abs() < 1e-9);
        assert!((r.annual_kwh - 365.0).abs() < 1e-9);
    }

    #[test]
    fn zero_weight_period_fails() {
        let mut weights = vec![1.0 / 334.0; 365];
        weights[..31].iter_mut().for_each(|w| *w = 0.0);
        let profile = ReferenceProfile::from_daily_weights("no-january", 2022, &weights)
            .expect("profile");
        let cov = coverage(date(2023, 1, 5), date(2023, 1, 20));
        let err = estimate(&cov, &profile, 10.0).unwrap_err();
        assert_eq!(
            err,
            EstimateError::ZeroCoverage {
                profile: "no-january".to_string()
            }
        );
    }

    #[test]
    fn vanishing_weight_fails_instead_of_overflowing() {
        let mut weights = vec![0.0; 365];
        weights[0] = 1e-320;
        let profile =
            ReferenceProfile::from_daily_weights("tiny", 2022, &weights).expect("profile");
        let cov = coverage(date(2023, 1, 1), date(2023, 1, 2));
        let err = estimate(&cov, &profile, 1000.0).unwrap_err();
        assert_eq!(
            err,
            EstimateError::NonFiniteEstimate {
                profile: "tiny".to_string()
            }
        );
    }

    #[test]
    fn mismatched_reference_years_fail() {
        let cov = coverage(date(2023, 1, 5), date(2023, 1, 20));
        let profile =
            ReferenceProfile::from_daily_weights("leap", 2024, &[1.0 / 366.0; 366]).expect("profile");
        assert!(matches!(
            estimate(&cov, &profile, 10.0),
            Err(EstimateError::ReferenceYearMismatch { .. })
        ));
    }

    #[test]
    fn seasonal_profile_weights_winter_higher() {
        let weights: Vec<f64> = (0..365)
            .map(|d| {
                let x = (d as f64 / 365.0) * std::f64::consts::TAU;
                1.0 + 0.5 * x.cos()
            })
            .collect();
        let total: f64 = weights.iter().sum();
        let normalized: Vec<f64> = weights.iter().map(|w| w / total).collect();
        let profile =
            ReferenceProfile::from_daily_weights("seasonal", 2022, &normalized).expect("profile");

        let winter = estimate(&coverage(date(2023, 1, 1), date(2023, 1, 31)), &profile, 100.0)
            .expect("winter");
        let summer = estimate(&coverage(date(2023, 7, 1), date(2023, 7, 31)), &profile, 100.0)
            .expect("summer");
        // same metered delta in a high-weight month implies lower annual use
        assert!(winter.annual_kwh < summer.annual_kwh);
    }
}
