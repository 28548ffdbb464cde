//! Request-scoped estimation: validate, normalize, fold, estimate.

use serde::{Deserialize, Serialize};

use crate::config::EstimationConfig;
use crate::error::{EstimateError, ValidationError};
use crate::estimate::estimate;
use crate::fold::{LeapDayPolicy, fold};
use crate::profile::ProfileStore;
use crate::reading::{BillingPeriod, MeterReading};
use crate::report::EstimationReport;
use crate::units::{Energy, Unit, UnitConverter};

/// Plain input of one estimation, independent of any UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimationRequest {
    pub energy: Energy,
    /// Unit the meter is read in; electricity only accepts kWh.
    #[serde(default)]
    pub unit: Unit,
    /// Grid operator key; `None` means "don't know".
    #[serde(default)]
    pub operator: Option<String>,
    pub start: MeterReading,
    pub end: MeterReading,
}

/// Runs requests against a shared, read-only profile store.
#[derive(Debug, Clone, Copy)]
pub struct Estimator<'a> {
    store: &'a ProfileStore,
    converter: UnitConverter,
    leap_day: LeapDayPolicy,
}

impl<'a> Estimator<'a> {
    /// # Errors
    ///
    /// Fails if the configured conversion factor is not positive.
    pub fn new(store: &'a ProfileStore, config: &EstimationConfig) -> Result<Self, EstimateError> {
        Ok(Self {
            store,
            converter: config.converter()?,
            leap_day: config.leap_day,
        })
    }

    pub fn store(&self) -> &'a ProfileStore {
        self.store
    }

    /// Estimates annual and monthly consumption for one request.
    ///
    /// # Errors
    ///
    /// [`EstimateError::Validation`] for a malformed request (nothing is
    /// computed), [`EstimateError::ZeroCoverage`] when the profile has no
    /// weight over the period, [`EstimateError::NonFiniteEstimate`] when the
    /// annual estimate overflows.
    pub fn run(&self, request: &EstimationRequest) -> Result<EstimationReport, EstimateError> {
        if !request.energy.supports(request.unit) {
            return Err(ValidationError::UnitNotSupported {
                energy: request.energy,
                unit: request.unit,
            }
            .into());
        }
        let period = BillingPeriod::new(request.start, request.end)?;

        let delta = period.delta();
        let delta_kwh = self.converter.to_kwh(delta, request.unit);
        let delta_m3 = match (request.energy, request.unit) {
            (Energy::Electricity, _) => None,
            (Energy::Gas, Unit::M3) => Some(delta),
            (Energy::Gas, Unit::Kwh) => Some(self.converter.to_m3(delta)),
        };

        let profile = self
            .store
            .resolve(request.energy, request.operator.as_deref());
        let coverage = fold(&period, self.store.reference_year(), self.leap_day)?;
        let mut result = estimate(&coverage, profile, delta_kwh)?;
        if request.energy == Energy::Gas {
            result.annual_m3 = Some(self.converter.to_m3(result.annual_kwh));
        }

        Ok(EstimationReport {
            energy: request.energy,
            profile: profile.key().to_string(),
            days: period.elapsed_days(),
            delta_kwh,
            delta_m3,
            segments: coverage.segments(),
            coverage,
            result,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::profile::{GAS_PROFILE_KEY, ReferenceProfile};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    fn store() -> ProfileStore {
        let uniform = |k: &str| {
            ReferenceProfile::from_daily_weights(k, 2022, &[1.0 / 365.0; 365]).expect("profile")
        };
        ProfileStore::new(
            2022,
            vec![uniform("ORES (Namur)"), uniform("Fluvius Antwerpen")],
            uniform(GAS_PROFILE_KEY),
            "ORES (Namur)",
        )
        .expect("store")
    }

    fn request(energy: Energy, unit: Unit, start: f64, end: f64) -> EstimationRequest {
        EstimationRequest {
            energy,
            unit,
            operator: None,
            start: MeterReading::new(date(2023, 1, 1), start),
            end: MeterReading::new(date(2023, 12, 31), end),
        }
    }

    #[test]
    fn gas_in_m3_converts_delta() {
        let s = store();
        let est = Estimator::new(&s, &EstimationConfig::default()).expect("estimator");
        let report = est
            .run(&request(Energy::Gas, Unit::M3, 1000.0, 1100.0))
            .expect("report");
        assert!((report.delta_kwh - 1018.88).abs() < 1e-9);
        assert_eq!(report.delta_m3, Some(100.0));
        assert_eq!(report.profile, GAS_PROFILE_KEY);
        let annual_m3 = report.result.annual_m3.expect("gas has volume");
        assert!((annual_m3 - 100.0).abs() < 1e-9);
    }

    #[test]
    fn gas_in_kwh_reports_volume() {
        let s = store();
        let est = Estimator::new(&s, &EstimationConfig::default()).expect("estimator");
        let report = est
            .run(&request(Energy::Gas, Unit::Kwh, 0.0, 1018.88))
            .expect("report");
        let m3 = report.delta_m3.expect("gas has volume");
        assert!((m3 - 100.0).abs() < 1e-9);
    }

    #[test]
    fn electricity_has_no_volume() {
        let s = store();
        let est = Estimator::new(&s, &EstimationConfig::default()).expect("estimator");
        let report = est
            .run(&request(Energy::Electricity, Unit::Kwh, 2447.0, 4495.0))
            .expect("report");
        assert_eq!(report.delta_m3, None);
        assert_eq!(report.result.annual_m3, None);
        assert_eq!(report.profile, "ORES (Namur)");
        assert_eq!(report.days, 364);
    }

    #[test]
    fn electricity_rejects_m3() {
        let s = store();
        let est = Estimator::new(&s, &EstimationConfig::default()).expect("estimator");
        let err = est
            .run(&request(Energy::Electricity, Unit::M3, 1.0, 2.0))
            .unwrap_err();
        assert!(matches!(
            err,
            EstimateError::Validation(ValidationError::UnitNotSupported { .. })
        ));
    }

    #[test]
    fn decreasing_index_is_validation_error() {
        let s = store();
        let est = Estimator::new(&s, &EstimationConfig::default()).expect("estimator");
        let err = est
            .run(&request(Energy::Electricity, Unit::Kwh, 10.0, 5.0))
            .unwrap_err();
        assert!(matches!(
            err,
            EstimateError::Validation(ValidationError::IndexNotIncreasing { .. })
        ));
    }

    #[test]
    fn named_operator_is_used() {
        let s = store();
        let est = Estimator::new(&s, &EstimationConfig::default()).expect("estimator");
        let mut req = request(Energy::Electricity, Unit::Kwh, 0.0, 1.0);
        req.operator = Some("Fluvius Antwerpen".to_string());
        let report = est.run(&req).expect("report");
        assert_eq!(report.profile, "Fluvius Antwerpen");
    }

    #[test]
    fn bad_factor_is_rejected_up_front() {
        let s = store();
        let cfg = EstimationConfig {
            kwh_per_m3: -1.0,
            ..EstimationConfig::default()
        };
        assert!(matches!(
            Estimator::new(&s, &cfg),
            Err(EstimateError::InvalidConversionFactor(_))
        ));
    }
}
