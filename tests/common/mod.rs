//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;
use rlp_estimate::profile::{GAS_PROFILE_KEY, ProfileStore, ReferenceProfile};
use rlp_estimate::reading::{BillingPeriod, MeterReading};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
}

pub fn period(start: NaiveDate, end: NaiveDate) -> BillingPeriod {
    BillingPeriod::new(MeterReading::new(start, 0.0), MeterReading::new(end, 1.0))
        .expect("valid period")
}

/// Flat profile over 2022: 1/365 per day.
pub fn uniform_profile(key: &str) -> ReferenceProfile {
    ReferenceProfile::from_daily_weights(key, 2022, &[1.0 / 365.0; 365]).expect("profile")
}

/// Normalized winter-heavy cosine profile over 2022.
pub fn seasonal_weights(amplitude: f64) -> Vec<f64> {
    let raw: Vec<f64> = (0..365)
        .map(|d| 1.0 + amplitude * ((d as f64 / 365.0) * std::f64::consts::TAU).cos())
        .collect();
    let total: f64 = raw.iter().sum();
    raw.iter().map(|w| w / total).collect()
}

pub fn seasonal_profile(key: &str) -> ReferenceProfile {
    ReferenceProfile::from_daily_weights(key, 2022, &seasonal_weights(0.6)).expect("profile")
}

/// Store with two flat electricity operators and a seasonal gas profile.
pub fn default_store() -> ProfileStore {
    ProfileStore::new(
        2022,
        vec![uniform_profile("ORES (Namur)"), uniform_profile("Sibelga")],
        seasonal_profile(GAS_PROFILE_KEY),
        "ORES (Namur)",
    )
    .expect("store")
}

/// Fresh scratch directory unique to this process and test name.
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("rlp-estimate-{}-{name}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).expect("scratch dir should be creatable");
    dir
}

/// Writes `elec.csv` (two flat operators), `gaz.csv` (seasonal) and a
/// `config.toml` pointing at them. Returns the config path.
pub fn write_fixture_tables(dir: &std::path::Path) -> PathBuf {
    let mut elec = String::from("GRD,date,value\n");
    let mut gas = String::from("date,value\n");
    let gas_weights = seasonal_weights(0.6);
    for (i, day) in date(2022, 1, 1).iter_days().take(365).enumerate() {
        for op in ["ORES (Namur)", "Sibelga"] {
            elec.push_str(&format!("{op},{day},{:.12}\n", 1.0 / 365.0));
        }
        gas.push_str(&format!("{day} 00:00:00,{:.12}\n", gas_weights[i]));
    }
    let elec_path = dir.join("elec.csv");
    let gas_path = dir.join("gaz.csv");
    fs::write(&elec_path, elec).expect("write elec.csv");
    fs::write(&gas_path, gas).expect("write gaz.csv");

    let config = format!(
        "[data]\nelectricity_csv = {:?}\ngas_csv = {:?}\n",
        elec_path.display().to_string(),
        gas_path.display().to_string()
    );
    let config_path = dir.join("config.toml");
    fs::write(&config_path, config).expect("write config.toml");
    config_path
}
