//! Household energy consumption estimation from two meter readings and a
//! standardized load profile (RLP).

#[cfg(feature = "api")]
pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod estimate;
pub mod fold;
pub mod io;
pub mod logging;
pub mod profile;
pub mod reading;
pub mod report;
pub mod request;
pub mod units;
