//! File output for estimation results.

pub mod export;
