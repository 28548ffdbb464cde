//! Command-line argument parsing for the `rlp-estimate` binary.

use std::env;
use std::path::PathBuf;

use chrono::NaiveDate;

use crate::reading::MeterReading;
use crate::request::EstimationRequest;
use crate::units::{Energy, Unit};

/// Parsed CLI arguments.
#[derive(Debug, Default)]
pub struct CliOptions {
    pub config: Option<PathBuf>,
    /// Set when both readings were given.
    pub request: Option<EstimationRequest>,
    pub list_operators: bool,
    pub monthly_out: Option<PathBuf>,
    pub coverage_out: Option<PathBuf>,
    pub serve: bool,
    pub port: Option<u16>,
    pub help: bool,
}

/// Parses the process arguments.
///
/// # Errors
///
/// Returns a message describing the first invalid or missing argument.
pub fn parse_args() -> Result<CliOptions, String> {
    let args: Vec<String> = env::args().skip(1).collect();
    parse_args_from(&args)
}

/// Parses an argument list (without the program name).
///
/// # Errors
///
/// Returns a message describing the first invalid or missing argument.
pub fn parse_args_from(args: &[String]) -> Result<CliOptions, String> {
    let mut opts = CliOptions::default();
    let mut energy = Energy::Electricity;
    let mut unit = None;
    let mut operator = None;
    let mut start_date = None;
    let mut start_index = None;
    let mut end_date = None;
    let mut end_index = None;

    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => opts.help = true,
            "--config" => {
                i += 1;
                let path = args.next_or_err(i, "missing value for --config (expected a TOML path)")?;
                opts.config = Some(PathBuf::from(path));
            }
            "--energy" => {
                i += 1;
                energy = args
                    .next_or_err(i, "missing value for --energy (electricity or gas)")?
                    .parse()?;
            }
            "--unit" => {
                i += 1;
                unit = Some(
                    args.next_or_err(i, "missing value for --unit (kwh or m3)")?
                        .parse::<Unit>()?,
                );
            }
            "--operator" => {
                i += 1;
                let op = args.next_or_err(i, "missing value for --operator")?;
                operator = Some(op.to_string());
            }
            "--start" => {
                i += 1;
                start_date = Some(parse_date(args.next_or_err(i, "missing value for --start")?)?);
            }
            "--end" => {
                i += 1;
                end_date = Some(parse_date(args.next_or_err(i, "missing value for --end")?)?);
            }
            "--start-index" => {
                i += 1;
                start_index = Some(parse_index(
                    args.next_or_err(i, "missing value for --start-index")?,
                )?);
            }
            "--end-index" => {
                i += 1;
                end_index = Some(parse_index(args.next_or_err(i, "missing value for --end-index")?)?);
            }
            "--monthly-out" => {
                i += 1;
                let path = args.next_or_err(i, "missing value for --monthly-out")?;
                opts.monthly_out = Some(PathBuf::from(path));
            }
            "--coverage-out" => {
                i += 1;
                let path = args.next_or_err(i, "missing value for --coverage-out")?;
                opts.coverage_out = Some(PathBuf::from(path));
            }
            "--list-operators" => opts.list_operators = true,
            "--serve" => opts.serve = true,
            "--port" => {
                i += 1;
                let raw = args.next_or_err(i, "missing value for --port")?;
                let port = raw
                    .parse::<u16>()
                    .map_err(|_| format!("--port value \"{raw}\" is not a valid u16"))?;
                opts.port = Some(port);
            }
            other => return Err(format!("unknown argument: {other}")),
        }
        i += 1;
    }

    match (start_date, start_index, end_date, end_index) {
        (Some(sd), Some(si), Some(ed), Some(ei)) => {
            opts.request = Some(EstimationRequest {
                energy,
                unit: unit.unwrap_or_default(),
                operator,
                start: MeterReading::new(sd, si),
                end: MeterReading::new(ed, ei),
            });
        }
        (None, None, None, None) => {
            if !opts.help && !opts.list_operators && !opts.serve {
                return Err(
                    "nothing to do: give both readings (--start/--start-index/--end/--end-index), \
                     --list-operators or --serve"
                        .to_string(),
                );
            }
        }
        _ => {
            return Err(
                "a reading is incomplete: --start, --start-index, --end and --end-index \
                 must all be given"
                    .to_string(),
            );
        }
    }

    Ok(opts)
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| format!("invalid date \"{s}\" (expected YYYY-MM-DD): {e}"))
}

fn parse_index(s: &str) -> Result<f64, String> {
    s.parse::<f64>()
        .map_err(|_| format!("invalid meter index \"{s}\""))
}

trait SliceArgExt {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String>;
}

impl SliceArgExt for [String] {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String> {
        self.get(index)
            .map(String::as_str)
            .ok_or_else(|| err.to_string())
    }
}

pub fn print_usage() {
    eprintln!("rlp-estimate: annual consumption from two meter readings and an RLP profile");
    eprintln!();
    eprintln!("Usage:");
    eprintln!(
        "  rlp-estimate [--config <path>] [--energy electricity|gas] [--unit kwh|m3] \
         [--operator <key>]"
    );
    eprintln!("               --start <date> --start-index <value> --end <date> --end-index <value>");
    eprintln!("               [--monthly-out <path>] [--coverage-out <path>]");
    eprintln!("  rlp-estimate [--config <path>] --list-operators");
    eprintln!("  rlp-estimate [--config <path>] --serve [--port <u16>]   (api feature)");
    eprintln!();
    eprintln!("Dates are YYYY-MM-DD. Without --operator the default operator is used.");
}
