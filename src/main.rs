//! rlp-estimate entry point: CLI wiring, one-time profile load, estimation.

use std::process;

use rlp_estimate::cli::{CliOptions, parse_args, print_usage};
use rlp_estimate::config::Settings;
use rlp_estimate::io::export::{export_coverage_csv, export_monthly_csv};
use rlp_estimate::logging::init_tracing;
use rlp_estimate::profile::ProfileStore;
use rlp_estimate::request::Estimator;

fn load_settings(cli: &CliOptions) -> Settings {
    let settings = match cli.config {
        Some(ref path) => match Settings::from_toml_file(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        },
        None => Settings::default(),
    };

    let errors = settings.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }
    settings
}

fn main() {
    let cli = match parse_args() {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("error: {e}");
            print_usage();
            process::exit(1);
        }
    };
    if cli.help {
        print_usage();
        return;
    }

    init_tracing();
    let settings = load_settings(&cli);

    // Reference data is required for every request; failing here is fatal.
    let store = match ProfileStore::load(&settings) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("error: cannot load profiles: {e}");
            process::exit(1);
        }
    };

    if cli.list_operators {
        for op in store.operators() {
            let marker = if op == store.default_operator() {
                " (default)"
            } else {
                ""
            };
            println!("{op}{marker}");
        }
    }

    if let Some(ref request) = cli.request {
        let estimator = match Estimator::new(&store, &settings.estimation) {
            Ok(est) => est,
            Err(e) => {
                eprintln!("error: {e}");
                process::exit(1);
            }
        };
        let report = match estimator.run(request) {
            Ok(report) => report,
            Err(e) => {
                eprintln!("error: {e}");
                process::exit(1);
            }
        };

        println!("{report}");

        if let Some(ref path) = cli.monthly_out {
            if let Err(e) = export_monthly_csv(&report, path) {
                eprintln!("error: failed to write CSV: {e}");
                process::exit(1);
            }
            tracing::info!(path = %path.display(), "monthly breakdown written");
        }
        if let Some(ref path) = cli.coverage_out {
            let profile = store.resolve(request.energy, Some(report.profile.as_str()));
            if let Err(e) = export_coverage_csv(&report.coverage, profile, path) {
                eprintln!("error: failed to write CSV: {e}");
                process::exit(1);
            }
            tracing::info!(path = %path.display(), "coverage series written");
        }
    }

    if cli.serve {
        serve(store, settings, cli.port);
    }
}

#[cfg(feature = "api")]
fn serve(store: ProfileStore, settings: Settings, port: Option<u16>) {
    use std::net::SocketAddr;
    use std::sync::Arc;

    let port = port.unwrap_or(settings.server.port);
    let state = Arc::new(rlp_estimate::api::AppState {
        store,
        estimation: settings.estimation,
    });
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let rt = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("error: failed to create tokio runtime: {e}");
        process::exit(1);
    });
    if let Err(e) = rt.block_on(rlp_estimate::api::serve(state, addr)) {
        eprintln!("error: server failed on {addr}: {e}");
        process::exit(1);
    }
}

#[cfg(not(feature = "api"))]
fn serve(_store: ProfileStore, _settings: Settings, _port: Option<u16>) {
    eprintln!("error: --serve requires building with the `api` feature");
    process::exit(1);
}
