//! Tracing setup for the CLI. Logs go to stderr.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const APP_TARGET: &str = "mfdash";

fn default_directive(verbose: bool) -> String {
    if verbose {
        format!("{APP_TARGET}=debug")
    } else {
        "off".to_string()
    }
}

/// `RUST_LOG` wins when set. Otherwise `--verbose` turns on debug output for
/// this crate only.
pub fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    tracing_subscriber::registry()
        .with(fmt::layer().pretty().without_time().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
