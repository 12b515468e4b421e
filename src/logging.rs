//! Structured logging initialization.
//!
//! Robot mode emits JSON lines for machine consumption; otherwise output is
//! compact, with ANSI colors only on a real terminal. Everything goes to
//! stderr so stdout stays parseable.

use std::io::{self, IsTerminal};

use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Default filter directive for the given verbosity.
fn directive(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "fnotes=error";
    }
    match verbose {
        0 => "fnotes=info",
        1 => "fnotes=debug",
        _ => "fnotes=trace",
    }
}

/// Initialize the tracing subscriber from CLI flags and environment.
///
/// `RUST_LOG` overrides the verbosity-derived default filter.
pub fn init(robot: bool, verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(directive(verbose, quiet)));

    let registry = tracing_subscriber::registry().with(filter);
    if robot {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .compact()
                    .with_target(false)
                    .with_ansi(io::stderr().is_terminal())
                    .with_writer(io::stderr),
            )
            .init();
    }
}
