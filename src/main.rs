//! Spots - Provision an EC2 instance through CloudFormation.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use spots::cli::output;
use spots::cli::{execute, Cli};

/// Install the tracing subscriber for this process.
///
/// `SPOTS_LOG` takes an `EnvFilter` directive; `SPOTS_LOG_FORMAT=json`
/// switches to JSON lines. Logs go to stderr so stdout stays for results.
fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_env("SPOTS_LOG").unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("spots=debug")
        } else {
            EnvFilter::new("spots=info")
        }
    });

    let json = std::env::var("SPOTS_LOG_FORMAT").is_ok_and(|format| format == "json");
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = execute(cli) {
        output::error(&e.to_string());
        if let Some(hint) = e.hint() {
            output::hint(hint);
        }
        std::process::exit(1);
    }
}
