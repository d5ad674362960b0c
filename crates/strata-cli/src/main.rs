//! Entry point of the `strata` replay harness.

use std::{fmt::Write as _, process, str::FromStr};

use clap::Parser;
use log::{LevelFilter, debug, error, info};
use miette::GraphicalReportHandler;

use strata_cli::{Args, CliError, error_adapter::to_reportables};

fn main() {
    miette::set_panic_hook();

    let args = Args::parse();
    init_logger(&args.log_level);
    debug!(args:?; "Parsed arguments");

    match strata_cli::run(&args) {
        Ok(()) => info!(input = args.input; "Replay finished"),
        Err(err) => {
            error!("{}", render_failure(&err));
            process::exit(1);
        }
    }
}

/// Installs `env_logger`, falling back to `warn` for an unknown level name.
fn init_logger(level: &str) {
    let filter = LevelFilter::from_str(level).unwrap_or_else(|_| {
        eprintln!("Unknown log level `{level}`, logging warnings only");
        LevelFilter::Warn
    });

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(filter)
        .init();
}

/// Renders every diagnostic of `err` into one report.
fn render_failure(err: &CliError) -> String {
    let handler = GraphicalReportHandler::new();
    let mut report = String::new();
    for reportable in to_reportables(err) {
        if handler.render_report(&mut report, &reportable).is_err() {
            let _ = writeln!(report, "{reportable}");
        }
    }
    report
}
