//! CLI logic for the strata replay harness.
//!
//! The harness loads a scripted [`scenario`](scenario::Scenario), replays it
//! against a [`Session`] backed by a [`RecordingServer`], and writes the
//! resulting constraint overlay as SVG together with a TOML transcript of the
//! notifications the layout server would have received.

pub mod error_adapter;
pub mod scenario;

mod args;
mod config;
mod error;

pub use args::Args;
pub use error::CliError;

use std::{fs, path::PathBuf};

use log::info;
use serde::Serialize;

use strata::{
    Session,
    server::{Notification, RecordingServer},
};

use crate::scenario::Scenario;

/// Notifications in the order they were sent.
#[derive(Debug, Serialize)]
struct Transcript {
    notification: Vec<Notification>,
}

/// Run the strata replay harness
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `CliError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Malformed scenarios
/// - Rejected model snapshots
pub fn run(args: &Args) -> Result<(), CliError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Replaying scenario"
    );

    let app_config = config::load_config(args.config.as_ref())?;

    let src = fs::read_to_string(&args.input)?;
    let scenario: Scenario = toml::from_str(&src).map_err(|err| CliError::Scenario {
        path: PathBuf::from(&args.input),
        src: src.clone(),
        err,
    })?;

    let mut session = Session::new(app_config, RecordingServer::new())?;
    let effects = scenario::replay(&mut session, &scenario)?;
    info!(steps = scenario.steps().len(), effects = effects.len(); "Scenario replayed");

    let transcript = Transcript {
        notification: session.server_mut().take(),
    };
    let transcript = toml::to_string(&transcript)?;
    match &args.notifications {
        Some(path) => {
            fs::write(path, transcript)?;
            info!(notifications_file = path; "Notifications written");
        }
        None => print!("{transcript}"),
    }

    fs::write(&args.output, session.render_overlay().to_string())?;
    info!(output_file = args.output; "Overlay exported successfully");

    Ok(())
}
