//! Command-line argument definitions for the strata replay harness.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`].

use clap::Parser;

/// Command-line arguments for the strata replay harness
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input scenario (TOML)
    #[arg(help = "Path to the scenario file")]
    pub input: String,

    /// Path to the output SVG overlay
    #[arg(short, long, default_value = "overlay.svg")]
    pub output: String,

    /// Write notifications to this file instead of stdout
    #[arg(short, long)]
    pub notifications: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
