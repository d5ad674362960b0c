//! Error type for the replay harness.

use std::{io, path::PathBuf};

use thiserror::Error;

use strata::StrataError;

use crate::config::ConfigError;

/// Everything that can make a replay fail.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Strata(#[from] StrataError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to parse scenario {}: {}", path.display(), err.message())]
    Scenario {
        path: PathBuf,
        src: String,
        err: toml::de::Error,
    },

    #[error("Failed to serialize notifications: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
