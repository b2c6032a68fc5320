//! @acp:module "Errors"
//! @acp:summary "Error types for the Sails command-line tool"
//! @acp:domain cli
//! @acp:layer model

use std::path::PathBuf;

use thiserror::Error;

/// Internal faults. Expected command results travel as
/// [`Outcome`](crate::outcome::Outcome) values instead.
#[derive(Debug, Error)]
pub enum SailsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config file {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Could not start `{node}`: {source}")]
    Spawn {
        node: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Bridge protocol error: {0}")]
    Protocol(String),

    #[error("Sails runtime failed: {0}")]
    Runtime(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, SailsError>;
