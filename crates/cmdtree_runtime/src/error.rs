//! Error type for the console host.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for console host operations.
pub type Result<T> = std::result::Result<T, RuntimeError>;

/// Console host failures.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Reading a file failed.
    #[error("cannot read {path}: {source}")]
    Io {
        /// The file being read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// A configuration file did not parse.
    #[error("invalid configuration in {path}: {source}")]
    Config {
        /// The configuration file.
        path: PathBuf,
        /// Parse error.
        source: toml::de::Error,
    },

    /// The line editor failed.
    #[error("line editor error: {0}")]
    Editor(String),

    /// Registering commands failed.
    #[error(transparent)]
    Registration(#[from] cmdtree_foundation::Error),

    /// The log subscriber could not be installed.
    #[error("cannot initialise logging: {0}")]
    Logging(String),
}
