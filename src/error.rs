//! Error taxonomy shared by both binaries.
//!
//! "No opinion" is never an error: rules and text extraction return `None`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Missing or invalid command-line argument.
    #[error("usage: {0}")]
    Usage(String),

    /// Hook input is not valid JSON or does not have the expected shape.
    #[error("invalid hook input, no decision emitted: {0}")]
    InputParse(#[source] serde_json::Error),

    /// An expected directory or file is absent.
    #[error("not found: {}", path.display())]
    Environment { path: PathBuf },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid search pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// Failed to serialize an output document.
    #[error("output error: {0}")]
    Output(#[source] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
