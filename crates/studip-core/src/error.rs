//! Error handling
//!
//! Every failure in the core surfaces to the caller; nothing is recovered
//! locally. The variants follow the four failure families of a sync run:
//! transport, lookup, missing capability and filesystem.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// A requested item was not found in a collection returned by the server
/// or by the local environment
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// Semester title not present in the remote semester list
    #[error("Semester '{0}' not found")]
    Semester(String),

    /// The interactive chooser returned without a selection
    #[error("No semester chosen")]
    NoSemesterChosen,

    /// No session cookie for the configured host in the browser store
    #[error("Session cookie for '{host}' not found")]
    Cookie { host: String },

    /// Browser profile could not be located
    #[error("Browser profile not found: {0}")]
    BrowserProfile(String),

    /// A field expected in a remote response was missing
    #[error("Field '{field}' missing in response from '{path}'")]
    MissingField { path: String, field: &'static str },
}

/// Errors that can occur while talking to Stud.IP or mirroring its content
#[derive(Error, Debug)]
pub enum Error {
    /// The server answered with a non-success status
    #[error("Failed to get {url}: {status}")]
    Transport { url: String, status: u16 },

    /// The request could not be sent or the body could not be read
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not the expected JSON shape
    #[error("Invalid response from '{path}': {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Lookup(#[from] LookupError),

    /// A required external tool is not installed
    #[error("'{tool}' not found on PATH")]
    Capability { tool: String },

    /// Filesystem operation failed
    #[error("I/O error at '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An external command (git, dejsonlz4) exited unsuccessfully
    #[error("`{command}` failed ({status}): {stderr}")]
    Command {
        command: String,
        status: String,
        stderr: String,
    },

    /// Configuration is unusable for the requested operation
    #[error("Configuration error: {0}")]
    Config(String),

    /// Interactive prompt failed
    #[error("Prompt failed: {0}")]
    Prompt(String),
}

impl Error {
    /// Attach a path to an I/O error
    pub fn io(source: io::Error, path: impl Into<PathBuf>) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the failure came from the remote side
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport { .. } | Error::Http(_))
    }
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, Error>;
