//! Error types for the GitHub Actions callback.
//!
//! Nothing in this crate is allowed to abort the run it is observing. Every
//! variant the callback can produce is downgraded to a diagnostic line by the
//! driver. Only the binary turns errors into an exit status, through
//! [`Error::exit_code`].

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for callback operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the callback.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Event Errors
    // ========================================================================
    /// A field of an incoming event could not be turned into output.
    #[error("invalid {field} field: {message}")]
    EventField {
        /// Name of the offending field
        field: &'static str,
        /// What was wrong with it
        message: String,
    },

    /// A line of the JSON event stream could not be decoded.
    #[error("malformed event on line {line}: {source}")]
    EventParse {
        /// 1-based line number in the stream
        line: usize,
        /// Decoder error
        #[source]
        source: serde_json::Error,
    },

    /// Unknown result status literal.
    #[error("unknown result status '{0}'")]
    UnknownStatus(String),

    /// Unknown result channel literal.
    #[error("unknown result channel '{0}'")]
    UnknownChannel(String),

    /// Unknown grouping mode literal.
    #[error("unknown grouping mode '{0}' (expected smart, play or task)")]
    UnknownGrouping(String),

    // ========================================================================
    // Statistics Errors
    // ========================================================================
    /// A counter would overflow.
    #[error("{status} counter overflow for host '{host}' in play '{play}'")]
    StatsOverflow {
        /// Play name
        play: String,
        /// Host name
        host: String,
        /// Status literal of the counter
        status: &'static str,
    },

    // ========================================================================
    // I/O Errors
    // ========================================================================
    /// The transcript could not be written to the archive file.
    #[error("failed to write archive file '{}': {source}", path.display())]
    ArchiveWrite {
        /// Archive destination
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A configuration file could not be read or parsed.
    #[error("failed to load config from '{}': {message}", path.display())]
    ConfigLoad {
        /// Path to the configuration file
        path: PathBuf,
        /// Error message
        message: String,
    },

    /// The event source could not be opened or read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Creates a new event field error.
    pub fn event_field(field: &'static str, message: impl Into<String>) -> Self {
        Self::EventField {
            field,
            message: message.into(),
        }
    }

    /// Creates a new config load error.
    pub fn config_load(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ConfigLoad {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Returns the CLI exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::ConfigLoad { .. } => 2,
            Error::Io(_) => 3,
            _ => 1,
        }
    }
}
