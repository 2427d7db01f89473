//! Error types for the solarstrip crate.

use thiserror::Error;

/// Errors that can occur while fetching telemetry or driving the strip.
///
/// There is no recovery path for any of these: every variant propagates
/// to the top-level boundary in the binary, which logs it and exits
/// non-zero without touching the strip state.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// Inverter returned a non-success status code
    #[error("inverter returned status {status}: {body}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body
        body: String,
    },

    /// Malformed or incomplete inverter payload
    #[error("unexpected inverter payload: {0}")]
    Payload(String),

    /// History file could not be read, parsed, or written
    #[error("history file {path}: {message}")]
    History {
        /// Path of the history file
        path: String,
        /// What went wrong
        message: String,
    },

    /// LED driver failure
    #[cfg(feature = "hardware")]
    #[error("LED driver error: {0}")]
    Driver(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Request(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Payload(err.to_string())
    }
}

#[cfg(feature = "hardware")]
impl From<rs_ws281x::WS2811Error> for Error {
    fn from(err: rs_ws281x::WS2811Error) -> Self {
        Error::Driver(err.to_string())
    }
}
