//! Error types for pwswitch.

use std::io;
use thiserror::Error;

/// Result type for pwswitch operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for pwswitch operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Serial port error (opening or configuring the connection).
    #[cfg(feature = "native")]
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),

    /// Listing the available serial ports failed.
    #[cfg(feature = "native")]
    #[error("get ports list: {0}")]
    Enumerate(#[source] serialport::Error),

    /// No available port name contains the device pattern.
    #[error("the target port is not found (looking for {pattern:?})")]
    PortNotFound {
        /// Substring that was searched for.
        pattern: String,
    },

    /// Writing the command line to the connection failed.
    #[error("send request: {0}")]
    SendRequest(#[source] io::Error),

    /// Reading from the connection failed for a reason other than a timeout.
    #[error("read response: {0}")]
    ReadResponse(#[source] io::Error),

    /// A received line could not be turned into a response.
    #[error("parse response at {index}: {source}")]
    ParseResponse {
        /// 0-based index of the offending line within the exchange.
        index: usize,
        /// What was wrong with the line.
        #[source]
        source: ResponseError,
    },
}

/// Failure to parse a single response line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResponseError {
    /// The device answered with the `ERROR` sentinel.
    #[error("got error response")]
    Device,

    /// The line matched none of the known responses.
    #[error("invalid response: {0:?}")]
    Invalid(String),
}

impl Error {
    /// Returns the response error if this is a protocol failure.
    #[must_use]
    pub fn response_error(&self) -> Option<&ResponseError> {
        match self {
            Self::ParseResponse { source, .. } => Some(source),
            _ => None,
        }
    }
}
