//! Error types exposed by the request listing pipeline.

use thiserror::Error;

/// Errors surfaced while loading configuration, talking to a provider, or
/// rendering the final listing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RequestListError {
    /// Configuration could not be loaded or failed validation.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },

    /// Networking failed while calling a provider.
    #[error("network error: {message}")]
    Transport {
        /// Transport-level error detail.
        message: String,
    },

    /// A provider response could not be decoded.
    #[error("decode error: {message}")]
    Decode {
        /// Describes which part of the response was malformed.
        message: String,
    },

    /// The provider answered with a non-success HTTP status.
    #[error("provider API error (status {status}): {message}")]
    Api {
        /// HTTP status code returned by the provider.
        status: u16,
        /// Request description and response body excerpt.
        message: String,
    },

    /// The fetch was cancelled before it completed.
    #[error("request listing cancelled")]
    Cancelled,

    /// Local I/O operation failed.
    #[error("I/O error: {message}")]
    Io {
        /// Error detail from the underlying I/O operation.
        message: String,
    },
}

impl RequestListError {
    /// Builds a [`RequestListError::Configuration`] from any displayable
    /// message.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Builds a [`RequestListError::Decode`] from any displayable message.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }
}

/// Converts an I/O error to a [`RequestListError::Io`].
pub(crate) fn io_error(error: &std::io::Error) -> RequestListError {
    RequestListError::Io {
        message: error.to_string(),
    }
}
