//! Error types for the submit module.
//!
//! Every way a submission can end badly maps to one variant here. The
//! `Display` output is what ends up in the status display after the
//! failure banner, so messages are written for the person at the keyboard.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while submitting a time sheet and staging the result.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// A field that must hold JSON text could not be parsed.
    #[error("Failed to read {field}: {source}")]
    InvalidJson {
        /// Name of the offending form field.
        field: String,
        /// The parser error.
        #[source]
        source: serde_json::Error,
    },

    /// The server answered with something other than 200.
    ///
    /// `reason` is the response body, which the server fills with a
    /// human-readable explanation (one line per problem).
    #[error("{reason}")]
    Rejected {
        /// The HTTP status code.
        status: u16,
        /// The response body as text.
        reason: String,
    },

    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error posting to {url}: {source}")]
    Network {
        /// The endpoint that was being contacted.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before completion.
    #[error("timeout posting to {url}")]
    Timeout {
        /// The endpoint that timed out.
        url: String,
    },

    /// The configured server URL cannot be used as a base for the endpoint.
    #[error("invalid server URL: {url}")]
    InvalidEndpoint {
        /// The invalid URL string.
        url: String,
    },

    /// File system error while staging the artifact.
    #[error("IO error writing to {path}: {source}")]
    Io {
        /// Where the artifact was being written.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl SubmitError {
    /// Creates a JSON parse error for the named field.
    pub fn invalid_json(field: impl Into<String>, source: serde_json::Error) -> Self {
        Self::InvalidJson {
            field: field.into(),
            source,
        }
    }

    /// Creates a server rejection error.
    pub fn rejected(status: u16, reason: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            reason: reason.into(),
        }
    }

    /// Creates a network error from a reqwest error, promoting timeouts.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            return Self::Timeout { url: url.into() };
        }
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates an invalid endpoint error.
    pub fn invalid_endpoint(url: impl Into<String>) -> Self {
        Self::InvalidEndpoint { url: url.into() }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

// No From<reqwest::Error> / From<std::io::Error>: every variant needs the
// url or path the caller is working with.
