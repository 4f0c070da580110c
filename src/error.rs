//! Error types for EC2 metadata discovery.

use std::collections::TryReserveError;

use thiserror::Error;

/// Errors that can occur during an EC2 metadata discovery attempt.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// The preflight probe did not identify the host as an EC2 instance.
    #[error("host does not look like an EC2 instance")]
    NotDetected,

    /// A field buffer could not be allocated.
    #[error("failed to allocate field buffer")]
    Alloc(#[from] TryReserveError),

    /// Request exceeded the fixed per-request timeout.
    #[error("request timeout")]
    Timeout,

    /// Transport-level failure (connect, DNS, aborted transfer).
    #[error("transport failure: {0}")]
    Transport(reqwest::Error),

    /// The metadata service answered with a non-200 status.
    #[error("http {0}")]
    HttpStatus(u16),

    /// Response body would overflow the fixed field capacity.
    #[error("response body of {len} bytes exceeds field capacity of {limit} bytes")]
    Overflow { len: usize, limit: usize },

    /// Response body was not valid UTF-8.
    #[error("invalid utf-8 in response body")]
    Utf8,
}

impl From<reqwest::Error> for MetadataError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            MetadataError::Timeout
        } else {
            MetadataError::Transport(err)
        }
    }
}
