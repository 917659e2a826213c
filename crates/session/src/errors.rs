//! Error type for session construction and the request/decode round trip.

use envelope::{EnvelopeError, SENTINEL_STATUS};
use thiserror::Error;

/// Everything a [`crate::Session`] call can fail with.
///
/// Each variant identifies the stage that produced it. None of them are
/// retried by this crate; retry policy belongs to the caller.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The transport failed before a usable response existed, or while the
    /// body was being read.
    ///
    /// The original error is carried unchanged and displayed verbatim.
    #[error(transparent)]
    Transport(reqwest::Error),

    /// The platform answered with its anti-automation status.
    ///
    /// Displays as exactly the status code so callers matching on the message
    /// keep working; match on the variant where possible.
    #[error("{status}", status = SENTINEL_STATUS)]
    SentinelRejected,

    /// A response body arrived but did not yield the requested value.
    #[error(transparent)]
    Envelope(#[from] EnvelopeError),

    /// The session configuration does not describe a usable origin or header.
    ///
    /// Produced at construction time or when a request path cannot be joined
    /// onto the base URL.
    #[error("invalid session configuration: {message}")]
    InvalidConfig {
        /// Description of the configuration problem.
        message: String,
    },

    /// The underlying HTTP client could not be allocated.
    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),
}

impl SessionError {
    /// `true` for [`SessionError::SentinelRejected`].
    pub fn is_sentinel(&self) -> bool {
        matches!(self, Self::SentinelRejected)
    }

    /// The envelope error, when the failure happened after a body arrived.
    pub fn as_envelope(&self) -> Option<&EnvelopeError> {
        match self {
            Self::Envelope(error) => Some(error),
            _ => None,
        }
    }
}
