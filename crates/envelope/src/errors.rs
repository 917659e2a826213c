//! Error type for the envelope decoding pipeline.
//!
//! [`EnvelopeError`] covers the three ways a response body that did arrive can
//! still fail to produce a value. Transport-level failures (no body at all, or
//! the sentinel status) are the `session` crate's concern and never appear
//! here.

use thiserror::Error;

/// The decode stage that rejected a response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecodeStage {
    /// The outer `{h, c}` wrapper.
    Outer,
    /// The application status carried in `h.c`.
    Application,
    /// The endpoint-specific payload in `c`.
    Inner,
}

impl std::fmt::Display for DecodeStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Outer => f.write_str("outer envelope"),
            Self::Application => f.write_str("application status"),
            Self::Inner => f.write_str("inner payload"),
        }
    }
}

/// Errors produced while unpacking a response body.
///
/// Variants are ordered by the stage that produces them; a body that fails an
/// earlier stage is never handed to a later one.
#[derive(Debug, Error)]
pub enum EnvelopeError {
    /// The body is not a well-formed envelope.
    ///
    /// Produced by: the first decode pass. The inner payload is not looked at.
    #[error("outer envelope parse failed: {source}")]
    OuterDecode {
        /// The underlying JSON error, unchanged.
        source: serde_json::Error,
    },

    /// The envelope parsed but its header reports a non-zero status.
    ///
    /// The platform uses this for expired or invalid login credentials among
    /// other things; the code is passed through uninterpreted.
    #[error("application error {code}: {message}")]
    Application {
        /// Value of `h.c`.
        code: i64,
        /// Value of `h.e`.
        message: String,
    },

    /// The envelope parsed and reported success, but `c` does not match the
    /// requested target shape.
    #[error("inner payload parse failed: {source}")]
    InnerDecode {
        /// The underlying JSON error, unchanged.
        source: serde_json::Error,
    },
}

impl EnvelopeError {
    /// Which stage produced this error.
    pub fn stage(&self) -> DecodeStage {
        match self {
            Self::OuterDecode { .. } => DecodeStage::Outer,
            Self::Application { .. } => DecodeStage::Application,
            Self::InnerDecode { .. } => DecodeStage::Inner,
        }
    }
}
