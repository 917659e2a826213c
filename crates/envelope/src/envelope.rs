//! The response envelope and the two-pass decoder.
//!
//! Every API response from the platform has the same outer shape:
//!
//! ```json
//! { "h": { "c": 0, "e": "", "s": 0, "t": 0 }, "c": <endpoint-specific JSON> }
//! ```
//!
//! The shape of `c` varies per endpoint, so the first pass captures it verbatim
//! as a [`RawValue`] and the second pass decodes that captured text into
//! whatever type the caller asks for. The two passes fail with different
//! [`EnvelopeError`] variants so a caller can tell "no valid envelope" apart
//! from "valid envelope, wrong payload shape".

use std::io::Read;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::value::RawValue;
use tracing::{debug, warn};

use crate::EnvelopeError;

/// JSON text an absent `c` field decodes as.
const ABSENT_CONTENT: &str = "null";

/// The `h` object of an envelope.
///
/// Missing or `null` fields default to zero or empty, so a body without `h`
/// at all, or with `"h": null`, reads as a success header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvelopeHeader {
    /// Application status; `0` means success.
    #[serde(rename = "c", deserialize_with = "null_as_default")]
    pub code: i64,
    /// Human-readable reason accompanying a non-zero `code`.
    #[serde(rename = "e", deserialize_with = "null_as_default")]
    pub message: String,
    /// Opaque server integer, passed through.
    #[serde(deserialize_with = "null_as_default")]
    pub s: i64,
    /// Opaque server integer, passed through.
    #[serde(deserialize_with = "null_as_default")]
    pub t: i64,
}

impl EnvelopeHeader {
    /// A success header with every other field zeroed.
    pub fn success() -> Self {
        Self::default()
    }

    /// A failure header carrying `code` and `message`.
    pub fn failure(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            ..Self::default()
        }
    }
}

/// The outer wrapper of every API response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    /// Application status header; see [`EnvelopeHeader`].
    #[serde(rename = "h", default, deserialize_with = "null_as_default")]
    pub header: EnvelopeHeader,
    #[serde(rename = "c", default, skip_serializing_if = "Option::is_none")]
    content: Option<Box<RawValue>>,
}

impl Envelope {
    /// Wraps `content` under `header`, serialising it once into raw JSON.
    pub fn new<T: Serialize>(
        header: EnvelopeHeader,
        content: &T,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            header,
            content: Some(serde_json::value::to_raw_value(content)?),
        })
    }

    /// First decode pass over an in-memory body.
    pub fn from_slice(body: &[u8]) -> Result<Self, EnvelopeError> {
        serde_json::from_slice(body).map_err(outer_failure)
    }

    /// First decode pass over a streaming body.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, EnvelopeError> {
        serde_json::from_reader(reader).map_err(outer_failure)
    }

    /// `true` when the header reports success (`h.c == 0`).
    pub fn is_success(&self) -> bool {
        self.header.code == 0
    }

    /// Fails with [`EnvelopeError::Application`] unless the header reports
    /// success.
    pub fn ensure_success(&self) -> Result<(), EnvelopeError> {
        if self.is_success() {
            return Ok(());
        }
        warn!(
            code = self.header.code,
            reason = %self.header.message,
            "envelope reports application failure"
        );
        Err(EnvelopeError::Application {
            code: self.header.code,
            message: self.header.message.clone(),
        })
    }

    /// The captured `c` field exactly as it appeared on the wire, or `null`
    /// when the field was absent.
    pub fn content_str(&self) -> &str {
        self.content
            .as_deref()
            .map(RawValue::get)
            .unwrap_or(ABSENT_CONTENT)
    }

    /// Second decode pass: reads the captured content as `T`.
    ///
    /// Does not look at the header; see [`Envelope::ensure_success`].
    pub fn content<T: DeserializeOwned>(&self) -> Result<T, EnvelopeError> {
        serde_json::from_str(self.content_str()).map_err(|source| {
            debug!(error = %source, "inner payload did not match target shape");
            EnvelopeError::InnerDecode { source }
        })
    }
}

/// Decodes a complete response body into `T`.
///
/// Runs the outer pass, enforces `h.c == 0`, then decodes `c`. The first
/// failing stage ends the call.
pub fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, EnvelopeError> {
    let envelope = Envelope::from_slice(body)?;
    envelope.ensure_success()?;
    envelope.content()
}

/// Streaming counterpart of [`decode`].
pub fn decode_reader<T: DeserializeOwned, R: Read>(reader: R) -> Result<T, EnvelopeError> {
    let envelope = Envelope::from_reader(reader)?;
    envelope.ensure_success()?;
    envelope.content()
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn outer_failure(source: serde_json::Error) -> EnvelopeError {
    debug!(error = %source, "response body is not a valid envelope");
    EnvelopeError::OuterDecode { source }
}
