//! Stage A of response handling: the transport gate.
//!
//! [`gate`] decides whether a transport result carries a body worth decoding
//! at all; [`decode`] runs the gate and then hands the body to
//! [`envelope::decode`] for the envelope and payload passes.

use envelope::SENTINEL_STATUS;
use reqwest::Response;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::SessionError;

/// Filters a raw transport result down to a response whose body should be
/// decoded.
///
/// - A transport error is returned unchanged as [`SessionError::Transport`].
/// - The sentinel status fails with [`SessionError::SentinelRejected`] without
///   reading the body.
/// - Any other status passes through, including non-2xx ones: the platform
///   reports most failures inside the envelope.
///
/// The response is owned by this function, so its body is released on every
/// path that does not hand it back.
pub fn gate(result: Result<Response, reqwest::Error>) -> Result<Response, SessionError> {
    let response = match result {
        Ok(response) => response,
        Err(error) => {
            debug!(error = %error, "transport failed before a usable response");
            return Err(SessionError::Transport(error));
        }
    };

    if response.status().as_u16() == SENTINEL_STATUS {
        warn!(
            url = %response.url(),
            status = SENTINEL_STATUS,
            "platform requested an anti-automation challenge"
        );
        drop(response);
        return Err(SessionError::SentinelRejected);
    }

    Ok(response)
}

/// Runs a transport result through the gate, the envelope pass, the
/// application status check and the payload pass, in that order.
pub async fn decode<T: DeserializeOwned>(
    result: Result<Response, reqwest::Error>,
) -> Result<T, SessionError> {
    let response = gate(result)?;
    let status = response.status();
    let body = response.bytes().await.map_err(SessionError::Transport)?;
    debug!(%status, bytes = body.len(), "decoding response envelope");

    envelope::decode(&body).map_err(|error| {
        debug!(stage = %error.stage(), "response body rejected");
        SessionError::from(error)
    })
}
