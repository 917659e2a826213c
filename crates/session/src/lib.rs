//! Cookie-authenticated session for the dedao web API.
//!
//! Builds a [`Session`] from a seven-token [`envelope::Credentials`] set, issues
//! requests through it, and unpacks every response through the platform's
//! two-layer envelope.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** HTTP transport, cookie jar seeding and the transport
//! gate live here. Envelope semantics come from the [`envelope`] crate; this
//! crate only decides whether a response has a body worth decoding.
//!
//! ## Response pipeline
//!
//! | Stage | Failure |
//! |-------|---------|
//! | transport | [`SessionError::Transport`] |
//! | status 452 | [`SessionError::SentinelRejected`] |
//! | outer envelope | [`envelope::EnvelopeError::OuterDecode`] |
//! | `h.c != 0` | [`envelope::EnvelopeError::Application`] |
//! | inner payload | [`envelope::EnvelopeError::InnerDecode`] |
//!
//! Nothing is retried. Credentials are never refreshed and nothing is written
//! to disk.

pub mod config;
pub mod errors;
mod jar;
pub mod response;
pub mod session;

pub use config::SessionConfig;
pub use errors::SessionError;
pub use response::{decode, gate};
pub use session::Session;
