//! Platform domain for the dedao session layer.
//!
//! This crate contains every domain concept the session layer works with: the
//! platform's fixed origins, the seven-token credential set and the cookie
//! scoping table it is seeded through, the response envelope wire format, and
//! the second-stage decoder that unpacks an envelope into a caller-chosen type.
//!
//! ## Architectural Layer
//!
//! **Business logic.** This crate has no I/O dependencies. It decides *what* a
//! response means; the `session` crate decides *how* bytes get here.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`platform`] | Platform root domain, API origin, sentinel status |
//! | [`credentials`] | Redacting credential tokens, [`Credentials`], cookie scoping |
//! | [`envelope`] | [`Envelope`] wire types and the [`decode`] pipeline |
//! | [`errors`] | [`EnvelopeError`] and [`DecodeStage`] |

pub mod credentials;
pub mod envelope;
pub mod errors;
pub mod platform;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use credentials::{
    AcwTc, CookieScope, Credentials, Gat, GuardDeviceId, Iget, Isid, SeedCookie, Sid, Token,
};
pub use envelope::{decode, decode_reader, Envelope, EnvelopeHeader};
pub use errors::{DecodeStage, EnvelopeError};
pub use platform::{BASE_URL, PLATFORM_ROOT, SENTINEL_STATUS};
