//! Transport settings for a session.
//!
//! Defaults point at the production platform. Tests and staging setups swap
//! the base URL and platform root; the cookie origins are derived from the
//! root, never configured separately.

use std::collections::BTreeMap;
use std::time::Duration;

use envelope::{CookieScope, BASE_URL, PLATFORM_ROOT};
use reqwest::Url;

use crate::SessionError;

/// Transport configuration for a [`crate::Session`].
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Origin every request path is joined onto.
    pub base_url: String,
    /// Bare platform domain the credential cookies are scoped under.
    pub platform_root: String,
    /// Optional `User-Agent` override.
    pub user_agent: Option<String>,
    /// Additional headers sent with every request.
    pub extra_headers: BTreeMap<String, String>,
    /// Optional whole-request timeout, enforced by the transport.
    pub timeout: Option<Duration>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            platform_root: PLATFORM_ROOT.to_string(),
            user_agent: None,
            extra_headers: BTreeMap::new(),
            timeout: None,
        }
    }
}

impl SessionConfig {
    /// Replaces the origin request paths are joined onto.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Replaces the domain cookies are scoped under. A leading `.` is ignored.
    pub fn with_platform_root(mut self, platform_root: impl Into<String>) -> Self {
        self.platform_root = platform_root.into();
        self
    }

    /// Sends `user_agent` as the `User-Agent` header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Bounds each whole request, connect to last body byte.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Adds a header to every request, replacing an earlier one of the same
    /// name.
    pub fn insert_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.insert(key.into(), value.into());
        self
    }

    pub(crate) fn parsed_base_url(&self) -> Result<Url, SessionError> {
        let base = self.base_url.trim();
        let url = Url::parse(base).map_err(|error| SessionError::InvalidConfig {
            message: format!("invalid base URL {base:?}: {error}"),
        })?;
        if url.cannot_be_a_base() {
            return Err(SessionError::InvalidConfig {
                message: format!("base URL {base:?} cannot carry a path"),
            });
        }
        Ok(url)
    }

    /// The origin cookies of `scope` are stored against and read back from.
    pub(crate) fn cookie_origin(&self, scope: CookieScope) -> Result<Url, SessionError> {
        let root = self.normalized_root();
        if root.is_empty() {
            return Err(SessionError::InvalidConfig {
                message: "platform root domain is empty".to_owned(),
            });
        }
        let origin = format!("https://{}/", scope.host(root));
        Url::parse(&origin).map_err(|error| SessionError::InvalidConfig {
            message: format!("invalid platform root {root:?}: {error}"),
        })
    }

    /// Platform root with surrounding whitespace and any leading dot removed.
    pub(crate) fn normalized_root(&self) -> &str {
        self.platform_root.trim().trim_start_matches('.')
    }
}
