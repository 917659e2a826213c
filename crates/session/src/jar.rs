//! The cookie store behind a [`crate::Session`].
//!
//! Wraps the same `cookie_store` engine `reqwest`'s own `Jar` uses, but seeds
//! it from structured name/value pairs instead of `Set-Cookie` text. A
//! credential value is therefore stored exactly as given: `;`, surrounding
//! whitespace or non-ASCII text cannot add attributes, truncate the value, or
//! knock another cookie out of the jar.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use cookie::Cookie;
use envelope::SeedCookie;
use reqwest::cookie::CookieStore;
use reqwest::header::HeaderValue;
use reqwest::Url;
use tracing::warn;

use crate::SessionError;

/// Thread-safe cookie store handed to the session's HTTP client.
#[derive(Default)]
pub(crate) struct CredentialJar(RwLock<cookie_store::CookieStore>);

impl CredentialJar {
    /// Stores `seed` against `origin` with its scope's `Domain` and `Path=/`.
    pub(crate) fn seed(
        &self,
        seed: &SeedCookie<'_>,
        root: &str,
        origin: &Url,
    ) -> Result<(), SessionError> {
        let cookie = Cookie::build((seed.name, seed.value.to_owned()))
            .domain(seed.scope.domain(root))
            .path("/")
            .build();
        self.0
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert_raw(&cookie, origin)
            .map(|_| ())
            .map_err(|error| SessionError::InvalidConfig {
                message: format!("cookie {} rejected for {origin}: {error}", seed.name),
            })
    }

    /// Name/value pairs the store would send to `url`, exactly as stored.
    pub(crate) fn values(&self, url: &Url) -> BTreeMap<String, String> {
        self.0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get_request_values(url)
            .map(|(name, value)| (name.to_owned(), value.to_owned()))
            .collect()
    }
}

impl CookieStore for CredentialJar {
    fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, url: &Url) {
        let cookies = cookie_headers.filter_map(|header| {
            let text = std::str::from_utf8(header.as_bytes()).ok()?;
            Cookie::parse(text).ok().map(Cookie::into_owned)
        });
        self.0
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .store_response_cookies(cookies, url);
    }

    fn cookies(&self, url: &Url) -> Option<HeaderValue> {
        let store = self.0.read().unwrap_or_else(PoisonError::into_inner);
        let header = store
            .get_request_values(url)
            .filter(|(name, value)| {
                let sendable = header_safe(name) && header_safe(value);
                if !sendable {
                    warn!(cookie = *name, "cookie holds control characters; not sent");
                }
                sendable
            })
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; ");
        if header.is_empty() {
            return None;
        }
        HeaderValue::from_bytes(header.as_bytes()).ok()
    }
}

/// Bytes a header value may carry: tab, visible ASCII, space and obs-text.
fn header_safe(text: &str) -> bool {
    text.bytes().all(|b| b == b'\t' || (b >= 0x20 && b != 0x7f))
}

#[cfg(test)]
mod tests {
    use envelope::{CookieScope, Credentials};

    use super::*;

    fn seeded(credentials: &Credentials) -> CredentialJar {
        let jar = CredentialJar::default();
        let root: Url = "https://dedao.cn/".parse().expect("url");
        let www: Url = "https://www.dedao.cn/".parse().expect("url");
        for cookie in credentials.seed_cookies() {
            let origin = match cookie.scope {
                CookieScope::Root => &root,
                CookieScope::Www => &www,
            };
            jar.seed(&cookie, "dedao.cn", origin).expect("seed");
        }
        jar
    }

    #[test]
    fn values_with_separators_are_stored_verbatim() {
        let jar = seeded(&Credentials::new(
            "a; Max-Age=0",
            "plain",
            "a;b",
            " padded ",
            "登录",
            "x=y",
            "",
        ));
        let www = jar.values(&"https://www.dedao.cn/".parse().expect("url"));

        assert_eq!(www.len(), 7);
        assert_eq!(www["GAT"], "a; Max-Age=0");
        assert_eq!(www["ISID"], "plain");
        assert_eq!(www["_sid"], "a;b");
        assert_eq!(www["acw_tc"], " padded ");
        assert_eq!(www["iget"], "登录");
        assert_eq!(www["token"], "x=y");
        assert_eq!(www["_guard_device_id"], "");
    }

    #[test]
    fn request_header_carries_only_cookies_in_scope() {
        let jar = seeded(&Credentials::new("g", "i", "s", "a", "n", "t", "d"));

        let root = jar
            .cookies(&"https://m.dedao.cn/x".parse().expect("url"))
            .expect("root cookies apply to subdomains");
        let root = root.to_str().expect("ascii header");
        assert!(root.contains("GAT=g"));
        assert!(root.contains("ISID=i"));
        assert!(!root.contains("token="));

        assert!(jar
            .cookies(&"https://example.com/".parse().expect("url"))
            .is_none());
    }

    #[test]
    fn non_ascii_values_reach_the_request_header() {
        let jar = seeded(&Credentials::new("登录", "i", "", "", "", "", ""));
        let header = jar
            .cookies(&"https://dedao.cn/".parse().expect("url"))
            .expect("header");
        let text = String::from_utf8_lossy(header.as_bytes());
        assert!(text.contains("GAT=登录"));
    }

    #[test]
    fn control_characters_keep_a_cookie_out_of_the_header_only() {
        let jar = seeded(&Credentials::new("bad\nvalue", "i", "", "", "", "", ""));
        let url: Url = "https://dedao.cn/".parse().expect("url");

        assert_eq!(jar.values(&url)["GAT"], "bad\nvalue");
        let header = jar.cookies(&url).expect("ISID still sent");
        assert_eq!(header.to_str().expect("ascii"), "ISID=i");
    }

    #[test]
    fn response_cookies_are_stored() {
        let jar = CredentialJar::default();
        let url: Url = "https://www.dedao.cn/api".parse().expect("url");
        let header = HeaderValue::from_static("acw_sc=fresh; Path=/");
        jar.set_cookies(&mut std::iter::once(&header), &url);

        assert_eq!(jar.values(&url)["acw_sc"], "fresh");
    }
}
