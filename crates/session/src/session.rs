use std::collections::BTreeMap;
use std::sync::Arc;

use envelope::{CookieScope, Credentials};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::config::SessionConfig;
use crate::jar::CredentialJar;
use crate::response::decode;
use crate::SessionError;

/// An authenticated handle on the platform API.
///
/// Owns one HTTP client and the cookie jar that client reads and updates.
/// Build one per login and pass it by reference to every call site; the jar
/// is internally synchronised, so concurrent calls through `&Session` are
/// fine.
pub struct Session {
    http: Client,
    jar: Arc<CredentialJar>,
    base_url: Url,
    root_origin: Url,
    www_origin: Url,
}

impl Session {
    /// Builds a session against the production platform.
    pub fn new(credentials: &Credentials) -> Result<Self, SessionError> {
        Self::with_config(credentials, &SessionConfig::default())
    }

    /// Builds a session from an explicit configuration.
    ///
    /// Starts from an empty jar and seeds exactly the seven credential
    /// cookies. No network I/O happens here.
    pub fn with_config(
        credentials: &Credentials,
        config: &SessionConfig,
    ) -> Result<Self, SessionError> {
        let base_url = config.parsed_base_url()?;
        let root_origin = config.cookie_origin(CookieScope::Root)?;
        let www_origin = config.cookie_origin(CookieScope::Www)?;
        let root = config.normalized_root();

        let jar = Arc::new(CredentialJar::default());
        for cookie in credentials.seed_cookies() {
            let origin = match cookie.scope {
                CookieScope::Root => &root_origin,
                CookieScope::Www => &www_origin,
            };
            jar.seed(&cookie, root, origin)?;
            debug!(
                cookie = cookie.name,
                domain = %cookie.scope.domain(root),
                "seeded credential cookie"
            );
        }

        let mut builder = Client::builder()
            .cookie_provider(Arc::clone(&jar))
            .default_headers(build_headers(config)?);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = config.user_agent.as_deref() {
            builder = builder.user_agent(user_agent);
        }
        let http = builder.build().map_err(SessionError::Build)?;

        debug!(base_url = %base_url, root, "session ready");
        Ok(Self {
            http,
            jar,
            base_url,
            root_origin,
            www_origin,
        })
    }

    /// The origin request paths are joined onto.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Current cookies visible to the bare platform origin, by name.
    ///
    /// Only root-scoped cookies are reported; `www`-scoped ones are not sent to
    /// the bare domain. Values are returned as-is for external persistence.
    pub fn cookies(&self) -> BTreeMap<String, String> {
        self.cookies_for(&self.root_origin)
    }

    /// Current cookies visible to the `www` platform origin, which includes
    /// every seeded credential cookie.
    pub fn www_cookies(&self) -> BTreeMap<String, String> {
        self.cookies_for(&self.www_origin)
    }

    /// Current cookies the jar would send to `url`, by name.
    ///
    /// Values come straight from the store, so they match what was seeded
    /// byte for byte whatever characters they contain.
    pub fn cookies_for(&self, url: &Url) -> BTreeMap<String, String> {
        self.jar.values(url)
    }

    /// Resolves `path` against the base URL.
    pub fn endpoint(&self, path: &str) -> Result<Url, SessionError> {
        self.base_url
            .join(path)
            .map_err(|error| SessionError::InvalidConfig {
                message: format!("cannot join {path:?} onto {}: {error}", self.base_url),
            })
    }

    /// Starts a request to `path` on the base origin.
    pub fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, SessionError> {
        Ok(self.http.request(method, self.endpoint(path)?))
    }

    /// Starts a `GET` to `path`.
    pub fn get(&self, path: &str) -> Result<RequestBuilder, SessionError> {
        self.request(Method::GET, path)
    }

    /// Starts a `POST` to `path`.
    pub fn post(&self, path: &str) -> Result<RequestBuilder, SessionError> {
        self.request(Method::POST, path)
    }

    /// Performs `request` through this session's client and returns the raw
    /// transport result, undecoded.
    pub async fn send(&self, request: RequestBuilder) -> Result<Response, reqwest::Error> {
        let request = request.build()?;
        debug!(method = %request.method(), url = %request.url(), "sending request");
        self.http.execute(request).await
    }

    /// Performs `request` and decodes the envelope content as `T`.
    pub async fn call<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, SessionError> {
        decode(self.send(request).await).await
    }

    /// `GET`s `path` and decodes the envelope content as `T`.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, SessionError> {
        self.call(self.get(path)?).await
    }

    /// `POST`s `body` as JSON to `path` and decodes the envelope content as
    /// `T`.
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, SessionError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.call(self.post(path)?.json(body)).await
    }
}

impl std::fmt::Debug for Session {
    // The jar holds credential values; keep it out of debug output.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("base_url", &self.base_url.as_str())
            .field("root_origin", &self.root_origin.as_str())
            .field("www_origin", &self.www_origin.as_str())
            .finish_non_exhaustive()
    }
}

fn build_headers(config: &SessionConfig) -> Result<HeaderMap, SessionError> {
    let mut headers = HeaderMap::new();
    for (key, value) in &config.extra_headers {
        headers.insert(
            HeaderName::from_bytes(key.as_bytes()).map_err(|_| SessionError::InvalidConfig {
                message: format!("invalid header key: {key}"),
            })?,
            HeaderValue::from_str(value).map_err(|_| SessionError::InvalidConfig {
                message: format!("invalid header value for {key}"),
            })?,
        );
    }
    Ok(headers)
}
