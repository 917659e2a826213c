//! Fixed facts about the platform this client talks to.

/// Bare platform domain. Cookies scoped to `.<root>` are visible to every host.
pub const PLATFORM_ROOT: &str = "dedao.cn";

/// Origin every API request is issued against.
pub const BASE_URL: &str = "https://www.dedao.cn";

/// HTTP status the platform answers with when it wants an anti-automation
/// challenge solved instead of serving the request.
///
/// Not a registered status code; it is reported as its own error and never
/// treated as a generic transport failure.
pub const SENTINEL_STATUS: u16 = 452;
