//! Credential tokens and the cookie scoping table they are seeded through.
//!
//! A logged-in browser session on the platform is identified by seven cookies.
//! Each one is represented here as a distinct newtype so the seven values
//! cannot be swapped by accident when a [`Credentials`] set is assembled, and
//! so none of them ever reaches a log line: `Debug` and `Display` redact the
//! value.
//!
//! Empty tokens are valid. They produce an empty-valued cookie rather than an
//! error; the platform decides what an empty token means.

// ---------------------------------------------------------------------------
// Macro for redacting String-wrapped tokens.
// Generates: struct, new(), as_str(), redacted Debug/Display, From impls.
// ---------------------------------------------------------------------------
macro_rules! credential_token {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Clone, Default, PartialEq, Eq, Hash)]
        pub struct $name(String);

        impl $name {
            /// Wraps a raw token value. Empty values are accepted.
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Returns the raw token value.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}([REDACTED])", stringify!($name))
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("[REDACTED]")
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }
    };
}

credential_token! {
    /// Account-wide auth token, carried in the root-scoped `GAT` cookie.
    Gat
}

credential_token! {
    /// Account session identifier, carried in the root-scoped `ISID` cookie.
    Isid
}

credential_token! {
    /// Web session identifier, carried in the `www`-scoped `_sid` cookie.
    Sid
}

credential_token! {
    /// Edge load-balancer affinity token, carried in the `acw_tc` cookie.
    AcwTc
}

credential_token! {
    /// Web login marker, carried in the `iget` cookie.
    Iget
}

credential_token! {
    /// Web API token, carried in the `token` cookie.
    Token
}

credential_token! {
    /// Device fingerprint identifier, carried in the `_guard_device_id` cookie.
    GuardDeviceId
}

// ---------------------------------------------------------------------------
// Cookie scoping
// ---------------------------------------------------------------------------

/// Which host a seeded cookie is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CookieScope {
    /// `.<root>`: sent to the bare domain and every subdomain.
    Root,
    /// `www.<root>`: sent to the `www` host only.
    Www,
}

impl CookieScope {
    /// The `Domain` attribute for this scope under `root`.
    pub fn domain(self, root: &str) -> String {
        match self {
            Self::Root => format!(".{root}"),
            Self::Www => format!("www.{root}"),
        }
    }

    /// The host a cookie of this scope must be stored against.
    ///
    /// A cookie store only accepts a `Domain` attribute that domain-matches the
    /// origin it is stored for, so `www`-scoped cookies go in through the `www`
    /// host.
    pub fn host(self, root: &str) -> String {
        match self {
            Self::Root => root.to_owned(),
            Self::Www => format!("www.{root}"),
        }
    }
}

/// One entry of the scoping table, paired with the value it will carry.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct SeedCookie<'a> {
    /// Cookie name the platform expects.
    pub name: &'static str,
    /// Host the cookie is scoped to.
    pub scope: CookieScope,
    /// Credential value, stored as-is; may be empty.
    pub value: &'a str,
}

impl std::fmt::Debug for SeedCookie<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeedCookie")
            .field("name", &self.name)
            .field("scope", &self.scope)
            .field("value", &"[REDACTED]")
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Credential set
// ---------------------------------------------------------------------------

/// The seven tokens a session is built from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    /// Seeded as `GAT` on the root domain.
    pub gat: Gat,
    /// Seeded as `ISID` on the root domain.
    pub isid: Isid,
    /// Seeded as `_sid` on the `www` host.
    pub sid: Sid,
    /// Seeded as `acw_tc` on the `www` host.
    pub acw_tc: AcwTc,
    /// Seeded as `iget` on the `www` host.
    pub iget: Iget,
    /// Seeded as `token` on the `www` host.
    pub token: Token,
    /// Seeded as `_guard_device_id` on the `www` host.
    pub guard_device_id: GuardDeviceId,
}

impl Credentials {
    /// Assembles a credential set. Argument order is fixed and matches the
    /// order the platform's login flow hands the values out in.
    pub fn new(
        gat: impl Into<Gat>,
        isid: impl Into<Isid>,
        sid: impl Into<Sid>,
        acw_tc: impl Into<AcwTc>,
        iget: impl Into<Iget>,
        token: impl Into<Token>,
        guard_device_id: impl Into<GuardDeviceId>,
    ) -> Self {
        Self {
            gat: gat.into(),
            isid: isid.into(),
            sid: sid.into(),
            acw_tc: acw_tc.into(),
            iget: iget.into(),
            token: token.into(),
            guard_device_id: guard_device_id.into(),
        }
    }

    /// The full cookie scoping table with this set's values filled in.
    pub fn seed_cookies(&self) -> [SeedCookie<'_>; 7] {
        [
            SeedCookie {
                name: "GAT",
                scope: CookieScope::Root,
                value: self.gat.as_str(),
            },
            SeedCookie {
                name: "ISID",
                scope: CookieScope::Root,
                value: self.isid.as_str(),
            },
            SeedCookie {
                name: "_guard_device_id",
                scope: CookieScope::Www,
                value: self.guard_device_id.as_str(),
            },
            SeedCookie {
                name: "_sid",
                scope: CookieScope::Www,
                value: self.sid.as_str(),
            },
            SeedCookie {
                name: "acw_tc",
                scope: CookieScope::Www,
                value: self.acw_tc.as_str(),
            },
            SeedCookie {
                name: "iget",
                scope: CookieScope::Www,
                value: self.iget.as_str(),
            },
            SeedCookie {
                name: "token",
                scope: CookieScope::Www,
                value: self.token.as_str(),
            },
        ]
    }
}
