//! Cookie core types.
//!
//! This module defines the [`Cookie`] record held by the
//! [`CookieManager`](crate::cookies::CookieManager) and the type-erased
//! [`HostCookieStoreHandle`] it writes through.
//!
//! A [`Cookie`] is serialized into the same string a page would assign to
//! `document.cookie`:
//!
//! ```rust
//! use gosub_doc_cookies::cookies::Cookie;
//!
//! let c = Cookie::new("session", "abc123")
//!     .with_path("/")
//!     .with_domain("example.com")
//!     .with_secure(true);
//!
//! assert_eq!(c.serialize(), "session=abc123; path=/; domain=example.com; secure");
//! ```
//!
//! Names and values are written as-is. Callers must keep `;` and `=` out of
//! them, otherwise the host store will read back something different.

use std::fmt;
use std::sync::Arc;

use log::debug;
use serde::{Deserialize, Serialize};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

use crate::cookies::store::HostCookieStore;

/// HTTP date as written in `expires` (`Wed, 09 Jun 2021 10:18:14 GMT`).
const HTTP_DATE: &[BorrowedFormatItem<'static>] = format_description!(
    "[weekday repr:short], [day] [month repr:short] [year] [hour]:[minute]:[second] GMT"
);

/// Date and time part of an HTTP date, without the zone.
pub(crate) const HTTP_DATE_TIME: &[BorrowedFormatItem<'static>] = format_description!(
    "[weekday repr:short], [day] [month repr:short] [year] [hour]:[minute]:[second]"
);

/// A handle to a host cookie store.
///
/// Stores must be `Send + Sync` and internally synchronized, since callers
/// only hold `&self` when invoking trait methods.
pub type HostCookieStoreHandle = Arc<dyn HostCookieStore + Send + Sync>;

/// A single cookie as seen by a document.
///
/// A cookie with an empty `name` only exists while a cookie string is being
/// parsed; it never ends up inside a manager.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    /// Cookie name (case-sensitive).
    pub name: String,

    /// Raw cookie value (not URL-decoded). May be empty.
    pub value: String,

    /// Expiration timestamp. Session cookies have `None`.
    #[serde(with = "time::serde::timestamp::option")]
    pub expires: Option<OffsetDateTime>,

    /// Path scoping (e.g. `"/"`). Always starts with a slash when present.
    pub path: Option<String>,

    /// Domain scoping, kept verbatim.
    pub domain: Option<String>,

    /// If `true`, the cookie is only sent over secure connections.
    pub secure: bool,
}

impl Cookie {
    /// Creates a session cookie without any attributes.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            ..Self::default()
        }
    }

    pub fn with_expires(mut self, expires: OffsetDateTime) -> Self {
        self.expires = Some(expires);
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Produces the string written to the host store:
    /// `name=value[; expires=<date>][; path=<path>][; domain=<domain>][; secure]`.
    pub fn serialize(&self) -> String {
        let mut parts = vec![format!("{}={}", self.name, self.value)];

        if let Some(expires) = self.expires {
            match format_http_date(expires) {
                Ok(date) => parts.push(format!("expires={date}")),
                Err(err) => debug!("omitting unformattable expires on cookie `{}`: {err}", self.name),
            }
        }
        if let Some(path) = &self.path {
            parts.push(format!("path={path}"));
        }
        if let Some(domain) = &self.domain {
            parts.push(format!("domain={domain}"));
        }
        if self.secure {
            parts.push("secure".to_string());
        }

        parts.join("; ")
    }

    /// Returns `true` when the cookie carries an expiry at or before `now`.
    pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
        self.expires.is_some_and(|expires| expires <= now)
    }

    /// Blanks the value and expires the cookie at the Unix epoch. Writing the
    /// result to a host store makes the host evict it.
    pub fn expire(&mut self) {
        self.value.clear();
        self.expires = Some(OffsetDateTime::UNIX_EPOCH);
    }
}

impl fmt::Display for Cookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}

/// Formats `at` as an HTTP date (`Wed, 09 Jun 2021 10:18:14 GMT`).
pub fn format_http_date(at: OffsetDateTime) -> Result<String, time::error::Format> {
    at.to_offset(UtcOffset::UTC).format(HTTP_DATE)
}
