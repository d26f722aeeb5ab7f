use std::sync::{PoisonError, RwLock};

use log::debug;
use time::OffsetDateTime;

use crate::cookies::parser::{parse_cookie_string, ParseOptions};
use crate::cookies::store::HostCookieStore;
use crate::cookies::Cookie;

/// In-memory host cookie store (no persistence).
///
/// Behaves like a browser jar as far as a document can tell: writes are
/// merged by name, path and domain, cookies expiring at or before "now" are
/// evicted, and reads only expose `name=value` pairs in insertion order.
/// Every raw write is recorded so callers can inspect what reached the host.
#[derive(Default)]
pub struct InMemoryHostStore {
    jar: RwLock<Vec<Cookie>>,
    writes: RwLock<Vec<String>>,
}

impl InMemoryHostStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated from a `document.cookie`-style string.
    ///
    /// Seeding is not counted as writes.
    pub fn from_cookie_string(raw: &str) -> Self {
        let store = Self::new();
        {
            let mut jar = store.jar.write().unwrap_or_else(PoisonError::into_inner);
            let now = OffsetDateTime::now_utc();
            for cookie in parse_cookie_string(raw, ParseOptions::default()) {
                merge(&mut jar, cookie, now);
            }
        }
        store
    }

    /// All serialized cookies written so far, oldest first.
    pub fn writes(&self) -> Vec<String> {
        self.writes.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn write_count(&self) -> usize {
        self.writes.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Snapshot of the cookies currently held, including their attributes.
    pub fn cookies(&self) -> Vec<Cookie> {
        self.jar.read().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl HostCookieStore for InMemoryHostStore {
    fn read(&self) -> String {
        let now = OffsetDateTime::now_utc();
        self.jar
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|c| !c.is_expired_at(now))
            .map(|c| format!("{}={}", c.name, c.value))
            .collect::<Vec<_>>()
            .join("; ")
    }

    fn write(&self, serialized: &str) {
        self.writes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(serialized.to_string());

        let parsed = parse_cookie_string(serialized, ParseOptions::default());
        let Some(cookie) = parsed.into_iter().next() else {
            debug!("host store ignored write without a cookie name: `{serialized}`");
            return;
        };

        let mut jar = self.jar.write().unwrap_or_else(PoisonError::into_inner);
        merge(&mut jar, cookie, OffsetDateTime::now_utc());
    }
}

// Replaces (or evicts) the cookie sharing name, path and domain.
fn merge(jar: &mut Vec<Cookie>, cookie: Cookie, now: OffsetDateTime) {
    let existing = jar
        .iter()
        .position(|c| c.name == cookie.name && c.path == cookie.path && c.domain == cookie.domain);

    match (existing, cookie.is_expired_at(now)) {
        (Some(idx), true) => {
            debug!("host store evicting cookie `{}`", cookie.name);
            jar.remove(idx);
        }
        (Some(idx), false) => jar[idx] = cookie,
        (None, true) => {}
        (None, false) => jar.push(cookie),
    }
}
