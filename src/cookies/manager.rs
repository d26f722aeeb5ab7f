//! Document cookie manager.
//!
//! [`CookieManager`] keeps an ordered, name-keyed view of the cookies a
//! document can see and mirrors every mutation into the host store it was
//! built with. The view is read from the host exactly once, at construction;
//! afterwards it only changes through the manager's own operations.
//!
//! ## Notes
//! - Removal does not drop the entry. The cookie is blanked and expired at
//!   the Unix epoch, which makes the host evict it; the manager keeps the
//!   blanked entry flagged as removed and treats it as absent in `get`,
//!   `has` and `keys` until the next `set` of that name.
//! - Cookies are keyed by name only. Two host cookies with the same name but
//!   different paths collapse into one entry (the later one wins).
//!
//! ```rust
//! use std::sync::Arc;
//! use gosub_doc_cookies::cookies::{CookieManager, InMemoryHostStore, SetOptions};
//!
//! let store = Arc::new(InMemoryHostStore::from_cookie_string("theme=dark"));
//! let mut cookies = CookieManager::new(store.clone());
//!
//! assert_eq!(cookies.get("theme"), Some("dark"));
//! assert!(!cookies.set("lang", "nl", SetOptions::new().path("/")));
//! assert_eq!(cookies.keys(), vec!["theme", "lang"]);
//! assert_eq!(store.writes(), vec!["lang=nl; path=/"]);
//! ```

use indexmap::IndexMap;
use log::debug;
use time::OffsetDateTime;

use crate::config::ManagerConfig;
use crate::cookies::parser::{is_valid_path, parse_cookie_string};
use crate::cookies::{Cookie, HostCookieStoreHandle};

/// Optional attributes for [`CookieManager::set`].
///
/// Anything left unset falls back to the manager's [`ManagerConfig`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetOptions {
    pub expires: Option<OffsetDateTime>,
    pub path: Option<String>,
    pub domain: Option<String>,
    pub secure: Option<bool>,
}

impl SetOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expires(mut self, at: OffsetDateTime) -> Self {
        self.expires = Some(at);
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = Some(secure);
        self
    }
}

/// A cookie plus whether `remove`/`clear` blanked it.
#[derive(Debug, Clone)]
struct Entry {
    cookie: Cookie,
    removed: bool,
}

impl Entry {
    fn live(cookie: Cookie) -> Self {
        Self { cookie, removed: false }
    }
}

/// Cookie view of a single document, kept in sync with its host store.
pub struct CookieManager {
    config: ManagerConfig,
    /// Host store every mutation is written to.
    store: HostCookieStoreHandle,
    /// Cookies by name, in the order they were first seen.
    cookies: IndexMap<String, Entry>,
}

impl CookieManager {
    /// Creates a manager with the default configuration.
    pub fn new(store: HostCookieStoreHandle) -> Self {
        Self::with_config(store, ManagerConfig::default())
    }

    /// Reads the host's cookie string once and builds the initial view.
    pub fn with_config(store: HostCookieStoreHandle, config: ManagerConfig) -> Self {
        let raw = store.read();

        let mut cookies = IndexMap::new();
        for cookie in parse_cookie_string(&raw, config.parse) {
            cookies.insert(cookie.name.clone(), Entry::live(cookie));
        }
        debug!("cookie manager loaded {} cookie(s) from host store", cookies.len());

        Self { config, store, cookies }
    }

    /// Parses a raw cookie string with this manager's parse options.
    pub fn parse(&self, raw: &str) -> Vec<Cookie> {
        parse_cookie_string(raw, self.config.parse)
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    pub fn store(&self) -> &HostCookieStoreHandle {
        &self.store
    }

    /// Returns the value of `name`, or `None` when no such cookie is present.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.live(name).map(|c| c.value.as_str())
    }

    /// Returns the full record for `name`.
    pub fn cookie(&self, name: &str) -> Option<&Cookie> {
        self.live(name)
    }

    /// Creates or overwrites `name` and writes it to the host store.
    ///
    /// Returns `true` when an existing entry was overwritten and `false` when
    /// a new cookie was created. Exactly one host write happens either way.
    /// An empty `name` is ignored: nothing is stored or written and `false`
    /// is returned.
    pub fn set(&mut self, name: &str, value: &str, options: SetOptions) -> bool {
        if name.is_empty() {
            debug!("ignoring set of a cookie without a name");
            return false;
        }

        let path = options.path.or_else(|| self.config.default_path.clone());
        let path = match path {
            Some(p) if !is_valid_path(&p) => {
                debug!("ignoring malformed path `{p}` for cookie `{name}`");
                None
            }
            other => other,
        };
        let domain = options.domain.or_else(|| self.config.default_domain.clone());
        let secure = options.secure.unwrap_or(self.config.default_secure);

        if let Some(entry) = self.cookies.get_mut(name) {
            let existing = &mut entry.cookie;
            existing.value = value.to_string();
            existing.expires = options.expires;
            existing.path = path;
            existing.domain = domain;
            existing.secure = secure;
            entry.removed = false;
            write_through(&self.store, &entry.cookie);
            return true;
        }

        let cookie = Cookie {
            name: name.to_string(),
            value: value.to_string(),
            expires: options.expires,
            path,
            domain,
            secure,
        };
        write_through(&self.store, &cookie);
        self.cookies.insert(cookie.name.clone(), Entry::live(cookie));
        false
    }

    /// Blanks and epoch-expires `name`, making the host evict it.
    ///
    /// Returns `false`, without touching the host, when `name` is unknown.
    pub fn remove(&mut self, name: &str) -> bool {
        let Some(entry) = self.cookies.get_mut(name) else {
            return false;
        };

        entry.cookie.expire();
        entry.removed = true;
        write_through(&self.store, &entry.cookie);
        true
    }

    /// Removes every cookie. Returns `false` when there was nothing to clear.
    pub fn clear(&mut self) -> bool {
        if self.cookies.is_empty() {
            return false;
        }

        for entry in self.cookies.values_mut() {
            entry.cookie.expire();
            entry.removed = true;
            write_through(&self.store, &entry.cookie);
        }
        true
    }

    pub fn has(&self, name: &str) -> bool {
        self.live(name).is_some()
    }

    /// Names of all present cookies, in insertion order.
    pub fn keys(&self) -> Vec<String> {
        self.iter().map(|c| c.name.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cookie> {
        self.cookies.values().filter(|e| !e.removed).map(|e| &e.cookie)
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn live(&self, name: &str) -> Option<&Cookie> {
        self.cookies.get(name).filter(|e| !e.removed).map(|e| &e.cookie)
    }
}

fn write_through(store: &HostCookieStoreHandle, cookie: &Cookie) {
    debug!("writing cookie `{}` to host store", cookie.name);
    store.write(&cookie.serialize());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cookies::{HostCookieStore, InMemoryHostStore};
    use std::sync::{Arc, Mutex};
    use time::macros::datetime;

    /// Host store returning a fixed raw string, for attribute-annotated input
    /// a browser would never produce.
    struct FixedStore {
        raw: String,
        writes: Mutex<Vec<String>>,
    }

    impl FixedStore {
        fn new(raw: &str) -> Arc<Self> {
            Arc::new(Self { raw: raw.to_string(), writes: Mutex::new(Vec::new()) })
        }
    }

    impl HostCookieStore for FixedStore {
        fn read(&self) -> String {
            self.raw.clone()
        }

        fn write(&self, serialized: &str) {
            self.writes.lock().unwrap().push(serialized.to_string());
        }
    }

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn manager() -> (CookieManager, Arc<InMemoryHostStore>) {
        init_logger();
        let store = Arc::new(InMemoryHostStore::new());
        (CookieManager::new(store.clone()), store)
    }

    #[test]
    fn unknown_names_are_absent() {
        let (cookies, _) = manager();
        assert_eq!(cookies.get("nope"), None);
        assert!(!cookies.has("nope"));
        assert!(cookies.is_empty());
    }

    #[test]
    fn set_then_get() {
        let (mut cookies, store) = manager();

        assert!(!cookies.set("n", "v", SetOptions::new()));
        assert_eq!(cookies.get("n"), Some("v"));
        assert!(cookies.has("n"));
        assert_eq!(store.read(), "n=v");
    }

    #[test]
    fn set_twice_overwrites() {
        let (mut cookies, store) = manager();

        assert!(!cookies.set("n", "v1", SetOptions::new()));
        assert!(cookies.set("n", "v2", SetOptions::new()));
        assert_eq!(cookies.get("n"), Some("v2"));
        assert_eq!(cookies.keys(), vec!["n"]);
        assert_eq!(store.write_count(), 2);
        assert_eq!(store.read(), "n=v2");
    }

    #[test]
    fn set_overwrites_every_attribute() {
        let (mut cookies, store) = manager();

        cookies.set(
            "n",
            "v1",
            SetOptions::new().path("/a").domain("example.com").secure(true),
        );
        cookies.set("n", "v2", SetOptions::new().expires(datetime!(2100-01-01 0:00 UTC)));

        let c = cookies.cookie("n").unwrap();
        assert_eq!(c.path, None);
        assert_eq!(c.domain, None);
        assert!(!c.secure);
        assert_eq!(store.writes()[1], "n=v2; expires=Fri, 01 Jan 2100 00:00:00 GMT");
    }

    #[test]
    fn set_writes_serialized_attributes() {
        let (mut cookies, store) = manager();

        cookies.set(
            "sid",
            "xyz",
            SetOptions::new()
                .expires(datetime!(2100-01-01 0:00 UTC))
                .path("/")
                .domain("example.com")
                .secure(true),
        );

        assert_eq!(
            store.writes(),
            vec!["sid=xyz; expires=Fri, 01 Jan 2100 00:00:00 GMT; path=/; domain=example.com; secure"]
        );
    }

    #[test]
    fn set_ignores_malformed_path() {
        let (mut cookies, store) = manager();
        cookies.set("n", "v", SetOptions::new().path("no-slash"));

        assert_eq!(cookies.cookie("n").unwrap().path, None);
        assert_eq!(store.writes(), vec!["n=v"]);
    }

    #[test]
    fn set_applies_config_defaults() {
        init_logger();
        let store = Arc::new(InMemoryHostStore::new());
        let config = ManagerConfig::builder()
            .default_path("/")
            .default_domain("example.com")
            .default_secure(true)
            .build()
            .unwrap();
        let mut cookies = CookieManager::with_config(store.clone(), config);

        cookies.set("a", "1", SetOptions::new());
        cookies.set("b", "2", SetOptions::new().path("/b").secure(false));

        assert_eq!(
            store.writes(),
            vec![
                "a=1; path=/; domain=example.com; secure",
                "b=2; path=/b; domain=example.com",
            ]
        );
    }

    #[test]
    fn remove_after_set() {
        let (mut cookies, store) = manager();
        cookies.set("n", "v", SetOptions::new());

        assert!(cookies.remove("n"));
        assert_eq!(cookies.get("n"), None);
        assert!(!cookies.has("n"));
        assert_eq!(store.writes()[1], "n=; expires=Thu, 01 Jan 1970 00:00:00 GMT");
        assert_eq!(store.read(), "");
    }

    #[test]
    fn set_with_blank_value_and_past_expiry_is_still_present() {
        let (mut cookies, store) = manager();

        assert!(!cookies.set("n", "", SetOptions::new().expires(OffsetDateTime::UNIX_EPOCH)));
        assert_eq!(cookies.get("n"), Some(""));
        assert!(cookies.has("n"));
        assert_eq!(cookies.keys(), vec!["n"]);
        assert_eq!(store.writes(), vec!["n=; expires=Thu, 01 Jan 1970 00:00:00 GMT"]);
    }

    #[test]
    fn parsed_blank_expired_cookie_is_present() {
        init_logger();
        let store = FixedStore::new("a=; expires=Thu, 01 Jan 1970 00:00:00 GMT; b=2");
        let cookies = CookieManager::new(store);

        assert_eq!(cookies.keys(), vec!["a", "b"]);
        assert_eq!(cookies.get("a"), Some(""));
    }

    #[test]
    fn set_without_name_is_ignored() {
        let (mut cookies, store) = manager();

        assert!(!cookies.set("", "v", SetOptions::new()));
        assert!(cookies.keys().is_empty());
        assert!(!cookies.has(""));
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn remove_unknown_does_not_write() {
        let (mut cookies, store) = manager();
        assert!(!cookies.remove("n"));
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn removed_entry_is_revived_in_place_by_set() {
        let (mut cookies, _) = manager();
        cookies.set("a", "1", SetOptions::new());
        cookies.set("b", "2", SetOptions::new());
        cookies.remove("a");
        assert_eq!(cookies.keys(), vec!["b"]);

        // the blanked entry still exists, so this counts as an overwrite
        assert!(cookies.set("a", "3", SetOptions::new()));
        assert_eq!(cookies.keys(), vec!["a", "b"]);
        assert_eq!(cookies.get("a"), Some("3"));
    }

    #[test]
    fn clear_removes_everything() {
        let (mut cookies, store) = manager();
        cookies.set("a", "1", SetOptions::new());
        cookies.set("b", "2", SetOptions::new());

        assert!(cookies.clear());
        assert_eq!(cookies.get("a"), None);
        assert_eq!(cookies.get("b"), None);
        assert!(cookies.keys().is_empty());
        assert_eq!(store.write_count(), 4);
        assert_eq!(store.read(), "");
    }

    #[test]
    fn clear_on_empty_returns_false() {
        let (mut cookies, store) = manager();
        assert!(!cookies.clear());
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn keys_follow_insertion_order() {
        let (mut cookies, _) = manager();
        cookies.set("a", "1", SetOptions::new());
        cookies.set("b", "2", SetOptions::new());
        cookies.set("a", "3", SetOptions::new());

        assert_eq!(cookies.keys(), vec!["a", "b"]);
        assert_eq!(cookies.len(), 2);
    }

    #[test]
    fn construction_reads_host_store() {
        init_logger();
        let store = Arc::new(InMemoryHostStore::from_cookie_string("a=1; b=2"));
        let cookies = CookieManager::new(store.clone());

        assert_eq!(cookies.keys(), vec!["a", "b"]);
        assert_eq!(cookies.get("b"), Some("2"));
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn construction_parses_annotated_strings() {
        init_logger();
        let store = FixedStore::new("a=1; path=/; secure; b=2; expires=Wed, 09 Jun 2021 10:18:14 GMT; c=3");
        let cookies = CookieManager::new(store.clone());

        assert_eq!(cookies.keys(), vec!["a", "b", "c"]);
        assert!(cookies.cookie("a").unwrap().secure);
        assert_eq!(cookies.cookie("b").unwrap().expires, Some(datetime!(2021-06-09 10:18:14 UTC)));
        assert!(store.writes.lock().unwrap().is_empty());
    }

    #[test]
    fn leading_attribute_does_not_attach_to_anything() {
        init_logger();
        let store = FixedStore::new("expires=Wed, 09 Jun 2021 10:18:14 GMT; a=1");
        let cookies = CookieManager::new(store);

        assert_eq!(cookies.keys(), vec!["a"]);
        assert_eq!(cookies.cookie("a").unwrap().expires, None);
    }

    #[test]
    fn legacy_parsing_drops_the_last_cookie() {
        init_logger();
        let store = FixedStore::new("a=1; b=2");
        let config = ManagerConfig::builder().keep_trailing(false).build().unwrap();
        let cookies = CookieManager::with_config(store, config);

        assert_eq!(cookies.keys(), vec!["a"]);
        assert!(!cookies.has("b"));
    }

    #[test]
    fn duplicate_names_keep_first_position_and_last_value() {
        init_logger();
        let store = FixedStore::new("a=1; b=2; a=3");
        let cookies = CookieManager::new(store);

        assert_eq!(cookies.keys(), vec!["a", "b"]);
        assert_eq!(cookies.get("a"), Some("3"));
    }

    #[test]
    fn parse_uses_manager_options() {
        let (cookies, _) = manager();
        assert_eq!(cookies.parse("a=1; b=2").len(), 2);
    }
}
