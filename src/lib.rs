//! Document cookie access for the Gosub engine.
//!
//! A [`CookieManager`] reads the cookie string of a document once, keeps the
//! cookies as an ordered, name-keyed view and writes every `set`, `remove`
//! and `clear` back through a [`HostCookieStore`]. The host is injected, so
//! the same manager runs against `document.cookie` on `wasm32` or against
//! the [`InMemoryHostStore`](cookies::InMemoryHostStore) elsewhere.
//!
//! ```rust
//! use std::sync::Arc;
//! use gosub_doc_cookies::cookies::InMemoryHostStore;
//! use gosub_doc_cookies::{CookieManager, SetOptions};
//!
//! let mut cookies = CookieManager::new(Arc::new(InMemoryHostStore::new()));
//! cookies.set("theme", "dark", SetOptions::new());
//! assert_eq!(cookies.get("theme"), Some("dark"));
//! ```

pub mod config;
pub mod cookies;
pub mod errors;

pub use config::ManagerConfig;
pub use cookies::{Cookie, CookieManager, HostCookieStore, HostCookieStoreHandle, SetOptions};
pub use errors::CookieError;
