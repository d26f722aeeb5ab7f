// src/cookies.rs
//! Cookies: [`Cookie`], [`CookieManager`], [`HostCookieStore`] and backends.

mod cookies;
mod manager;
mod parser;
mod store;

pub use cookies::format_http_date;
pub use cookies::Cookie;
pub use cookies::HostCookieStoreHandle;

pub use manager::CookieManager;
pub use manager::SetOptions;

pub use parser::is_valid_path;
pub use parser::parse_cookie_string;
pub use parser::parse_expires;
pub use parser::ParseOptions;

pub use store::HostCookieStore;
pub use store::InMemoryHostStore;
#[cfg(target_arch = "wasm32")]
pub use store::DocumentCookieStore;
