//! Host cookie store infrastructure.
//!
//! A **host cookie store** is the ambient cookie surface a document sees:
//! one string to read every visible cookie at once, and a write entry point
//! that takes a single serialized cookie. The host merges each write into its
//! jar by name, path and domain, and evicts cookies whose expiry has passed.
//!
//! The [`CookieManager`](crate::cookies::CookieManager) never talks to a
//! browser directly; it is handed a [`HostCookieStoreHandle`] instead, so it
//! can run against any of the implementations below:
//! - [`InMemoryHostStore`]: an in-process jar with browser-like merge and
//!   eviction rules. Used by tests and non-browser embedders.
//! - `DocumentCookieStore` (only on `wasm32`): binds to `document.cookie`.
//!
//! [`HostCookieStoreHandle`]: crate::cookies::HostCookieStoreHandle
mod in_memory;
#[cfg(target_arch = "wasm32")]
mod document;

pub use in_memory::InMemoryHostStore;
#[cfg(target_arch = "wasm32")]
pub use document::DocumentCookieStore;

/// The ambient cookie store of the execution context.
///
/// Implementations must be `Send + Sync` and safe for concurrent use. Neither
/// method reports failure: a write either lands or is silently lost.
pub trait HostCookieStore: Send + Sync {
    /// Returns all cookies visible to the current context as one raw string,
    /// typically `name=value` pairs joined by `"; "`.
    fn read(&self) -> String;

    /// Writes a single serialized cookie (see [`Cookie::serialize`]).
    ///
    /// [`Cookie::serialize`]: crate::cookies::Cookie::serialize
    fn write(&self, serialized: &str);
}
