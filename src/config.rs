//! Manager configuration.
//!
//! `ManagerConfig` controls how a [`CookieManager`](crate::cookies::CookieManager)
//! reads the host's cookie string and which attributes it applies to cookies
//! created through `set` when the caller leaves them out.
//!
//! # Examples
//!
//! ```rust
//! use gosub_doc_cookies::config::ManagerConfig;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let cfg = ManagerConfig::builder()
//!     .default_path("/")
//!     .default_secure(true)
//!     .build()?; // returns Result<ManagerConfig, CookieError>
//! assert_eq!(cfg.default_path.as_deref(), Some("/"));
//! # Ok(()) }
//! ```
//!
//! # Errors
//!
//! [`ManagerConfigBuilder::build`] returns [`CookieError`] when the default
//! path is not a leading-slash path or the default domain is empty.

use crate::cookies::{is_valid_path, ParseOptions};
use crate::errors::CookieError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManagerConfig {
    /// Options used when parsing the host's cookie string.
    pub parse: ParseOptions,
    /// Path applied by `set` when none is given.
    pub default_path: Option<String>,
    /// Domain applied by `set` when none is given.
    pub default_domain: Option<String>,
    /// Secure flag applied by `set` when none is given.
    pub default_secure: bool,
}

impl ManagerConfig {
    pub fn builder() -> ManagerConfigBuilder {
        ManagerConfigBuilder::default()
    }
}

/// Builder for [`ManagerConfig`].
#[derive(Debug, Clone, Default)]
pub struct ManagerConfigBuilder {
    inner: ManagerConfig,
}

impl ManagerConfigBuilder {
    #[inline]
    fn map(mut self, f: impl FnOnce(&mut ManagerConfig)) -> Self {
        f(&mut self.inner);
        self
    }

    pub fn parse_options(self, opts: ParseOptions) -> Self { self.map(|c| c.parse = opts) }
    pub fn keep_trailing(self, on: bool) -> Self { self.map(|c| c.parse.keep_trailing = on) }
    pub fn default_path<S: Into<String>>(self, path: S) -> Self { self.map(|c| c.default_path = Some(path.into())) }
    pub fn default_domain<S: Into<String>>(self, domain: S) -> Self { self.map(|c| c.default_domain = Some(domain.into())) }
    pub fn default_secure(self, on: bool) -> Self { self.map(|c| c.default_secure = on) }

    /// Validate and build the final config.
    pub fn build(self) -> Result<ManagerConfig, CookieError> {
        validate(&self.inner)?;
        Ok(self.inner)
    }
}

fn validate(c: &ManagerConfig) -> Result<(), CookieError> {
    if let Some(path) = &c.default_path {
        if !is_valid_path(path) {
            return Err(CookieError::InvalidDefaultPath(path.clone()));
        }
    }
    if c.default_domain.as_deref().is_some_and(|d| d.trim().is_empty()) {
        return Err(CookieError::EmptyDefaultDomain);
    }
    Ok(())
}
