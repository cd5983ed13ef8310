//! Application configuration.
//!
//! [`AppConfig`] gathers everything router assembly and the HTTP
//! boundary need: bind address, route prefixes, maintenance switch,
//! optional basic-auth credential, front-end directory and the
//! feature-flag map. Construct it with the builder, or deserialize it
//! from TOML with [`AppConfig::from_toml_str`].
//!
//! # Example
//!
//! ```rust
//! use portico_server::AppConfig;
//!
//! let config = AppConfig::builder()
//!     .bind_addr("127.0.0.1:3000")
//!     .maintenance_mode(false)
//!     .feature_flag("new_submission_flow", true)
//!     .build();
//!
//! assert_eq!(config.api_prefix(), "/api");
//! ```

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Default HTTP bind address.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Default API route prefix.
pub const DEFAULT_API_PREFIX: &str = "/api";

/// Default admin route prefix.
pub const DEFAULT_ADMIN_PREFIX: &str = "/admin";

/// Default front-end asset directory.
pub const DEFAULT_FRONT_END_DIR: &str = "public";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The TOML document could not be parsed.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// The bind address is not a valid socket address.
    #[error("invalid bind address '{addr}': {source}")]
    InvalidAddr {
        /// The offending address string.
        addr: String,
        /// The underlying parse error.
        #[source]
        source: std::net::AddrParseError,
    },
}

/// The stored basic-auth credential.
///
/// The password is held only as a lowercase hex SHA-1 digest; the
/// cleartext never appears in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BasicAuthConfig {
    /// The expected username.
    pub username: String,
    /// Lowercase hex SHA-1 digest of the expected password.
    pub password_sha1: String,
}

/// Application configuration.
///
/// Use [`AppConfig::builder()`] to construct instances in code.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    bind_addr: String,
    api_prefix: String,
    admin_prefix: String,
    maintenance_mode: bool,
    basic_auth: Option<BasicAuthConfig>,
    front_end_dir: PathBuf,
    feature_flags: BTreeMap<String, bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl AppConfig {
    /// Creates a new configuration builder.
    #[must_use]
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Parses a configuration from a TOML document.
    ///
    /// Missing keys fall back to their defaults, so a partial document
    /// is valid.
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml)?)
    }

    /// Returns the HTTP bind address string.
    #[must_use]
    pub fn bind_addr(&self) -> &str {
        &self.bind_addr
    }

    /// Parses and returns the bind address as a `SocketAddr`.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind_addr
            .parse()
            .map_err(|source| ConfigError::InvalidAddr {
                addr: self.bind_addr.clone(),
                source,
            })
    }

    /// Returns the API route prefix.
    #[must_use]
    pub fn api_prefix(&self) -> &str {
        &self.api_prefix
    }

    /// Returns the admin route prefix.
    #[must_use]
    pub fn admin_prefix(&self) -> &str {
        &self.admin_prefix
    }

    /// Returns true when the application is in maintenance mode.
    #[must_use]
    pub fn maintenance_mode(&self) -> bool {
        self.maintenance_mode
    }

    /// Returns the basic-auth credential, if configured.
    #[must_use]
    pub fn basic_auth(&self) -> Option<&BasicAuthConfig> {
        self.basic_auth.as_ref()
    }

    /// Returns the front-end asset directory.
    #[must_use]
    pub fn front_end_dir(&self) -> &Path {
        &self.front_end_dir
    }

    /// Returns the feature-flag map.
    #[must_use]
    pub fn feature_flags(&self) -> &BTreeMap<String, bool> {
        &self.feature_flags
    }
}

/// Builder for [`AppConfig`].
#[derive(Debug, Clone)]
pub struct AppConfigBuilder {
    bind_addr: String,
    api_prefix: String,
    admin_prefix: String,
    maintenance_mode: bool,
    basic_auth: Option<BasicAuthConfig>,
    front_end_dir: PathBuf,
    feature_flags: BTreeMap<String, bool>,
}

impl Default for AppConfigBuilder {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            admin_prefix: DEFAULT_ADMIN_PREFIX.to_string(),
            maintenance_mode: false,
            basic_auth: None,
            front_end_dir: PathBuf::from(DEFAULT_FRONT_END_DIR),
            feature_flags: BTreeMap::new(),
        }
    }
}

impl AppConfigBuilder {
    /// Creates a builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the HTTP bind address.
    #[must_use]
    pub fn bind_addr(mut self, addr: impl Into<String>) -> Self {
        self.bind_addr = addr.into();
        self
    }

    /// Sets the API route prefix.
    #[must_use]
    pub fn api_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.api_prefix = prefix.into();
        self
    }

    /// Sets the admin route prefix.
    #[must_use]
    pub fn admin_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.admin_prefix = prefix.into();
        self
    }

    /// Enables or disables maintenance mode.
    #[must_use]
    pub fn maintenance_mode(mut self, enabled: bool) -> Self {
        self.maintenance_mode = enabled;
        self
    }

    /// Sets the basic-auth credential. `None` disables the auth wrap.
    #[must_use]
    pub fn basic_auth(mut self, auth: Option<BasicAuthConfig>) -> Self {
        self.basic_auth = auth;
        self
    }

    /// Sets the front-end asset directory.
    #[must_use]
    pub fn front_end_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.front_end_dir = dir.into();
        self
    }

    /// Sets one feature flag.
    #[must_use]
    pub fn feature_flag(mut self, name: impl Into<String>, enabled: bool) -> Self {
        self.feature_flags.insert(name.into(), enabled);
        self
    }

    /// Replaces the whole feature-flag map.
    #[must_use]
    pub fn feature_flags(mut self, flags: BTreeMap<String, bool>) -> Self {
        self.feature_flags = flags;
        self
    }

    /// Builds the [`AppConfig`].
    #[must_use]
    pub fn build(self) -> AppConfig {
        AppConfig {
            bind_addr: self.bind_addr,
            api_prefix: self.api_prefix,
            admin_prefix: self.admin_prefix,
            maintenance_mode: self.maintenance_mode,
            basic_auth: self.basic_auth,
            front_end_dir: self.front_end_dir,
            feature_flags: self.feature_flags,
        }
    }
}
