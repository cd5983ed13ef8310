//! # Portico Server
//!
//! Router assembly and the HTTP boundary for the Portico pipeline.
//!
//! This crate turns declarative resources, configuration and hooks into
//! a running application:
//!
//! - [`AppConfig`] - builder/TOML application configuration
//! - [`assemble`] - the deterministic assembly pipeline producing the
//!   final route order (status and flags in front of the basic-auth
//!   wrap, API routes dropped in maintenance mode)
//! - [`wrap_basic_auth`] - credential gate decorating a route's handler
//! - [`status_router`] / [`flags_router`] / [`admin_router`] /
//!   [`front_end_router`] - the built-in routers assembly mounts
//! - [`serve`] - the hyper boundary driving the router
//! - [`logging`] - tracing-subscriber initialization
//!
//! ## Example
//!
//! ```rust,ignore
//! use portico_server::{assemble, serve, AppConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::builder().bind_addr("0.0.0.0:8080").build();
//!     let router = assemble(&resources, &data, &config, is_staff, hooks);
//!     serve(router, resolver, &config).await?;
//!     Ok(())
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/portico-server/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod admin;
mod assemble;
mod auth;
mod config;
mod flags;
pub mod logging;
mod server;
mod static_files;
mod status;

pub use admin::admin_router;
pub use assemble::assemble;
pub use auth::{sha1_hex, wrap_basic_auth};
pub use config::{
    AppConfig, AppConfigBuilder, BasicAuthConfig, ConfigError, DEFAULT_ADMIN_PREFIX,
    DEFAULT_API_PREFIX, DEFAULT_BIND_ADDR, DEFAULT_FRONT_END_DIR,
};
pub use flags::flags_router;
pub use server::{serve, ServerError, SessionResolver, WireBody};
pub use static_files::front_end_router;
pub use status::status_router;
