//! # Portico
//!
//! **A composable server-side request-processing pipeline**
//!
//! Portico turns declarative resources into a running HTTP application:
//!
//! - **Two-phase handlers** - every route validates in `transform_request`
//!   and mutates only in `respond`; validation failures travel in-band,
//!   never through the error channel
//! - **Composable hooks** - before/after behavior attaches to any route,
//!   with `after` replaying in the same order as `before`
//! - **Pure combinators** - routes and routers namespace, merge and
//!   decorate as immutable values
//! - **Deterministic assembly** - one pure function produces the final
//!   route order, with liveness and feature-flag endpoints always in
//!   front of the basic-auth wrap
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use portico::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::builder().bind_addr("0.0.0.0:8080").build();
//!     let resources = vec![
//!         Resource::new("rfis")
//!             .read_many(|data: &Store| list_rfis(data.clone()))
//!             .create(|data: &Store| create_rfi(data.clone())),
//!     ];
//!     let router = assemble(&resources, &store, &config, is_staff, hooks);
//!     serve(router, resolver, &config).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! ```text
//! request → hooks (before) → transform_request → respond → hooks (after) → response
//! ```

#![doc(html_root_url = "https://docs.rs/portico/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export the pipeline value types
pub use portico_core as core;

// Re-export hook types
pub use portico_hook as hook;

// Re-export route/router combinators
pub use portico_router as router;

// Re-export resource compilation
pub use portico_resource as resource;

// Re-export assembly and the HTTP boundary
pub use portico_server as server;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust,ignore
/// use portico::prelude::*;
/// ```
pub mod prelude {
    pub use portico_core::{
        compose_transform, erase, BoxHandler, FnHandler, Handler, JsonStage, Params, PorticoError,
        PorticoResult, Query, RawBody, Request, RequestId, Response, ResponseBody, Session,
        StagedHandler, TransformStage, Validated,
    };

    // Re-export hook types
    pub use portico_hook::{
        combine_hooks, BoxHook, FnHook, HookState, LoggingHook, RouteHook, TimingHook,
    };

    // Re-export combinators
    pub use portico_router::{
        add_hooks_to_route, namespace_route, namespace_routes, not_found_json_route, Route, Router,
    };

    // Re-export resource compilation
    pub use portico_resource::{compile_resource, compile_resources, Resource};

    // Re-export assembly and boundary types
    pub use portico_server::{
        assemble, serve, wrap_basic_auth, AppConfig, BasicAuthConfig, SessionResolver,
    };
}
