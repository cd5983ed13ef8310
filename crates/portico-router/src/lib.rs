//! # Portico Router
//!
//! Route values, combinators and the per-request dispatch engine.
//!
//! A [`Route`] is a method pattern, a path pattern, a type-erased handler
//! and an optional hook. A [`Router`] is an ordered list of routes:
//! ordering is significant, the first matching route wins, and the final,
//! lowest-priority entry of a fully assembled router is a catch-all 404.
//!
//! Routes are immutable; the combinators ([`namespace_route`],
//! [`add_hooks_to_route`], [`Route::map_response`]) return new values
//! rather than mutating, so the same base route list can be reused to
//! build several router variants.

#![doc(html_root_url = "https://docs.rs/portico-router/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod not_found;
mod route;
mod router;

pub use not_found::not_found_json_route;
pub use route::{
    add_hooks_to_route, namespace_route, namespace_routes, MethodPattern, Route,
};
pub use router::Router;
