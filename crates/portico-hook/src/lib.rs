//! # Portico Hook
//!
//! Cross-cutting before/after behavior attachable to any route.
//!
//! A [`RouteHook`] runs `before` a route's handler and (optionally)
//! `after` it, carrying opaque per-request state between the two phases.
//! Multiple hooks combine into one with [`combine_hooks`]; the combined
//! hook's `after` callbacks replay in the **same order** their `before`
//! callbacks ran — not reversed. That ordering is deliberate and
//! load-bearing: a timer opened in `before` is closed by the matching
//! `after`, whichever position the hook occupies in the chain.
//!
//! ```text
//! before: h1, h2, h3   →   handler   →   after: h1, h2, h3
//! ```
//!
//! Hook faults are not caught here; a hook that should never abort
//! request processing (logging, metrics) must swallow its own errors.

#![doc(html_root_url = "https://docs.rs/portico-hook/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod combine;
mod hook;
mod logging;
mod timing;

pub use combine::{combine_hooks, CombinedHook};
pub use hook::{BoxHook, FnHook, HookState, RouteHook};
pub use logging::LoggingHook;
pub use timing::TimingHook;
