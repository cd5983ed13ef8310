//! # Portico Core
//!
//! Core types for the Portico request-processing pipeline.
//!
//! This crate provides the foundational value types shared by every other
//! Portico crate:
//!
//! - [`Request`] / [`Response`] - immutable per-request value types, generic
//!   over body stage and session
//! - [`RawBody`] / [`ResponseBody`] - tagged body stages
//! - [`Handler`] - the two-phase handler contract (`transform_request`,
//!   then `respond`)
//! - [`TransformStage`] / [`compose_transform`] - chainable request
//!   transformation stages
//! - [`PorticoError`] - the collaborator-fault error channel

#![doc(html_root_url = "https://docs.rs/portico-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod body;
mod error;
mod handler;
mod params;
mod query;
mod request;
mod response;
mod session;

pub use body::{RawBody, ResponseBody};
pub use error::{ErrorCategory, PorticoError, PorticoResult};
pub use handler::{
    compose_transform, erase, BoxFuture, BoxHandler, Composed, ErasedHandler, FnHandler, FnStage,
    Handler, JsonStage, StagedHandler, TransformStage, Validated,
};
pub use params::Params;
pub use query::Query;
pub use request::{Request, RequestId};
pub use response::Response;
pub use session::Session;
