//! Session bound.
//!
//! The session is the identity/auth context resolved by the boundary layer
//! and threaded through every [`Request`](crate::Request) and
//! [`Response`](crate::Response). Portico never inspects it; handlers and
//! permission predicates do. A handler may issue a *different* session on
//! its response (sign-in, sign-out) and the boundary layer persists it.

/// Bound satisfied by any session type.
///
/// The pipeline clones the session when hook bookkeeping needs a second
/// view of the request, so sessions should be cheap to clone (an `Arc`'d
/// record, or a small value type).
pub trait Session: Clone + Send + Sync + 'static {}

impl<T: Clone + Send + Sync + 'static> Session for T {}
