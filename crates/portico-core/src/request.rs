//! The inbound request value type.

use http::{HeaderMap, Method};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::params::Params;
use crate::query::Query;

/// A unique identifier for each request, using UUID v7.
///
/// UUID v7 is time-ordered, which makes it ideal for request tracking
/// and log correlation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Creates a new unique request ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Creates a `RequestId` from an existing UUID (e.g. one propagated
    /// by an upstream proxy).
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An inbound request, generic over body stage `B` and session `S`.
///
/// Created once per connection by the boundary layer and never mutated:
/// stage transitions produce a *new* request with a replaced body via
/// [`Request::with_body`], every other field carried over unchanged.
///
/// # Example
///
/// ```rust
/// use http::Method;
/// use portico_core::{Query, RawBody, Request};
///
/// let req: Request<RawBody, ()> = Request::new(
///     Method::GET,
///     "/rfis/42",
///     http::HeaderMap::new(),
///     Query::new(),
///     (),
///     RawBody::Empty,
/// );
/// assert_eq!(req.path(), "/rfis/42");
/// ```
#[derive(Debug, Clone)]
pub struct Request<B, S> {
    id: RequestId,
    method: Method,
    path: String,
    headers: HeaderMap,
    params: Params,
    query: Query,
    session: S,
    body: B,
}

impl<B, S> Request<B, S> {
    /// Creates a new request with a fresh [`RequestId`] and no path
    /// parameters (those are filled in by the router at match time).
    #[must_use]
    pub fn new(
        method: Method,
        path: impl Into<String>,
        headers: HeaderMap,
        query: Query,
        session: S,
        body: B,
    ) -> Self {
        Self {
            id: RequestId::new(),
            method,
            path: path.into(),
            headers,
            params: Params::new(),
            query,
            session,
            body,
        }
    }

    /// Returns the request ID.
    #[must_use]
    pub const fn id(&self) -> RequestId {
        self.id
    }

    /// Returns the HTTP method.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the request path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the request headers.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the path parameters extracted by the router.
    #[must_use]
    pub const fn params(&self) -> &Params {
        &self.params
    }

    /// Returns the decoded query parameters.
    #[must_use]
    pub const fn query(&self) -> &Query {
        &self.query
    }

    /// Returns the session.
    #[must_use]
    pub const fn session(&self) -> &S {
        &self.session
    }

    /// Returns the body for this stage.
    #[must_use]
    pub const fn body(&self) -> &B {
        &self.body
    }

    /// Consumes the request, returning the body.
    #[must_use]
    pub fn into_body(self) -> B {
        self.body
    }

    /// Consumes the request, returning the session.
    #[must_use]
    pub fn into_session(self) -> S {
        self.session
    }

    /// Produces the next-stage request: same request, new body.
    ///
    /// Every field other than the body is preserved, including the
    /// request ID.
    #[must_use]
    pub fn with_body<B2>(self, body: B2) -> Request<B2, S> {
        Request {
            id: self.id,
            method: self.method,
            path: self.path,
            headers: self.headers,
            params: self.params,
            query: self.query,
            session: self.session,
            body,
        }
    }

    /// Returns a copy of this request with a replaced set of path
    /// parameters. Used by the router after a successful match.
    #[must_use]
    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    /// Clones every field except the body, attaching `body` as the new
    /// stage value. Used when composing transform stages, where the
    /// previous stage still holds the original request by reference.
    #[must_use]
    pub fn clone_with_body<B2>(&self, body: B2) -> Request<B2, S>
    where
        S: Clone,
    {
        Request {
            id: self.id,
            method: self.method.clone(),
            path: self.path.clone(),
            headers: self.headers.clone(),
            params: self.params.clone(),
            query: self.query.clone(),
            session: self.session.clone(),
            body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RawBody;

    fn sample_request() -> Request<RawBody, &'static str> {
        Request::new(
            Method::POST,
            "/rfis",
            HeaderMap::new(),
            Query::parse("notify=1"),
            "session-a",
            RawBody::Text("{}".to_string()),
        )
    }

    #[test]
    fn test_request_id_display_roundtrip() {
        let id = RequestId::new();
        let text = id.to_string();
        let parsed = RequestId::from_uuid(text.parse().unwrap());
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_with_body_preserves_fields() {
        let req = sample_request();
        let id = req.id();
        let staged = req.with_body(42u32);

        assert_eq!(staged.id(), id);
        assert_eq!(staged.method(), &Method::POST);
        assert_eq!(staged.path(), "/rfis");
        assert_eq!(staged.query().get("notify"), Some("1"));
        assert_eq!(staged.session(), &"session-a");
        assert_eq!(*staged.body(), 42);
    }

    #[test]
    fn test_clone_with_body_preserves_fields() {
        let req = sample_request();
        let staged = req.clone_with_body("validated");

        assert_eq!(staged.id(), req.id());
        assert_eq!(staged.path(), req.path());
        assert_eq!(*staged.body(), "validated");
        // original untouched
        assert_eq!(req.body().as_text(), Some("{}"));
    }

    #[test]
    fn test_with_params() {
        let mut params = Params::new();
        params.push("id", "7");
        let req = sample_request().with_params(params);
        assert_eq!(req.params().get("id"), Some("7"));
    }
}
