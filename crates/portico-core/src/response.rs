//! The outbound response value type.

use http::{HeaderMap, StatusCode};
use serde_json::json;

use crate::body::ResponseBody;

/// An outbound response, generic over body `B` and session `S`.
///
/// The session is carried on the response so a handler can issue a
/// *different* session than the one it received (sign-in and sign-out do
/// exactly this); the boundary layer persists whatever session the
/// response carries.
#[derive(Debug, Clone)]
pub struct Response<B, S> {
    status: StatusCode,
    headers: HeaderMap,
    session: S,
    body: B,
}

impl<B, S> Response<B, S> {
    /// Creates a response.
    #[must_use]
    pub fn new(status: StatusCode, session: S, body: B) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            session,
            body,
        }
    }

    /// Returns the status code.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the response headers.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the session this response carries.
    #[must_use]
    pub const fn session(&self) -> &S {
        &self.session
    }

    /// Returns the body.
    #[must_use]
    pub const fn body(&self) -> &B {
        &self.body
    }

    /// Adds a header, returning the modified response.
    #[must_use]
    pub fn with_header(mut self, name: http::header::HeaderName, value: http::HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Replaces the session carried by this response.
    #[must_use]
    pub fn with_session<S2>(self, session: S2) -> Response<B, S2> {
        Response {
            status: self.status,
            headers: self.headers,
            session,
            body: self.body,
        }
    }

    /// Maps the body, preserving status, headers and session.
    #[must_use]
    pub fn map_body<B2>(self, f: impl FnOnce(B) -> B2) -> Response<B2, S> {
        Response {
            status: self.status,
            headers: self.headers,
            session: self.session,
            body: f(self.body),
        }
    }

    /// Decomposes the response into its parts.
    #[must_use]
    pub fn into_parts(self) -> (StatusCode, HeaderMap, S, B) {
        (self.status, self.headers, self.session, self.body)
    }
}

impl<S> Response<ResponseBody, S> {
    /// A `200 OK` JSON response.
    #[must_use]
    pub fn json(session: S, value: serde_json::Value) -> Self {
        Self::new(StatusCode::OK, session, ResponseBody::Json(value))
    }

    /// A JSON response with an explicit status.
    #[must_use]
    pub fn json_with_status(status: StatusCode, session: S, value: serde_json::Value) -> Self {
        Self::new(status, session, ResponseBody::Json(value))
    }

    /// An empty-bodied response with the given status.
    #[must_use]
    pub fn empty(status: StatusCode, session: S) -> Self {
        Self::new(status, session, ResponseBody::Empty)
    }

    /// A structured JSON error response.
    ///
    /// Used by handlers to map in-band validation failures to a status
    /// code without going through the fault channel.
    #[must_use]
    pub fn error(status: StatusCode, session: S, message: &str) -> Self {
        Self::new(
            status,
            session,
            ResponseBody::Json(json!({ "error": { "message": message } })),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_response() {
        let res: Response<ResponseBody, ()> = Response::json((), json!({"id": 1}));
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.body().content_type(), Some("application/json"));
    }

    #[test]
    fn test_error_response_shape() {
        let res: Response<ResponseBody, ()> =
            Response::error(StatusCode::UNAUTHORIZED, (), "credentials required");
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        match res.body() {
            ResponseBody::Json(value) => {
                assert_eq!(value["error"]["message"], "credentials required");
            }
            other => panic!("expected JSON body, got {other:?}"),
        }
    }

    #[test]
    fn test_with_session_replaces() {
        let res: Response<ResponseBody, &str> = Response::empty(StatusCode::OK, "old");
        let res = res.with_session("new");
        assert_eq!(*res.session(), "new");
    }

    #[test]
    fn test_map_body_preserves_status_and_headers() {
        let res: Response<ResponseBody, ()> = Response::empty(StatusCode::CREATED, ())
            .with_header(
                http::header::LOCATION,
                http::HeaderValue::from_static("/rfis/9"),
            );
        let mapped = res.map_body(ResponseBody::into_json);
        assert_eq!(mapped.status(), StatusCode::CREATED);
        assert!(mapped.headers().contains_key(http::header::LOCATION));
        assert_eq!(*mapped.body(), ResponseBody::Json(serde_json::Value::Null));
    }
}
