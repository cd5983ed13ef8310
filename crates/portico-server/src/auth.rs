//! Basic-auth route wrapping.
//!
//! [`wrap_basic_auth`] decorates a route's handler with an HTTP basic
//! authentication check against the stored credential: the username
//! must match exactly, the password's SHA-1 digest must match the
//! stored hex digest. A missing or failing `Authorization` header
//! short-circuits to `401` with a `WWW-Authenticate` challenge before
//! the wrapped handler runs. The route's method, path and hook are
//! untouched.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use http::header::{AUTHORIZATION, WWW_AUTHENTICATE};
use http::{HeaderMap, HeaderValue, StatusCode};
use sha1::{Digest, Sha1};

use portico_core::{
    BoxFuture, BoxHandler, ErasedHandler, PorticoResult, RawBody, Request, Response, ResponseBody,
    Session,
};
use portico_router::Route;

use crate::config::BasicAuthConfig;

/// Wraps a route's handler with a basic-auth check.
#[must_use]
pub fn wrap_basic_auth<S: Session>(auth: &BasicAuthConfig, route: Route<S>) -> Route<S> {
    let auth = auth.clone();
    route.map_handler(move |inner| Arc::new(BasicAuthHandler { auth, inner }))
}

/// Returns the lowercase hex SHA-1 digest of the input.
///
/// This is the digest format [`BasicAuthConfig::password_sha1`] stores;
/// exposed so deployments can derive the stored value.
#[must_use]
pub fn sha1_hex(input: &str) -> String {
    use std::fmt::Write;

    let digest = Sha1::digest(input.as_bytes());
    let mut out = String::with_capacity(digest.len() * 2);
    for byte in digest {
        let _ = write!(out, "{byte:02x}");
    }
    out
}

struct BasicAuthHandler<S> {
    auth: BasicAuthConfig,
    inner: BoxHandler<S>,
}

impl<S> BasicAuthHandler<S> {
    fn authorized(&self, headers: &HeaderMap) -> bool {
        let Some(credentials) = decode_credentials(headers) else {
            return false;
        };
        let (username, password) = credentials;
        username == self.auth.username
            && sha1_hex(&password).eq_ignore_ascii_case(&self.auth.password_sha1)
    }
}

impl<S: Session> ErasedHandler<S> for BasicAuthHandler<S> {
    fn run<'a>(
        &'a self,
        req: Request<RawBody, S>,
    ) -> BoxFuture<'a, PorticoResult<Response<ResponseBody, S>>> {
        Box::pin(async move {
            if self.authorized(req.headers()) {
                return self.inner.run(req).await;
            }
            tracing::debug!(path = %req.path(), "basic auth challenge");
            let res = Response::error(
                StatusCode::UNAUTHORIZED,
                req.into_session(),
                "authentication required",
            )
            .with_header(
                WWW_AUTHENTICATE,
                HeaderValue::from_static("Basic realm=\"portico\""),
            );
            Ok(res)
        })
    }
}

/// Extracts the username and password from an `Authorization: Basic`
/// header, if present and well-formed.
fn decode_credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let header = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let encoded = header.strip_prefix("Basic ")?;
    let decoded = BASE64.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

#[cfg(test)]
mod tests {
    use http::Method;
    use serde_json::json;

    use portico_core::{erase, JsonStage, Query, StagedHandler, Validated};
    use portico_router::Router;

    use super::*;

    fn credential() -> BasicAuthConfig {
        BasicAuthConfig {
            username: "ops".to_string(),
            password_sha1: sha1_hex("secret"),
        }
    }

    fn protected_route() -> Route<()> {
        let handler = erase(StagedHandler::new(
            JsonStage,
            |req: Request<Validated<serde_json::Value>, ()>| async move {
                Ok(Response::json(req.into_session(), json!({"ok": true})))
            },
        ));
        wrap_basic_auth(&credential(), Route::new(Method::GET, "/rfis", handler))
    }

    fn request_with_auth(value: Option<&str>) -> Request<RawBody, ()> {
        let mut headers = HeaderMap::new();
        if let Some(value) = value {
            headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        }
        Request::new(
            Method::GET,
            "/rfis",
            headers,
            Query::new(),
            (),
            RawBody::Empty,
        )
    }

    fn basic(username: &str, password: &str) -> String {
        format!("Basic {}", BASE64.encode(format!("{username}:{password}")))
    }

    #[tokio::test]
    async fn test_missing_header_is_challenged() {
        let router = Router::from_routes(vec![protected_route()]);
        let res = router.dispatch(request_with_auth(None)).await.unwrap();

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let challenge = res.headers().get(WWW_AUTHENTICATE).unwrap();
        assert!(challenge.to_str().unwrap().starts_with("Basic"));
    }

    #[tokio::test]
    async fn test_wrong_password_is_challenged() {
        let router = Router::from_routes(vec![protected_route()]);
        let res = router
            .dispatch(request_with_auth(Some(&basic("ops", "wrong"))))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_wrong_username_is_challenged() {
        let router = Router::from_routes(vec![protected_route()]);
        let res = router
            .dispatch(request_with_auth(Some(&basic("intruder", "secret"))))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_valid_credentials_pass_through() {
        let router = Router::from_routes(vec![protected_route()]);
        let res = router
            .dispatch(request_with_auth(Some(&basic("ops", "secret"))))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_garbage_header_is_challenged() {
        let router = Router::from_routes(vec![protected_route()]);
        for value in ["Basic not-base64!", "Bearer token", "Basic "] {
            let res = router
                .dispatch(request_with_auth(Some(value)))
                .await
                .unwrap();
            assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "header: {value}");
        }
    }

    #[test]
    fn test_sha1_hex_known_digest() {
        // SHA-1("secret")
        assert_eq!(
            sha1_hex("secret"),
            "e5e9fa1ba31ecd1ae84f75caaa474f3a663f05f4"
        );
    }
}
