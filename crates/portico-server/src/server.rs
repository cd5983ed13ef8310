//! The HTTP boundary.
//!
//! [`serve`] binds a TCP listener and drives hyper's HTTP/1 connection
//! loop, spawning one tokio task per connection. Each wire request is
//! converted into a pipeline [`Request`](portico_core::Request): the
//! body is collected into a [`RawBody`], the query string parsed, and
//! the session resolved from the headers through the
//! [`SessionResolver`] seam. The router's response is serialized back
//! out, with the body's content type and (when the resolver issues one)
//! a `Set-Cookie` header.
//!
//! Pipeline faults never leak: a [`PorticoError`] maps to its status
//! code and public-message JSON envelope, with the full error only in
//! the logs.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use http::header::{CONTENT_TYPE, SET_COOKIE};
use http::HeaderValue;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use thiserror::Error;
use tokio::net::TcpListener;

use portico_core::{BoxFuture, Query, RawBody, Request, Session};
use portico_router::Router;

use crate::config::AppConfig;

/// The wire response body type.
pub type WireBody = Full<Bytes>;

/// Errors raised by the HTTP boundary.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The configured bind address is invalid.
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    /// The listener could not be bound.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// The address that could not be bound.
        addr: SocketAddr,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Resolves sessions at the boundary.
///
/// The pipeline itself never inspects cookies or tokens; this seam
/// turns request headers into a session value before dispatch, and may
/// issue a `Set-Cookie` value from the session the response carries.
pub trait SessionResolver<S: Session>: Send + Sync + 'static {
    /// Resolves the session for an incoming request.
    fn resolve<'a>(&'a self, headers: &'a http::HeaderMap) -> BoxFuture<'a, S>;

    /// Issues a `Set-Cookie` value for the response's session, if the
    /// session should be (re)persisted on the client.
    fn issue(&self, session: &S) -> Option<String>;
}

/// Runs the server until the tokio runtime shuts down.
///
/// # Errors
///
/// Returns an error when the bind address is invalid or the listener
/// cannot be bound. Per-connection errors are logged, not returned.
pub async fn serve<S, R>(
    router: Router<S>,
    resolver: R,
    config: &AppConfig,
) -> Result<(), ServerError>
where
    S: Session,
    R: SessionResolver<S>,
{
    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;
    tracing::info!(%addr, "server listening");

    let router = Arc::new(router);
    let resolver = Arc::new(resolver);

    loop {
        let (stream, remote_addr) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(err) => {
                tracing::error!(error = %err, "failed to accept connection");
                continue;
            }
        };

        let router = Arc::clone(&router);
        let resolver = Arc::clone(&resolver);
        tokio::spawn(async move {
            let io = TokioIo::new(stream);
            let service = service_fn(move |req: hyper::Request<Incoming>| {
                let router = Arc::clone(&router);
                let resolver = Arc::clone(&resolver);
                async move { handle_request(&router, resolver.as_ref(), req).await }
            });

            if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                tracing::debug!(%remote_addr, error = %err, "connection closed with error");
            }
        });
    }
}

/// Converts one wire request, dispatches it, and converts the result
/// back.
async fn handle_request<S, R>(
    router: &Router<S>,
    resolver: &R,
    req: hyper::Request<Incoming>,
) -> Result<hyper::Response<WireBody>, Infallible>
where
    S: Session,
    R: SessionResolver<S>,
{
    let (parts, body) = req.into_parts();
    let query = parts.uri.query().map_or_else(Query::new, Query::parse);
    let path = parts.uri.path().to_string();

    let bytes = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(err) => {
            tracing::warn!(error = %err, "failed to collect request body");
            return Ok(plain_response(
                http::StatusCode::BAD_REQUEST,
                r#"{"error":{"message":"failed to read request body"}}"#,
            ));
        }
    };
    let content_type = parts
        .headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);

    let session = resolver.resolve(&parts.headers).await;
    let request = Request::new(
        parts.method,
        path,
        parts.headers,
        query,
        session,
        RawBody::from_bytes(bytes, content_type.as_deref()),
    );
    let request_id = request.id();

    match router.dispatch(request).await {
        Ok(res) => {
            let (status, headers, session, body) = res.into_parts();
            let cookie = resolver.issue(&session);
            let body_content_type = body.content_type().map(str::to_owned);

            let mut out = hyper::Response::new(Full::new(body.into_bytes()));
            *out.status_mut() = status;
            *out.headers_mut() = headers;
            if let Some(ct) = body_content_type {
                if let Ok(value) = HeaderValue::from_str(&ct) {
                    out.headers_mut().insert(CONTENT_TYPE, value);
                }
            }
            if let Some(cookie) = cookie {
                match HeaderValue::from_str(&cookie) {
                    Ok(value) => {
                        out.headers_mut().append(SET_COOKIE, value);
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "resolver issued an invalid cookie value");
                    }
                }
            }
            Ok(out)
        }
        Err(err) => {
            // The public envelope carries the category and a safe
            // message; the real error stays in the log.
            tracing::error!(request_id = %request_id, error = %err, "pipeline fault");
            let envelope = err.error_body().to_string();
            let mut out = plain_response(err.status_code(), &envelope);
            out.headers_mut()
                .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            Ok(out)
        }
    }
}

fn plain_response(status: http::StatusCode, body: &str) -> hyper::Response<WireBody> {
    let mut out = hyper::Response::new(Full::new(Bytes::from(body.to_string())));
    *out.status_mut() = status;
    out
}
