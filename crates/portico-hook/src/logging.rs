//! Request logging hook.

use std::time::Instant;

use portico_core::{BoxFuture, RawBody, Request, Response, ResponseBody, Session};

use crate::hook::{HookState, RouteHook};

/// Logs one line per request: method, path and request ID in `before`,
/// status and latency in `after`.
///
/// Attached globally at assembly time, so the line covers every route.
/// The hook never faults: `tracing` emission is infallible, and a state
/// of an unexpected type (which would indicate a pipeline bug) is logged
/// and ignored rather than allowed to abort the request.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingHook;

impl LoggingHook {
    /// Creates the logging hook.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl<S: Session> RouteHook<S> for LoggingHook {
    fn name(&self) -> &'static str {
        "logging"
    }

    fn before<'a>(&'a self, req: &'a Request<RawBody, S>) -> BoxFuture<'a, HookState> {
        Box::pin(async move {
            tracing::info!(
                request_id = %req.id(),
                method = %req.method(),
                path = %req.path(),
                "request received"
            );
            Box::new(Instant::now()) as HookState
        })
    }

    fn after<'a>(
        &'a self,
        state: HookState,
        req: &'a Request<RawBody, S>,
        res: &'a Response<ResponseBody, S>,
    ) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            match state.downcast::<Instant>() {
                Ok(started) => {
                    tracing::info!(
                        request_id = %req.id(),
                        status = %res.status().as_u16(),
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "request completed"
                    );
                }
                Err(_) => {
                    tracing::warn!(request_id = %req.id(), "logging hook state was not a timer");
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{HeaderMap, Method, StatusCode};
    use portico_core::Query;

    #[tokio::test]
    async fn test_logging_hook_round_trip() {
        let hook = LoggingHook::new();
        let req: Request<RawBody, ()> = Request::new(
            Method::GET,
            "/status",
            HeaderMap::new(),
            Query::new(),
            (),
            RawBody::Empty,
        );
        let res: Response<ResponseBody, ()> = Response::empty(StatusCode::OK, ());

        let state = hook.before(&req).await;
        assert!(state.is::<Instant>());
        hook.after(state, &req, &res).await;
    }

    #[tokio::test]
    async fn test_logging_hook_tolerates_foreign_state() {
        let hook = LoggingHook::new();
        let req: Request<RawBody, ()> = Request::new(
            Method::GET,
            "/status",
            HeaderMap::new(),
            Query::new(),
            (),
            RawBody::Empty,
        );
        let res: Response<ResponseBody, ()> = Response::empty(StatusCode::OK, ());

        // Must not panic when handed state it did not produce.
        hook.after(Box::new("wrong"), &req, &res).await;
        let _ = hook.before(&req).await;
    }
}
