//! Slow-request detection hook.

use std::time::{Duration, Instant};

use portico_core::{BoxFuture, RawBody, Request, Response, ResponseBody, Session};

use crate::hook::{HookState, RouteHook};

/// Warns about requests that take longer than a threshold.
///
/// Quieter than [`LoggingHook`](crate::LoggingHook): it emits nothing
/// for requests under the threshold, so it can stay attached in
/// production at a coarse log level. Like the logging hook it never
/// faults.
#[derive(Debug, Clone, Copy)]
pub struct TimingHook {
    threshold: Duration,
}

impl TimingHook {
    /// Creates a timing hook warning above the given threshold.
    #[must_use]
    pub const fn new(threshold: Duration) -> Self {
        Self { threshold }
    }

    /// Returns the slow-request threshold.
    #[must_use]
    pub const fn threshold(&self) -> Duration {
        self.threshold
    }
}

impl<S: Session> RouteHook<S> for TimingHook {
    fn name(&self) -> &'static str {
        "timing"
    }

    fn before<'a>(&'a self, _req: &'a Request<RawBody, S>) -> BoxFuture<'a, HookState> {
        Box::pin(async move { Box::new(Instant::now()) as HookState })
    }

    fn after<'a>(
        &'a self,
        state: HookState,
        req: &'a Request<RawBody, S>,
        res: &'a Response<ResponseBody, S>,
    ) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            let Ok(started) = state.downcast::<Instant>() else {
                tracing::warn!(request_id = %req.id(), "timing hook state was not a timer");
                return;
            };
            let elapsed = started.elapsed();
            if elapsed > self.threshold {
                tracing::warn!(
                    request_id = %req.id(),
                    method = %req.method(),
                    path = %req.path(),
                    status = %res.status().as_u16(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "slow request"
                );
            }
        })
    }
}
