//! The hook trait and per-request state.

use std::any::Any;
use std::sync::Arc;

use portico_core::{BoxFuture, RawBody, Request, Response, ResponseBody, Session};

/// Opaque per-request state carried from `before` to `after`.
///
/// Exists only for the lifetime of one request; never shared between
/// requests.
pub type HookState = Box<dyn Any + Send>;

/// Cross-cutting before/after behavior attachable to a route.
///
/// `before` runs ahead of the handler's two phases and returns state;
/// `after` runs once the response exists, receiving that same state, the
/// request, and the response. The default `after` does nothing.
///
/// Per request the lifecycle is strictly
/// `before → transform_request → respond → after`; a hook is never
/// re-entered for the same request.
///
/// # Example
///
/// ```rust,ignore
/// struct TimingHook;
///
/// impl<S: Session> RouteHook<S> for TimingHook {
///     fn name(&self) -> &'static str {
///         "timing"
///     }
///
///     fn before<'a>(&'a self, _req: &'a Request<RawBody, S>) -> BoxFuture<'a, HookState> {
///         Box::pin(async { Box::new(Instant::now()) as HookState })
///     }
///
///     fn after<'a>(
///         &'a self,
///         state: HookState,
///         _req: &'a Request<RawBody, S>,
///         res: &'a Response<ResponseBody, S>,
///     ) -> BoxFuture<'a, ()> {
///         Box::pin(async move {
///             if let Ok(started) = state.downcast::<Instant>() {
///                 tracing::debug!(elapsed = ?started.elapsed(), status = %res.status());
///             }
///         })
///     }
/// }
/// ```
pub trait RouteHook<S: Session>: Send + Sync + 'static {
    /// Returns the name of this hook, for logging and debugging.
    fn name(&self) -> &'static str;

    /// Runs before the route's handler; the returned state is handed
    /// back to [`RouteHook::after`] once the response exists.
    fn before<'a>(&'a self, req: &'a Request<RawBody, S>) -> BoxFuture<'a, HookState>;

    /// Runs after the route's handler with the state `before` produced.
    ///
    /// The default implementation does nothing.
    fn after<'a>(
        &'a self,
        state: HookState,
        req: &'a Request<RawBody, S>,
        res: &'a Response<ResponseBody, S>,
    ) -> BoxFuture<'a, ()> {
        let _ = (state, req, res);
        Box::pin(async {})
    }
}

/// A shared, type-erased hook.
pub type BoxHook<S> = Arc<dyn RouteHook<S>>;

/// A hook built from a pair of closures.
///
/// `before` must return the state `after` expects; the state travels as a
/// [`HookState`] so `after` downcasts it back. For hooks with no state,
/// return `Box::new(())`.
pub struct FnHook<B, A> {
    name: &'static str,
    before: B,
    after: A,
}

impl<B, A> FnHook<B, A> {
    /// Creates a named hook from `before` and `after` closures.
    pub const fn new(name: &'static str, before: B, after: A) -> Self {
        Self { name, before, after }
    }
}

impl<S, B, A> RouteHook<S> for FnHook<B, A>
where
    S: Session,
    B: Fn(&Request<RawBody, S>) -> HookState + Send + Sync + 'static,
    A: Fn(HookState, &Request<RawBody, S>, &Response<ResponseBody, S>) + Send + Sync + 'static,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn before<'a>(&'a self, req: &'a Request<RawBody, S>) -> BoxFuture<'a, HookState> {
        let state = (self.before)(req);
        Box::pin(async move { state })
    }

    fn after<'a>(
        &'a self,
        state: HookState,
        req: &'a Request<RawBody, S>,
        res: &'a Response<ResponseBody, S>,
    ) -> BoxFuture<'a, ()> {
        (self.after)(state, req, res);
        Box::pin(async {})
    }
}
