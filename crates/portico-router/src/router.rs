//! Ordered route collection and request dispatch.

use http::{Method, StatusCode};
use serde_json::json;

use portico_core::{Params, PorticoResult, RawBody, Request, Response, ResponseBody, Session};

use crate::route::Route;

/// An ordered collection of routes.
///
/// Matching is first-match-wins in insertion order, which is what makes
/// catch-all routes work: they are appended last and only fire when
/// nothing above them matched. Merging concatenates, preserving the
/// order of both sides.
pub struct Router<S> {
    routes: Vec<Route<S>>,
}

impl<S> Default for Router<S> {
    fn default() -> Self {
        Self { routes: Vec::new() }
    }
}

impl<S> Clone for Router<S> {
    fn clone(&self) -> Self {
        Self {
            routes: self.routes.clone(),
        }
    }
}

impl<S> std::fmt::Debug for Router<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.routes)
            .finish()
    }
}

impl<S: Session> Router<S> {
    /// Creates an empty router.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a router from an ordered list of routes.
    #[must_use]
    pub fn from_routes(routes: Vec<Route<S>>) -> Self {
        Self { routes }
    }

    /// Appends a route at the end of the match order.
    pub fn push(&mut self, route: Route<S>) {
        self.routes.push(route);
    }

    /// Concatenates another router's routes after this one's.
    #[must_use]
    pub fn merge(mut self, other: Self) -> Self {
        self.routes.extend(other.routes);
        self
    }

    /// Returns the routes in match order.
    #[must_use]
    pub fn routes(&self) -> &[Route<S>] {
        &self.routes
    }

    /// Consumes the router, returning its routes in match order.
    #[must_use]
    pub fn into_routes(self) -> Vec<Route<S>> {
        self.routes
    }

    /// Returns the number of routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns true if the router has no routes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Finds the first route matching the method and path.
    #[must_use]
    pub fn match_route(&self, method: &Method, path: &str) -> Option<(&Route<S>, Params)> {
        self.routes.iter().find_map(|route| {
            if !route.method().matches(method) {
                return None;
            }
            route.match_path(path).map(|params| (route, params))
        })
    }

    /// Dispatches a request through the first matching route.
    ///
    /// Runs the route's hook (if any) around the handler: `before` with
    /// the incoming request, then the handler, then `after` with the
    /// state, the request and the finished response. When the handler
    /// faults the error propagates and `after` does not run. When no
    /// route matches, responds `404` with an empty JSON object.
    pub async fn dispatch(
        &self,
        req: Request<RawBody, S>,
    ) -> PorticoResult<Response<ResponseBody, S>> {
        let Some((route, params)) = self.match_route(req.method(), req.path()) else {
            tracing::debug!(method = %req.method(), path = %req.path(), "no route matched");
            return Ok(Response::json_with_status(
                StatusCode::NOT_FOUND,
                req.into_session(),
                json!({}),
            ));
        };
        let req = req.with_params(params);

        match route.hook() {
            Some(hook) => {
                let state = hook.before(&req).await;
                // The hook observes the request again in `after`, so the
                // handler runs on a copy.
                let observed = req.clone_with_body(req.body().clone());
                let res = route.handler().run(req).await?;
                hook.after(state, &observed, &res).await;
                Ok(res)
            }
            None => route.handler().run(req).await,
        }
    }
}
