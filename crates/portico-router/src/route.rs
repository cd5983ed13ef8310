//! Route values and combinators.

use std::sync::Arc;

use http::Method;

use portico_core::{
    BoxFuture, BoxHandler, ErasedHandler, Params, PorticoResult, RawBody, Request, Response,
    ResponseBody, Session,
};
use portico_hook::{combine_hooks, BoxHook};

/// The method half of a route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodPattern {
    /// Matches a single HTTP method.
    Exact(Method),
    /// Matches every method (the catch-all route).
    Any,
}

impl MethodPattern {
    /// Returns true if the pattern accepts the method.
    #[must_use]
    pub fn matches(&self, method: &Method) -> bool {
        match self {
            Self::Exact(m) => m == method,
            Self::Any => true,
        }
    }
}

/// A single method + path + handler (+ optional hook) unit.
///
/// Path patterns are `/`-separated segments; a `:name` segment matches
/// any one segment and captures it as a parameter, and a trailing `*`
/// segment matches any remainder (including none). Routes are immutable
/// once constructed: every combinator returns a new value.
pub struct Route<S> {
    method: MethodPattern,
    path: String,
    handler: BoxHandler<S>,
    hook: Option<BoxHook<S>>,
}

impl<S> Clone for Route<S> {
    fn clone(&self) -> Self {
        Self {
            method: self.method.clone(),
            path: self.path.clone(),
            handler: Arc::clone(&self.handler),
            hook: self.hook.clone(),
        }
    }
}

impl<S> std::fmt::Debug for Route<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("has_hook", &self.hook.is_some())
            .finish_non_exhaustive()
    }
}

impl<S: Session> Route<S> {
    /// Creates a route for a single method.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>, handler: BoxHandler<S>) -> Self {
        Self {
            method: MethodPattern::Exact(method),
            path: normalize_path(&path.into()),
            handler,
            hook: None,
        }
    }

    /// Creates a route matching any method.
    #[must_use]
    pub fn any(path: impl Into<String>, handler: BoxHandler<S>) -> Self {
        Self {
            method: MethodPattern::Any,
            path: normalize_path(&path.into()),
            handler,
            hook: None,
        }
    }

    /// Returns the method pattern.
    #[must_use]
    pub const fn method(&self) -> &MethodPattern {
        &self.method
    }

    /// Returns the path pattern.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the attached hook, if any.
    #[must_use]
    pub const fn hook(&self) -> Option<&BoxHook<S>> {
        self.hook.as_ref()
    }

    /// Returns the handler.
    #[must_use]
    pub const fn handler(&self) -> &BoxHandler<S> {
        &self.handler
    }

    /// Returns a new route with the hook attached, replacing any
    /// existing hook. Prefer [`add_hooks_to_route`], which composes.
    #[must_use]
    pub fn with_hook(mut self, hook: BoxHook<S>) -> Self {
        self.hook = Some(hook);
        self
    }

    /// Returns a new route whose handler is wrapped by `f`.
    ///
    /// Used by decorating layers (the basic-auth wrap) that must
    /// interpose on the handler without touching method, path or hook.
    #[must_use]
    pub fn map_handler(mut self, f: impl FnOnce(BoxHandler<S>) -> BoxHandler<S>) -> Self {
        self.handler = f(self.handler);
        self
    }

    /// Returns a new route whose response bodies are mapped through `f`.
    #[must_use]
    pub fn map_response(
        self,
        f: impl Fn(ResponseBody) -> ResponseBody + Send + Sync + 'static,
    ) -> Self {
        let f = Arc::new(f);
        self.map_handler(move |inner| Arc::new(MapResponse { inner, f }))
    }

    /// Attempts to match this route's path pattern against a request
    /// path, returning extracted parameters on success.
    #[must_use]
    pub fn match_path(&self, path: &str) -> Option<Params> {
        let pattern: Vec<&str> = segments(&self.path).collect();
        let actual: Vec<&str> = segments(path).collect();

        let mut params = Params::new();
        let mut i = 0;
        for seg in &pattern {
            if seg.starts_with('*') {
                // Wildcard: consumes the remainder, including nothing.
                let name = &seg[1..];
                if !name.is_empty() {
                    params.push(name, actual[i..].join("/"));
                }
                return Some(params);
            }
            let Some(value) = actual.get(i) else {
                return None;
            };
            if let Some(name) = seg.strip_prefix(':') {
                params.push(name, *value);
            } else if seg != value {
                return None;
            }
            i += 1;
        }
        (i == actual.len()).then_some(params)
    }
}

/// Rewrites a route under a path prefix.
///
/// Pure string concatenation with redundant slashes collapsed; it does
/// not deduplicate prefixes, so applying the same prefix twice stacks it
/// twice. Returns a new route.
#[must_use]
pub fn namespace_route<S: Session>(prefix: &str, route: Route<S>) -> Route<S> {
    let path = join_paths(prefix, &route.path);
    Route { path, ..route }
}

/// Rewrites a batch of routes under a path prefix, preserving order.
#[must_use]
pub fn namespace_routes<S: Session>(prefix: &str, routes: Vec<Route<S>>) -> Vec<Route<S>> {
    routes
        .into_iter()
        .map(|route| namespace_route(prefix, route))
        .collect()
}

/// Attaches hooks to a route, composing with any hook already present.
///
/// The new hooks are composed **before** the existing hook, so assembly
/// order determines execution order: hooks attached later (closer to
/// final assembly) run first on both phases.
#[must_use]
pub fn add_hooks_to_route<S: Session>(hooks: Vec<BoxHook<S>>, route: Route<S>) -> Route<S> {
    let mut all = hooks;
    if let Some(existing) = route.hook.clone() {
        all.push(existing);
    }
    let combined: BoxHook<S> = Arc::new(combine_hooks(all));
    Route {
        hook: Some(combined),
        ..route
    }
}

/// Handler decorator applying a body transform to every response.
struct MapResponse<S> {
    inner: BoxHandler<S>,
    f: Arc<dyn Fn(ResponseBody) -> ResponseBody + Send + Sync>,
}

impl<S: Session> ErasedHandler<S> for MapResponse<S> {
    fn run<'a>(
        &'a self,
        req: Request<RawBody, S>,
    ) -> BoxFuture<'a, PorticoResult<Response<ResponseBody, S>>> {
        Box::pin(async move {
            let res = self.inner.run(req).await?;
            Ok(res.map_body(|body| (self.f)(body)))
        })
    }
}

/// Splits a path into its non-empty segments.
fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Joins a prefix and a path, collapsing redundant slashes.
fn join_paths(prefix: &str, path: &str) -> String {
    let mut out = String::from("/");
    for seg in segments(prefix).chain(segments(path)) {
        if out.len() > 1 {
            out.push('/');
        }
        out.push_str(seg);
    }
    out
}

/// Normalizes a path pattern to `/`-prefixed, slash-collapsed form.
fn normalize_path(path: &str) -> String {
    join_paths("", path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;
    use portico_core::{erase, JsonStage, StagedHandler, Validated};
    use serde_json::json;

    fn ok_handler() -> BoxHandler<()> {
        erase(StagedHandler::new(
            JsonStage,
            |req: Request<Validated<serde_json::Value>, ()>| async move {
                Ok(Response::json(req.into_session(), json!({"ok": true})))
            },
        ))
    }

    #[test]
    fn test_namespace_route_concatenates() {
        let route = Route::new(Method::GET, "widgets/", ok_handler());
        let route = namespace_route("/v1", route);
        let route = namespace_route("/api", route);
        assert_eq!(route.path(), "/api/v1/widgets");
    }

    #[test]
    fn test_namespace_route_collapses_slashes() {
        let route = Route::new(Method::GET, "//widgets", ok_handler());
        let route = namespace_route("api/", route);
        assert_eq!(route.path(), "/api/widgets");
    }

    #[test]
    fn test_namespace_is_pure_concatenation() {
        // No prefix-deduplication: applying the same prefix twice stacks it.
        let route = Route::new(Method::GET, "/widgets", ok_handler());
        let route = namespace_route("/api", namespace_route("/api", route));
        assert_eq!(route.path(), "/api/api/widgets");
    }

    #[test]
    fn test_namespace_returns_new_value() {
        let base = Route::new(Method::GET, "/widgets", ok_handler());
        let namespaced = namespace_route("/api", base.clone());
        assert_eq!(base.path(), "/widgets");
        assert_eq!(namespaced.path(), "/api/widgets");
    }

    #[test]
    fn test_match_static_path() {
        let route = Route::new(Method::GET, "/widgets", ok_handler());
        assert!(route.match_path("/widgets").is_some());
        assert!(route.match_path("/widgets/").is_some());
        assert!(route.match_path("/other").is_none());
        assert!(route.match_path("/widgets/42").is_none());
    }

    #[test]
    fn test_match_param_path() {
        let route = Route::new(Method::GET, "/widgets/:id", ok_handler());
        let params = route.match_path("/widgets/42").unwrap();
        assert_eq!(params.get("id"), Some("42"));
        assert!(route.match_path("/widgets").is_none());
        assert!(route.match_path("/widgets/42/extra").is_none());
    }

    #[test]
    fn test_match_wildcard() {
        let route = Route::any("*", ok_handler());
        assert!(route.match_path("/anything").is_some());
        assert!(route.match_path("/a/b/c").is_some());
        assert!(route.match_path("/").is_some());
    }

    #[test]
    fn test_match_named_wildcard_captures_rest() {
        let route = Route::new(Method::GET, "/assets/*file", ok_handler());
        let params = route.match_path("/assets/css/site.css").unwrap();
        assert_eq!(params.get("file"), Some("css/site.css"));
    }

    #[test]
    fn test_prefixed_wildcard_matches_prefix_subtree() {
        let route = Route::any("/api/*", ok_handler());
        assert!(route.match_path("/api/unknown").is_some());
        assert!(route.match_path("/api").is_some());
        assert!(route.match_path("/other").is_none());
    }

    #[test]
    fn test_method_pattern() {
        assert!(MethodPattern::Any.matches(&Method::DELETE));
        assert!(MethodPattern::Exact(Method::GET).matches(&Method::GET));
        assert!(!MethodPattern::Exact(Method::GET).matches(&Method::POST));
    }

    #[tokio::test]
    async fn test_later_attached_hooks_run_first() {
        use std::sync::{Arc as StdArc, Mutex};

        use portico_core::BoxFuture;
        use portico_hook::{BoxHook, HookState, RouteHook};

        type Log = StdArc<Mutex<Vec<(&'static str, &'static str)>>>;

        struct NamedHook {
            label: &'static str,
            log: Log,
        }

        impl RouteHook<()> for NamedHook {
            fn name(&self) -> &'static str {
                self.label
            }

            fn before<'a>(&'a self, _req: &'a Request<RawBody, ()>) -> BoxFuture<'a, HookState> {
                Box::pin(async move {
                    self.log.lock().unwrap().push(("before", self.label));
                    Box::new(()) as HookState
                })
            }

            fn after<'a>(
                &'a self,
                _state: HookState,
                _req: &'a Request<RawBody, ()>,
                _res: &'a Response<ResponseBody, ()>,
            ) -> BoxFuture<'a, ()> {
                Box::pin(async move {
                    self.log.lock().unwrap().push(("after", self.label));
                })
            }
        }

        let log: Log = StdArc::new(Mutex::new(Vec::new()));
        let hook = |label| -> BoxHook<()> {
            StdArc::new(NamedHook {
                label,
                log: StdArc::clone(&log),
            })
        };

        // "outer" is attached later, so it runs first on both phases.
        let route = Route::new(Method::GET, "/widgets", ok_handler());
        let route = add_hooks_to_route(vec![hook("inner")], route);
        let route = add_hooks_to_route(vec![hook("outer")], route);

        let req = Request::new(
            Method::GET,
            "/widgets",
            http::HeaderMap::new(),
            portico_core::Query::new(),
            (),
            RawBody::Empty,
        );
        let router = crate::router::Router::from_routes(vec![route]);
        router.dispatch(req).await.unwrap();

        let log = log.lock().unwrap();
        assert_eq!(
            *log,
            vec![
                ("before", "outer"),
                ("before", "inner"),
                ("after", "outer"),
                ("after", "inner"),
            ]
        );
    }

    #[tokio::test]
    async fn test_map_response_wraps_body() {
        use http::HeaderMap;
        use portico_core::Query;

        let route = Route::new(Method::GET, "/widgets", ok_handler())
            .map_response(|body| match body {
                ResponseBody::Json(value) => ResponseBody::Json(json!({ "data": value })),
                other => other,
            });

        let req = Request::new(
            Method::GET,
            "/widgets",
            HeaderMap::new(),
            Query::new(),
            (),
            RawBody::Empty,
        );
        let res = route.handler().run(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        match res.body() {
            ResponseBody::Json(value) => assert_eq!(value["data"]["ok"], true),
            other => panic!("expected JSON, got {other:?}"),
        }
    }
}
