//! Hook combination.

use portico_core::{BoxFuture, RawBody, Request, Response, ResponseBody, Session};

use crate::hook::{BoxHook, HookState, RouteHook};

/// Combines hooks into a single hook.
///
/// The combined `before` runs each hook's `before` in order, collecting
/// every state; the combined `after` replays each hook's `after` with its
/// own state **in the same order**. Combining an empty list yields a
/// no-op hook.
pub fn combine_hooks<S: Session>(hooks: Vec<BoxHook<S>>) -> CombinedHook<S> {
    CombinedHook { hooks }
}

/// A hook built from an ordered list of hooks. See [`combine_hooks`].
///
/// The combined state is the ordered list of each inner hook's state;
/// it lives only for the duration of one request.
pub struct CombinedHook<S> {
    hooks: Vec<BoxHook<S>>,
}

impl<S: Session> CombinedHook<S> {
    /// Returns the number of combined hooks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    /// Returns true if this is the no-op combination.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}

impl<S: Session> RouteHook<S> for CombinedHook<S> {
    fn name(&self) -> &'static str {
        "combined"
    }

    fn before<'a>(&'a self, req: &'a Request<RawBody, S>) -> BoxFuture<'a, HookState> {
        Box::pin(async move {
            let mut states = Vec::with_capacity(self.hooks.len());
            for hook in &self.hooks {
                states.push(hook.before(req).await);
            }
            Box::new(states) as HookState
        })
    }

    fn after<'a>(
        &'a self,
        state: HookState,
        req: &'a Request<RawBody, S>,
        res: &'a Response<ResponseBody, S>,
    ) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            let Ok(states) = state.downcast::<Vec<HookState>>() else {
                tracing::warn!("combined hook received state of an unexpected type");
                return;
            };
            // Same order as `before`, not reversed.
            for (hook, state) in self.hooks.iter().zip(*states) {
                hook.after(state, req, res).await;
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{HeaderMap, Method, StatusCode};
    use portico_core::Query;
    use std::sync::{Arc, Mutex};

    type Log = Arc<Mutex<Vec<(&'static str, usize)>>>;

    /// Records its position in the chain on both phases, and hands its
    /// index through the hook state so `after` can verify it got its own
    /// state back.
    struct RecordingHook {
        index: usize,
        log: Log,
    }

    impl RouteHook<()> for RecordingHook {
        fn name(&self) -> &'static str {
            "recording"
        }

        fn before<'a>(&'a self, _req: &'a Request<RawBody, ()>) -> BoxFuture<'a, HookState> {
            Box::pin(async move {
                self.log.lock().unwrap().push(("before", self.index));
                Box::new(self.index) as HookState
            })
        }

        fn after<'a>(
            &'a self,
            state: HookState,
            _req: &'a Request<RawBody, ()>,
            _res: &'a Response<ResponseBody, ()>,
        ) -> BoxFuture<'a, ()> {
            Box::pin(async move {
                let own_state = *state.downcast::<usize>().expect("own state");
                assert_eq!(own_state, self.index, "hook got someone else's state");
                self.log.lock().unwrap().push(("after", self.index));
            })
        }
    }

    fn request() -> Request<RawBody, ()> {
        Request::new(
            Method::GET,
            "/rfis",
            HeaderMap::new(),
            Query::new(),
            (),
            RawBody::Empty,
        )
    }

    async fn run_combined(n: usize) -> Vec<(&'static str, usize)> {
        let log: Log = Arc::new(Mutex::new(Vec::new()));
        let hooks: Vec<BoxHook<()>> = (0..n)
            .map(|index| {
                Arc::new(RecordingHook {
                    index,
                    log: Arc::clone(&log),
                }) as BoxHook<()>
            })
            .collect();

        let combined = combine_hooks(hooks);
        let req = request();
        let res: Response<ResponseBody, ()> = Response::empty(StatusCode::OK, ());

        let state = combined.before(&req).await;
        combined.after(state, &req, &res).await;

        let log = log.lock().unwrap();
        log.clone()
    }

    #[tokio::test]
    async fn test_after_runs_in_before_order() {
        let log = run_combined(3).await;
        assert_eq!(
            log,
            vec![
                ("before", 0),
                ("before", 1),
                ("before", 2),
                ("after", 0),
                ("after", 1),
                ("after", 2),
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_combination_is_noop() {
        let log = run_combined(0).await;
        assert!(log.is_empty());

        let combined: CombinedHook<()> = combine_hooks(vec![]);
        assert!(combined.is_empty());
        assert_eq!(combined.len(), 0);
    }

    #[tokio::test]
    async fn test_single_hook_combination() {
        let log = run_combined(1).await;
        assert_eq!(log, vec![("before", 0), ("after", 0)]);
    }

    // Ordering invariant for arbitrary chain lengths: `after` callbacks
    // fire in the same order as their `before` callbacks, each with its
    // own state, for all N >= 0.
    proptest::proptest! {
        #[test]
        fn prop_after_order_matches_before_order(n in 0usize..8) {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            let log = rt.block_on(run_combined(n));

            let befores: Vec<usize> = log
                .iter()
                .filter(|(phase, _)| *phase == "before")
                .map(|(_, i)| *i)
                .collect();
            let afters: Vec<usize> = log
                .iter()
                .filter(|(phase, _)| *phase == "after")
                .map(|(_, i)| *i)
                .collect();

            proptest::prop_assert_eq!(befores.len(), n);
            proptest::prop_assert_eq!(befores, afters);
        }
    }
}
