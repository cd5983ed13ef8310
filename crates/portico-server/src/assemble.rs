//! Router assembly.
//!
//! [`assemble`] is a pure function from configuration, resources and
//! hooks to the application's final route order. The step order is
//! load-bearing:
//!
//! 1. Compile the API resources (skipped entirely in maintenance mode).
//! 2. Mount the admin router under the admin prefix.
//! 3. Append the front-end catch-all.
//! 4. Attach the global hooks to everything so far.
//! 5. Wrap everything so far in basic auth, when configured.
//! 6. Prepend the feature-flag router.
//! 7. Prepend the liveness router.
//!
//! Steps 6 and 7 run after step 5, so `/flags` and `/status` sit in
//! front of the basic-auth wrap: monitors and the pre-login front end
//! reach them without credentials.

use portico_core::Session;
use portico_hook::BoxHook;
use portico_resource::{compile_resources, Resource};
use portico_router::{add_hooks_to_route, namespace_routes, Route, Router};

use crate::admin::admin_router;
use crate::auth::wrap_basic_auth;
use crate::config::AppConfig;
use crate::flags::flags_router;
use crate::static_files::front_end_router;
use crate::status::status_router;

/// Assembles the application router.
///
/// `data` is the data-access layer handed to the resource handler
/// factories; `admin_access` decides which sessions may use the admin
/// surface; `global_hooks` run around every API, admin and front-end
/// request (but not around `/status` or `/flags`).
#[must_use]
pub fn assemble<S, D, P>(
    resources: &[Resource<S, D>],
    data: &D,
    config: &AppConfig,
    admin_access: P,
    global_hooks: Vec<BoxHook<S>>,
) -> Router<S>
where
    S: Session,
    P: Fn(&S) -> bool + Send + Sync + 'static,
{
    // Steps 1-3: the authenticated surface, in match order.
    let mut routes: Vec<Route<S>> = if config.maintenance_mode() {
        tracing::warn!("maintenance mode: API routes omitted from assembly");
        Vec::new()
    } else {
        compile_resources(resources, data, config.api_prefix())
    };
    routes.extend(namespace_routes(
        config.admin_prefix(),
        admin_router(admin_access).into_routes(),
    ));
    routes.extend(front_end_router(config).into_routes());

    // Step 4: global hooks around everything assembled so far.
    if !global_hooks.is_empty() {
        routes = routes
            .into_iter()
            .map(|route| add_hooks_to_route(global_hooks.clone(), route))
            .collect();
    }

    // Step 5: basic auth around everything assembled so far.
    if let Some(auth) = config.basic_auth() {
        routes = routes
            .into_iter()
            .map(|route| wrap_basic_auth(auth, route))
            .collect();
    }

    // Steps 6-7: flags then status, prepended so both bypass the wrap.
    let mut all = status_router().into_routes();
    all.extend(flags_router(config.feature_flags()).into_routes());
    all.extend(routes);

    tracing::info!(route_count = all.len(), "router assembled");
    Router::from_routes(all)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_assembly_still_has_status_flags_and_front_end() {
        let config = AppConfig::default();
        let router: Router<()> =
            assemble(&[], &(), &config, |_session: &()| false, Vec::new());

        let paths: Vec<_> = router.routes().iter().map(Route::path).collect();
        // api surface is just the JSON catch-all when no resources exist
        assert_eq!(
            paths,
            vec![
                "/status",
                "/flags",
                "/api/*",
                "/admin/diagnostics",
                "/*"
            ]
        );
    }

    #[test]
    fn test_maintenance_mode_drops_api_routes() {
        let config = AppConfig::builder().maintenance_mode(true).build();
        let router: Router<()> =
            assemble(&[], &(), &config, |_session: &()| false, Vec::new());

        let paths: Vec<_> = router.routes().iter().map(Route::path).collect();
        assert_eq!(
            paths,
            vec!["/status", "/flags", "/admin/diagnostics", "/*"]
        );
    }
}
