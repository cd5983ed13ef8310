//! Administrative endpoints.
//!
//! The admin router's routes authorize with a session predicate inside
//! their transform phase, in-band: a session the predicate rejects
//! gets `401` from `respond`, not a fault. Assembly namespaces the
//! router under the configured admin prefix; the permission check
//! deliberately lives here rather than in assembly so it holds no
//! matter how the routes are mounted.

use http::StatusCode;
use serde_json::json;

use portico_core::{
    erase, PorticoResult, RawBody, Request, Response, ResponseBody, Session, StagedHandler,
    TransformStage, Validated,
};
use portico_router::{Route, Router};

/// Builds the admin router.
///
/// `permitted` decides whether a session may use the admin surface.
/// Current endpoints: `GET /diagnostics` with service name and version.
#[must_use]
pub fn admin_router<S, P>(permitted: P) -> Router<S>
where
    S: Session,
    P: Fn(&S) -> bool + Send + Sync + 'static,
{
    let handler = erase(StagedHandler::new(
        PermissionStage { permitted },
        respond_diagnostics,
    ));
    Router::from_routes(vec![Route::new(http::Method::GET, "/diagnostics", handler)])
}

/// Authorizes the session; the body is never read.
struct PermissionStage<P> {
    permitted: P,
}

impl<S, P> TransformStage<S> for PermissionStage<P>
where
    S: Session,
    P: Fn(&S) -> bool + Send + Sync + 'static,
{
    type In = RawBody;
    type Out = Validated<()>;

    fn apply(
        &self,
        req: &Request<Self::In, S>,
    ) -> impl std::future::Future<Output = PorticoResult<Self::Out>> + Send {
        let out = if (self.permitted)(req.session()) {
            Validated::Valid(())
        } else {
            Validated::invalid(StatusCode::UNAUTHORIZED, "admin access required")
        };
        std::future::ready(Ok(out))
    }
}

async fn respond_diagnostics<S: Session>(
    req: Request<Validated<()>, S>,
) -> PorticoResult<Response<ResponseBody, S>> {
    let session = req.session().clone();
    match req.into_body() {
        Validated::Valid(()) => Ok(Response::json(
            session,
            json!({
                "service": env!("CARGO_PKG_NAME"),
                "version": env!("CARGO_PKG_VERSION"),
            }),
        )),
        Validated::Invalid { status, message } => Ok(Response::error(status, session, &message)),
    }
}

#[cfg(test)]
mod tests {
    use http::{HeaderMap, Method};
    use portico_core::Query;

    use super::*;

    /// A session that knows whether it belongs to staff.
    #[derive(Debug, Clone)]
    struct Staff {
        admin: bool,
    }

    fn diagnostics_request(admin: bool) -> Request<RawBody, Staff> {
        Request::new(
            Method::GET,
            "/diagnostics",
            HeaderMap::new(),
            Query::new(),
            Staff { admin },
            RawBody::Empty,
        )
    }

    fn router() -> Router<Staff> {
        admin_router(|session: &Staff| session.admin)
    }

    #[tokio::test]
    async fn test_admin_session_gets_diagnostics() {
        let res = router().dispatch(diagnostics_request(true)).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        match res.body() {
            ResponseBody::Json(value) => {
                assert_eq!(value["version"], env!("CARGO_PKG_VERSION"));
            }
            other => panic!("expected JSON, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_plain_session_is_rejected_in_band() {
        let res = router().dispatch(diagnostics_request(false)).await.unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
