//! Liveness endpoint.

use portico_core::{
    erase, PorticoResult, RawBody, Request, Response, ResponseBody, Session, StagedHandler,
    TransformStage, Validated,
};
use portico_router::{Route, Router};
use serde_json::json;

/// Builds the liveness router: `GET /status` answering `{"status":"ok"}`.
///
/// Assembly prepends this router last, so it sits first in match order
/// and stays outside the basic-auth wrap; monitors never need
/// credentials.
#[must_use]
pub fn status_router<S: Session>() -> Router<S> {
    let handler = erase(StagedHandler::new(Ignore, respond_status));
    Router::from_routes(vec![Route::new(http::Method::GET, "/status", handler)])
}

/// The liveness check never reads the body.
struct Ignore;

impl<S: Session> TransformStage<S> for Ignore {
    type In = RawBody;
    type Out = Validated<()>;

    fn apply(
        &self,
        _req: &Request<Self::In, S>,
    ) -> impl std::future::Future<Output = PorticoResult<Self::Out>> + Send {
        std::future::ready(Ok(Validated::Valid(())))
    }
}

async fn respond_status<S: Session>(
    req: Request<Validated<()>, S>,
) -> PorticoResult<Response<ResponseBody, S>> {
    Ok(Response::json(
        req.into_session(),
        json!({ "status": "ok" }),
    ))
}
