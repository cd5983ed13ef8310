//! Structural JSON catch-all.

use http::StatusCode;
use serde_json::json;

use portico_core::{
    erase, PorticoResult, RawBody, Request, Response, ResponseBody, Session, StagedHandler,
    TransformStage, Validated,
};

use crate::route::Route;

/// Terminates an API route list with a JSON `404`.
///
/// Matches every method and path, so it must be appended **after** the
/// real routes. The body is an empty JSON object rather than an error
/// envelope: "nothing here" is an expected outcome for API probing, not
/// a fault.
#[must_use]
pub fn not_found_json_route<S: Session>() -> Route<S> {
    Route::any("*", erase(StagedHandler::new(Passthrough, respond_not_found)))
}

/// Identity transform: the catch-all never inspects the body.
struct Passthrough;

impl<S: Session> TransformStage<S> for Passthrough {
    type In = RawBody;
    type Out = Validated<()>;

    fn apply(
        &self,
        _req: &Request<Self::In, S>,
    ) -> impl std::future::Future<Output = PorticoResult<Self::Out>> + Send {
        std::future::ready(Ok(Validated::Valid(())))
    }
}

async fn respond_not_found<S: Session>(
    req: Request<Validated<()>, S>,
) -> PorticoResult<Response<ResponseBody, S>> {
    Ok(Response::json_with_status(
        StatusCode::NOT_FOUND,
        req.into_session(),
        json!({}),
    ))
}
