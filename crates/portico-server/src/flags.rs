//! Feature-flag endpoint.

use std::collections::BTreeMap;

use serde_json::Value;

use portico_core::{
    erase, PorticoResult, RawBody, Request, Response, Session, StagedHandler,
    TransformStage, Validated,
};
use portico_router::{Route, Router};

/// Builds the feature-flag router: `GET /flags` returning the flag map.
///
/// The map is captured at assembly time; the front end fetches it
/// before it can authenticate, which is why assembly keeps this router
/// (like `/status`) outside the basic-auth wrap.
#[must_use]
pub fn flags_router<S: Session>(flags: &BTreeMap<String, bool>) -> Router<S> {
    let value = Value::Object(
        flags
            .iter()
            .map(|(name, enabled)| (name.clone(), Value::Bool(*enabled)))
            .collect(),
    );
    let handler = erase(StagedHandler::new(
        Ignore,
        move |req: Request<Validated<()>, S>| {
            let value = value.clone();
            async move { Ok(Response::json(req.into_session(), value)) }
        },
    ));
    Router::from_routes(vec![Route::new(http::Method::GET, "/flags", handler)])
}

/// The flag endpoint never reads the body.
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
