//! The two-phase handler contract.
//!
//! Every route performs the same two-phase unit of work:
//!
//! 1. [`Handler::transform_request`] - inspect the incoming request and
//!    produce a typed value. Domain-validation failures are *encoded* in
//!    that value (see [`Validated`]); they are never returned as errors.
//!    Reads needed for validation are allowed here; writes are not.
//! 2. [`Handler::respond`] - compute the response from the transformed
//!    request. All side effects (persisting, notifying) happen here, so a
//!    request that fails validation performs no mutation. `respond` must
//!    handle every variant `transform_request` can produce, mapping each
//!    failure variant to a status code.
//!
//! Only genuine faults (data store unreachable) travel the `Result` error
//! channel; the boundary layer maps those to 500-class responses.
//!
//! Transform stages compose: [`compose_transform`] layers a generic stage
//! (raw body to JSON, see [`JsonStage`]) underneath per-resource
//! validation, threading a new [`Request`] between the stages with every
//! non-body field preserved.

use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;
use std::sync::Arc;

use http::StatusCode;

use crate::body::{RawBody, ResponseBody};
use crate::error::PorticoResult;
use crate::request::Request;
use crate::response::Response;
use crate::session::Session;

/// A boxed future, used where trait objects require type erasure.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A validation outcome carried in-band through the pipeline.
///
/// `transform_request` produces `Invalid` instead of failing, and
/// `respond` maps it to the recorded status code. Permission failures
/// use [`StatusCode::UNAUTHORIZED`], missing records
/// [`StatusCode::NOT_FOUND`], field failures [`StatusCode::BAD_REQUEST`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validated<T> {
    /// The request passed validation.
    Valid(T),
    /// The request failed validation; `respond` answers with `status`.
    Invalid {
        /// The status code the failure maps to.
        status: StatusCode,
        /// A client-safe description of the failure.
        message: String,
    },
}

impl<T> Validated<T> {
    /// Creates an invalid outcome.
    pub fn invalid(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Invalid {
            status,
            message: message.into(),
        }
    }

    /// Maps the valid value, passing failures through.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Validated<U> {
        match self {
            Self::Valid(value) => Validated::Valid(f(value)),
            Self::Invalid { status, message } => Validated::Invalid { status, message },
        }
    }

    /// Returns true for the valid variant.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }
}

/// A single request-transformation stage.
///
/// Stages are the composable half of `transform_request`: each one maps a
/// request at body stage `In` to a typed value `Out`. Chain stages with
/// [`compose_transform`].
pub trait TransformStage<S: Session>: Send + Sync + 'static {
    /// The body stage this transform consumes.
    type In: Send + 'static;
    /// The value this transform produces.
    type Out: Send + 'static;

    /// Applies the transformation.
    fn apply(
        &self,
        req: &Request<Self::In, S>,
    ) -> impl Future<Output = PorticoResult<Self::Out>> + Send;
}

/// Chains two transform stages.
///
/// Stage `a`'s output becomes the body of a new request (all other fields
/// preserved, including the request ID) which feeds stage `b`.
pub fn compose_transform<A, B>(first: A, second: B) -> Composed<A, B> {
    Composed { first, second }
}

/// The composition of two transform stages. See [`compose_transform`].
#[derive(Debug, Clone)]
pub struct Composed<A, B> {
    first: A,
    second: B,
}

impl<S, A, B> TransformStage<S> for Composed<A, B>
where
    S: Session,
    A: TransformStage<S>,
    A::In: Sync,
    B: TransformStage<S, In = A::Out>,
{
    type In = A::In;
    type Out = B::Out;

    fn apply(
        &self,
        req: &Request<A::In, S>,
    ) -> impl Future<Output = PorticoResult<B::Out>> + Send {
        async move {
            let mid = self.first.apply(req).await?;
            let staged = req.clone_with_body(mid);
            self.second.apply(&staged).await
        }
    }
}

/// A transform stage built from a closure.
pub struct FnStage<F, In, Out> {
    f: F,
    _marker: PhantomData<fn(In) -> Out>,
}

impl<F, In, Out> FnStage<F, In, Out> {
    /// Wraps a closure as a transform stage.
    pub const fn new(f: F) -> Self {
        Self {
            f,
            _marker: PhantomData,
        }
    }
}

impl<S, F, Fut, In, Out> TransformStage<S> for FnStage<F, In, Out>
where
    S: Session,
    F: Fn(&Request<In, S>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = PorticoResult<Out>> + Send + 'static,
    In: Send + 'static,
    Out: Send + 'static,
{
    type In = In;
    type Out = Out;

    fn apply(&self, req: &Request<In, S>) -> impl Future<Output = PorticoResult<Out>> + Send {
        (self.f)(req)
    }
}

/// The stock wire-to-JSON transform stage.
///
/// Parses a [`RawBody`] into a JSON value; an empty body parses as
/// `null`, and malformed or binary bodies become an in-band 400. Layer
/// this underneath per-resource validation with [`compose_transform`].
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonStage;

impl<S: Session> TransformStage<S> for JsonStage {
    type In = RawBody;
    type Out = Validated<serde_json::Value>;

    fn apply(
        &self,
        req: &Request<RawBody, S>,
    ) -> impl Future<Output = PorticoResult<Self::Out>> + Send {
        let parsed = match req.body() {
            RawBody::Empty => Validated::Valid(serde_json::Value::Null),
            RawBody::Text(text) => match serde_json::from_str(text) {
                Ok(value) => Validated::Valid(value),
                Err(err) => Validated::invalid(
                    StatusCode::BAD_REQUEST,
                    format!("malformed JSON body: {err}"),
                ),
            },
            RawBody::Binary(_) => {
                Validated::invalid(StatusCode::BAD_REQUEST, "expected a JSON body")
            }
        };
        std::future::ready(Ok(parsed))
    }
}

/// The two-phase unit of work behind every route.
///
/// See the module docs for the contract. Handlers are usually assembled
/// from a [`TransformStage`] plus a respond closure via [`StagedHandler`],
/// then erased with [`erase`] for storage in a route.
pub trait Handler<S: Session>: Send + Sync + 'static {
    /// The body stage this handler accepts.
    type In: Send + 'static;
    /// The typed value `transform_request` produces.
    type Out: Send + 'static;
    /// The response body type `respond` produces.
    type ResBody: Send + 'static;

    /// Validates and transforms the incoming request into a typed value.
    ///
    /// Must not fail for domain-validation failures; encode those in
    /// `Self::Out`. May read from collaborators to validate. Must not
    /// write.
    fn transform_request(
        &self,
        req: &Request<Self::In, S>,
    ) -> impl Future<Output = PorticoResult<Self::Out>> + Send;

    /// Computes the response from the transformed request.
    ///
    /// Handles every variant of `Self::Out`, including failure variants.
    /// Side effects happen here and only here.
    fn respond(
        &self,
        req: Request<Self::Out, S>,
    ) -> impl Future<Output = PorticoResult<Response<Self::ResBody, S>>> + Send;
}

/// A handler assembled from a transform stage and a respond closure.
///
/// # Example
///
/// ```rust,ignore
/// let handler = StagedHandler::new(JsonStage, |req| async move {
///     let session = req.session().clone();
///     match req.body() {
///         Validated::Valid(value) => Ok(Response::json(session, value.clone())),
///         Validated::Invalid { status, message } => {
///             Ok(Response::error(*status, session, message))
///         }
///     }
/// });
/// ```
pub struct StagedHandler<T, R, ResBody> {
    stage: T,
    respond_fn: R,
    _marker: PhantomData<fn() -> ResBody>,
}

impl<T, R, ResBody> StagedHandler<T, R, ResBody> {
    /// Assembles a handler from a transform stage and a respond closure.
    pub const fn new(stage: T, respond_fn: R) -> Self {
        Self {
            stage,
            respond_fn,
            _marker: PhantomData,
        }
    }
}

impl<S, T, R, Fut, ResBody> Handler<S> for StagedHandler<T, R, ResBody>
where
    S: Session,
    T: TransformStage<S>,
    R: Fn(Request<T::Out, S>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = PorticoResult<Response<ResBody, S>>> + Send + 'static,
    ResBody: Send + 'static,
{
    type In = T::In;
    type Out = T::Out;
    type ResBody = ResBody;

    fn transform_request(
        &self,
        req: &Request<T::In, S>,
    ) -> impl Future<Output = PorticoResult<T::Out>> + Send {
        self.stage.apply(req)
    }

    fn respond(
        &self,
        req: Request<T::Out, S>,
    ) -> impl Future<Output = PorticoResult<Response<ResBody, S>>> + Send {
        (self.respond_fn)(req)
    }
}

/// A handler built directly from two closures, one per phase.
///
/// For handlers that layer a reusable transform stage under a respond
/// closure, prefer [`StagedHandler`]; `FnHandler` suits one-off routes
/// where both phases are bespoke.
pub struct FnHandler<T, R, In, Out> {
    transform_fn: T,
    respond_fn: R,
    _marker: PhantomData<fn(In) -> Out>,
}

impl<T, R, In, Out> FnHandler<T, R, In, Out> {
    /// Assembles a handler from a transform closure and a respond
    /// closure.
    pub const fn new(transform_fn: T, respond_fn: R) -> Self {
        Self {
            transform_fn,
            respond_fn,
            _marker: PhantomData,
        }
    }
}

impl<S, T, TFut, R, RFut, In, Out, ResBody> Handler<S> for FnHandler<T, R, In, Out>
where
    S: Session,
    T: Fn(&Request<In, S>) -> TFut + Send + Sync + 'static,
    TFut: Future<Output = PorticoResult<Out>> + Send + 'static,
    R: Fn(Request<Out, S>) -> RFut + Send + Sync + 'static,
    RFut: Future<Output = PorticoResult<Response<ResBody, S>>> + Send + 'static,
    In: Send + 'static,
    Out: Send + 'static,
    ResBody: Send + 'static,
{
    type In = In;
    type Out = Out;
    type ResBody = ResBody;

    fn transform_request(
        &self,
        req: &Request<In, S>,
    ) -> impl Future<Output = PorticoResult<Out>> + Send {
        (self.transform_fn)(req)
    }

    fn respond(
        &self,
        req: Request<Out, S>,
    ) -> impl Future<Output = PorticoResult<Response<ResBody, S>>> + Send {
        (self.respond_fn)(req)
    }
}

/// A type-erased handler, as stored in a route.
///
/// `run` drives both phases in order: transform the wire-stage request,
/// thread the typed value into a new request, respond.
pub trait ErasedHandler<S>: Send + Sync {
    /// Runs the full two-phase contract for one request.
    fn run<'a>(
        &'a self,
        req: Request<RawBody, S>,
    ) -> BoxFuture<'a, PorticoResult<Response<ResponseBody, S>>>;
}

/// A shared, type-erased handler.
pub type BoxHandler<S> = Arc<dyn ErasedHandler<S>>;

struct ErasedRunner<H> {
    inner: H,
}

impl<S, H> ErasedHandler<S> for ErasedRunner<H>
where
    S: Session,
    H: Handler<S, In = RawBody>,
    H::ResBody: Into<ResponseBody>,
{
    fn run<'a>(
        &'a self,
        req: Request<RawBody, S>,
    ) -> BoxFuture<'a, PorticoResult<Response<ResponseBody, S>>> {
        Box::pin(async move {
            let out = self.inner.transform_request(&req).await?;
            let res = self.inner.respond(req.with_body(out)).await?;
            Ok(res.map_body(Into::into))
        })
    }
}

/// Erases a typed [`Handler`] for storage in a route.
pub fn erase<S, H>(handler: H) -> BoxHandler<S>
where
    S: Session,
    H: Handler<S, In = RawBody>,
    H::ResBody: Into<ResponseBody>,
{
    Arc::new(ErasedRunner { inner: handler })
}
