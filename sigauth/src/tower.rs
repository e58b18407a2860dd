//! `tower::Layer`/`Service` middleware wrapping an inner service with
//! signature verification.
//!
//! Mirrors the `Service<Request<Body>>` shape used elsewhere in this
//! codebase family for request middleware: a `poll_ready` passthrough and a
//! boxed async `call`.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use bytes::Bytes;
use http::Request;
use tower::{Layer, Service};

use crate::error::VerifyError;
use crate::request::drain_request;
use crate::verifier::Verifier;

/// Builds [`SigAuthService`] around an inner service.
#[derive(Clone)]
pub struct SigAuthLayer {
    verifier: Arc<Verifier>,
}

impl SigAuthLayer {
    #[must_use]
    pub fn new(verifier: Arc<Verifier>) -> Self {
        Self { verifier }
    }
}

impl<S> Layer<S> for SigAuthLayer {
    type Service = SigAuthService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        SigAuthService {
            inner,
            verifier: self.verifier.clone(),
        }
    }
}

/// Rejects unauthenticated requests before they reach `inner`.
#[derive(Clone)]
pub struct SigAuthService<S> {
    inner: S,
    verifier: Arc<Verifier>,
}

/// Either the request failed verification, its body could not be read, or
/// the wrapped service itself failed.
#[derive(Debug)]
pub enum SigAuthError<E> {
    Unauthorized(VerifyError),
    BodyRead(String),
    Inner(E),
}

impl<E: fmt::Display> fmt::Display for SigAuthError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unauthorized(e) => write!(f, "{e}"),
            Self::BodyRead(detail) => write!(f, "error reading request body: {detail}"),
            Self::Inner(e) => write!(f, "{e}"),
        }
    }
}

impl<E: std::error::Error + 'static> std::error::Error for SigAuthError<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Unauthorized(e) => Some(e),
            Self::BodyRead(_) => None,
            Self::Inner(e) => Some(e),
        }
    }
}

impl<S, B> Service<Request<B>> for SigAuthService<S>
where
    S: Service<Request<B>> + Clone + Send + 'static,
    S::Future: Send,
    B: http_body::Body<Data = Bytes> + Default + Send + 'static,
    B::Error: fmt::Display,
    http_body_util::Full<Bytes>: Into<B>,
{
    type Response = S::Response;
    type Error = SigAuthError<S::Error>;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx).map_err(SigAuthError::Inner)
    }

    fn call(&mut self, mut req: Request<B>) -> Self::Future {
        let verifier = self.verifier.clone();
        let mut inner = self.inner.clone();
        Box::pin(async move {
            let view = drain_request(&mut req).await.map_err(|e| SigAuthError::BodyRead(e.to_string()))?;
            verifier.verify(&view).map_err(SigAuthError::Unauthorized)?;
            inner.call(req).await.map_err(SigAuthError::Inner)
        })
    }
}
