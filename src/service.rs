//! Hyper adapter for the router.
//!
//! [`RouterService`] turns [`Dispatch`](crate::Dispatch) outcomes into
//! HTTP responses: a matched handler is invoked with its captured
//! [`PathParams`] attached to the request extensions, a trailing slash
//! recommendation becomes a `301` with a `Location` header, and the
//! automatic `404`/`405` responses can be overridden by
//! application-supplied handlers.

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Instant;

use futures::future::{ok, BoxFuture};
use hyper::body::{Body as HttpBody, Bytes, Frame, Incoming};
use hyper::service::Service;
use hyper::{header, Request, Response, StatusCode};
use tracing::debug;

use crate::router::{Dispatch, Router};

/// An asynchronous request handler.
///
/// Implemented for any `Fn(Request<Incoming>)` returning a response
/// future, which covers plain `async fn`s.
pub trait Handler {
    fn handle(&self, req: Request<Incoming>) -> BoxFuture<'static, hyper::Result<Response<Body>>>;
}

impl<F, R> Handler for F
where
    F: Fn(Request<Incoming>) -> R,
    R: Future<Output = hyper::Result<Response<Body>>> + Send + 'static,
{
    fn handle(&self, req: Request<Incoming>) -> BoxFuture<'static, hyper::Result<Response<Body>>> {
        Box::pin(self(req))
    }
}

/// A type-erased [`Handler`], the value type a served router stores.
pub type BoxedHandler = Box<dyn Handler + Send + Sync>;

/// The parameters captured for a request, attached to its extensions
/// under this type.
///
/// Missing parameters and optional parameters that matched the empty
/// string both read back as `""`.
#[derive(Clone, Debug, Default)]
pub struct PathParams(Vec<(String, String)>);

impl PathParams {
    /// Returns the value of the first parameter matching the given
    /// name, or the empty string.
    pub fn get(&self, name: &str) -> &str {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
            .unwrap_or("")
    }

    /// Returns an iterator over the captured parameters in route order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

/// A hyper `Service` dispatching every request through a [`Router`].
///
/// Cloning is cheap; clones share the same router.
#[derive(Clone)]
pub struct RouterService {
    router: Arc<Router<BoxedHandler>>,
    not_found: Option<Arc<BoxedHandler>>,
    method_not_allowed: Option<Arc<BoxedHandler>>,
}

impl RouterService {
    pub fn new(router: Router<BoxedHandler>) -> Self {
        RouterService {
            router: Arc::new(router),
            not_found: None,
            method_not_allowed: None,
        }
    }

    /// Overrides the automatic `404 Not Found` response.
    pub fn with_not_found(mut self, handler: BoxedHandler) -> Self {
        self.not_found = Some(Arc::new(handler));
        self
    }

    /// Overrides the automatic `405 Method Not Allowed` response.
    pub fn with_method_not_allowed(mut self, handler: BoxedHandler) -> Self {
        self.method_not_allowed = Some(Arc::new(handler));
        self
    }

    fn serve(&self, mut req: Request<Incoming>) -> BoxFuture<'static, hyper::Result<Response<Body>>> {
        let started = Instant::now();
        let method = req.method().as_str().to_owned();
        let path = req.uri().path().to_owned();

        let fut: BoxFuture<'static, hyper::Result<Response<Body>>> =
            match self.router.dispatch(&method, &path) {
                Dispatch::Match { value, params } => {
                    let params = PathParams(
                        params
                            .iter()
                            .map(|(key, value)| (key.to_owned(), value.to_owned()))
                            .collect(),
                    );
                    req.extensions_mut().insert(params);
                    value.handle(req)
                }
                Dispatch::Redirect { location } => Box::pin(ok(Response::builder()
                    .status(StatusCode::MOVED_PERMANENTLY)
                    .header(header::LOCATION, location)
                    .body(Body::empty())
                    .unwrap())),
                Dispatch::MethodNotAllowed { allowed } => match &self.method_not_allowed {
                    Some(handler) => handler.handle(req),
                    None => Box::pin(ok(Response::builder()
                        .status(StatusCode::METHOD_NOT_ALLOWED)
                        .header(header::ALLOW, allowed.join(", "))
                        .body(Body::empty())
                        .unwrap())),
                },
                Dispatch::NotFound => match &self.not_found {
                    Some(handler) => handler.handle(req),
                    None => Box::pin(ok(Response::builder()
                        .status(StatusCode::NOT_FOUND)
                        .body(Body::empty())
                        .unwrap())),
                },
            };

        Box::pin(async move {
            let res = fut.await;
            if let Ok(res) = &res {
                debug!(
                    %method,
                    %path,
                    status = res.status().as_u16(),
                    elapsed = ?started.elapsed(),
                    "dispatched"
                );
            }
            res
        })
    }
}

impl Service<Request<Incoming>> for RouterService {
    type Response = Response<Body>;
    type Error = hyper::Error;
    type Future = BoxFuture<'static, hyper::Result<Response<Body>>>;

    fn call(&self, req: Request<Incoming>) -> Self::Future {
        self.serve(req)
    }
}

impl Router<BoxedHandler> {
    /// Converts the router into a hyper service.
    pub fn into_service(self) -> RouterService {
        RouterService::new(self)
    }
}

/// A minimal response body.
pub enum Body {
    Empty,
    Once(Option<Bytes>),
}

impl Body {
    pub fn empty() -> Self {
        Self::Empty
    }
}

impl HttpBody for Body {
    type Data = Bytes;
    type Error = Infallible;

    fn poll_frame(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        match &mut self.as_mut().get_mut() {
            Self::Empty => Poll::Ready(None),
            Self::Once(val) => Poll::Ready(val.take().map(|bytes| Ok(Frame::data(bytes)))),
        }
    }
}

impl From<&str> for Body {
    fn from(s: &str) -> Self {
        if s.is_empty() {
            Self::Empty
        } else {
            Self::Once(Some(Bytes::from(s.as_bytes().to_vec())))
        }
    }
}

impl From<String> for Body {
    fn from(s: String) -> Self {
        if s.is_empty() {
            Self::Empty
        } else {
            Self::Once(Some(Bytes::from(s.into_bytes())))
        }
    }
}
