//! Handler trait and async-function adapter.
//!
//! # How requests flow through a chain
//!
//! Everything that can answer a request implements [`Handler`]: plain async
//! functions (through [`handler_fn`]) and middleware that wraps another
//! handler. The server holds exactly one root handler; middleware decides per
//! request whether to answer itself or forward to the handler it owns.
//!
//! ```text
//! async fn app(req: Request) -> Response { … }    ← user writes this
//!        ↓ handler_fn(app)
//! FnHandler(app)                                  ← implements Handler
//!        ↓ RevisionMiddleware::new(inner, config)
//! RevisionMiddleware<FnHandler<_>>                ← also implements Handler
//!        ↓ Server::serve(handler)
//! Arc<dyn Handler>                                ← shared across connections
//!        ↓
//! handler.call(req) at request time               ← one vtable dispatch
//! ```

use std::future::Future;
use std::pin::Pin;

use crate::request::Request;
use crate::response::{IntoResponse, Response};

/// A heap-allocated, type-erased future that resolves to a [`Response`].
///
/// `Pin<Box<…>>` is required because the async runtime must be able to poll
/// the future in-place. `Send + 'static` let tokio move it across threads.
pub type BoxFuture = Pin<Box<dyn Future<Output = Response> + Send + 'static>>;

/// Something that turns a [`Request`] into a [`Response`].
///
/// Implemented by [`FnHandler`] for async functions and by every middleware
/// in [`crate::middleware`]. Implementations are shared across concurrent
/// requests, hence `Send + Sync + 'static`.
pub trait Handler: Send + Sync + 'static {
    fn call(&self, req: Request) -> BoxFuture;
}

/// Adapts an async function into a [`Handler`].
///
/// Accepts any function with the signature:
///
/// ```text
/// async fn name(req: Request) -> impl IntoResponse
/// ```
///
/// ```rust
/// use revision_endpoint::{handler_fn, Request, Response};
///
/// async fn hello(_req: Request) -> Response {
///     Response::text("hello")
/// }
///
/// let handler = handler_fn(hello);
/// ```
pub fn handler_fn<F, Fut, R>(f: F) -> FnHandler<F>
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    FnHandler(f)
}

/// Newtype wrapper that holds a concrete function `F` and implements
/// [`Handler`] for it. Built by [`handler_fn`].
pub struct FnHandler<F>(F);

impl<F, Fut, R> Handler for FnHandler<F>
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn call(&self, req: Request) -> BoxFuture {
        let fut = (self.0)(req);
        Box::pin(async move { fut.await.into_response() })
    }
}
