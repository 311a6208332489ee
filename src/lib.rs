//! # revision-endpoint
//!
//! HTTP middleware that tells you which build is running.
//!
//! Deploy pipelines export the commit a binary was built from (`COMMIT_HASH`
//! by default). [`RevisionMiddleware`](middleware::RevisionMiddleware) reads it
//! once at startup and answers `GET /__revision__` with
//! `{"revision":"<hash>"}`. Every other request goes to your application
//! unchanged.
//!
//! The crate carries just enough HTTP plumbing to run on its own:
//!
//! - [`Handler`] — one method, `call(Request) -> Response`; async functions
//!   adapt via [`handler_fn`]
//! - [`Server`] — hyper, HTTP/1.1 and HTTP/2, drains in-flight requests on
//!   SIGTERM / Ctrl-C
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use revision_endpoint::{handler_fn, Request, Response, Server};
//! use revision_endpoint::middleware::{RevisionConfig, RevisionMiddleware};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), revision_endpoint::Error> {
//!     let app = RevisionMiddleware::new(handler_fn(app), RevisionConfig::default())?;
//!     Server::bind("0.0.0.0:3000").serve(app).await
//! }
//!
//! async fn app(_req: Request) -> Response {
//!     Response::text("hello")
//! }
//! ```

mod config;
mod error;
mod handler;
mod request;
mod response;
mod server;

pub mod middleware;

pub use error::Error;
pub use handler::{handler_fn, BoxFuture, FnHandler, Handler};
pub use request::{BodyError, Request};
pub use response::{IntoResponse, Response, ResponseBuilder};
pub use server::{Server, DEFAULT_BODY_LIMIT};
