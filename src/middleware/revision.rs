//! Revision endpoint middleware.
//!
//! Answers one exact path with the revision the process was deployed from and
//! forwards every other request, untouched, to the handler it wraps.
//!
//! | Condition | Status | Content type | Body |
//! |---|---|---|---|
//! | path matches, JSON | 200 | `application/json` | `{"revision":"<value>"}` |
//! | path matches, plain | 200 | `text/plain` | `<value>` |
//! | anything else | whatever the inner handler returns | | |
//!
//! The revision is read once, when the middleware is built. Changing the
//! variable afterwards has no effect on a running instance.

use bytes::Bytes;
use http::StatusCode;
use tracing::{debug, info, trace};

use crate::config::{ConfigSource, Env, RevisionConfig};
use crate::error::Error;
use crate::handler::{BoxFuture, Handler};
use crate::request::Request;
use crate::response::Response;

/// Value reported when the configured variable is not set.
pub const UNKNOWN_REVISION: &str = "unknown";

/// Wraps `H` and serves the deployed revision on a fixed path.
///
/// ```rust
/// use revision_endpoint::{handler_fn, Request, Response};
/// use revision_endpoint::middleware::{RevisionConfig, RevisionMiddleware};
///
/// async fn app(_req: Request) -> Response {
///     Response::text("hello")
/// }
///
/// let handler = RevisionMiddleware::new(handler_fn(app), RevisionConfig::default())?;
/// # Ok::<(), revision_endpoint::Error>(())
/// ```
pub struct RevisionMiddleware<H> {
    inner: H,
    path: String,
    revision: String,
    body: Bytes,
    length: String,
    content_type: &'static str,
}

impl<H: Handler> RevisionMiddleware<H> {
    /// Builds the middleware, reading the revision from the process
    /// environment.
    pub fn new(inner: H, config: RevisionConfig) -> Result<Self, Error> {
        Self::with_source(inner, config, &Env)
    }

    /// Builds the middleware, reading the revision from `source`.
    ///
    /// Fails only when `config` is malformed; a missing variable yields
    /// [`UNKNOWN_REVISION`].
    pub fn with_source(
        inner: H,
        config: RevisionConfig,
        source: &impl ConfigSource,
    ) -> Result<Self, Error> {
        config.validate()?;

        let revision = source.get(&config.env_var).unwrap_or_else(|| {
            debug!(var = %config.env_var, "revision variable not set");
            UNKNOWN_REVISION.to_owned()
        });

        let (body, content_type) = if config.json_format {
            (render_json(&revision), "application/json")
        } else {
            (Bytes::from(revision.clone()), "text/plain")
        };

        info!(
            path = %config.path,
            var = %config.env_var,
            revision = %revision,
            "revision endpoint enabled"
        );

        Ok(Self {
            inner,
            path: config.path,
            revision,
            length: body.len().to_string(),
            body,
            content_type,
        })
    }

    /// The revision captured at construction.
    pub fn revision(&self) -> &str { &self.revision }

    /// The path this middleware answers.
    pub fn path(&self) -> &str { &self.path }

    /// The wrapped handler.
    pub fn inner(&self) -> &H { &self.inner }

    fn revision_response(&self) -> Response {
        Response::builder()
            .status(StatusCode::OK)
            .header("content-length", &self.length)
            .body(self.content_type, self.body.clone())
    }
}

impl<H: Handler> Handler for RevisionMiddleware<H> {
    fn call(&self, req: Request) -> BoxFuture {
        if req.path() == self.path {
            trace!(method = %req.method(), path = %self.path, "serving revision");
            let res = self.revision_response();
            return Box::pin(std::future::ready(res));
        }
        self.inner.call(req)
    }
}

fn render_json(revision: &str) -> Bytes {
    serde_json::json!({ "revision": revision }).to_string().into()
}
