//! Middleware layer.
//!
//! A middleware is a [`Handler`](crate::Handler) that owns the next handler in
//! the chain and decides per request whether to answer itself or forward.
//! Compose by nesting constructors; the outermost one goes to
//! [`Server::serve`](crate::Server::serve).

mod revision;

pub use crate::config::{ConfigSource, Env, RevisionConfig, DEFAULT_ENV_VAR, DEFAULT_PATH};
pub use revision::{RevisionMiddleware, UNKNOWN_REVISION};
