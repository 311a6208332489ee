//! Minimal example — an application behind the revision endpoint.
//!
//! Run with:
//!   COMMIT_HASH=$(git rev-parse HEAD) RUST_LOG=info cargo run --example basic
//!
//! Try:
//!   curl -i http://localhost:3000/__revision__
//!   curl -i -X POST http://localhost:3000/__revision__
//!   curl -i http://localhost:3000/users/42

use http::StatusCode;
use revision_endpoint::middleware::{RevisionConfig, RevisionMiddleware};
use revision_endpoint::{handler_fn, Request, Response, Server};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let app = RevisionMiddleware::new(handler_fn(app), RevisionConfig::default())
        .expect("invalid revision config");

    Server::bind("0.0.0.0:3000")
        .serve(app)
        .await
        .expect("server error");
}

// Everything the middleware does not answer lands here.
async fn app(req: Request) -> Response {
    match req.path().strip_prefix("/users/") {
        Some(id) if !id.is_empty() => {
            Response::json(format!(r#"{{"id":"{id}","name":"alice"}}"#).into_bytes())
        }
        _ => Response::status(StatusCode::NOT_FOUND),
    }
}
