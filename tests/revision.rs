use std::collections::HashMap;

use http::{Method, StatusCode};
use revision_endpoint::middleware::{RevisionConfig, RevisionMiddleware};
use revision_endpoint::{handler_fn, Error, Handler, Request, Response};

async fn original(_req: Request) -> Response {
    Response::builder()
        .header("x-original", "yes")
        .body("text/plain", "Original Response")
}

fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect()
}

fn app(config: RevisionConfig, pairs: &'static [(&'static str, &'static str)]) -> impl Handler {
    RevisionMiddleware::with_source(handler_fn(original), config, &env(pairs)).unwrap()
}

fn get(path: &str) -> Request {
    Request::new(Method::GET, path)
}

fn assert_length_matches_body(res: &Response) {
    assert_eq!(res.header("content-length"), Some(res.body().len().to_string().as_str()));
}

#[tokio::test]
async fn returns_commit_hash_at_default_path() {
    let app = app(RevisionConfig::default(), &[("COMMIT_HASH", "abc123")]);
    let res = app.call(get("/__revision__")).await;

    assert_eq!(res.status_code(), StatusCode::OK);
    assert_eq!(res.body(), br#"{"revision":"abc123"}"#);
    assert_eq!(res.header("content-type"), Some("application/json"));
    assert_length_matches_body(&res);
}

#[tokio::test]
async fn returns_unknown_when_variable_not_set() {
    let app = app(RevisionConfig::default(), &[]);
    let res = app.call(get("/__revision__")).await;

    assert_eq!(res.body(), br#"{"revision":"unknown"}"#);
    assert_eq!(res.header("content-type"), Some("application/json"));
    assert_length_matches_body(&res);
}

#[tokio::test]
async fn passes_through_other_requests() {
    let app = app(RevisionConfig::default(), &[("COMMIT_HASH", "abc123")]);
    let req = || {
        Request::new(Method::PUT, "/?a=b")
            .with_header("authorization", "Bearer t")
            .with_body("payload")
    };

    let direct = handler_fn(original).call(req()).await;
    let through = app.call(req()).await;

    assert_eq!(through, direct);
    assert_eq!(through.body(), b"Original Response");
}

#[tokio::test]
async fn uses_custom_path() {
    let app = app(RevisionConfig::default().path("/version"), &[("COMMIT_HASH", "abc123")]);

    let res = app.call(get("/version")).await;
    assert_eq!(res.status_code(), StatusCode::OK);
    assert_eq!(res.body(), br#"{"revision":"abc123"}"#);
    assert_length_matches_body(&res);

    let res = app.call(get("/__revision__")).await;
    assert_eq!(res.body(), b"Original Response");
}

#[tokio::test]
async fn uses_custom_variable() {
    let app = app(
        RevisionConfig::default().env_var("MY_CUSTOM_HASH"),
        &[("COMMIT_HASH", "abc123"), ("MY_CUSTOM_HASH", "custom123")],
    );
    let res = app.call(get("/__revision__")).await;

    assert_eq!(res.body(), br#"{"revision":"custom123"}"#);
    assert_length_matches_body(&res);
}

#[tokio::test]
async fn plain_text_response() {
    let app = app(RevisionConfig::default().json_format(false), &[("COMMIT_HASH", "abc123")]);
    let res = app.call(get("/__revision__")).await;

    assert_eq!(res.status_code(), StatusCode::OK);
    assert_eq!(res.body(), b"abc123");
    assert_eq!(res.header("content-type"), Some("text/plain"));
    assert_eq!(res.header("content-length"), Some("6"));
}

#[tokio::test]
async fn content_length_counts_bytes_not_chars() {
    let plain = app(RevisionConfig::default().json_format(false), &[("COMMIT_HASH", "réVision✓")]);
    let res = plain.call(get("/__revision__")).await;

    assert_eq!(res.body(), "réVision✓".as_bytes());
    assert_eq!(res.header("content-length"), Some("12"));

    let json = app(RevisionConfig::default(), &[("COMMIT_HASH", "réVision✓")]);
    let res = json.call(get("/__revision__")).await;
    let parsed: serde_json::Value = serde_json::from_slice(res.body()).unwrap();
    assert_eq!(parsed["revision"], "réVision✓");
    assert_length_matches_body(&res);
}

#[tokio::test]
async fn ignores_method_headers_and_query() {
    let app = app(RevisionConfig::default(), &[("COMMIT_HASH", "abc123")]);
    let plain = app.call(get("/__revision__")).await;

    for method in [Method::POST, Method::PATCH, Method::DELETE, Method::TRACE] {
        let req = Request::new(method, "/__revision__?verbose=true")
            .with_header("accept", "text/html")
            .with_body("ignored");
        assert_eq!(app.call(req).await, plain);
    }
}

#[tokio::test]
async fn repeated_calls_are_identical() {
    let app = app(RevisionConfig::default(), &[("COMMIT_HASH", "abc123")]);
    let first = app.call(get("/__revision__")).await;
    let second = app.call(get("/__revision__")).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn middleware_nests() {
    let source = env(&[("COMMIT_HASH", "abc123"), ("BUILD_ID", "42")]);
    let inner = RevisionMiddleware::with_source(handler_fn(original), RevisionConfig::default(), &source).unwrap();
    let outer = RevisionMiddleware::with_source(
        inner,
        RevisionConfig::default().path("/build").env_var("BUILD_ID").json_format(false),
        &source,
    )
    .unwrap();

    assert_eq!(outer.call(get("/build")).await.body(), b"42");
    assert_eq!(outer.call(get("/__revision__")).await.body(), br#"{"revision":"abc123"}"#);
    assert_eq!(outer.call(get("/other")).await.body(), b"Original Response");
    assert_eq!(outer.inner().revision(), "abc123");
}

#[test]
fn rejects_malformed_config() {
    let res = RevisionMiddleware::with_source(
        handler_fn(original),
        RevisionConfig::default().env_var(""),
        &env(&[]),
    );
    assert!(matches!(res, Err(Error::Config(_))));
}
