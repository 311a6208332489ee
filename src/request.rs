//! Incoming HTTP request type.
//!
//! The body is not read before the handler runs. A handler that needs it calls
//! [`Request::read_body`]; one that doesn't (the revision endpoint, for one)
//! answers without waiting on the client.

use std::fmt;

use bytes::Bytes;
use http::header::{HeaderMap, HeaderName, HeaderValue};
use http::{Method, StatusCode};
use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::{BodyExt, LengthLimitError};

use crate::response::{IntoResponse, Response};

pub(crate) type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// An incoming HTTP request.
#[derive(Debug)]
pub struct Request {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) query: Option<String>,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Body,
}

/// Request body: either already in memory or still on the connection.
pub(crate) enum Body {
    Buffered(Bytes),
    Streaming(UnsyncBoxBody<Bytes, BoxError>),
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buffered(b) => f.debug_tuple("Buffered").field(&b.len()).finish(),
            Self::Streaming(_) => f.write_str("Streaming"),
        }
    }
}

impl Request {
    /// Builds a request by hand, e.g. for tests or when embedding a handler
    /// behind another server.
    ///
    /// `target` is the request target as it appears on the request line; a
    /// query string after `?` is split off and does not take part in path
    /// comparisons.
    ///
    /// ```rust
    /// use revision_endpoint::Request;
    /// use http::Method;
    ///
    /// let req = Request::new(Method::GET, "/__revision__?verbose=1")
    ///     .with_header("accept", "application/json");
    /// assert_eq!(req.path(), "/__revision__");
    /// assert_eq!(req.query(), Some("verbose=1"));
    /// ```
    pub fn new(method: Method, target: &str) -> Self {
        let (path, query) = match target.split_once('?') {
            Some((p, q)) => (p, Some(q.to_owned())),
            None => (target, None),
        };
        Self {
            method,
            path: path.to_owned(),
            query,
            headers: HeaderMap::new(),
            body: Body::Buffered(Bytes::new()),
        }
    }

    /// Appends a header.
    ///
    /// # Panics
    ///
    /// Panics if `name` or `value` is not valid in an HTTP header.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        let name = HeaderName::from_bytes(name.as_bytes())
            .unwrap_or_else(|e| panic!("invalid header name `{name}`: {e}"));
        let value = HeaderValue::from_str(value)
            .unwrap_or_else(|e| panic!("invalid header value `{value}`: {e}"));
        self.headers.append(name, value);
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Body::Buffered(body.into());
        self
    }

    /// Converts hyper's request head. Headers are kept as received, and the
    /// body stays unread.
    pub(crate) fn from_parts(parts: http::request::Parts, body: Body) -> Self {
        Self {
            method: parts.method,
            path: parts.uri.path().to_owned(),
            query: parts.uri.query().map(str::to_owned),
            headers: parts.headers,
            body,
        }
    }

    pub fn method(&self) -> &Method { &self.method }
    pub fn path(&self) -> &str { &self.path }
    pub fn query(&self) -> Option<&str> { self.query.as_deref() }
    pub fn headers(&self) -> &HeaderMap { &self.headers }

    /// Case-insensitive header lookup. Returns `None` for values that are not
    /// visible ASCII; read those through [`headers`](Request::headers).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }

    /// Reads the whole body.
    ///
    /// The first call drains the connection, subject to the server's body
    /// limit; later calls return the same bytes.
    pub async fn read_body(&mut self) -> Result<Bytes, BodyError> {
        let bytes = match &mut self.body {
            Body::Buffered(b) => return Ok(b.clone()),
            Body::Streaming(stream) => stream.collect().await.map_err(BodyError::from)?.to_bytes(),
        };
        self.body = Body::Buffered(bytes.clone());
        Ok(bytes)
    }
}

/// Failure to read a request body.
#[derive(Debug)]
pub enum BodyError {
    /// The body exceeded the server's limit.
    TooLarge,
    /// The connection failed while the body was being read.
    Read(BoxError),
}

impl From<BoxError> for BodyError {
    fn from(e: BoxError) -> Self {
        if e.is::<LengthLimitError>() { Self::TooLarge } else { Self::Read(e) }
    }
}

impl fmt::Display for BodyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooLarge => f.write_str("request body too large"),
            Self::Read(e)  => write!(f, "failed to read request body: {e}"),
        }
    }
}

impl std::error::Error for BodyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TooLarge => None,
            Self::Read(e)  => Some(e.as_ref()),
        }
    }
}

/// `413` for an oversized body, `400` otherwise.
impl IntoResponse for BodyError {
    fn into_response(self) -> Response {
        match self {
            Self::TooLarge => Response::status(StatusCode::PAYLOAD_TOO_LARGE),
            Self::Read(_)  => Response::status(StatusCode::BAD_REQUEST),
        }
    }
}
