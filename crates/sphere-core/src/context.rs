//! Requests and responses exchanged between the host, the worker and the network.

use std::borrow::Cow;
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};

use http::header::{HeaderName, HeaderValue};
use http::{HeaderMap, Method, StatusCode, Uri};

/// Unique request identifier for tracing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestId(pub String);

impl RequestId {
    /// Generate a new request ID.
    pub fn generate() -> Self {
        static SEQ: AtomicU32 = AtomicU32::new(0);

        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let seq = SEQ.fetch_add(1, Ordering::Relaxed);
        Self(format!("{:x}-{:x}", nanos, seq))
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What the requesting page intends to do with the response.
///
/// Mirrors `Request.destination` as seen by a browser worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Destination {
    /// No declared destination (fetch/XHR).
    #[default]
    Empty,
    Document,
    Image,
    Script,
    Style,
    Font,
    Manifest,
}

impl Destination {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Empty => "",
            Self::Document => "document",
            Self::Image => "image",
            Self::Script => "script",
            Self::Style => "style",
            Self::Font => "font",
            Self::Manifest => "manifest",
        }
    }
}

impl FromStr for Destination {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "" | "empty" => Ok(Self::Empty),
            "document" => Ok(Self::Document),
            "image" => Ok(Self::Image),
            "script" => Ok(Self::Script),
            "style" => Ok(Self::Style),
            "font" => Ok(Self::Font),
            "manifest" => Ok(Self::Manifest),
            other => Err(RequestError::UnknownDestination(other.to_string())),
        }
    }
}

/// Errors building a request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    #[error("invalid URL '{0}'")]
    InvalidUrl(String),

    #[error("unknown request destination '{0}'")]
    UnknownDestination(String),
}

/// A request intercepted by the worker.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    /// Unique request identifier.
    pub request_id: RequestId,
    /// HTTP method.
    pub method: Method,
    /// Absolute request URL.
    pub uri: Uri,
    /// Request headers.
    pub headers: HeaderMap,
    /// Declared destination.
    pub destination: Destination,
}

impl FetchRequest {
    /// Create a new request.
    pub fn new(method: Method, uri: Uri) -> Self {
        Self {
            request_id: RequestId::generate(),
            method,
            uri,
            headers: HeaderMap::new(),
            destination: Destination::Empty,
        }
    }

    /// Create a GET request for an absolute URL.
    pub fn get(url: &str) -> Result<Self, RequestError> {
        let uri = parse_absolute(url)?;
        Ok(Self::new(Method::GET, uri))
    }

    /// Set the declared destination.
    pub fn with_destination(mut self, destination: Destination) -> Self {
        self.destination = destination;
        self
    }

    /// Set the HTTP method.
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Add a header.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Request path without the query string.
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    /// Full request URL.
    pub fn url(&self) -> String {
        self.uri.to_string()
    }
}

/// Parse a URL that must carry a scheme and authority.
pub fn parse_absolute(url: &str) -> Result<Uri, RequestError> {
    let uri: Uri = url
        .parse()
        .map_err(|_| RequestError::InvalidUrl(url.to_string()))?;

    if uri.scheme().is_none() || uri.authority().is_none() {
        return Err(RequestError::InvalidUrl(url.to_string()));
    }

    Ok(uri)
}

/// A response produced by the network or replayed from a cache bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchResponse {
    /// HTTP status.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Response body.
    pub body: Vec<u8>,
}

impl FetchResponse {
    /// Create an empty response with the given status.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: Vec::new(),
        }
    }

    /// Create a `200 OK` response with a body.
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self::new(StatusCode::OK).with_body(body)
    }

    /// Set the body.
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Add a header.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Whether the status is exactly `200 OK`.
    ///
    /// Only these responses are written to a bucket during fetch handling.
    pub fn is_ok(&self) -> bool {
        self.status == StatusCode::OK
    }

    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Body decoded as UTF-8, lossily.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_requires_absolute_url() {
        assert!(FetchRequest::get("https://example.com/api/assets").is_ok());
        assert_eq!(
            FetchRequest::get("/api/assets").unwrap_err(),
            RequestError::InvalidUrl("/api/assets".to_string())
        );
    }

    #[test]
    fn test_path_excludes_query() {
        let req = FetchRequest::get("https://example.com/api/search?q=sunset").unwrap();
        assert_eq!(req.path(), "/api/search");
        assert_eq!(req.url(), "https://example.com/api/search?q=sunset");
    }

    #[test]
    fn test_destination_parse() {
        assert_eq!("image".parse::<Destination>().unwrap(), Destination::Image);
        assert_eq!("IMAGE".parse::<Destination>().unwrap(), Destination::Image);
        assert_eq!("".parse::<Destination>().unwrap(), Destination::Empty);
        assert!("video".parse::<Destination>().is_err());
    }

    #[test]
    fn test_request_ids_are_unique() {
        let a = RequestId::generate();
        let b = RequestId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_response_status_helpers() {
        let ok = FetchResponse::ok("hello");
        assert!(ok.is_ok());
        assert_eq!(ok.text(), "hello");

        let created = FetchResponse::new(StatusCode::CREATED);
        assert!(!created.is_ok());
        assert!(created.is_success());
    }
}
