//! Flat request record extracted from an HTTP request/response pair.

use std::collections::BTreeMap;

use http::header::{HeaderMap, HOST};
use http::{Method, Uri};
use serde::Serialize;

/// HTTP request fields that end up in every logged line.
///
/// Built fresh for each request and never mutated afterwards. Header names
/// are stored in canonical form (`X-Foo-Header`) and keep every value in the
/// order it was received.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Fields {
    pub method: String,
    pub status: String,
    pub path: String,
    pub host: String,
    pub headers: BTreeMap<String, Vec<String>>,
}

/// Optional capability of a response: report the status code that has been
/// (or will be) sent.
///
/// A code of `0` means "no status written yet" and is logged as an empty
/// string.
pub trait HasStatusCode {
    fn status_code(&self) -> u16;
}

/// Response side of the extractor.
///
/// Every response type the logger accepts implements this; only those that
/// know their status override [`ResponseView::status_provider`].
pub trait ResponseView {
    fn status_provider(&self) -> Option<&dyn HasStatusCode> {
        None
    }
}

/// Request side of the extractor.
pub trait RequestView {
    fn method(&self) -> &Method;
    fn uri(&self) -> &Uri;
    fn headers(&self) -> &HeaderMap;
}

impl<B> RequestView for http::Request<B> {
    fn method(&self) -> &Method {
        http::Request::method(self)
    }

    fn uri(&self) -> &Uri {
        http::Request::uri(self)
    }

    fn headers(&self) -> &HeaderMap {
        http::Request::headers(self)
    }
}

impl RequestView for http::request::Parts {
    fn method(&self) -> &Method {
        &self.method
    }

    fn uri(&self) -> &Uri {
        &self.uri
    }

    fn headers(&self) -> &HeaderMap {
        &self.headers
    }
}

impl HasStatusCode for http::StatusCode {
    fn status_code(&self) -> u16 {
        self.as_u16()
    }
}

impl ResponseView for http::StatusCode {
    fn status_provider(&self) -> Option<&dyn HasStatusCode> {
        Some(self)
    }
}

impl<B> HasStatusCode for http::Response<B> {
    fn status_code(&self) -> u16 {
        self.status().as_u16()
    }
}

impl<B> ResponseView for http::Response<B> {
    fn status_provider(&self) -> Option<&dyn HasStatusCode> {
        Some(self)
    }
}

impl HasStatusCode for http::response::Parts {
    fn status_code(&self) -> u16 {
        self.status.as_u16()
    }
}

impl ResponseView for http::response::Parts {
    fn status_provider(&self) -> Option<&dyn HasStatusCode> {
        Some(self)
    }
}

/// A response with no status capability at all.
impl ResponseView for () {}

/// Tracks the status of a response that is still being written.
///
/// Reports `0` until [`StatusRecorder::write_status`] is called, so a line
/// logged before the head is flushed carries an empty status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusRecorder {
    code: u16,
}

impl StatusRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_status(&mut self, code: u16) {
        self.code = code;
    }
}

impl HasStatusCode for StatusRecorder {
    fn status_code(&self) -> u16 {
        self.code
    }
}

impl ResponseView for StatusRecorder {
    fn status_provider(&self) -> Option<&dyn HasStatusCode> {
        Some(self)
    }
}

impl<T: ResponseView + ?Sized> ResponseView for &T {
    fn status_provider(&self) -> Option<&dyn HasStatusCode> {
        (**self).status_provider()
    }
}

/// Build [`Fields`] from a response and the request it answers.
///
/// Never fails: anything missing degrades to an empty string.
pub fn extract<S, R>(response: &S, request: &R) -> Fields
where
    S: ResponseView + ?Sized,
    R: RequestView + ?Sized,
{
    let uri = request.uri();
    Fields {
        method: request.method().as_str().to_string(),
        status: status_string(response),
        path: request_uri(uri),
        host: request_host(uri, request.headers()),
        headers: snapshot_headers(request.headers()),
    }
}

/// Decimal status from the response's status capability, or `""` when the
/// capability is missing or reports `0`.
pub fn status_string<S: ResponseView + ?Sized>(response: &S) -> String {
    match response.status_provider().map(|p| p.status_code()) {
        None | Some(0) => String::new(),
        Some(code) => code.to_string(),
    }
}

fn request_uri(uri: &Uri) -> String {
    match uri.path_and_query() {
        Some(pq) if !pq.as_str().is_empty() => pq.as_str().to_string(),
        _ => "/".to_string(),
    }
}

fn request_host(uri: &Uri, headers: &HeaderMap) -> String {
    // host[:port] only; userinfo never reaches a log line
    if let Some(host) = uri.host() {
        return match uri.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };
    }
    headers
        .get(HOST)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
        .unwrap_or_default()
}

fn snapshot_headers(headers: &HeaderMap) -> BTreeMap<String, Vec<String>> {
    let mut out = BTreeMap::new();
    for name in headers.keys() {
        let values = headers
            .get_all(name)
            .iter()
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
            .collect();
        out.insert(canonical_header_name(name.as_str()), values);
    }
    out
}

/// Canonical MIME form of a header name: the first letter and every letter
/// following a hyphen upper-cased, the rest lower-cased.
pub fn canonical_header_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = true;
    for c in name.chars() {
        if upper {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c.to_ascii_lowercase());
        }
        upper = c == '-';
    }
    out
}
