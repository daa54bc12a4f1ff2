//! HTTP response carrier shared by controllers and middleware.

use bytes::{Bytes, BytesMut};
use http::header::{self, HeaderName};
use http::{HeaderMap, HeaderValue, StatusCode};

use super::Cookie;

/// Pre-allocated static header values for common content types.
mod content_types {
    use super::*;
    pub static TEXT_PLAIN: HeaderValue = HeaderValue::from_static("text/plain; charset=utf-8");
    pub static TEXT_HTML: HeaderValue = HeaderValue::from_static("text/html; charset=utf-8");
}

/// HTTP response.
///
/// Header, status and cookie changes are transformations: each `with_*`
/// consumes the value and returns the changed one, so callers holding a
/// response must keep the returned value. Only [`Response::write_body`]
/// mutates in place.
///
/// `Clone` is derived because a redirect or JSON response is derived from the
/// controller's current response while the controller keeps its own copy.
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    cookies: Vec<Cookie>,
    body: BytesMut,
}

impl Response {
    /// Create a new response builder.
    #[inline]
    pub fn builder() -> ResponseBuilder {
        ResponseBuilder::new()
    }

    /// Create a 200 OK response with body.
    #[inline]
    pub fn ok(body: impl AsRef<[u8]>) -> Self {
        Self::default().with_body(body)
    }

    /// Create an empty response with given status.
    #[inline]
    pub fn empty(status: StatusCode) -> Self {
        Self::default().with_status(status)
    }

    /// Plain-text error response used when dispatch fails.
    pub fn error(status: StatusCode, msg: &str) -> Self {
        Self::empty(status)
            .with_header_value(header::CONTENT_TYPE, content_types::TEXT_PLAIN.clone())
            .with_body(msg)
    }

    // Getters

    #[inline]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    #[inline]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Get a header value by string name (case-insensitive).
    #[inline]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Cookies attached so far, in the order they were added.
    #[inline]
    pub fn cookies(&self) -> &[Cookie] {
        &self.cookies
    }

    /// Last cookie attached under `name`.
    pub fn cookie(&self, name: &str) -> Option<&Cookie> {
        self.cookies.iter().rev().find(|c| c.name() == name)
    }

    #[inline]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Body as UTF-8 text (lossy).
    pub fn body_str(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    #[inline]
    pub fn body_len(&self) -> usize {
        self.body.len()
    }

    #[inline]
    pub fn content_type(&self) -> Option<&str> {
        self.header(header::CONTENT_TYPE.as_str())
    }

    /// `Location` header, set by redirects.
    #[inline]
    pub fn location(&self) -> Option<&str> {
        self.header(header::LOCATION.as_str())
    }

    // Transformations

    #[inline]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    #[inline]
    pub fn with_header_value(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Set a header by string name and value. Invalid names or values are
    /// dropped with a debug log.
    pub fn with_header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        match (
            HeaderName::try_from(name.as_ref()),
            HeaderValue::try_from(value.as_ref()),
        ) {
            (Ok(name), Ok(value)) => {
                self.headers.insert(name, value);
            }
            _ => tracing::debug!(header = name.as_ref(), "dropping invalid response header"),
        }
        self
    }

    /// Attach a cookie; emitted as a `Set-Cookie` header on conversion.
    #[inline]
    pub fn with_cookie(mut self, cookie: Cookie) -> Self {
        self.cookies.push(cookie);
        self
    }

    /// Replace the body.
    #[inline]
    pub fn with_body(mut self, body: impl AsRef<[u8]>) -> Self {
        self.body = BytesMut::from(body.as_ref());
        self
    }

    /// Append to the body stream of this instance.
    #[inline]
    pub fn write_body(&mut self, data: impl AsRef<[u8]>) {
        self.body.extend_from_slice(data.as_ref());
    }

    // Status checks

    #[inline]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    #[inline]
    pub fn is_redirection(&self) -> bool {
        self.status.is_redirection()
    }
}

impl Default for Response {
    fn default() -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            cookies: Vec::new(),
            body: BytesMut::new(),
        }
    }
}

impl From<Response> for http::Response<Bytes> {
    fn from(res: Response) -> Self {
        let mut headers = res.headers;
        for cookie in &res.cookies {
            if let Ok(value) = HeaderValue::try_from(cookie.to_header_value()) {
                headers.append(header::SET_COOKIE, value);
            }
        }

        let mut out = http::Response::new(res.body.freeze());
        *out.status_mut() = res.status;
        *out.headers_mut() = headers;
        out
    }
}

/// Builder for creating responses.
pub struct ResponseBuilder {
    status: StatusCode,
    headers: Option<HeaderMap>,
    body: BytesMut,
}

impl Default for ResponseBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseBuilder {
    #[inline]
    pub fn new() -> Self {
        Self {
            status: StatusCode::OK,
            headers: None,
            body: BytesMut::new(),
        }
    }

    #[inline]
    pub fn status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    #[inline]
    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::try_from(name.as_ref()),
            HeaderValue::try_from(value.as_ref()),
        ) {
            self.headers
                .get_or_insert_with(HeaderMap::new)
                .insert(name, value);
        }
        self
    }

    /// Set Content-Type to text/html.
    #[inline]
    pub fn html(mut self) -> Self {
        self.headers
            .get_or_insert_with(HeaderMap::new)
            .insert(header::CONTENT_TYPE, content_types::TEXT_HTML.clone());
        self
    }

    #[inline]
    pub fn body(mut self, body: impl AsRef<[u8]>) -> Self {
        self.body = BytesMut::from(body.as_ref());
        self
    }

    #[inline]
    pub fn build(self) -> Response {
        Response {
            status: self.status,
            headers: self.headers.unwrap_or_default(),
            cookies: Vec::new(),
            body: self.body,
        }
    }
}
