//! Read-only request accessor used by controllers and middleware.

use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use http::header::{self, HeaderName};
use http::{HeaderMap, Method, Uri};

use super::filter::{HtmlFilter, ParamFilter};
use super::parser::{self, ParamList};

/// HTTP request with parsed query, body, cookie and server parameters.
///
/// Parameters are parsed once at construction; every accessor is read-only.
/// Accessors taking `apply_filter` run the value through the request's
/// [`ParamFilter`] (defaults to [`HtmlFilter`]).
pub struct Request {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
    version: http::Version,
    query: ParamList,
    post: ParamList,
    cookies: ParamList,
    server: ParamList,
    base_url: String,
    filter: Arc<dyn ParamFilter>,
}

impl std::fmt::Debug for Request {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Request")
            .field("method", &self.method)
            .field("uri", &self.uri)
            .field("headers", &self.headers)
            .field("body_len", &self.body.len())
            .finish()
    }
}

impl Request {
    /// Create a new request and parse its parameters.
    pub fn new(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Self {
        Self::with_version(method, uri, headers, body, http::Version::HTTP_11)
    }

    fn with_version(
        method: Method,
        uri: Uri,
        headers: HeaderMap,
        body: Bytes,
        version: http::Version,
    ) -> Self {
        let query = uri.query().map(parser::parse_query_string).unwrap_or_default();
        let cookies = headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(parser::parse_cookies)
            .collect();
        let post = parse_body(&headers, &body);
        let server = build_server_params(&method, &uri, &headers, version);

        Self {
            method,
            uri,
            headers,
            body,
            version,
            query,
            post,
            cookies,
            server,
            base_url: String::new(),
            filter: Arc::new(HtmlFilter),
        }
    }

    /// Set the application base URL (path prefix the app is mounted under).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Replace the input filter.
    pub fn with_filter(mut self, filter: Arc<dyn ParamFilter>) -> Self {
        self.filter = filter;
        self
    }

    /// Record the peer address as `REMOTE_ADDR`/`REMOTE_PORT`.
    pub fn with_remote_addr(mut self, addr: SocketAddr) -> Self {
        self.server
            .push(("REMOTE_ADDR".to_string(), addr.ip().to_string()));
        self.server
            .push(("REMOTE_PORT".to_string(), addr.port().to_string()));
        self
    }

    /// Add or override a server parameter.
    pub fn with_server_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.server.push((name.into(), value.into()));
        self
    }

    #[inline]
    pub fn method(&self) -> &Method {
        &self.method
    }

    #[inline]
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    #[inline]
    pub fn query(&self) -> Option<&str> {
        self.uri.query()
    }

    /// The URI as received (usually origin-form: path and query).
    #[inline]
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    #[inline]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    #[inline]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    #[inline]
    pub fn version(&self) -> http::Version {
        self.version
    }

    #[inline]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get a header value by string name (case-insensitive).
    #[inline]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    #[inline]
    fn header_by_name(&self, name: &HeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    #[inline]
    pub fn user_agent(&self) -> Option<&str> {
        self.header_by_name(&header::USER_AGENT)
    }

    /// Request host without port, from the URI authority or the Host header.
    pub fn host(&self) -> &str {
        if let Some(host) = self.uri.host() {
            return host;
        }
        let raw = self.header_by_name(&header::HOST).unwrap_or("");
        strip_port(raw)
    }

    /// `https` when the URI says so or `HTTPS=on` was recorded, else `http`.
    pub fn scheme(&self) -> &str {
        if let Some(scheme) = self.uri.scheme_str() {
            return scheme;
        }
        match parser::lookup(&self.server, "HTTPS") {
            Some(v) if v.eq_ignore_ascii_case("on") || v == "1" => "https",
            _ => "http",
        }
    }

    /// Absolute URL of the current request.
    pub fn url(&self) -> String {
        let authority = self
            .uri
            .authority()
            .map(|a| a.as_str())
            .or_else(|| self.header_by_name(&header::HOST))
            .unwrap_or("localhost");
        let path_and_query = self
            .uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");
        format!("{}://{}{}", self.scheme(), authority, path_and_query)
    }

    // Parameter accessors

    fn read(
        &self,
        params: &[(String, String)],
        name: &str,
        default: Option<&str>,
        apply_filter: bool,
    ) -> Option<String> {
        match parser::lookup(params, name) {
            Some(v) if apply_filter => Some(self.filter.filter(v)),
            Some(v) => Some(v.to_string()),
            None => default.map(str::to_string),
        }
    }

    fn read_all(&self, params: &[(String, String)], apply_filter: bool) -> ParamList {
        params
            .iter()
            .map(|(k, v)| {
                let v = if apply_filter {
                    self.filter.filter(v)
                } else {
                    v.clone()
                };
                (k.clone(), v)
            })
            .collect()
    }

    /// Query string parameter.
    pub fn query_param(&self, name: &str, default: Option<&str>, apply_filter: bool) -> Option<String> {
        self.read(&self.query, name, default, apply_filter)
    }

    /// Body parameter (form-urlencoded or top-level JSON object).
    pub fn post_param(&self, name: &str, default: Option<&str>, apply_filter: bool) -> Option<String> {
        self.read(&self.post, name, default, apply_filter)
    }

    /// Request cookie.
    pub fn cookie_param(&self, name: &str, default: Option<&str>, apply_filter: bool) -> Option<String> {
        self.read(&self.cookies, name, default, apply_filter)
    }

    /// Server parameter (`REQUEST_METHOD`, `HTTP_HOST`, `HTTP_REFERER`, ...).
    pub fn server_param(&self, name: &str, default: Option<&str>, apply_filter: bool) -> Option<String> {
        self.read(&self.server, name, default, apply_filter)
    }

    /// All query parameters.
    pub fn query_params(&self, apply_filter: bool) -> ParamList {
        self.read_all(&self.query, apply_filter)
    }

    /// All body parameters.
    pub fn parsed_body(&self, apply_filter: bool) -> ParamList {
        self.read_all(&self.post, apply_filter)
    }

    /// All cookies.
    pub fn cookie_params(&self, apply_filter: bool) -> ParamList {
        self.read_all(&self.cookies, apply_filter)
    }

    /// All server parameters.
    pub fn server_params(&self) -> &[(String, String)] {
        &self.server
    }
}

impl<B> From<http::Request<B>> for Request
where
    B: Into<Bytes>,
{
    fn from(req: http::Request<B>) -> Self {
        let (parts, body) = req.into_parts();
        Self::with_version(parts.method, parts.uri, parts.headers, body.into(), parts.version)
    }
}

fn strip_port(host: &str) -> &str {
    if host.starts_with('[') {
        // IPv6 literal: keep the brackets' content
        return host
            .find(']')
            .map(|end| &host[1..end])
            .unwrap_or(host);
    }
    host.rsplit_once(':').map(|(h, _)| h).unwrap_or(host)
}

fn parse_body(headers: &HeaderMap, body: &Bytes) -> ParamList {
    if body.is_empty() {
        return Vec::new();
    }
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if content_type.starts_with("application/x-www-form-urlencoded") {
        parser::parse_query_string(&String::from_utf8_lossy(body))
    } else if content_type.starts_with("application/json") {
        parser::parse_json_body(body)
    } else {
        Vec::new()
    }
}

fn build_server_params(
    method: &Method,
    uri: &Uri,
    headers: &HeaderMap,
    version: http::Version,
) -> ParamList {
    let mut server = Vec::with_capacity(headers.len() + 5);

    server.push(("REQUEST_METHOD".to_string(), method.as_str().to_string()));
    server.push((
        "REQUEST_URI".to_string(),
        uri.path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| "/".to_string()),
    ));
    server.push((
        "QUERY_STRING".to_string(),
        uri.query().unwrap_or("").to_string(),
    ));
    server.push((
        "SERVER_PROTOCOL".to_string(),
        match version {
            http::Version::HTTP_10 => "HTTP/1.0",
            http::Version::HTTP_2 => "HTTP/2.0",
            _ => "HTTP/1.1",
        }
        .to_string(),
    ));
    if uri.scheme_str() == Some("https") {
        server.push(("HTTPS".to_string(), "on".to_string()));
    }

    for (name, value) in headers {
        if let Ok(value) = value.to_str() {
            let key = format!("HTTP_{}", name.as_str().to_ascii_uppercase().replace('-', "_"));
            server.push((key, value.to_string()));
        }
    }

    server
}
