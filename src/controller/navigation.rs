//! Redirect helpers.

use http::StatusCode;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use url::Url;

use super::params::is_blank;
use super::Controller;
use crate::core::Response;

/// Bytes that cannot appear in a `Location` value. Reserved characters and
/// existing `%` escapes pass through.
const LOCATION: &AsciiSet = &CONTROLS.add(b' ').add(b'"').add(b'<').add(b'>').add(b'`');

impl Controller {
    /// Same-host referrer with any fragment removed, or an empty string.
    pub fn referrer(&self) -> String {
        let referer = self.get_server("HTTP_REFERER", None, true).unwrap_or_default();
        let host = self.get_server("HTTP_HOST", None, true).unwrap_or_default();

        if referer.is_empty() || !referer.contains(host.as_str()) {
            return String::new();
        }
        match referer.find('#') {
            Some(pos) => referer[..pos].to_string(),
            None => referer,
        }
    }

    /// Copy of the current response redirecting to `url` with `302 Found`.
    pub fn redirect(&self, url: impl AsRef<str>) -> Response {
        self.redirect_with(url, StatusCode::FOUND)
    }

    /// Copy of the current response redirecting to `url` with `status`.
    /// Non-ASCII characters are percent-encoded.
    pub fn redirect_with(&self, url: impl AsRef<str>, status: StatusCode) -> Response {
        let location = utf8_percent_encode(url.as_ref(), LOCATION).to_string();
        self.response
            .clone()
            .with_header("Location", location)
            .with_status(status)
    }

    /// Redirect to the application base URL.
    pub fn go_home(&self) -> Response {
        let base = self.request.base_url();
        self.redirect(if base.is_empty() { "/" } else { base })
    }

    /// Redirect to the first non-empty of: the `refer` request value, the
    /// `refer` cookie, the same-host referrer, `default_url`.
    ///
    /// Values without `//` are treated as paths on this host. With
    /// `verify_host`, an absolute URL whose host differs from the request's
    /// host is discarded and the response goes home instead.
    pub fn go_back(&self, default_url: &str, verify_host: bool) -> Response {
        let present = |v: &String| !is_blank(v);
        let url = self
            .get("refer", None, true)
            .filter(present)
            .or_else(|| self.request.cookie_param("refer", None, true).filter(present))
            .or_else(|| Some(self.referrer()).filter(present))
            .unwrap_or_else(|| default_url.to_string());

        if is_blank(&url) {
            return self.go_home();
        }

        let target = if !url.contains("//") {
            format!("/{}", url.trim_start_matches('/'))
        } else if verify_host && url_host(&url).as_deref() != Some(self.request.host()) {
            tracing::debug!(url = %url, "Refusing cross-host back redirect");
            return self.go_home();
        } else {
            url
        };
        self.redirect(target)
    }

    /// Redirect to the current URL, optionally with `#anchor`.
    pub fn refresh(&self, anchor: &str) -> Response {
        let mut url = self.request.url();
        if let Some(pos) = url.find('#') {
            url.truncate(pos);
        }
        if !anchor.is_empty() {
            url.push('#');
            url.push_str(anchor.trim_start_matches('#'));
        }
        self.redirect(url)
    }
}

/// Host of an absolute or protocol-relative URL.
fn url_host(url: &str) -> Option<String> {
    let parsed = if url.starts_with("//") {
        Url::parse(&format!("http:{}", url))
    } else {
        Url::parse(url)
    };
    parsed
        .ok()
        .and_then(|u| u.host_str().map(|h| h.trim_matches(|c| c == '[' || c == ']').to_string()))
        .filter(|h| !h.is_empty())
}
