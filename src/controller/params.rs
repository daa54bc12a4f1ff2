//! Request value accessors and the cookie writer.

use tracing::debug;

use super::Controller;
use crate::core::{Cookie, Error, ParamList, Result};

impl Controller {
    /// Look up `name` in the query string, then the body, falling back to
    /// `default`.
    pub fn get(&self, name: &str, default: Option<&str>, apply_filter: bool) -> Option<String> {
        self.request
            .query_param(name, None, apply_filter)
            .or_else(|| self.request.post_param(name, default, apply_filter))
    }

    pub fn get_query(&self, name: &str, default: Option<&str>, apply_filter: bool) -> Option<String> {
        self.request.query_param(name, default, apply_filter)
    }

    pub fn query_params(&self, apply_filter: bool) -> ParamList {
        self.request.query_params(apply_filter)
    }

    pub fn get_post(&self, name: &str, default: Option<&str>, apply_filter: bool) -> Option<String> {
        self.request.post_param(name, default, apply_filter)
    }

    pub fn post_params(&self, apply_filter: bool) -> ParamList {
        self.request.parsed_body(apply_filter)
    }

    pub fn get_server(&self, name: &str, default: Option<&str>, apply_filter: bool) -> Option<String> {
        self.request.server_param(name, default, apply_filter)
    }

    /// Read a cookie. With `secure`, a non-empty value is decrypted with
    /// `secret` or the configured `app.secret_key`; a value that fails to
    /// decrypt reads as absent.
    pub fn get_cookie(
        &self,
        name: &str,
        secure: bool,
        secret: Option<&str>,
        apply_filter: bool,
    ) -> Result<Option<String>> {
        let value = self.request.cookie_param(name, None, apply_filter);
        match value {
            Some(v) if secure && !v.is_empty() => {
                let secret = self.resolve_secret(secret)?;
                let plain = self.services.cipher().decrypt(&v, &secret);
                if plain.is_none() {
                    debug!(cookie = name, "Discarding cookie that failed to decrypt");
                }
                Ok(plain)
            }
            other => Ok(other),
        }
    }

    /// Queue a cookie on the response. With `secure`, the value is
    /// encrypted first.
    pub fn set_cookie(&mut self, mut cookie: Cookie, secure: bool, secret: Option<&str>) -> Result<()> {
        if secure {
            let secret = self.resolve_secret(secret)?;
            let sealed = self.services.cipher().encrypt(cookie.value(), &secret);
            cookie.set_value(sealed);
        }
        self.response = std::mem::take(&mut self.response).with_cookie(cookie);
        Ok(())
    }

    fn resolve_secret(&self, secret: Option<&str>) -> Result<String> {
        secret
            .map(str::to_string)
            .or_else(|| self.config().get("app", "secret_key"))
            .filter(|s| !is_blank(s))
            .ok_or(Error::MissingSecretConfiguration)
    }
}

/// Empty-value test shared by the accessors: `""` and `"0"` count as unset.
pub(super) fn is_blank(value: &str) -> bool {
    value.is_empty() || value == "0"
}
