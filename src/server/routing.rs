//! Path-based route resolution.
//!
//! Paths map as `/{controller}/{action}/{key}/{value}/...` below the
//! application base path. Missing segments select the default controller
//! and the controller's default action.

use std::borrow::Cow;

use percent_encoding::percent_decode_str;

/// Controller, action and path parameters extracted from a request path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Route {
    pub controller: String,
    /// Empty when the path names no action.
    pub action: String,
    pub params: Vec<(String, String)>,
}

impl Route {
    /// Parse `path` relative to `base_path`.
    pub fn parse(path: &str, base_path: &str, default_controller: &str) -> Self {
        let base = base_path.trim_end_matches('/');
        let rest = path
            .strip_prefix(base)
            .filter(|rest| rest.is_empty() || rest.starts_with('/'))
            .unwrap_or(path);

        let mut segments = rest
            .split('/')
            .filter(|s| !s.is_empty())
            .map(decode);

        let controller = segments
            .next()
            .unwrap_or_else(|| default_controller.to_string());
        let action = segments.next().unwrap_or_default();

        let mut params = Vec::new();
        while let (Some(key), Some(value)) = (segments.next(), segments.next()) {
            params.push((key, value));
        }

        Self {
            controller,
            action,
            params,
        }
    }

    /// Canonical route id, e.g. `user/show`.
    pub fn id(&self, default_action: &str) -> String {
        let action = if self.action.is_empty() {
            default_action
        } else {
            &self.action
        };
        format!("{}/{}", self.controller, action)
    }
}

fn decode(segment: &str) -> String {
    match percent_decode_str(segment).decode_utf8_lossy() {
        Cow::Borrowed(s) => s.to_string(),
        Cow::Owned(s) => s,
    }
}
