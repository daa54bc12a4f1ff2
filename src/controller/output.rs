//! Output assembly: template data, JSON and rendered views.

use serde_json::{Map, Value};

use super::Controller;
use crate::core::{Response, Result};

/// Message code for a successful operation.
pub const MSG_OK: i64 = 0;
/// Message code for a failed operation.
pub const MSG_ERR: i64 = 1;

impl Controller {
    /// Set one template value. A later assignment to the same name wins.
    pub fn assign(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.data.insert(name.into(), value.into());
    }

    /// Merge several template values.
    pub fn assign_all(&mut self, values: Map<String, Value>) {
        for (name, value) in values {
            self.data.insert(name, value);
        }
    }

    /// Values assigned so far, in assignment order.
    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    /// Wrap rendered pages in the layout template `name`.
    pub fn set_layout(&mut self, name: impl Into<String>) {
        self.layout.set(name);
    }

    /// Render `template` into the layout section `name`.
    pub fn set_layout_section(&mut self, name: impl Into<String>, template: impl Into<String>) {
        self.layout.set_section(name, template);
    }

    /// Serialize a value as compact JSON.
    pub fn json_encode(&self, value: &Value) -> Result<String> {
        Ok(serde_json::to_string(value)?)
    }

    /// JSON response built from `data`, or from the assigned values when
    /// `data` is absent or empty.
    ///
    /// With JSONP enabled and a non-empty callback parameter, the payload is
    /// wrapped as `callback(json)`; a callback starting with `?` yields a
    /// bare `(json)`.
    pub fn serve_json(&self, data: Option<Value>) -> Result<Response> {
        let payload = match data {
            Some(value) if !is_empty_value(&value) => value,
            _ => Value::Object(self.data.clone()),
        };
        let mut content = self.json_encode(&payload)?;

        if self.jsonp_enabled {
            let callback = self
                .get(&self.json_callback, None, true)
                .filter(|c| !c.is_empty());
            if let Some(callback) = callback {
                let name = if callback.starts_with('?') { "" } else { callback.as_str() };
                content = format!("{}({})", name, content);
            }
        }

        let mut response = self
            .response
            .clone()
            .with_header("Content-Type", format!("application/json; charset={}", self.charset));
        response.write_body(content);
        Ok(response)
    }

    /// Render `template` (the current route when empty) with the assigned
    /// values merged with `data`, append the output to the response and
    /// return it. Entries in `data` override assigned values.
    pub fn render(&mut self, template: &str, data: Map<String, Value>) -> Result<Response> {
        let template = if template.is_empty() {
            self.route.clone()
        } else {
            template.to_string()
        };

        let mut merged = self.data.clone();
        for (name, value) in data {
            merged.insert(name, value);
        }

        let content = self
            .services
            .view()
            .render(&template, &merged, &self.layout)?;
        self.response.write_body(content);
        Ok(self.response.clone())
    }

    /// Render the message template with `code`, `msg` and `jumpUrl`
    /// (`null` when there is no jump target).
    pub fn message(&mut self, text: &str, code: i64, jump_url: Option<&str>) -> Result<Response> {
        self.assign("code", code);
        self.assign("msg", text);
        self.assign("jumpUrl", jump_url);

        let template = self.message_template.clone();
        self.render(&template, Map::new())
    }
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}
