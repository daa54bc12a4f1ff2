//! View rendering service.
//!
//! Controllers hand a template identifier, the merged output data and the
//! request's [`Layout`] to a [`View`]. [`TemplateView`] is a small built-in
//! engine: `{{ name }}` inserts an HTML-escaped value, `{{! name }}` inserts
//! it raw, dotted names (`user.name`) walk nested objects.
//!
//! Layouts wrap the rendered page: the layout template receives the page as
//! `content`, and each layout section is rendered with the same data and
//! exposed under its section name.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use serde_json::{Map, Value};

use crate::core::{Error, Result};

/// Layout selection for one request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Layout {
    name: Option<String>,
    sections: Vec<(String, String)>,
}

impl Layout {
    /// Wrap rendered pages in the layout template `name`.
    pub fn set(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    /// Render `template` as the layout section `name`. Setting a section
    /// twice replaces the template.
    pub fn set_section(&mut self, name: impl Into<String>, template: impl Into<String>) {
        let name = name.into();
        let template = template.into();
        match self.sections.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = template,
            None => self.sections.push((name, template)),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn sections(&self) -> &[(String, String)] {
        &self.sections
    }
}

/// Template rendering service.
pub trait View: Send + Sync {
    fn render(&self, template: &str, data: &Map<String, Value>, layout: &Layout) -> Result<Vec<u8>>;
}

/// Built-in template engine backed by a directory of `.html` files or an
/// in-memory template set. Loaded templates are cached for the life of the
/// view.
pub struct TemplateView {
    root: Option<PathBuf>,
    extension: String,
    cache: RwLock<HashMap<String, String>>,
}

impl TemplateView {
    /// Templates resolve to `{root}/{id}.html`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
            extension: "html".to_string(),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// In-memory template set; unknown identifiers fail to render.
    pub fn from_templates<I, K, V>(templates: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let cache = templates
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            root: None,
            extension: "html".to_string(),
            cache: RwLock::new(cache),
        }
    }

    /// Change the template file extension (without the dot).
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    fn load(&self, id: &str) -> Result<String> {
        if let Some(source) = self.cache.read().ok().and_then(|c| c.get(id).cloned()) {
            return Ok(source);
        }

        let Some(ref root) = self.root else {
            return Err(Error::View(format!("template not found: {}", id)));
        };
        if id.split('/').any(|part| part == "..") {
            return Err(Error::View(format!("invalid template id: {}", id)));
        }

        let path = root.join(format!("{}.{}", id, self.extension));
        let source = std::fs::read_to_string(&path)
            .map_err(|e| Error::View(format!("cannot load template {:?}: {}", path, e)))?;

        if let Ok(mut cache) = self.cache.write() {
            cache.insert(id.to_string(), source.clone());
        }
        Ok(source)
    }

    fn render_one(&self, id: &str, data: &Map<String, Value>) -> Result<String> {
        let source = self.load(id)?;
        Ok(substitute(&source, data))
    }
}

impl View for TemplateView {
    fn render(&self, template: &str, data: &Map<String, Value>, layout: &Layout) -> Result<Vec<u8>> {
        let content = self.render_one(template, data)?;

        let Some(layout_name) = layout.name() else {
            return Ok(content.into_bytes());
        };

        let mut layout_data = data.clone();
        for (section, section_template) in layout.sections() {
            let rendered = self.render_one(section_template, data)?;
            layout_data.insert(section.clone(), Value::String(rendered));
        }
        layout_data.insert("content".to_string(), Value::String(content));

        tracing::trace!(template, layout = layout_name, "rendering with layout");
        Ok(self.render_one(layout_name, &layout_data)?.into_bytes())
    }
}

/// Replace `{{ name }}` / `{{! name }}` placeholders.
fn substitute(source: &str, data: &Map<String, Value>) -> String {
    let mut out = String::with_capacity(source.len());
    let mut rest = source;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };

        let tag = after[..end].trim();
        let (raw, name) = match tag.strip_prefix('!') {
            Some(name) => (true, name.trim()),
            None => (false, tag),
        };
        let text = resolve(data, name).map(value_to_text).unwrap_or_default();
        if raw {
            out.push_str(&text);
        } else {
            escape_html_into(&text, &mut out);
        }

        rest = &after[end + 2..];
    }

    out.push_str(rest);
    out
}

fn resolve<'a>(data: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    let mut parts = name.split('.');
    let mut current = data.get(parts.next()?)?;
    for part in parts {
        current = match current {
            Value::Object(map) => map.get(part)?,
            Value::Array(items) => items.get(part.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(true) => "1".to_string(),
        Value::Bool(false) => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

fn escape_html_into(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            c => out.push(c),
        }
    }
}
