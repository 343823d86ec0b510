//! Liquid template evaluation and the render context.
//!
//! Pages written as `.liquid` and every layout are evaluated here. The
//! context always carries two objects:
//!
//! - `site`: the `[site]` table from the build options
//! - `page`: the current page's front-matter attributes
//!
//! Layouts additionally see `body`, the page's rendered HTML.
//!
//! Liquid refuses to render a reference to a variable that does not exist,
//! and that refusal is surfaced as a [`TemplateError`]: a typo in a template
//! stops the build instead of silently producing an empty string. The
//! optional page metadata listed in [`PAGE_KEYS`] is always present on
//! `page` (nil when the page does not set it), so a shared layout can use
//! `{{ page.title }}` on untitled pages and on the home page.

use crate::markdown;
use crate::types::{Attributes, ContentKind};
use liquid::model::Value;
use log::debug;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("failed to parse template {name}: {source}")]
    Parse {
        name: String,
        #[source]
        source: liquid::Error,
    },
    #[error("failed to render template {name}: {source}")]
    Render {
        name: String,
        #[source]
        source: liquid::Error,
    },
    #[error("failed to set up the template engine: {0}")]
    Engine(#[source] liquid::Error),
}

/// Page metadata keys every template can reference, set or not.
pub const PAGE_KEYS: &[&str] = &["title", "date", "abstract", "tags", "layout", "type", "style"];

/// Variables visible to a template.
#[derive(Debug, Clone, Copy)]
pub struct TemplateContext<'a> {
    pub site: &'a Attributes,
    pub page: &'a Attributes,
}

impl<'a> TemplateContext<'a> {
    pub fn new(site: &'a Attributes, page: &'a Attributes) -> Self {
        Self { site, page }
    }

    /// The `{site, page}` object handed to Liquid.
    pub fn to_globals(&self) -> liquid::Object {
        let mut globals = liquid::Object::new();
        globals.insert("site".into(), map_to_liquid(self.site));
        globals.insert("page".into(), Value::Object(page_object(self.page)));
        globals
    }

    /// The globals plus `body`, as a layout sees them.
    pub fn with_body(&self, body: &str) -> liquid::Object {
        let mut globals = self.to_globals();
        globals.insert("body".into(), Value::scalar(body.to_string()));
        globals
    }
}

/// A Liquid parser with the standard filter and tag library.
pub struct TemplateEngine {
    parser: liquid::Parser,
}

impl TemplateEngine {
    pub fn new() -> Result<Self, TemplateError> {
        let parser = liquid::ParserBuilder::with_stdlib()
            .build()
            .map_err(TemplateError::Engine)?;
        Ok(Self { parser })
    }

    /// Evaluate `source` against `globals`. `name` is only used in errors.
    pub fn render(
        &self,
        name: &str,
        source: &str,
        globals: &liquid::Object,
    ) -> Result<String, TemplateError> {
        let template = self
            .parser
            .parse(source)
            .map_err(|source| TemplateError::Parse {
                name: name.to_string(),
                source,
            })?;
        template
            .render(globals)
            .map_err(|source| TemplateError::Render {
                name: name.to_string(),
                source,
            })
    }
}

/// Turn a page body into HTML according to its kind.
pub fn render_content(
    engine: &TemplateEngine,
    kind: ContentKind,
    name: &str,
    body: &str,
    context: &TemplateContext<'_>,
) -> Result<String, TemplateError> {
    debug!("Rendering {name} as {kind:?}");
    match kind {
        ContentKind::Markdown => Ok(markdown::to_html(body)),
        ContentKind::Template => engine.render(name, body, &context.to_globals()),
        ContentKind::Html => Ok(body.to_string()),
    }
}

fn map_to_liquid(map: &Attributes) -> Value {
    Value::Object(object_from(map))
}

fn object_from(map: &Attributes) -> liquid::Object {
    let mut obj = liquid::Object::new();
    for (key, value) in map {
        obj.insert(key.clone().into(), json_to_liquid(value));
    }
    obj
}

fn page_object(page: &Attributes) -> liquid::Object {
    let mut obj = object_from(page);
    for key in PAGE_KEYS {
        if !obj.contains_key(*key) {
            obj.insert((*key).into(), Value::Nil);
        }
    }
    obj
}

/// Convert a JSON value (front matter, site options) into a Liquid value.
pub fn json_to_liquid(json: &serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Nil,
        serde_json::Value::Bool(b) => Value::scalar(*b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::scalar(i)
            } else if let Some(f) = n.as_f64() {
                Value::scalar(f)
            } else {
                Value::scalar(n.to_string())
            }
        }
        serde_json::Value::String(s) => Value::scalar(s.clone()),
        serde_json::Value::Array(items) => Value::Array(items.iter().map(json_to_liquid).collect()),
        serde_json::Value::Object(map) => map_to_liquid(map),
    }
}
