//! Shared types passed between the build stages.
//!
//! A page's metadata outlives its rendered body: the page builder returns a
//! [`PageRecord`], the history aggregator projects it into a history entry,
//! and the CLI output module lists it.

/// Free-form author metadata from a page's front matter, and the site-wide
/// variables from the `[site]` options table.
pub type Attributes = serde_json::Map<String, serde_json::Value>;

/// How a page body is turned into HTML, decided by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    /// `.md` / `.markdown` → CommonMark
    Markdown,
    /// `.liquid` → evaluated against `site` and `page`
    Template,
    /// Anything else is already HTML and passes through.
    Html,
}

impl ContentKind {
    pub fn from_path(path: &std::path::Path) -> Self {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "md" | "markdown" => ContentKind::Markdown,
            "liquid" => ContentKind::Template,
            _ => ContentKind::Html,
        }
    }
}

/// The result of building one page.
#[derive(Debug, Clone)]
pub struct PageRecord {
    /// Source path relative to `<source>/pages`, `/`-separated.
    pub source: String,
    pub kind: ContentKind,
    /// Front-matter attributes plus `path`, the relative output path.
    pub attributes: Attributes,
    /// Output path relative to the output directory, e.g. `hello/index.html`.
    pub output: String,
}

impl PageRecord {
    /// String value of an attribute, if present and a string.
    pub fn attr_str(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(|v| v.as_str())
    }
}
