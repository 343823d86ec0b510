//! Building a single page.
//!
//! `pages/notes/trip.md` goes through:
//!
//! ```text
//! read → split front matter → render body (by extension) → wrap in layout
//!      → write output/notes/trip/index.html
//! ```
//!
//! The whole document is rendered in memory before anything is written, so
//! a page that fails (missing layout, template error) leaves no output file
//! behind.

use crate::front_matter::{self, FrontMatter};
use crate::layout::{DEFAULT_LAYOUT, LayoutError, Layouts};
use crate::paths::{self, url_path};
use crate::template::{self, TemplateContext, TemplateEngine, TemplateError};
use crate::types::{Attributes, ContentKind, PageRecord};
use log::debug;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PageError {
    #[error("failed to read page {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("page {page}: {source}")]
    Template {
        page: String,
        #[source]
        source: TemplateError,
    },
    #[error("page {page}: {source}")]
    Layout {
        page: String,
        #[source]
        source: LayoutError,
    },
}

/// Everything a page build needs besides the page itself.
pub struct PageContext<'a> {
    pub engine: &'a TemplateEngine,
    pub layouts: &'a Layouts,
    pub site: &'a Attributes,
    /// `<source>/pages`
    pub pages_dir: &'a Path,
    pub output_dir: &'a Path,
}

/// A page read from disk but not yet rendered.
#[derive(Debug, Clone)]
pub struct SourcePage {
    /// Path relative to the pages directory, `/`-separated.
    pub name: String,
    pub kind: ContentKind,
    pub front_matter: FrontMatter,
}

impl SourcePage {
    /// Layout named in the front matter, or the default one.
    pub fn layout(&self) -> &str {
        self.front_matter
            .attributes
            .get("layout")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_LAYOUT)
    }
}

/// Read and split a page without rendering it.
pub fn read_page(pages_dir: &Path, rel: &Path) -> Result<SourcePage, PageError> {
    let path = pages_dir.join(rel);
    let text = fs::read_to_string(&path).map_err(|source| PageError::Read { path, source })?;
    Ok(SourcePage {
        name: url_path(rel),
        kind: ContentKind::from_path(rel),
        front_matter: front_matter::split(&text),
    })
}

/// Build one page and write it to the output directory.
pub fn build_page(ctx: &PageContext<'_>, rel: &Path) -> Result<PageRecord, PageError> {
    let source = read_page(ctx.pages_dir, rel)?;
    let destination = paths::destination(rel);
    let name = source.name.clone();

    let html = render_page(ctx, &source)?;

    let dir = ctx.output_dir.join(&destination.dir);
    fs::create_dir_all(&dir).map_err(|e| PageError::Write {
        path: dir.clone(),
        source: e,
    })?;
    let file = ctx.output_dir.join(&destination.file);
    fs::write(&file, html).map_err(|e| PageError::Write {
        path: file.clone(),
        source: e,
    })?;
    debug!("Wrote {}", file.display());

    let output = destination.url();
    let mut attributes = source.front_matter.attributes;
    attributes.insert("path".into(), output.clone().into());

    Ok(PageRecord {
        source: name,
        kind: source.kind,
        attributes,
        output,
    })
}

/// Render a page's full HTML document.
pub fn render_page(ctx: &PageContext<'_>, source: &SourcePage) -> Result<String, PageError> {
    let context = TemplateContext::new(ctx.site, &source.front_matter.attributes);

    let body = template::render_content(
        ctx.engine,
        source.kind,
        &source.name,
        &source.front_matter.body,
        &context,
    )
    .map_err(|e| PageError::Template {
        page: source.name.clone(),
        source: e,
    })?;

    ctx.layouts
        .compose(ctx.engine, source.layout(), &context, &body)
        .map_err(|e| PageError::Layout {
            page: source.name.clone(),
            source: e,
        })
}
