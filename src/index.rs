//! The site's home page.
//!
//! Two policies, chosen per build with `[index] mode`:
//!
//! - **placeholder** (default): the page body is a fixed string; browsing
//!   the archive is left to the history index, which the layout's own
//!   scripts load.
//! - **summary**: the body is a digest of the most recent pages, one
//!   `<article class="summary">` per page with its title, date, abstract
//!   and a "Read more" link.
//!
//! Either way the body is evaluated as a Liquid template with an empty
//! `page`, wrapped in the configured layout and written to
//! `<output>/index.html`.

use crate::history::HistoryEntry;
use crate::layout::{LayoutError, Layouts};
use crate::paths::INDEX_FILE;
use crate::template::{TemplateContext, TemplateEngine};
use crate::types::Attributes;
use maud::{Markup, html};
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IndexError {
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    Template(#[from] crate::template::TemplateError),
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// What the home page shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IndexMode {
    #[default]
    Placeholder,
    Summary,
}

/// Digest of the first `count` entries, most recent first.
pub fn render_summary<'a>(entries: impl IntoIterator<Item = &'a HistoryEntry>, count: usize) -> Markup {
    html! {
        @for entry in entries.into_iter().take(count) {
            @let title = HistoryEntry::text(entry.title.as_ref()).unwrap_or_else(|| entry.path.clone());
            article.summary {
                h2 { a href=(entry.path) { (title) } }
                @if let Some(date) = HistoryEntry::text(entry.date.as_ref()) {
                    p.date { (date) }
                }
                @if let Some(text) = HistoryEntry::text(entry.r#abstract.as_ref()) {
                    p class="abstract" { (text) }
                }
                a.read-more href=(entry.path) { "Read more" }
            }
        }
    }
}

/// Render the home page body through the layout and write it.
///
/// Returns the path of the written file.
pub fn build_index_page(
    engine: &TemplateEngine,
    layouts: &Layouts,
    layout: &str,
    site: &Attributes,
    content: &str,
    output_dir: &Path,
) -> Result<PathBuf, IndexError> {
    let page = Attributes::new();
    let context = TemplateContext::new(site, &page);

    let body = engine.render("index page", content, &context.to_globals())?;
    let html = layouts.compose(engine, layout, &context, &body)?;

    let path = output_dir.join(INDEX_FILE);
    fs::create_dir_all(output_dir).map_err(|source| IndexError::Write {
        path: output_dir.to_path_buf(),
        source,
    })?;
    fs::write(&path, html).map_err(|source| IndexError::Write {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}
