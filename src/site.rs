//! The build orchestrator.
//!
//! A build runs strictly in order, on one thread:
//!
//! ```text
//! 0. guard     output must not hold src/, publish must not sit in output/
//! 1. clear     output/                       (remove, recreate empty)
//! 2. discover  src/pages/**/*.{md,markdown,liquid,html}
//!              sorted by path, then reversed
//! 3. pages     one output/<dir>/<stem>/index.html per source
//! 4. history   output/history.js             (paginated page index)
//! 5. index     output/index.html             (home page)
//! 6. publish   copy output/ → publish dir    (optional)
//! ```
//!
//! Any failure aborts the build. Nothing is rolled back: files already
//! written stay until the next build clears the output directory.

use crate::config::BuildConfig;
use crate::history::{self, HistoryDocument, HistoryEntry};
use crate::index::{self, IndexError, IndexMode};
use crate::layout::Layouts;
use crate::page::{self, PageContext, PageError, SourcePage};
use crate::paths::{INDEX_FILE, url_path};
use crate::template::{TemplateEngine, TemplateError};
use crate::types::PageRecord;
use log::{debug, info, warn};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to walk directory: {0}")]
    Walk(#[from] walkdir::Error),
    #[error(transparent)]
    Page(#[from] PageError),
    #[error(transparent)]
    Index(#[from] IndexError),
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("pages directory not found: {}", .0.display())]
    MissingPages(PathBuf),
    #[error(
        "output directory {} contains the source directory {}; clearing it would delete the site",
        output.display(),
        source_dir.display()
    )]
    OutputContainsSource { output: PathBuf, source_dir: PathBuf },
    #[error(
        "publish directory {} is inside the output directory {}",
        publish.display(),
        output.display()
    )]
    PublishInsideOutput { publish: PathBuf, output: PathBuf },
}

impl BuildError {
    fn io(path: &Path) -> impl FnOnce(io::Error) -> BuildError + '_ {
        move |source| BuildError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Extensions picked up as pages.
pub const PAGE_EXTENSIONS: &[&str] = &["md", "markdown", "liquid", "html"];

/// What a finished build produced.
#[derive(Debug)]
pub struct BuildReport {
    /// Built pages in processing order.
    pub pages: Vec<PageRecord>,
    pub history: HistoryDocument,
    pub history_path: PathBuf,
    pub index_path: PathBuf,
    /// Publish directory the output was copied into, if any.
    pub published: Option<PathBuf>,
    pub elapsed: Duration,
}

/// Build the whole site.
pub fn build(config: &BuildConfig) -> Result<BuildReport, BuildError> {
    info!("Building site...");
    let started = Instant::now();

    let engine = TemplateEngine::new()?;
    let layouts = Layouts::new(config.layouts_dir());
    let pages_dir = config.pages_dir();

    check_locations(config)?;
    clear_dir(&config.output)?;

    let sources = discover_pages(&pages_dir)?;
    debug!("Found {} pages under {}", sources.len(), pages_dir.display());

    let ctx = PageContext {
        engine: &engine,
        layouts: &layouts,
        site: &config.site,
        pages_dir: &pages_dir,
        output_dir: &config.output,
    };
    let mut pages = Vec::with_capacity(sources.len());
    for rel in &sources {
        let record = page::build_page(&ctx, rel)?;
        debug!("Built {} -> {}", record.source, record.output);
        pages.push(record);
    }

    if let Some(home) = pages.iter().find(|p| p.output == INDEX_FILE) {
        warn!(
            "{} is written to {}, which the home page overwrites",
            home.source, INDEX_FILE
        );
    }

    let mut entries: Vec<HistoryEntry> = pages.iter().map(HistoryEntry::from_record).collect();
    history::order_entries(&mut entries, config.history.order);
    let document = history::paginate(entries, config.history.page_size);
    let history_path = config.history_path();
    let text = history::serialize(&document, config.history.format, &config.history.variable)?;
    history::write_history(&history_path, &text).map_err(BuildError::io(&history_path))?;
    debug!(
        "Wrote history with {} pages to {}",
        document.pages.len(),
        history_path.display()
    );

    let content = match config.index.mode {
        IndexMode::Placeholder => config.index.placeholder.clone(),
        IndexMode::Summary => {
            index::render_summary(document.entries(), config.index.summary_count).into_string()
        }
    };
    let index_path = index::build_index_page(
        &engine,
        &layouts,
        &config.index.layout,
        &config.site,
        &content,
        &config.output,
    )?;

    let elapsed = started.elapsed();
    info!(
        "Site built successfully in {:.3}ms",
        elapsed.as_secs_f64() * 1000.0
    );

    let published = match &config.publish {
        Some(target) => {
            info!("Copying pages to {}...", target.display());
            copy_dir_recursive(&config.output, target)?;
            info!("Copied pages");
            Some(target.clone())
        }
        None => None,
    };

    Ok(BuildReport {
        pages,
        history: document,
        history_path,
        index_path,
        published,
        elapsed,
    })
}

/// Result of a dry run over the sources.
#[derive(Debug)]
pub struct CheckReport {
    /// Every discovered page, read and split, in processing order.
    pub pages: Vec<SourcePage>,
    /// `(page, layout)` pairs whose layout file does not exist.
    pub missing_layouts: Vec<(String, String)>,
    /// Whether the index layout exists.
    pub index_layout_found: bool,
}

impl CheckReport {
    pub fn is_ok(&self) -> bool {
        self.missing_layouts.is_empty() && self.index_layout_found
    }
}

/// Read every page and confirm its layout exists, without writing anything.
pub fn check(config: &BuildConfig) -> Result<CheckReport, BuildError> {
    let layouts = Layouts::new(config.layouts_dir());
    let pages_dir = config.pages_dir();

    let mut pages = Vec::new();
    let mut missing_layouts = Vec::new();
    for rel in discover_pages(&pages_dir)? {
        let source = page::read_page(&pages_dir, &rel)?;
        if !layouts.exists(source.layout()) {
            missing_layouts.push((source.name.clone(), source.layout().to_string()));
        }
        pages.push(source);
    }

    Ok(CheckReport {
        pages,
        missing_layouts,
        index_layout_found: layouts.exists(&config.index.layout),
    })
}

/// Page sources under `pages_dir`, relative to it, in processing order.
///
/// Paths are sorted lexicographically and then reversed, so files named
/// `2024-03-01-….md` come out newest first. Hidden files and directories
/// are skipped.
pub fn discover_pages(pages_dir: &Path) -> Result<Vec<PathBuf>, BuildError> {
    if !pages_dir.is_dir() {
        return Err(BuildError::MissingPages(pages_dir.to_path_buf()));
    }

    let mut found: Vec<PathBuf> = Vec::new();
    let walker = WalkDir::new(pages_dir)
        .min_depth(1)
        .into_iter()
        .filter_entry(|e| !is_hidden(e.file_name()));
    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() || !is_page(entry.path()) {
            continue;
        }
        if let Ok(rel) = entry.path().strip_prefix(pages_dir) {
            found.push(rel.to_path_buf());
        }
    }

    found.sort_by_key(|p| url_path(p));
    found.reverse();
    Ok(found)
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

fn is_page(path: &Path) -> bool {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .is_some_and(|ext| PAGE_EXTENSIONS.contains(&ext.as_str()))
}

/// Refuse output and publish locations that would destroy data.
///
/// The output directory is wiped at the start of every build, so it must
/// not be or contain the source directory. The publish directory is filled
/// from the output directory, so it must not be or sit inside it.
pub fn check_locations(config: &BuildConfig) -> Result<(), BuildError> {
    let output = resolve_path(&config.output)?;
    let source = resolve_path(&config.source)?;
    if source.starts_with(&output) {
        return Err(BuildError::OutputContainsSource {
            output: config.output.clone(),
            source_dir: config.source.clone(),
        });
    }
    if let Some(publish) = &config.publish
        && resolve_path(publish)?.starts_with(&output)
    {
        return Err(BuildError::PublishInsideOutput {
            publish: publish.clone(),
            output: config.output.clone(),
        });
    }
    Ok(())
}

/// Absolute form of `path` with symlinks resolved as far as it exists.
fn resolve_path(path: &Path) -> Result<PathBuf, BuildError> {
    let absolute = std::path::absolute(path).map_err(BuildError::io(path))?;
    let mut existing = absolute.as_path();
    let mut missing = Vec::new();
    while !existing.exists() {
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name);
                existing = parent;
            }
            _ => break,
        }
    }
    let mut resolved = existing.canonicalize().map_err(BuildError::io(existing))?;
    resolved.extend(missing.iter().rev());
    Ok(resolved)
}

/// Remove `dir` and everything in it, then recreate it empty.
pub fn clear_dir(dir: &Path) -> Result<(), BuildError> {
    if dir.exists() {
        fs::remove_dir_all(dir).map_err(BuildError::io(dir))?;
    }
    fs::create_dir_all(dir).map_err(BuildError::io(dir))
}

/// Copy the contents of `src` into `dst`, overwriting files that exist.
pub fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<(), BuildError> {
    fs::create_dir_all(dst).map_err(BuildError::io(dst))?;
    for entry in WalkDir::new(src).min_depth(1) {
        let entry = entry?;
        let Ok(rel) = entry.path().strip_prefix(src) else {
            continue;
        };
        let target = dst.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(BuildError::io(&target))?;
        } else {
            fs::copy(entry.path(), &target).map_err(BuildError::io(&target))?;
        }
    }
    Ok(())
}
