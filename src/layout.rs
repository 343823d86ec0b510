//! Layout composition.
//!
//! A layout is a Liquid file in `<source>/layouts/` that wraps a page's
//! rendered HTML (`{{ body }}`) in the site's shared furniture. Pages pick
//! one with the `layout` front-matter key. The name is a plain file name
//! inside the layouts directory: `post` and `v1.2` load `post.liquid` and
//! `v1.2.liquid`, while a name already ending in `.liquid` or `.html` is
//! used as-is. Names containing a path separator are rejected.
//!
//! Layouts are read from disk every time they are used. A build renders
//! each page once, so there is nothing worth caching.

use crate::template::{TemplateContext, TemplateEngine, TemplateError};
use log::debug;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// Extension appended to bare layout names.
pub const LAYOUT_EXTENSION: &str = "liquid";

/// Extensions a layout name may already carry.
const KNOWN_EXTENSIONS: &[&str] = &[LAYOUT_EXTENSION, "html"];

/// Layout used when a page does not name one.
pub const DEFAULT_LAYOUT: &str = "default";

#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("invalid layout name '{0}': must be a file name inside the layouts directory")]
    InvalidName(String),
    #[error("layout '{name}' not found at {}", path.display())]
    NotFound { name: String, path: PathBuf },
    #[error("failed to read layout {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Template(#[from] TemplateError),
}

/// The layouts directory of a site.
#[derive(Debug, Clone)]
pub struct Layouts {
    dir: PathBuf,
}

impl Layouts {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// File a layout name resolves to.
    pub fn path_for(&self, name: &str) -> Result<PathBuf, LayoutError> {
        if !is_file_name(name) {
            return Err(LayoutError::InvalidName(name.to_string()));
        }
        let has_known_extension = Path::new(name)
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .is_some_and(|ext| KNOWN_EXTENSIONS.contains(&ext.as_str()));
        if has_known_extension {
            Ok(self.dir.join(name))
        } else {
            Ok(self.dir.join(format!("{name}.{LAYOUT_EXTENSION}")))
        }
    }

    /// Whether the named layout exists. Invalid names never do.
    pub fn exists(&self, name: &str) -> bool {
        self.path_for(name).is_ok_and(|path| path.is_file())
    }

    /// Load the named layout's source text.
    pub fn load(&self, name: &str) -> Result<String, LayoutError> {
        let path = self.path_for(name)?;
        match fs::read_to_string(&path) {
            Ok(source) => Ok(source),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(LayoutError::NotFound {
                name: name.to_string(),
                path,
            }),
            Err(source) => Err(LayoutError::Read { path, source }),
        }
    }

    /// Wrap `body` in the named layout.
    pub fn compose(
        &self,
        engine: &TemplateEngine,
        name: &str,
        context: &TemplateContext<'_>,
        body: &str,
    ) -> Result<String, LayoutError> {
        let source = self.load(name)?;
        debug!("Using layout: {name}");
        let html = engine.render(&format!("layout '{name}'"), &source, &context.with_body(body))?;
        Ok(html)
    }
}

fn is_file_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    !name.contains(['/', '\\'])
        && matches!(components.next(), Some(Component::Normal(_)))
        && components.next().is_none()
}
