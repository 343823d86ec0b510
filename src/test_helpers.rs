//! Shared test utilities for the sitewright test suite.
//!
//! [`SiteFixture`] lays out a throwaway site in a temp directory:
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let site = SiteFixture::new();
//! site.layout("default", "<html><body>{{ body }}</body></html>");
//! site.page("hello.md", "---\ntitle: Hi\n---\n# Hello\n");
//!
//! let report = crate::site::build(&site.config()).unwrap();
//! assert_eq!(site.read_output("hello/index.html"), "...");
//! ```

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::config::{BuildConfig, BuildOptions};
use crate::types::Attributes;

// =========================================================================
// Fixture setup
// =========================================================================

/// A site rooted in its own temp directory: `src/pages`, `src/layouts`, `public`.
pub struct SiteFixture {
    tmp: TempDir,
    site: RefCell<Attributes>,
}

impl SiteFixture {
    pub fn new() -> Self {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("src/pages")).unwrap();
        fs::create_dir_all(tmp.path().join("src/layouts")).unwrap();
        Self {
            tmp,
            site: RefCell::new(Attributes::new()),
        }
    }

    pub fn root(&self) -> &Path {
        self.tmp.path()
    }

    pub fn source_dir(&self) -> PathBuf {
        self.root().join("src")
    }

    pub fn pages_dir(&self) -> PathBuf {
        self.source_dir().join("pages")
    }

    pub fn layouts_dir(&self) -> PathBuf {
        self.source_dir().join("layouts")
    }

    pub fn output_dir(&self) -> PathBuf {
        self.root().join("public")
    }

    /// Write `pages/<rel>`, creating subdirectories.
    pub fn page(&self, rel: &str, content: &str) {
        write_file(&self.pages_dir().join(rel), content);
    }

    /// Write `layouts/<name>.liquid`.
    pub fn layout(&self, name: &str, content: &str) {
        write_file(&self.layouts_dir().join(format!("{name}.liquid")), content);
    }

    pub fn site_title(&self, title: &str) {
        self.site
            .borrow_mut()
            .insert("title".into(), title.to_string().into());
    }

    pub fn site_attributes(&self) -> Attributes {
        self.site.borrow().clone()
    }

    /// Options pointing at this fixture's directories.
    pub fn options(&self) -> BuildOptions {
        BuildOptions {
            source: Some(self.source_dir()),
            output: Some(self.output_dir()),
            site: Some(self.site_attributes()),
            ..Default::default()
        }
    }

    pub fn config(&self) -> BuildConfig {
        self.options().resolve()
    }

    /// Read `public/<rel>`. Panics with the file list on a miss.
    pub fn read_output(&self, rel: &str) -> String {
        let path = self.output_dir().join(rel);
        fs::read_to_string(&path).unwrap_or_else(|e| {
            let files = list_files(&self.output_dir());
            panic!("cannot read output {rel}: {e}. Available: {files:?}")
        })
    }
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

/// All files under `dir`, relative and `/`-joined, sorted.
pub fn list_files(dir: &Path) -> Vec<String> {
    let mut files: Vec<String> = walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| {
            e.path()
                .strip_prefix(dir)
                .ok()
                .map(crate::paths::url_path)
        })
        .collect();
    files.sort();
    files
}
