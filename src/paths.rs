//! Output path computation for pages.
//!
//! Every page becomes a directory index so URLs stay extension-free:
//!
//! - `hello.md` → `hello/index.html`
//! - `notes/2024-trip.liquid` → `notes/2024-trip/index.html`
//! - `index.md` → `index.html`
//! - `notes/index.html` → `notes/index.html`
//!
//! Paths handed to templates and the history index are always joined with
//! `/`, whatever the host separator is.

use std::path::{Component, Path, PathBuf};

/// Name of the document written into every page directory.
pub const INDEX_FILE: &str = "index.html";

/// Where a page lands, relative to the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    /// Directory that holds the page's `index.html`.
    pub dir: PathBuf,
    /// The `index.html` file itself.
    pub file: PathBuf,
}

impl Destination {
    /// The output file as a `/`-joined relative URL path.
    pub fn url(&self) -> String {
        url_path(&self.file)
    }
}

/// Compute the output location for a page source path relative to the pages root.
pub fn destination(rel: &Path) -> Destination {
    let parent = rel.parent().map(Path::to_path_buf).unwrap_or_default();
    let stem = rel
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    let dir = if stem == "index" {
        parent
    } else {
        parent.join(stem)
    };
    let file = dir.join(INDEX_FILE);
    Destination { dir, file }
}

/// Join the normal components of a relative path with `/`.
pub fn url_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_page_gets_own_directory() {
        let d = destination(Path::new("hello.md"));
        assert_eq!(d.dir, PathBuf::from("hello"));
        assert_eq!(d.url(), "hello/index.html");
    }

    #[test]
    fn index_page_writes_into_its_directory() {
        let d = destination(Path::new("index.md"));
        assert_eq!(d.dir, PathBuf::new());
        assert_eq!(d.url(), "index.html");
    }

    #[test]
    fn nested_index_page() {
        let d = destination(Path::new("notes/index.html"));
        assert_eq!(d.url(), "notes/index.html");
    }

    #[test]
    fn nested_plain_page() {
        let d = destination(Path::new("notes/2024/trip.liquid"));
        assert_eq!(d.dir, Path::new("notes").join("2024").join("trip"));
        assert_eq!(d.url(), "notes/2024/trip/index.html");
    }

    #[test]
    fn stem_keeps_inner_dots() {
        let d = destination(Path::new("v1.2-release.md"));
        assert_eq!(d.url(), "v1.2-release/index.html");
    }

    #[test]
    fn url_path_skips_current_dir() {
        assert_eq!(url_path(Path::new("./a/b/index.html")), "a/b/index.html");
    }
}
