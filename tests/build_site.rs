//! End-to-end builds against throwaway sites on disk.
//!
//! Run with: cargo test --test build_site

use serde_json::json;
use sitewright::config::{BuildConfig, BuildOptions, HistoryOptions, IndexOptions};
use sitewright::history::{self, HistoryFormat, HistoryOrder};
use sitewright::index::IndexMode;
use sitewright::site::{self, BuildError};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const LAYOUT: &str = "<html><body>{{ body }}</body></html>";

struct Site {
    tmp: TempDir,
}

impl Site {
    fn new() -> Self {
        let site = Site {
            tmp: TempDir::new().unwrap(),
        };
        site.write("src/layouts/default.liquid", LAYOUT);
        site.write("src/layouts/template.liquid", LAYOUT);
        site
    }

    fn path(&self, rel: &str) -> PathBuf {
        self.tmp.path().join(rel)
    }

    fn write(&self, rel: &str, content: &str) {
        let path = self.path(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn page(&self, rel: &str, content: &str) {
        self.write(&format!("src/pages/{rel}"), content);
    }

    fn read(&self, rel: &str) -> String {
        fs::read_to_string(self.path(rel)).unwrap()
    }

    fn options(&self) -> BuildOptions {
        BuildOptions {
            source: Some(self.path("src")),
            output: Some(self.path("public")),
            ..Default::default()
        }
    }

    fn config(&self) -> BuildConfig {
        self.options().resolve()
    }
}

fn snapshot(dir: &Path) -> Vec<(PathBuf, String)> {
    let mut files: Vec<(PathBuf, String)> = walkdir::WalkDir::new(dir)
        .into_iter()
        .map(|e| e.unwrap())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let rel = e.path().strip_prefix(dir).unwrap().to_path_buf();
            (rel, fs::read_to_string(e.path()).unwrap())
        })
        .collect();
    files.sort();
    files
}

#[test]
fn markdown_page_is_wrapped_and_listed() {
    let site = Site::new();
    site.page(
        "hello.md",
        "---\ntitle: Hi\ndate: 2024-01-01\nabstract: A greeting\n---\n# Hello\n",
    );

    let report = site::build(&site.config()).unwrap();

    assert_eq!(
        site.read("public/hello/index.html"),
        "<html><body><h1 id=\"hello\">Hello</h1>\n</body></html>"
    );
    assert_eq!(report.pages.len(), 1);

    let doc = history::parse_history(&site.read("public/history.js")).unwrap();
    assert_eq!(doc.pages.len(), 1);
    let entry = &doc.pages[0].entries[0];
    assert_eq!(entry.title, Some(json!("Hi")));
    assert_eq!(entry.date, Some(json!("2024-01-01")));
    assert_eq!(entry.r#abstract, Some(json!("A greeting")));
    assert_eq!(entry.path, "hello/index.html");
    assert_eq!(entry.kind, json!("normal"));
}

#[test]
fn history_script_declares_variable() {
    let site = Site::new();
    site.page("a.md", "a");
    site::build(&site.config()).unwrap();

    let text = site.read("public/history.js");
    assert!(text.starts_with("const history = {"));
    assert!(text.ends_with("};"));
}

#[test]
fn home_page_uses_placeholder_by_default() {
    let site = Site::new();
    site.page("a.md", "a");
    site::build(&site.config()).unwrap();

    assert_eq!(
        site.read("public/index.html"),
        "<html><body><br></body></html>"
    );
}

#[test]
fn rebuild_is_byte_identical() {
    let site = Site::new();
    site.page("2024-01-01-first.md", "---\ntitle: First\ntags: [a, b]\n---\nOne\n");
    site.page("2024-02-01-second.liquid", "---\ntitle: Second\n---\n<p>{{ page.title }}</p>");
    site.page("notes/index.html", "<p>notes</p>");

    let config = site.config();
    site::build(&config).unwrap();
    let first = snapshot(&config.output);
    site::build(&config).unwrap();
    let second = snapshot(&config.output);

    assert_eq!(first, second);
}

#[test]
fn stale_output_is_removed() {
    let site = Site::new();
    site.page("a.md", "a");
    site.write("public/leftover.html", "old");

    site::build(&site.config()).unwrap();

    assert!(!site.path("public/leftover.html").exists());
    assert!(site.path("public/a/index.html").exists());
}

#[test]
fn missing_layout_aborts_without_writing_the_page() {
    let site = Site::new();
    site.page("lost.md", "---\nlayout: nowhere\n---\nbody");

    let err = site::build(&site.config()).unwrap_err();

    assert!(matches!(err, BuildError::Page(_)));
    assert!(err.to_string().contains("nowhere"));
    assert!(!site.path("public/lost/index.html").exists());
    assert!(!site.path("public/history.js").exists());
}

#[test]
fn undefined_template_variable_aborts() {
    let site = Site::new();
    site.page("broken.liquid", "{{ page.missing }}");

    let err = site::build(&site.config()).unwrap_err();

    assert!(matches!(err, BuildError::Page(_)));
    assert!(!site.path("public/broken/index.html").exists());
}

#[test]
fn ten_pages_paginate_in_fours() {
    let site = Site::new();
    for i in 0..10 {
        site.page(&format!("post-{i:02}.md"), &format!("---\ntitle: Post {i}\n---\n"));
    }

    let report = site::build(&site.config()).unwrap();

    let doc = history::parse_history(&site.read("public/history.js")).unwrap();
    let sizes: Vec<usize> = doc.pages.iter().map(|p| p.entries.len()).collect();
    let indices: Vec<usize> = doc.pages.iter().map(|p| p.index).collect();
    assert_eq!(sizes, vec![4, 4, 2]);
    assert_eq!(indices, vec![0, 1, 2]);
    assert_eq!(doc, report.history);

    // Reverse path order: post-09 first.
    assert_eq!(doc.pages[0].entries[0].path, "post-09/index.html");
    assert_eq!(doc.pages[2].entries[1].path, "post-00/index.html");
}

#[test]
fn empty_site_writes_one_empty_group() {
    let site = Site::new();
    fs::create_dir_all(site.path("src/pages")).unwrap();

    let report = site::build(&site.config()).unwrap();

    assert!(report.pages.is_empty());
    let doc = history::parse_history(&site.read("public/history.js")).unwrap();
    assert_eq!(doc.pages.len(), 1);
    assert_eq!(doc.pages[0].index, 0);
    assert!(doc.pages[0].entries.is_empty());
}

#[test]
fn missing_pages_directory_is_an_error() {
    let site = Site::new();
    let err = site::build(&site.config()).unwrap_err();
    assert!(matches!(err, BuildError::MissingPages(_)));
}

#[test]
fn json_history_with_custom_file_and_order() {
    let site = Site::new();
    site.page("a.md", "---\ntitle: Old\ndate: 2023-05-01\n---\n");
    site.page("b.md", "---\ntitle: Undated\n---\n");
    site.page("c.md", "---\ntitle: New\ndate: 2024-05-01\n---\n");

    let config = BuildOptions {
        history: HistoryOptions {
            file: Some(PathBuf::from("data/history.json")),
            format: Some(HistoryFormat::Json),
            order: Some(HistoryOrder::Date),
            ..Default::default()
        },
        ..site.options()
    }
    .resolve();
    site::build(&config).unwrap();

    let text = site.read("public/data/history.json");
    assert!(text.starts_with('{'));
    let doc: history::HistoryDocument = serde_json::from_str(&text).unwrap();
    let titles: Vec<_> = doc.entries().map(|e| e.title.clone().unwrap()).collect();
    assert_eq!(titles, vec![json!("New"), json!("Old"), json!("Undated")]);
}

#[test]
fn summary_home_page_lists_recent_pages() {
    let site = Site::new();
    site.page("a.md", "---\ntitle: Alpha\nabstract: First letter\n---\n");
    site.page("b.md", "---\ntitle: Beta\n---\n");

    let config = BuildOptions {
        index: IndexOptions {
            mode: Some(IndexMode::Summary),
            summary_count: Some(1),
            ..Default::default()
        },
        ..site.options()
    }
    .resolve();
    assert_eq!(config.index.layout, "default");
    let report = site::build(&config).unwrap();

    let home = site.read("public/index.html");
    assert_eq!(report.index_path, config.output.join("index.html"));
    assert!(home.starts_with("<html><body>"));
    assert!(home.contains("Beta"));
    assert!(home.contains("b/index.html"));
    assert!(!home.contains("Alpha"));
}

#[test]
fn site_variables_reach_layouts() {
    let site = Site::new();
    site.write(
        "src/layouts/default.liquid",
        "<title>{{ page.title }} | {{ site.title }}</title>{{ body }}",
    );
    site.page("a.html", "---\ntitle: About\n---\n<p>hi</p>");

    let mut options = site.options();
    let mut attrs = serde_json::Map::new();
    attrs.insert("title".into(), json!("My Site"));
    options.site = Some(attrs);
    site::build(&options.resolve()).unwrap();

    assert_eq!(
        site.read("public/a/index.html"),
        "<title>About | My Site</title><p>hi</p>"
    );
}

#[test]
fn publish_copies_the_finished_output() {
    let site = Site::new();
    site.page("a.md", "a");
    site.write("deploy/keep.txt", "kept");

    let config = BuildOptions {
        publish: Some(site.path("deploy")),
        ..site.options()
    }
    .resolve();
    let report = site::build(&config).unwrap();

    assert_eq!(report.published, Some(site.path("deploy")));
    assert_eq!(
        site.read("deploy/a/index.html"),
        site.read("public/a/index.html")
    );
    assert!(site.path("deploy/history.js").exists());
    assert!(site.path("deploy/index.html").exists());
    assert_eq!(site.read("deploy/keep.txt"), "kept");
}

#[test]
fn check_reports_missing_layouts_without_writing() {
    let site = Site::new();
    site.page("ok.md", "fine");
    site.page("lost.md", "---\nlayout: nowhere\n---\n");

    let report = site::check(&site.config()).unwrap();

    assert!(!report.is_ok());
    assert_eq!(
        report.missing_layouts,
        vec![("lost.md".to_string(), "nowhere".to_string())]
    );
    assert!(report.index_layout_found);
    assert!(!site.path("public").exists());
}

#[test]
fn publish_into_output_is_refused_and_output_survives() {
    let site = Site::new();
    site.page("a.md", "a");
    site::build(&site.config()).unwrap();
    let built = site.read("public/a/index.html");

    let config = BuildOptions {
        publish: Some(site.path("public")),
        ..site.options()
    }
    .resolve();
    let err = site::build(&config).unwrap_err();

    assert!(matches!(err, BuildError::PublishInsideOutput { .. }));
    assert_eq!(site.read("public/a/index.html"), built);
}

#[test]
fn output_pointing_at_source_is_refused() {
    let site = Site::new();
    site.page("a.md", "a");

    let config = BuildOptions {
        output: Some(site.path("src")),
        ..site.options()
    }
    .resolve();
    let err = site::build(&config).unwrap_err();

    assert!(matches!(err, BuildError::OutputContainsSource { .. }));
    assert!(site.path("src/pages/a.md").exists());
    assert!(site.path("src/layouts/default.liquid").exists());
}

#[test]
fn untitled_page_renders_through_a_titled_layout() {
    let site = Site::new();
    site.write(
        "src/layouts/default.liquid",
        "<title>{{ page.title | default: site.title }}</title>{{ body }}",
    );
    site.page("untitled.md", "plain");

    let mut options = site.options();
    let mut attrs = serde_json::Map::new();
    attrs.insert("title".into(), json!("My Site"));
    options.site = Some(attrs);
    site::build(&options.resolve()).unwrap();

    assert_eq!(
        site.read("public/untitled/index.html"),
        "<title>My Site</title><p>plain</p>\n"
    );
}

#[test]
fn summary_home_page_through_a_layout_using_page_title() {
    let site = Site::new();
    site.write(
        "src/layouts/default.liquid",
        "<title>{{ page.title }}</title>{{ body }}",
    );
    site.page("a.md", "---\ntitle: Alpha\n---\n");

    let config = BuildOptions {
        index: IndexOptions {
            mode: Some(IndexMode::Summary),
            ..Default::default()
        },
        ..site.options()
    }
    .resolve();
    site::build(&config).unwrap();

    assert_eq!(site.read("public/a/index.html"), "<title>Alpha</title>");
    let home = site.read("public/index.html");
    assert!(home.starts_with("<title></title><article"));
    assert!(home.contains("Alpha"));
}
