//! CLI output formatting for build and check runs.
//!
//! Output lists pages by identity first (title, or source path for untitled
//! pages) with the files involved as indented context lines:
//!
//! ## Build
//!
//! ```text
//! Pages
//! 001 Hi → hello/index.html
//!     Source: hello.md
//! 002 notes/index.md → notes/index.html
//!     Source: notes/index.md
//!
//! History: 1 page, 2 entries → public/history.js
//! Home → public/index.html
//! Published → ../site/posts
//!
//! Built 2 pages in 12.345ms
//! ```
//!
//! ## Check
//!
//! ```text
//! 001 Hi (layout: default)
//!     Source: hello.md
//! 002 Lost (layout: nowhere) — layout missing
//!     Source: lost.md
//! Home layout: template — missing
//! ```
//!
//! `format_*` functions are pure and return lines; `print_*` wrappers write
//! them to stdout.

use crate::site::{BuildReport, CheckReport};

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

/// Lines summarizing a finished build.
pub fn format_build_output(report: &BuildReport) -> Vec<String> {
    let mut lines = Vec::new();

    if !report.pages.is_empty() {
        lines.push("Pages".to_string());
        for (i, page) in report.pages.iter().enumerate() {
            let label = page.attr_str("title").unwrap_or(&page.source);
            lines.push(format!("{} {} → {}", format_index(i + 1), label, page.output));
            lines.push(format!("{}Source: {}", indent(1), page.source));
        }
        lines.push(String::new());
    }

    lines.push(format!(
        "History: {}, {} → {}",
        plural(report.history.pages.len(), "page", "pages"),
        plural(report.history.entry_count(), "entry", "entries"),
        report.history_path.display()
    ));
    lines.push(format!("Home → {}", report.index_path.display()));
    if let Some(target) = &report.published {
        lines.push(format!("Published → {}", target.display()));
    }
    lines.push(String::new());
    lines.push(format!(
        "Built {} in {:.3}ms",
        plural(report.pages.len(), "page", "pages"),
        report.elapsed.as_secs_f64() * 1000.0
    ));
    lines
}

/// Lines describing a check run.
pub fn format_check_output(report: &CheckReport, index_layout: &str) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, page) in report.pages.iter().enumerate() {
        let label = page
            .front_matter
            .attributes
            .get("title")
            .and_then(|v| v.as_str())
            .unwrap_or(&page.name);
        let missing = report
            .missing_layouts
            .iter()
            .any(|(name, _)| name == &page.name);
        let suffix = if missing { " — layout missing" } else { "" };
        lines.push(format!(
            "{} {} (layout: {}){}",
            format_index(i + 1),
            label,
            page.layout(),
            suffix
        ));
        lines.push(format!("{}Source: {}", indent(1), page.name));
    }
    let status = if report.index_layout_found { "found" } else { "missing" };
    lines.push(format!("Home layout: {index_layout} — {status}"));
    lines
}

pub fn print_build_output(report: &BuildReport) {
    for line in format_build_output(report) {
        println!("{}", line);
    }
}

pub fn print_check_output(report: &CheckReport, index_layout: &str) {
    for line in format_check_output(report, index_layout) {
        println!("{}", line);
    }
}
