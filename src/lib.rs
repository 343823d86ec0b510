//! # sitewright
//!
//! A small static site builder. Pages are Markdown, Liquid or plain HTML
//! files with YAML front matter; each one is rendered, wrapped in a named
//! layout and written out as its own `index.html`. Alongside the pages the
//! build writes a paginated history index for client-side browsing and a
//! home page.
//!
//! # Pipeline
//!
//! ```text
//! src/pages/**        →  split front matter  →  render body  →  wrap in layout  →  public/<page>/index.html
//!                                                                                     │
//!                          public/history.js  ←  paginate  ←  one entry per page  ←──┘
//!                          public/index.html  ←  placeholder or recent-page digest
//! ```
//!
//! The build is one linear pass on one thread. Every failure (unreadable
//! page, missing layout, broken template) aborts it.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | Partial build options, defaults, TOML loading |
//! | [`front_matter`] | Splits a page into YAML attributes and body |
//! | [`markdown`] | Markdown → HTML with heading ids |
//! | [`template`] | Liquid evaluation and the `site`/`page` context |
//! | [`layout`] | Loads `layouts/<name>.liquid` and injects `body` |
//! | [`paths`] | Where each page lands in the output tree |
//! | [`page`] | Builds one page |
//! | [`history`] | Orders, paginates and serializes the history index |
//! | [`index`] | Builds the home page |
//! | [`site`] | Runs the whole build, dry-run checks, publishing |
//! | [`output`] | CLI output formatting |
//! | [`types`] | Types shared between stages |
//!
//! # Design Decisions
//!
//! ## Liquid for Templates
//!
//! Layouts and `.liquid` pages are evaluated with the `liquid` crate. It
//! treats a reference to an unknown variable as an error, so a typo in a
//! template fails the build instead of publishing a page with a hole in it.
//!
//! ## Directory URLs
//!
//! `hello.md` becomes `hello/index.html`, so links never carry an extension
//! and a page can later grow into a directory without breaking them.
//!
//! ## Explicit Ordering
//!
//! Pages are processed in reverse lexicographic path order, decided by an
//! explicit sort rather than by whatever order the filesystem lists them
//! in. With date-prefixed file names this is newest first. Sites without
//! date prefixes can order the history index by the `date` attribute
//! instead (`[history] order = "date"`).

pub mod config;
pub mod front_matter;
pub mod history;
pub mod index;
pub mod layout;
pub mod markdown;
pub mod output;
pub mod page;
pub mod paths;
pub mod site;
pub mod template;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
