//! Build options.
//!
//! A build is driven by a [`BuildOptions`] value in which every field is
//! optional. [`BuildOptions::resolve`] fills the gaps with fixed defaults and
//! produces the [`BuildConfig`] the rest of the pipeline consumes. Resolving
//! never fails: a missing or unusable value falls back to its default.
//!
//! Options usually come from a TOML file, with CLI flags layered on top via
//! [`BuildOptions::overlay`]:
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! source = "src"            # Site sources: pages/ and layouts/
//! output = "public"         # Cleared and rewritten on every build
//! # publish = "../site/posts"  # Copy the finished output here
//!
//! [site]                    # Free-form, visible to templates as `site`
//! title = "My Site"
//!
//! [index]
//! mode = "placeholder"      # or "summary"
//! placeholder = "<br>"
//! # layout = "template"     # default: "template" (placeholder) / "default" (summary)
//! summary_count = 6
//!
//! [history]
//! file = "history.js"       # Relative to the output directory
//! format = "script"         # or "json"
//! variable = "history"
//! page_size = 4
//! order = "reverse-path"    # or "date"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::history::{HistoryFormat, HistoryOrder};
use crate::index::IndexMode;
use crate::types::Attributes;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

pub const DEFAULT_SOURCE: &str = "src";
pub const DEFAULT_OUTPUT: &str = "public";
pub const DEFAULT_PLACEHOLDER: &str = "<br>";
pub const DEFAULT_SUMMARY_COUNT: usize = 6;
pub const DEFAULT_HISTORY_FILE: &str = "history.js";
pub const DEFAULT_HISTORY_VARIABLE: &str = "history";
pub const DEFAULT_PAGE_SIZE: usize = 4;

/// Layout the index page uses in placeholder mode.
pub const PLACEHOLDER_INDEX_LAYOUT: &str = "template";
/// Layout the index page uses in summary mode.
pub const SUMMARY_INDEX_LAYOUT: &str = "default";

/// Partial build options, as read from a file or assembled by a caller.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildOptions {
    /// Directory holding `pages/` and `layouts/`.
    pub source: Option<PathBuf>,
    /// Directory the site is written to.
    pub output: Option<PathBuf>,
    /// Directory the finished output is copied into, if any.
    pub publish: Option<PathBuf>,
    /// Site-wide template variables.
    pub site: Option<Attributes>,
    pub index: IndexOptions,
    pub history: HistoryOptions,
}

/// Partial `[index]` options.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndexOptions {
    pub mode: Option<IndexMode>,
    pub placeholder: Option<String>,
    pub layout: Option<String>,
    pub summary_count: Option<usize>,
}

/// Partial `[history]` options.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HistoryOptions {
    pub file: Option<PathBuf>,
    pub format: Option<HistoryFormat>,
    pub variable: Option<String>,
    pub page_size: Option<usize>,
    pub order: Option<HistoryOrder>,
}

/// Fully resolved build configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildConfig {
    pub source: PathBuf,
    pub output: PathBuf,
    pub publish: Option<PathBuf>,
    pub site: Attributes,
    pub index: IndexConfig,
    pub history: HistoryConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexConfig {
    pub mode: IndexMode,
    pub placeholder: String,
    pub layout: String,
    pub summary_count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryConfig {
    /// Path of the history artifact, relative to the output directory.
    pub file: PathBuf,
    pub format: HistoryFormat,
    pub variable: String,
    pub page_size: usize,
    pub order: HistoryOrder,
}

impl BuildConfig {
    pub fn pages_dir(&self) -> PathBuf {
        self.source.join("pages")
    }

    pub fn layouts_dir(&self) -> PathBuf {
        self.source.join("layouts")
    }

    pub fn history_path(&self) -> PathBuf {
        self.output.join(&self.history.file)
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        BuildOptions::default().resolve()
    }
}

impl BuildOptions {
    /// Fill every missing value with its default.
    pub fn resolve(self) -> BuildConfig {
        let mode = self.index.mode.unwrap_or_default();
        let default_layout = match mode {
            IndexMode::Placeholder => PLACEHOLDER_INDEX_LAYOUT,
            IndexMode::Summary => SUMMARY_INDEX_LAYOUT,
        };

        BuildConfig {
            source: self.source.unwrap_or_else(|| PathBuf::from(DEFAULT_SOURCE)),
            output: self.output.unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
            publish: self.publish,
            site: self.site.unwrap_or_default(),
            index: IndexConfig {
                mode,
                placeholder: self
                    .index
                    .placeholder
                    .unwrap_or_else(|| DEFAULT_PLACEHOLDER.to_string()),
                layout: self
                    .index
                    .layout
                    .unwrap_or_else(|| default_layout.to_string()),
                summary_count: self
                    .index
                    .summary_count
                    .filter(|n| *n > 0)
                    .unwrap_or(DEFAULT_SUMMARY_COUNT),
            },
            history: HistoryConfig {
                file: self
                    .history
                    .file
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_HISTORY_FILE)),
                format: self.history.format.unwrap_or_default(),
                variable: self
                    .history
                    .variable
                    .unwrap_or_else(|| DEFAULT_HISTORY_VARIABLE.to_string()),
                page_size: self
                    .history
                    .page_size
                    .filter(|n| *n > 0)
                    .unwrap_or(DEFAULT_PAGE_SIZE),
                order: self.history.order.unwrap_or_default(),
            },
        }
    }

    /// Values set in `other` replace the ones in `self`.
    ///
    /// The `site` table is merged key by key rather than replaced.
    pub fn overlay(self, other: BuildOptions) -> BuildOptions {
        let site = match (self.site, other.site) {
            (Some(mut base), Some(top)) => {
                base.extend(top);
                Some(base)
            }
            (base, top) => top.or(base),
        };
        BuildOptions {
            source: other.source.or(self.source),
            output: other.output.or(self.output),
            publish: other.publish.or(self.publish),
            site,
            index: IndexOptions {
                mode: other.index.mode.or(self.index.mode),
                placeholder: other.index.placeholder.or(self.index.placeholder),
                layout: other.index.layout.or(self.index.layout),
                summary_count: other.index.summary_count.or(self.index.summary_count),
            },
            history: HistoryOptions {
                file: other.history.file.or(self.history.file),
                format: other.history.format.or(self.history.format),
                variable: other.history.variable.or(self.history.variable),
                page_size: other.history.page_size.or(self.history.page_size),
                order: other.history.order.or(self.history.order),
            },
        }
    }

    /// Reject values that would otherwise be silently replaced by defaults.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history.page_size == Some(0) {
            return Err(ConfigError::Validation(
                "history.page_size must be at least 1".into(),
            ));
        }
        if self.index.summary_count == Some(0) {
            return Err(ConfigError::Validation(
                "index.summary_count must be at least 1".into(),
            ));
        }
        if let Some(variable) = &self.history.variable
            && !is_identifier(variable)
        {
            return Err(ConfigError::Validation(format!(
                "history.variable '{variable}' is not a valid JavaScript identifier"
            )));
        }
        Ok(())
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Parse options from TOML text and validate them.
pub fn parse_options(text: &str) -> Result<BuildOptions, ConfigError> {
    let options: BuildOptions = toml::from_str(text)?;
    options.validate()?;
    Ok(options)
}

/// Load options from a TOML file.
///
/// Returns empty options if the file doesn't exist.
/// Returns `Err` if the file exists but is invalid.
pub fn load_options(path: &Path) -> Result<BuildOptions, ConfigError> {
    if !path.exists() {
        return Ok(BuildOptions::default());
    }
    let content = fs::read_to_string(path)?;
    parse_options(&content)
}

/// Returns a fully-commented stock options file with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# sitewright configuration
# ========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# Directory holding the site sources:
#   <source>/pages/**/*.{md,markdown,liquid,html}  content pages
#   <source>/layouts/<name>.liquid                 layout templates
source = "src"

# Build output. Cleared completely at the start of every build.
output = "public"

# Copy the finished output into this directory after a successful build.
# publish = "../my-site/posts"

# ---------------------------------------------------------------------------
# Site variables
# ---------------------------------------------------------------------------
# Free-form values, available in every template as `site.<key>`.
[site]
# title = "My Site"
# base_url = "https://example.com"

# ---------------------------------------------------------------------------
# Home page
# ---------------------------------------------------------------------------
[index]
# "placeholder": the home page body is the fixed `placeholder` string and
#                browsing is left to the history index.
# "summary":     the home page lists the most recent pages inline.
mode = "placeholder"

# Body of the home page in placeholder mode (rendered as a Liquid template).
placeholder = "<br>"

# Layout wrapping the home page.
# Defaults to "template" in placeholder mode and "default" in summary mode.
# layout = "template"

# Number of recent pages listed in summary mode.
summary_count = 6

# ---------------------------------------------------------------------------
# History index
# ---------------------------------------------------------------------------
[history]
# Where the paginated page index is written, relative to `output`.
file = "history.js"

# "script": `const <variable> = {...};`, loadable with a <script> tag.
# "json":   the bare JSON document.
format = "script"
variable = "history"

# Entries per history page.
page_size = 4

# "reverse-path": reverse lexicographic order of the page paths
#                 (newest first when file names start with a date).
# "date":         newest `date` front-matter value first; undated pages last.
order = "reverse-path"
"##
}
