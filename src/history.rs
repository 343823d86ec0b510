//! The paginated history index.
//!
//! Every built page contributes one [`HistoryEntry`]. Entries are grouped
//! into fixed-size [`HistoryPage`]s so a client can browse the site's
//! archive a page at a time:
//!
//! ```json
//! {"pages":[
//!   {"index":0,"entries":[{"title":"Hi","date":"2024-01-01","path":"hello/index.html","type":"normal"}, ...]},
//!   {"index":1,"entries":[...]}
//! ]}
//! ```
//!
//! The document is written either as a bare JSON file or, by default, as a
//! script (`const history = {...};`) that a static page can load with a
//! `<script>` tag.
//!
//! ## Ordering
//!
//! Entry order is decided explicitly, never by whatever order the
//! filesystem returns:
//!
//! - [`HistoryOrder::ReversePath`]: reverse lexicographic order of the page
//!   source paths. Newest first as long as file names start with a date.
//! - [`HistoryOrder::Date`]: newest `date` attribute first. Dates compare as
//!   strings, so ISO-8601 values sort correctly. Undated pages follow, in
//!   reverse path order.

use crate::types::PageRecord;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::fs;
use std::path::Path;

/// Value of `type` for pages that don't set one.
pub const DEFAULT_ENTRY_TYPE: &str = "normal";

/// How entries are ordered before pagination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HistoryOrder {
    #[default]
    ReversePath,
    Date,
}

/// How the history document is written to disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HistoryFormat {
    /// `const <variable> = <json>;`
    #[default]
    Script,
    /// The bare JSON document.
    Json,
}

/// One page as listed in the history index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r#abstract: Option<serde_json::Value>,
    /// Output path relative to the site root, `/`-separated.
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<serde_json::Value>,
    #[serde(rename = "type")]
    pub kind: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<serde_json::Value>,
}

impl HistoryEntry {
    pub fn from_record(record: &PageRecord) -> Self {
        let attr = |key: &str| record.attributes.get(key).filter(|v| !v.is_null()).cloned();
        HistoryEntry {
            title: attr("title"),
            date: attr("date"),
            r#abstract: attr("abstract"),
            path: record.output.clone(),
            tags: attr("tags"),
            kind: attr("type").unwrap_or_else(|| DEFAULT_ENTRY_TYPE.into()),
            style: attr("style"),
        }
    }

    /// A display string for a metadata value: strings as-is, anything else as JSON.
    pub fn text(value: Option<&serde_json::Value>) -> Option<String> {
        value.map(|v| match v {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }

    fn date_key(&self) -> Option<String> {
        Self::text(self.date.as_ref())
    }
}

/// One pagination group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryPage {
    pub index: usize,
    pub entries: Vec<HistoryEntry>,
}

/// The full history index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryDocument {
    pub pages: Vec<HistoryPage>,
}

impl HistoryDocument {
    /// All entries across all groups, in order.
    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.pages.iter().flat_map(|p| p.entries.iter())
    }

    pub fn entry_count(&self) -> usize {
        self.pages.iter().map(|p| p.entries.len()).sum()
    }
}

/// Reorder entries that arrive in processing (reverse path) order.
pub fn order_entries(entries: &mut [HistoryEntry], order: HistoryOrder) {
    match order {
        HistoryOrder::ReversePath => {}
        // Stable: equal or missing dates keep processing order.
        HistoryOrder::Date => entries.sort_by_key(|e| match e.date_key() {
            Some(date) => (0, Reverse(date)),
            None => (1, Reverse(String::new())),
        }),
    }
}

/// Group entries into pages of at most `page_size`.
///
/// An empty input still yields one empty group with index 0 so a client
/// always has a first page to load.
pub fn paginate(entries: Vec<HistoryEntry>, page_size: usize) -> HistoryDocument {
    let page_size = page_size.max(1);
    if entries.is_empty() {
        return HistoryDocument {
            pages: vec![HistoryPage {
                index: 0,
                entries: Vec::new(),
            }],
        };
    }

    let mut pages: Vec<HistoryPage> = Vec::new();
    for entry in entries {
        match pages.last_mut() {
            Some(page) if page.entries.len() < page_size => page.entries.push(entry),
            _ => pages.push(HistoryPage {
                index: pages.len(),
                entries: vec![entry],
            }),
        }
    }
    HistoryDocument { pages }
}

/// Serialize the document in the requested format.
pub fn serialize(
    document: &HistoryDocument,
    format: HistoryFormat,
    variable: &str,
) -> Result<String, serde_json::Error> {
    let json = serde_json::to_string(document)?;
    Ok(match format {
        HistoryFormat::Script => format!("const {variable} = {json};"),
        HistoryFormat::Json => json,
    })
}

/// Read a document back from either format.
pub fn parse_history(text: &str) -> Result<HistoryDocument, serde_json::Error> {
    let trimmed = text.trim();
    let json = match trimmed.strip_prefix("const ") {
        Some(rest) => rest
            .split_once('=')
            .map(|(_, value)| value.trim().trim_end_matches(';').trim_end())
            .unwrap_or(rest),
        None => trimmed,
    };
    serde_json::from_str(json)
}

/// Write the serialized document, creating parent directories as needed.
pub fn write_history(path: &Path, text: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, text)
}
