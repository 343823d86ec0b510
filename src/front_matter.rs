//! Front-matter splitting.
//!
//! A page may open with a YAML block fenced by `---` lines:
//!
//! ```text
//! ---
//! title: Hi
//! date: 2024-01-01
//! tags: [intro]
//! ---
//! # Hello
//! ```
//!
//! The block becomes [`FrontMatter::attributes`] and everything after the
//! closing fence is returned untouched as [`FrontMatter::body`]. The closing
//! fence may also be `...`, as YAML allows.
//!
//! Parsing is lenient: a block that is not valid YAML, or that is YAML but
//! not a mapping, yields empty attributes rather than failing the page.

use crate::types::Attributes;
use log::warn;

/// A page split into its metadata block and body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrontMatter {
    pub attributes: Attributes,
    pub body: String,
}

const FENCE: &str = "---";
const END_FENCE: &str = "...";

/// Split raw file text into attributes and body.
pub fn split(text: &str) -> FrontMatter {
    match locate_block(text) {
        Some((yaml, body)) => FrontMatter {
            attributes: parse_attributes(yaml),
            body: body.to_string(),
        },
        None => FrontMatter {
            attributes: Attributes::new(),
            body: text.to_string(),
        },
    }
}

/// Find the YAML block and the body that follows it.
///
/// Returns `None` unless the text starts with a fence line and a closing
/// fence line exists further down.
fn locate_block(text: &str) -> Option<(&str, &str)> {
    let content = text.strip_prefix('\u{feff}').unwrap_or(text);
    let (first, mut rest) = next_line(content)?;
    if first.trim_end() != FENCE {
        return None;
    }

    let yaml_start = rest;
    let mut yaml_len = 0;
    while let Some((line, after)) = next_line(rest) {
        let marker = line.trim_end();
        if marker == FENCE || marker == END_FENCE {
            return Some((&yaml_start[..yaml_len], after));
        }
        yaml_len += rest.len() - after.len();
        rest = after;
    }
    None
}

/// Split off one line, without its terminator. `None` at end of input.
fn next_line(text: &str) -> Option<(&str, &str)> {
    if text.is_empty() {
        return None;
    }
    match text.find('\n') {
        Some(pos) => Some((text[..pos].trim_end_matches('\r'), &text[pos + 1..])),
        None => Some((text, "")),
    }
}

fn parse_attributes(yaml: &str) -> Attributes {
    if yaml.trim().is_empty() {
        return Attributes::new();
    }
    match serde_yaml::from_str::<serde_json::Value>(yaml) {
        Ok(serde_json::Value::Object(map)) => map,
        Ok(serde_json::Value::Null) => Attributes::new(),
        Ok(other) => {
            warn!("Front matter is not a mapping, ignoring it: {other}");
            Attributes::new()
        }
        Err(e) => {
            warn!("Error parsing front matter: {e}");
            Attributes::new()
        }
    }
}
