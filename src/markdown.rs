//! Markdown to HTML conversion.
//!
//! CommonMark via `pulldown-cmark` with the GitHub-flavoured extensions
//! authors expect (tables, strikethrough, task lists, footnotes). Headings
//! get an `id` derived from their text so they can be linked to:
//!
//! ```text
//! # Hello        → <h1 id="hello">Hello</h1>
//! ## Hello       → <h2 id="hello-1">Hello</h2>
//! ## Setup {#x}  → <h2 id="x">Setup</h2>
//! ```

use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, TagEnd, html};
use std::collections::HashMap;

fn options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_HEADING_ATTRIBUTES
}

/// Convert a Markdown document to an HTML fragment.
pub fn to_html(markdown: &str) -> String {
    let events = with_heading_ids(Parser::new_ext(markdown, options()));
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, events.into_iter());
    out
}

/// Buffer the event stream, filling in an `id` on every heading that lacks one.
fn with_heading_ids<'a>(events: impl Iterator<Item = Event<'a>>) -> Vec<Event<'a>> {
    let mut out: Vec<Event<'a>> = Vec::new();
    let mut used: HashMap<String, usize> = HashMap::new();
    // (position of the heading's Start event in `out`, accumulated text)
    let mut open: Option<(usize, String)> = None;

    for event in events {
        match &event {
            Event::Start(Tag::Heading { .. }) => open = Some((out.len(), String::new())),
            Event::Text(text) | Event::Code(text) => {
                if let Some((_, heading_text)) = open.as_mut() {
                    heading_text.push_str(text);
                }
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some((start, heading_text)) = open.take()
                    && let Event::Start(Tag::Heading { id, .. }) = &mut out[start]
                    && id.is_none()
                {
                    let slug = unique_slug(&heading_text, &mut used);
                    if !slug.is_empty() {
                        *id = Some(CowStr::from(slug));
                    }
                }
            }
            _ => {}
        }
        out.push(event);
    }
    out
}

/// Slug for heading text, suffixed `-1`, `-2`, … on repeats within a document.
fn unique_slug(text: &str, used: &mut HashMap<String, usize>) -> String {
    let base = slug::slugify(text);
    if base.is_empty() {
        return base;
    }
    let seen = used.entry(base.clone()).or_insert(0);
    let slug = if *seen == 0 {
        base
    } else {
        format!("{base}-{seen}")
    };
    *seen += 1;
    slug
}
