//! Placeholder scanning for `{{name}}` tokens.
//!
//! A placeholder opens with `{{`, closes with the first `}}`, and its name is
//! the trimmed text in between. Names cannot contain `}`. A name that is only
//! whitespace (`{{ }}`) is kept as written so it can be reported; it resolves
//! only against a header that normalizes to empty. Unterminated markers and
//! stray braces are literal text.

use once_cell::sync::Lazy;
use regex::Regex;

static PLACEHOLDER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{\s*([^}]+?)\s*\}\}").unwrap());

/// A piece of a parsed template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    Literal(&'a str),
    Placeholder(&'a str),
}

/// Split a template into literal and placeholder segments, left to right.
pub fn segments(template: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut cursor = 0;

    for caps in PLACEHOLDER_PATTERN.captures_iter(template) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let trimmed = name.as_str().trim();
        let name = if trimmed.is_empty() { name.as_str() } else { trimmed };
        if whole.start() > cursor {
            out.push(Segment::Literal(&template[cursor..whole.start()]));
        }
        out.push(Segment::Placeholder(name));
        cursor = whole.end();
    }

    if cursor < template.len() {
        out.push(Segment::Literal(&template[cursor..]));
    }
    out
}

/// Raw placeholder names in order of appearance, duplicates retained.
pub fn extract(template: &str) -> Vec<&str> {
    segments(template)
        .into_iter()
        .filter_map(|segment| match segment {
            Segment::Placeholder(name) => Some(name),
            Segment::Literal(_) => None,
        })
        .collect()
}
