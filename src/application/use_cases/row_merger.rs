// ============================================================
// ROW MERGER
// ============================================================
// Substitute one row's values into one template, single pass

use crate::application::use_cases::mapping_validator::PlaceholderMapping;
use crate::application::use_cases::placeholder::{self, Segment};
use crate::domain::table::Row;

/// Merge `template` with `row`.
///
/// Blank or missing values become `blank_fill`. Substituted text is never
/// re-scanned, and literal text (whitespace, line breaks) passes through.
/// A placeholder absent from `mapping` yields an empty string; validation
/// rules that out before any merge runs.
pub fn merge(template: &str, row: &Row, mapping: &PlaceholderMapping, blank_fill: &str) -> String {
    let mut out = String::with_capacity(template.len());

    for segment in placeholder::segments(template) {
        match segment {
            Segment::Literal(text) => out.push_str(text),
            Segment::Placeholder(raw) => {
                let Some(column) = mapping.column_for(raw) else {
                    continue;
                };
                match row.get(column) {
                    Some(value) if !value.is_blank() => out.push_str(&value.as_text()),
                    _ => out.push_str(blank_fill),
                }
            }
        }
    }

    out
}
