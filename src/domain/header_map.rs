// ============================================================
// HEADER NORMALIZATION
// ============================================================
// Case/space/underscore-insensitive column matching

use std::collections::HashMap;

/// Canonical key for a header or placeholder name.
///
/// Trims surrounding whitespace, lowercases, and drops every space and
/// underscore, so `" First_Name "` and `"first name"` both become `"firstname"`.
pub fn normalize(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .chars()
        .filter(|c| *c != ' ' && *c != '_')
        .collect()
}

/// Normalized key -> original column name, first occurrence wins
#[derive(Debug, Clone, Default)]
pub struct HeaderMap {
    by_key: HashMap<String, String>,
}

impl HeaderMap {
    pub fn build<S: AsRef<str>>(columns: &[S]) -> Self {
        let mut by_key = HashMap::new();
        for column in columns {
            let column = column.as_ref();
            by_key
                .entry(normalize(column))
                .or_insert_with(|| column.to_string());
        }
        Self { by_key }
    }

    /// Resolve a raw placeholder (or any name) to its original column
    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.by_key.get(&normalize(name)).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}

/// First column (in column order) whose normalized name equals `identifier`'s.
pub fn find_identity_column<S: AsRef<str>>(columns: &[S], identifier: &str) -> Option<String> {
    let wanted = normalize(identifier);
    columns
        .iter()
        .map(|column| column.as_ref())
        .find(|column| normalize(column) == wanted)
        .map(str::to_string)
}
