// ============================================================
// MAPPING VALIDATOR
// ============================================================
// Resolve every placeholder of a run to a column, all-or-nothing

use std::collections::{HashMap, HashSet};

use crate::application::use_cases::placeholder;
use crate::domain::error::{AppError, Result};
use crate::domain::header_map::HeaderMap;
use crate::domain::template::Template;

/// Raw placeholder text -> original column name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceholderMapping {
    columns: HashMap<String, String>,
}

impl PlaceholderMapping {
    pub fn column_for(&self, raw: &str) -> Option<&str> {
        self.columns.get(raw).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Entries sorted by placeholder, for reports
    pub fn entries(&self) -> Vec<(&str, &str)> {
        let mut entries: Vec<(&str, &str)> = self
            .columns
            .iter()
            .map(|(raw, column)| (raw.as_str(), column.as_str()))
            .collect();
        entries.sort();
        entries
    }
}

/// Outcome of a validation pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub mapping: PlaceholderMapping,

    /// Unresolved raw placeholders, de-duplicated in first-seen order
    pub missing: Vec<String>,
}

impl ValidationReport {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }

    /// Gate: the mapping only comes back when nothing is missing
    pub fn into_mapping(self) -> Result<PlaceholderMapping> {
        if self.missing.is_empty() {
            Ok(self.mapping)
        } else {
            Err(AppError::UnmappedPlaceholders(self.missing))
        }
    }
}

/// Scan `templates` in order and resolve each placeholder against `header_map`.
pub fn validate<'a, I>(templates: I, header_map: &HeaderMap) -> ValidationReport
where
    I: IntoIterator<Item = &'a Template>,
{
    let mut report = ValidationReport::default();
    let mut seen_missing = HashSet::new();

    for template in templates {
        for raw in placeholder::extract(&template.text) {
            match header_map.resolve(raw) {
                Some(column) => {
                    report
                        .mapping
                        .columns
                        .entry(raw.to_string())
                        .or_insert_with(|| column.to_string());
                }
                None => {
                    if seen_missing.insert(raw.to_string()) {
                        report.missing.push(raw.to_string());
                    }
                }
            }
        }
    }

    report
}
