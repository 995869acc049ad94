// ============================================================
// MERGE RESULT TYPES
// ============================================================
// Output records produced by one generation pass

use serde::{Deserialize, Serialize};

use super::merge_config::OutputShape;

pub const COL_EMAIL_ADDRESS: &str = "Email address";
pub const COL_SUBJECT: &str = "Subject line";
pub const COL_EMAIL_COPY: &str = "Email Copy";
pub const COL_EMAIL_SENT: &str = "Email Sent?";
pub const COL_CHASER_COPY: &str = "Chaser copy";
pub const COL_CHASER_SENT: &str = "Chaser sent?";
pub const COL_STATUS: &str = "Status";

/// A rendered output cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OutputValue {
    Text(String),
    /// Tracking flag; spreadsheet-capable sinks render it as a checkbox
    Flag(bool),
}

/// Output record for one input row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedRow {
    /// Index of the source row
    pub index: usize,

    /// Carried from the identity column; empty when absent
    pub email_address: String,

    pub subject: String,
    pub email_copy: String,
    pub chaser_copy: String,

    /// Tracking fields, initialized as "not yet processed"
    pub email_sent: bool,
    pub chaser_sent: bool,
    pub status: String,
}

impl MergedRow {
    /// Values in the column order of `shape`
    pub fn values(&self, shape: OutputShape) -> Vec<OutputValue> {
        match shape {
            OutputShape::Outreach => vec![
                OutputValue::Text(self.email_address.clone()),
                OutputValue::Text(self.subject.clone()),
                OutputValue::Text(self.email_copy.clone()),
                OutputValue::Flag(self.email_sent),
                OutputValue::Text(self.chaser_copy.clone()),
                OutputValue::Flag(self.chaser_sent),
                OutputValue::Text(self.status.clone()),
            ],
            OutputShape::Minimal => vec![
                OutputValue::Text(self.email_address.clone()),
                OutputValue::Text(self.email_copy.clone()),
            ],
        }
    }
}

/// Full result table of a run, rows in input order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeOutput {
    pub shape: OutputShape,
    pub rows: Vec<MergedRow>,
}

impl MergeOutput {
    pub fn columns(&self) -> &'static [&'static str] {
        match self.shape {
            OutputShape::Outreach => &[
                COL_EMAIL_ADDRESS,
                COL_SUBJECT,
                COL_EMAIL_COPY,
                COL_EMAIL_SENT,
                COL_CHASER_COPY,
                COL_CHASER_SENT,
                COL_STATUS,
            ],
            OutputShape::Minimal => &[COL_EMAIL_ADDRESS, COL_EMAIL_COPY],
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
