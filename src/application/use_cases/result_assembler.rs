// ============================================================
// RESULT ASSEMBLER
// ============================================================
// Combine per-row merged text with the address column

use crate::domain::merge_config::OutputShape;
use crate::domain::merge_result::{MergeOutput, MergedRow};
use crate::domain::table::Row;

/// Merged text for every role of one row; inactive roles stay empty
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleTexts {
    pub subject: String,
    pub body: String,
    pub chaser: String,
}

/// Build the output table. `rows` and `merged` are zipped in input order.
pub fn assemble(
    rows: &[Row],
    merged: Vec<RoleTexts>,
    address_column: Option<&str>,
    shape: OutputShape,
) -> MergeOutput {
    let rows = rows
        .iter()
        .zip(merged)
        .map(|(row, texts)| MergedRow {
            index: row.index,
            email_address: address_column
                .and_then(|column| row.get(column))
                .map(|value| value.as_text())
                .unwrap_or_default(),
            subject: texts.subject,
            email_copy: texts.body,
            chaser_copy: texts.chaser,
            email_sent: false,
            chaser_sent: false,
            status: String::new(),
        })
        .collect();

    MergeOutput { shape, rows }
}
