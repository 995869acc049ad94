use std::path::PathBuf;

use calamine::{open_workbook_auto, Data, DataType, Range, Reader};

use super::TabularSource;
use crate::domain::error::{AppError, Result};
use crate::domain::table::{CellValue, DataTable};

/// Workbook source (xlsx, xlsm, xlsb, xls, ods). The first row is the header row.
pub struct SpreadsheetSource {
    path: PathBuf,

    /// Worksheet name; the first sheet when unset
    sheet: Option<String>,
}

impl SpreadsheetSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            sheet: None,
        }
    }

    pub fn with_sheet(mut self, sheet: impl Into<String>) -> Self {
        self.sheet = Some(sheet.into());
        self
    }

    fn open_range(&self) -> Result<Range<Data>> {
        let mut workbook = open_workbook_auto(&self.path).map_err(|e| {
            AppError::InputRead(format!(
                "Failed to open workbook {}: {}",
                self.path.display(),
                e
            ))
        })?;

        let range = match &self.sheet {
            Some(name) => workbook.worksheet_range(name),
            None => workbook
                .worksheet_range_at(0)
                .ok_or_else(|| AppError::InputRead("No worksheet found".to_string()))?,
        };

        range.map_err(|e| AppError::InputRead(format!("Failed to read worksheet range: {}", e)))
    }
}

impl TabularSource for SpreadsheetSource {
    fn read(&self) -> Result<DataTable> {
        let range = self.open_range()?;
        Ok(range_to_table(&range))
    }
}

/// Header row, then one table row per worksheet row
pub fn range_to_table(range: &Range<Data>) -> DataTable {
    let mut rows = range.rows();
    let columns = match rows.next() {
        Some(header) => header
            .iter()
            .enumerate()
            .map(|(idx, cell)| header_name(idx, cell))
            .collect(),
        None => Vec::new(),
    };

    let mut table = DataTable::new(columns);
    for row in rows {
        table.push_values(row.iter().map(cell_value).collect());
    }
    table
}

fn header_name(idx: usize, cell: &Data) -> String {
    let name = match cell {
        Data::String(s) => s.clone(),
        Data::Empty => String::new(),
        other => cell_value(other).as_text(),
    };
    if name.is_empty() {
        format!("Unnamed: {}", idx)
    } else {
        name
    }
}

fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::String(s) => CellValue::from(s.as_str()),
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        other => other
            .as_datetime()
            .map(CellValue::DateTime)
            .unwrap_or_else(|| CellValue::Text(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_range() -> Range<Data> {
        let mut range = Range::new((0, 0), (2, 2));
        range.set_value((0, 0), Data::String("First Name".to_string()));
        range.set_value((0, 1), Data::String("Email".to_string()));
        range.set_value((1, 0), Data::String("Ana".to_string()));
        range.set_value((1, 1), Data::String("a@x.com".to_string()));
        range.set_value((1, 2), Data::Float(3.0));
        range.set_value((2, 0), Data::Empty);
        range.set_value((2, 1), Data::Bool(true));
        range
    }

    #[test]
    fn test_range_to_table() {
        let table = range_to_table(&sample_range());

        assert_eq!(table.columns, vec!["First Name", "Email", "Unnamed: 2"]);
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.rows[0].get("First Name"),
            Some(&CellValue::Text("Ana".to_string()))
        );
        assert_eq!(table.rows[0].get("Unnamed: 2"), Some(&CellValue::Float(3.0)));
        assert_eq!(table.rows[1].get("First Name"), Some(&CellValue::Empty));
        assert_eq!(table.rows[1].get("Email"), Some(&CellValue::Bool(true)));
    }

    #[test]
    fn test_empty_range() {
        let table = range_to_table(&Range::<Data>::empty());
        assert!(table.columns.is_empty());
        assert!(table.is_empty());
    }

    #[test]
    fn test_unreadable_workbook_is_input_read_error() {
        let file = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
        std::fs::write(file.path(), b"not a zip archive").unwrap();

        let err = SpreadsheetSource::new(file.path()).read().unwrap_err();
        assert!(matches!(err, AppError::InputRead(_)));
    }
}
