// ============================================================
// CSV SOURCE
// ============================================================
// Parse delimited files with encoding and delimiter detection

use std::path::PathBuf;

use csv::{ReaderBuilder, Trim};

use super::TabularSource;
use crate::domain::error::{AppError, Result};
use crate::domain::table::{CellValue, DataTable};

/// Delimited text source. Values are kept verbatim; blank detection happens at merge time.
pub struct CsvSource {
    path: PathBuf,

    /// Fixed delimiter; detected from content when unset
    delimiter: Option<u8>,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            delimiter: None,
        }
    }

    /// Set custom delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    /// Parse CSV content from string
    pub fn parse_content(content: &str, delimiter: Option<u8>) -> Result<DataTable> {
        let delimiter = delimiter.unwrap_or_else(|| detect_delimiter(content));
        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .trim(Trim::None)
            .flexible(true) // Allow rows with different lengths
            .from_reader(content.as_bytes());

        let headers = reader
            .headers()
            .map_err(|e| AppError::InputRead(format!("Failed to read CSV headers: {}", e)))?
            .iter()
            .map(str::to_string)
            .collect::<Vec<_>>();

        let mut table = DataTable::new(headers);
        for (index, result) in reader.records().enumerate() {
            let record = result.map_err(|e| {
                AppError::InputRead(format!("Failed to parse CSV row {}: {}", index + 1, e))
            })?;
            table.push_values(record.iter().map(CellValue::from).collect());
        }

        Ok(table)
    }
}

impl TabularSource for CsvSource {
    fn read(&self) -> Result<DataTable> {
        let bytes = std::fs::read(&self.path).map_err(|e| {
            AppError::InputRead(format!("Failed to open {}: {}", self.path.display(), e))
        })?;
        let content = decode(&bytes);
        tracing::debug!(
            "Decoded {} bytes from {}",
            bytes.len(),
            self.path.display()
        );
        Self::parse_content(&content, self.delimiter)
    }
}

/// UTF-8 (BOM aware), falling back to Windows-1252 for legacy exports
fn decode(bytes: &[u8]) -> String {
    let (text, _, had_errors) = encoding_rs::UTF_8.decode(bytes);
    if !had_errors {
        return text.into_owned();
    }
    tracing::warn!("Input is not valid UTF-8, decoding as Windows-1252");
    let (text, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    text.into_owned()
}

/// Detect delimiter from content (comma, semicolon, tab, pipe)
pub fn detect_delimiter(content: &str) -> u8 {
    let candidates = [b',', b';', b'\t', b'|'];
    let sample_lines: Vec<_> = content.lines().take(10).collect();
    if sample_lines.is_empty() {
        return b',';
    }

    let mut best_delimiter = b',';
    let mut best_score = 0.0f32;

    for &delimiter in &candidates {
        let field_counts: Vec<usize> = sample_lines
            .iter()
            .map(|line| line.bytes().filter(|&b| b == delimiter).count())
            .collect();

        // Score by consistency (low standard deviation) and frequency
        let avg = field_counts.iter().sum::<usize>() as f32 / field_counts.len() as f32;
        let variance = field_counts
            .iter()
            .map(|&x| (x as f32 - avg).powi(2))
            .sum::<f32>()
            / field_counts.len() as f32;

        let score = avg / (1.0 + variance.sqrt());

        if score > best_score {
            best_score = score;
            best_delimiter = delimiter;
        }
    }

    best_delimiter
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_simple_csv() {
        let table = CsvSource::parse_content("name,age,city\nAlice,30,NYC\nBob,25,LA", None).unwrap();

        assert_eq!(table.columns, vec!["name", "age", "city"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[1].index, 1);
        assert_eq!(
            table.rows[0].get("name"),
            Some(&CellValue::Text("Alice".to_string()))
        );
    }

    #[test]
    fn test_short_rows_are_blank_filled() {
        let table = CsvSource::parse_content("a,b,c\n1\n", None).unwrap();
        assert_eq!(table.rows[0].get("c"), Some(&CellValue::Empty));
    }

    #[test]
    fn test_headers_kept_verbatim() {
        let table = CsvSource::parse_content("Email,EMAIL \nx,y", None).unwrap();
        assert_eq!(table.columns, vec!["Email", "EMAIL "]);
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter("a,b,c\nd,e,f"), b',');
        assert_eq!(detect_delimiter("a;b;c\nd;e;f"), b';');
        assert_eq!(detect_delimiter("a\tb\nc\td"), b'\t');
        assert_eq!(detect_delimiter(""), b',');
    }

    #[test]
    fn test_read_file_with_bom_and_semicolons() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"\xEF\xBB\xBFFirst Name;Email\nAna;a@x.com\n").unwrap();

        let table = CsvSource::new(file.path()).read().unwrap();
        assert_eq!(table.columns, vec!["First Name", "Email"]);
        assert_eq!(
            table.rows[0].get("Email"),
            Some(&CellValue::Text("a@x.com".to_string()))
        );
    }

    #[test]
    fn test_read_latin1_fallback() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"name\nJos\xE9\n").unwrap();

        let table = CsvSource::new(file.path()).read().unwrap();
        assert_eq!(
            table.rows[0].get("name"),
            Some(&CellValue::Text("José".to_string()))
        );
    }

    #[test]
    fn test_missing_file_is_input_read_error() {
        let err = CsvSource::new("/definitely/not/here.csv").read().unwrap_err();
        assert!(matches!(err, AppError::InputRead(_)));
    }
}
