// ============================================================
// TABULAR INFRASTRUCTURE LAYER
// ============================================================
// Input sources and output sinks around the merge engine

mod csv_source;
mod sink;
mod spreadsheet_source;

use std::path::Path;

use crate::domain::error::{AppError, Result};
use crate::domain::merge_result::MergeOutput;
use crate::domain::table::DataTable;

pub use csv_source::{detect_delimiter, CsvSource};
pub use sink::{write_csv, write_json, CsvSink, JsonSink};
pub use spreadsheet_source::SpreadsheetSource;

/// Where rows come from
pub trait TabularSource {
    fn read(&self) -> Result<DataTable>;
}

/// Where a finished run is rendered
pub trait TabularSink {
    fn write(&self, output: &MergeOutput) -> Result<()>;
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default()
}

/// Pick a source by file extension
pub fn open_source(path: &Path, sheet: Option<&str>) -> Result<Box<dyn TabularSource>> {
    match extension(path).as_str() {
        "csv" | "txt" => Ok(Box::new(CsvSource::new(path))),
        "tsv" => Ok(Box::new(CsvSource::new(path).with_delimiter(b'\t'))),
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => {
            let source = SpreadsheetSource::new(path);
            Ok(Box::new(match sheet {
                Some(name) => source.with_sheet(name),
                None => source,
            }))
        }
        other => Err(AppError::InputRead(format!(
            "Unsupported input type {:?} for {}",
            other,
            path.display()
        ))),
    }
}

/// Pick a sink by file extension
pub fn open_sink(path: &Path) -> Result<Box<dyn TabularSink>> {
    match extension(path).as_str() {
        "csv" => Ok(Box::new(CsvSink::new(path))),
        "tsv" => Ok(Box::new(CsvSink::new(path).with_delimiter(b'\t'))),
        "json" => Ok(Box::new(JsonSink::new(path))),
        other => Err(AppError::OutputWrite(format!(
            "Unsupported output type {:?} for {}",
            other,
            path.display()
        ))),
    }
}
