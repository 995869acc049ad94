// ============================================================
// OUTPUT SINKS
// ============================================================
// Render a finished MergeOutput to CSV or JSON

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use super::TabularSink;
use crate::domain::error::{AppError, Result};
use crate::domain::merge_result::{MergeOutput, OutputValue};

/// Delimited output. Tracking flags have no checkbox here and render as empty text.
pub struct CsvSink {
    path: PathBuf,
    delimiter: u8,
}

impl CsvSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            delimiter: b',',
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}

impl TabularSink for CsvSink {
    fn write(&self, output: &MergeOutput) -> Result<()> {
        let file = create(&self.path)?;
        write_csv(output, file, self.delimiter)
    }
}

pub fn write_csv<W: Write>(output: &MergeOutput, writer: W, delimiter: u8) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);

    writer
        .write_record(output.columns())
        .map_err(|e| AppError::OutputWrite(format!("Failed to write CSV header: {}", e)))?;

    for row in &output.rows {
        let record: Vec<String> = row
            .values(output.shape)
            .into_iter()
            .map(|value| match value {
                OutputValue::Text(text) => text,
                OutputValue::Flag(_) => String::new(),
            })
            .collect();
        writer.write_record(&record).map_err(|e| {
            AppError::OutputWrite(format!("Failed to write CSV row {}: {}", row.index + 1, e))
        })?;
    }

    writer
        .flush()
        .map_err(|e| AppError::OutputWrite(format!("Failed to flush CSV output: {}", e)))
}

/// JSON array of objects keyed by column title; tracking flags are booleans
pub struct JsonSink {
    path: PathBuf,
}

impl JsonSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TabularSink for JsonSink {
    fn write(&self, output: &MergeOutput) -> Result<()> {
        let file = create(&self.path)?;
        write_json(output, file)
    }
}

pub fn write_json<W: Write>(output: &MergeOutput, mut writer: W) -> Result<()> {
    let records: Vec<Value> = output
        .rows
        .iter()
        .map(|row| {
            let object: Map<String, Value> = output
                .columns()
                .iter()
                .zip(row.values(output.shape))
                .map(|(column, value)| {
                    let value = match value {
                        OutputValue::Text(text) => Value::String(text),
                        OutputValue::Flag(flag) => Value::Bool(flag),
                    };
                    (column.to_string(), value)
                })
                .collect();
            Value::Object(object)
        })
        .collect();

    serde_json::to_writer_pretty(&mut writer, &records)
        .map_err(|e| AppError::OutputWrite(format!("Failed to serialize JSON output: {}", e)))?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path).map_err(|e| {
        AppError::OutputWrite(format!("Failed to create {}: {}", path.display(), e))
    })?;
    Ok(BufWriter::new(file))
}
