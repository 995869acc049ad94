use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AppError {
    /// The tabular source could not be opened or parsed.
    InputRead(String),
    /// Every placeholder (raw text, first-seen order) with no matching column.
    UnmappedPlaceholders(Vec<String>),
    ValidationError(String),
    ConfigError(String),
    OutputWrite(String),
    IoError(String),
}

impl AppError {
    /// One line per unmapped placeholder, as shown to the operator.
    pub fn unmapped_report(missing: &[String]) -> String {
        missing
            .iter()
            .map(|ph| format!("UNMAPPED PLACEHOLDER: {{{{{}}}}}", ph))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::InputRead(msg) => write!(f, "Could not read input: {}", msg),
            AppError::UnmappedPlaceholders(missing) => write!(
                f,
                "Some placeholders do not match any column header \
                 (case-insensitive; ignores spaces/underscores):\n{}",
                AppError::unmapped_report(missing)
            ),
            AppError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AppError::ConfigError(msg) => write!(f, "Config error: {}", msg),
            AppError::OutputWrite(msg) => write!(f, "Could not write output: {}", msg),
            AppError::IoError(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
