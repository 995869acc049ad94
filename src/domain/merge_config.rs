// ============================================================
// MERGE CONFIGURATION
// ============================================================
// Options recognized by the merge engine

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::template::TemplateRole;

pub const DEFAULT_BLANK_FILL: &str = "[MISSING]";
pub const DEFAULT_IDENTITY_FIELD: &str = "email";

/// Which output table the run produces
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputShape {
    /// Address, subject, body, chaser, plus sent/status tracking columns
    #[default]
    Outreach,
    /// Address and body only
    Minimal,
}

impl OutputShape {
    /// Roles validated and merged for this shape
    pub fn active_roles(&self) -> &'static [TemplateRole] {
        match self {
            OutputShape::Outreach => &[TemplateRole::Subject, TemplateRole::Body, TemplateRole::Chaser],
            OutputShape::Minimal => &[TemplateRole::Body],
        }
    }
}

/// Configuration for one merge run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct MergeConfig {
    /// Substituted for blank or missing cell values (may be empty)
    pub blank_fill: String,

    pub output_shape: OutputShape,

    /// Name matched (normalized) against headers to find the address column
    #[validate(custom(function = "not_blank"))]
    pub identity_field: String,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            blank_fill: DEFAULT_BLANK_FILL.to_string(),
            output_shape: OutputShape::default(),
            identity_field: DEFAULT_IDENTITY_FIELD.to_string(),
        }
    }
}

impl MergeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blank_fill(mut self, blank_fill: impl Into<String>) -> Self {
        self.blank_fill = blank_fill.into();
        self
    }

    pub fn with_output_shape(mut self, output_shape: OutputShape) -> Self {
        self.output_shape = output_shape;
        self
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}
