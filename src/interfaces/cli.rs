//! Command-line front end.
//!
//! Usage:
//!   outreach-merge leads.xlsx -o outreach.csv \
//!     --subject "Hello {{first name}}" --subject "Hi {{first name}}" \
//!     --body "Dear {{First_Name}}, ..."
//!
//!   # templates and options from a TOML file, validation only
//!   outreach-merge leads.csv --config merge.toml --check

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::application::use_cases::merge_run::MergeRunUseCase;
use crate::domain::error::{AppError, Result};
use crate::domain::merge_config::OutputShape;
use crate::infrastructure::config::{ConfigService, RunConfig};
use crate::infrastructure::tabular::{open_sink, open_source};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ShapeArg {
    /// Address, subject, copy, chaser and tracking columns
    Outreach,
    /// Address and email copy only
    Minimal,
}

impl From<ShapeArg> for OutputShape {
    fn from(arg: ShapeArg) -> Self {
        match arg {
            ShapeArg::Outreach => OutputShape::Outreach,
            ShapeArg::Minimal => OutputShape::Minimal,
        }
    }
}

/// Generate per-row outreach copy from templates and a spreadsheet
#[derive(Parser, Debug)]
#[command(name = "outreach-merge")]
#[command(about = "Merge {{placeholders}} in subject/body/chaser templates with spreadsheet rows")]
pub struct Args {
    /// Input table (.csv, .tsv, .xlsx, .xls, .ods)
    pub input: PathBuf,

    /// Output file (.csv, .tsv, .json)
    #[arg(long, short = 'o', required_unless_present = "check")]
    pub output: Option<PathBuf>,

    /// TOML file with options and templates
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Worksheet name for workbook inputs (first sheet by default)
    #[arg(long)]
    pub sheet: Option<String>,

    /// Subject template; repeat to rotate A, B, A, ...
    #[arg(long = "subject", short = 's')]
    pub subjects: Vec<String>,

    /// Email copy template; repeat to rotate
    #[arg(long = "body", short = 'b')]
    pub bodies: Vec<String>,

    /// Optional chaser copy template; repeat to rotate
    #[arg(long = "chaser")]
    pub chasers: Vec<String>,

    /// Text used for blank cells (may be empty)
    #[arg(long)]
    pub blank_fill: Option<String>,

    /// Output table layout
    #[arg(long, value_enum)]
    pub shape: Option<ShapeArg>,

    /// Only check that every placeholder maps to a column
    #[arg(long)]
    pub check: bool,
}

impl Args {
    /// Flags win over environment, environment over the config file
    pub fn resolve_config(&self) -> Result<RunConfig> {
        let mut service = ConfigService::new();
        if let Some(path) = &self.config {
            service = service.with_file(path)?;
        }
        let mut config = service.with_env().load()?;

        if let Some(blank_fill) = &self.blank_fill {
            config.blank_fill = blank_fill.clone();
        }
        if let Some(shape) = self.shape {
            config.output_shape = shape.into();
        }
        if !self.subjects.is_empty() {
            config.templates.subject = self.subjects.clone();
        }
        if !self.bodies.is_empty() {
            config.templates.body = self.bodies.clone();
        }
        if !self.chasers.is_empty() {
            config.templates.chaser = self.chasers.clone();
        }

        Ok(config)
    }
}

/// Run one invocation; returns the text to print on success
pub fn execute(args: &Args) -> Result<String> {
    let config = args.resolve_config()?;
    let templates = config.templates.to_template_set();
    let use_case = MergeRunUseCase::new(config.merge_config());
    let source = open_source(&args.input, args.sheet.as_deref())?;

    if args.check {
        let report = use_case.check(&*source, &templates)?;
        let mapping = report
            .mapping
            .entries()
            .into_iter()
            .map(|(raw, column)| format!("{{{{{}}}}} -> {}", raw, column))
            .collect::<Vec<_>>();
        if !report.is_complete() {
            return Err(AppError::UnmappedPlaceholders(report.missing));
        }
        return Ok(mapping.join("\n"));
    }

    let output_path = args
        .output
        .as_ref()
        .ok_or_else(|| AppError::ValidationError("--output is required".to_string()))?;
    let sink = open_sink(output_path)?;

    let run = use_case.run(&*source, &templates)?;
    sink.write(&run.output)?;
    tracing::info!(
        "Wrote {} rows to {} in {} ms",
        run.summary.row_count,
        output_path.display(),
        run.summary.processing_time_ms
    );

    Ok(format!(
        "{} rows written to {}",
        run.summary.row_count,
        output_path.display()
    ))
}
