// ============================================================
// MERGE RUN USE CASE
// ============================================================
// Read -> validate -> merge -> assemble, fail-closed at validation

use std::fmt;
use std::time::Instant;

use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

use crate::application::use_cases::mapping_validator::{self, PlaceholderMapping, ValidationReport};
use crate::application::use_cases::result_assembler::{self, RoleTexts};
use crate::application::use_cases::{rotation, row_merger};
use crate::domain::error::{AppError, Result};
use crate::domain::header_map::{find_identity_column, HeaderMap};
use crate::domain::merge_config::MergeConfig;
use crate::domain::merge_result::MergeOutput;
use crate::domain::table::{DataTable, Row};
use crate::domain::template::{TemplateRole, TemplateSet};
use crate::infrastructure::tabular::TabularSource;

/// Pipeline states of a single run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RunStage {
    Idle,
    Reading,
    Validating,
    Failed,
    Merging,
    Assembling,
    Done,
}

impl fmt::Display for RunStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// What a completed run did
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub row_count: usize,
    pub placeholder_count: usize,
    pub identity_column: Option<String>,
    pub template_counts: Vec<(TemplateRole, usize)>,
    pub processing_time_ms: u64,
}

#[derive(Debug, Clone)]
pub struct MergeRun {
    pub output: MergeOutput,
    pub summary: RunSummary,
}

/// One mail-merge invocation. Holds no state between runs.
pub struct MergeRunUseCase {
    config: MergeConfig,
}

impl MergeRunUseCase {
    pub fn new(config: MergeConfig) -> Self {
        Self { config }
    }

    /// Read `source`, then merge it with `templates`
    pub fn run(&self, source: &dyn TabularSource, templates: &TemplateSet) -> Result<MergeRun> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("merge_run", %run_id);
        let _enter = span.enter();

        self.check_config(templates)?;
        let table = self.read(source)?;
        self.execute(run_id, &table, templates)
    }

    /// Merge an already loaded table
    pub fn run_table(&self, table: &DataTable, templates: &TemplateSet) -> Result<MergeRun> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("merge_run", %run_id);
        let _enter = span.enter();

        self.check_config(templates)?;
        self.execute(run_id, table, templates)
    }

    /// Read and validate only; reports the mapping without merging
    pub fn check(&self, source: &dyn TabularSource, templates: &TemplateSet) -> Result<ValidationReport> {
        self.check_config(templates)?;
        let table = self.read(source)?;
        enter(RunStage::Validating);
        let header_map = HeaderMap::build(&table.columns);
        let report = mapping_validator::validate(
            templates.iter_roles(self.config.output_shape.active_roles()),
            &header_map,
        );
        if !report.is_complete() {
            enter(RunStage::Failed);
        }
        Ok(report)
    }

    fn check_config(&self, templates: &TemplateSet) -> Result<()> {
        enter(RunStage::Idle);
        self.config
            .validate()
            .map_err(|e| AppError::ValidationError(format!("Invalid merge config: {}", e)))?;

        for role in self.config.output_shape.active_roles() {
            if !role.is_optional() && templates.for_role(*role).is_empty() {
                return Err(AppError::ValidationError(format!(
                    "At least one {} is required",
                    role.title().to_lowercase()
                )));
            }
        }
        Ok(())
    }

    fn read(&self, source: &dyn TabularSource) -> Result<DataTable> {
        enter(RunStage::Reading);
        let table = source.read().map_err(|e| {
            enter(RunStage::Failed);
            tracing::error!("Could not read input: {}", e);
            match e {
                AppError::InputRead(_) => e,
                other => AppError::InputRead(other.to_string()),
            }
        })?;
        tracing::info!(
            "Read {} rows with {} columns",
            table.len(),
            table.columns.len()
        );
        Ok(table)
    }

    fn execute(&self, run_id: Uuid, table: &DataTable, templates: &TemplateSet) -> Result<MergeRun> {
        let start = Instant::now();
        let roles = self.config.output_shape.active_roles();

        enter(RunStage::Validating);
        for template in templates.iter_roles(roles) {
            tracing::debug!("Validating {}", template.label());
        }
        let header_map = HeaderMap::build(&table.columns);
        let mapping = mapping_validator::validate(templates.iter_roles(roles), &header_map)
            .into_mapping()
            .map_err(|e| {
                enter(RunStage::Failed);
                if let AppError::UnmappedPlaceholders(missing) = &e {
                    for ph in missing {
                        tracing::warn!("UNMAPPED PLACEHOLDER: {{{{{}}}}}", ph);
                    }
                }
                e
            })?;

        let identity_column = find_identity_column(&table.columns, &self.config.identity_field);
        match &identity_column {
            Some(column) => tracing::debug!("Address column: {:?}", column),
            None => tracing::info!(
                "No column matches {:?}; address field left empty",
                self.config.identity_field
            ),
        }

        enter(RunStage::Merging);
        let merged: Vec<RoleTexts> = table
            .rows
            .iter()
            .enumerate()
            .map(|(position, row)| self.merge_row(position, row, templates, &mapping))
            .collect();

        enter(RunStage::Assembling);
        let output = result_assembler::assemble(
            &table.rows,
            merged,
            identity_column.as_deref(),
            self.config.output_shape,
        );

        enter(RunStage::Done);
        let summary = RunSummary {
            run_id,
            row_count: output.len(),
            placeholder_count: mapping.len(),
            identity_column,
            template_counts: roles
                .iter()
                .map(|role| (*role, templates.for_role(*role).len()))
                .collect(),
            processing_time_ms: start.elapsed().as_millis() as u64,
        };
        tracing::info!(
            "Generated {} rows from {} placeholders",
            summary.row_count,
            summary.placeholder_count
        );

        Ok(MergeRun { output, summary })
    }

    /// Rotation uses the row's position in the table, not any data value
    fn merge_row(
        &self,
        position: usize,
        row: &Row,
        templates: &TemplateSet,
        mapping: &PlaceholderMapping,
    ) -> RoleTexts {
        let mut texts = RoleTexts::default();
        for role in self.config.output_shape.active_roles() {
            let Some(template) = rotation::select(templates.for_role(*role), position) else {
                continue;
            };
            let merged = row_merger::merge(&template.text, row, mapping, &self.config.blank_fill);
            match role {
                TemplateRole::Subject => texts.subject = merged,
                TemplateRole::Body => texts.body = merged,
                TemplateRole::Chaser => texts.chaser = merged,
            }
        }
        texts
    }
}

fn enter(stage: RunStage) {
    tracing::debug!(%stage, "merge run stage");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::merge_config::OutputShape;
    use crate::domain::table::CellValue;

    struct FixedSource(DataTable);

    impl TabularSource for FixedSource {
        fn read(&self) -> Result<DataTable> {
            Ok(self.0.clone())
        }
    }

    struct BrokenSource;

    impl TabularSource for BrokenSource {
        fn read(&self) -> Result<DataTable> {
            Err(AppError::IoError("disk on fire".to_string()))
        }
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn table(columns: &[&str], rows: &[&[&str]]) -> DataTable {
        let mut table = DataTable::new(strings(columns));
        for row in rows {
            table.push_values(row.iter().map(|v| CellValue::from(*v)).collect());
        }
        table
    }

    fn people() -> DataTable {
        table(
            &["Name", "EMAIL", "Company"],
            &[
                &["Ana", "ana@x.com", "Acme"],
                &["Bo", "bo@x.com", ""],
                &["Cy", "", "Initech"],
            ],
        )
    }

    #[test]
    fn test_full_run_outreach_shape() {
        let templates = TemplateSet::from_texts(
            &strings(&["Hello {{name}}", "Hi {{name}}"]),
            &strings(&["{{Name}} at {{company}}"]),
            &[],
        );
        let run = MergeRunUseCase::new(MergeConfig::default())
            .run(&FixedSource(people()), &templates)
            .unwrap();

        let rows = &run.output.rows;
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].subject, "Hello Ana");
        assert_eq!(rows[1].subject, "Hi Bo");
        assert_eq!(rows[2].subject, "Hello Cy");
        assert_eq!(rows[1].email_copy, "Bo at [MISSING]");
        assert_eq!(rows[0].email_address, "ana@x.com");
        assert_eq!(rows[2].email_address, "");
        assert!(rows.iter().all(|r| r.chaser_copy.is_empty()));
        assert_eq!(run.summary.identity_column.as_deref(), Some("EMAIL"));
        assert_eq!(run.summary.placeholder_count, 3);
    }

    #[test]
    fn test_unmapped_placeholder_aborts_without_output() {
        let templates = TemplateSet::from_texts(
            &strings(&["Hi {{Nickname}}"]),
            &strings(&["{{name}} {{Title}}"]),
            &strings(&["{{Nickname}} again"]),
        );
        let err = MergeRunUseCase::new(MergeConfig::default())
            .run(&FixedSource(people()), &templates)
            .unwrap_err();
        assert_eq!(
            err,
            AppError::UnmappedPlaceholders(strings(&["Nickname", "Title"]))
        );
    }

    #[test]
    fn test_blank_placeholder_is_unmapped() {
        let templates = TemplateSet::from_texts(
            &strings(&["Hi {{ }} {{name}}"]),
            &strings(&["b"]),
            &[],
        );
        let err = MergeRunUseCase::new(MergeConfig::default())
            .run_table(&table(&["name"], &[&["Ana"]]), &templates)
            .unwrap_err();
        assert_eq!(err, AppError::UnmappedPlaceholders(strings(&[" "])));
        assert!(err.to_string().contains("UNMAPPED PLACEHOLDER: {{ }}"));
    }

    #[test]
    fn test_blank_placeholder_matches_blank_header() {
        let templates = TemplateSet::from_texts(&strings(&["[{{ }}]"]), &strings(&["b"]), &[]);
        let run = MergeRunUseCase::new(MergeConfig::default())
            .run_table(&table(&["name", " _ "], &[&["Ana", "x"]]), &templates)
            .unwrap();
        assert_eq!(run.output.rows[0].subject, "[x]");
    }

    #[test]
    fn test_minimal_shape_ignores_subject_and_chaser() {
        let templates = TemplateSet::from_texts(
            &strings(&["{{not a column}}"]),
            &strings(&["Hey {{name}}"]),
            &strings(&["{{also missing}}"]),
        );
        let config = MergeConfig::new().with_output_shape(OutputShape::Minimal);
        let run = MergeRunUseCase::new(config)
            .run(&FixedSource(people()), &templates)
            .unwrap();

        assert_eq!(run.output.shape, OutputShape::Minimal);
        assert_eq!(run.output.rows[0].email_copy, "Hey Ana");
        assert!(run.output.rows[0].subject.is_empty());
    }

    #[test]
    fn test_chaser_rotates_on_its_own_list() {
        let templates = TemplateSet::from_texts(
            &strings(&["s"]),
            &strings(&["b"]),
            &strings(&["c1 {{name}}", "c2", "c3"]),
        );
        let run = MergeRunUseCase::new(MergeConfig::default())
            .run_table(&people(), &templates)
            .unwrap();
        let chasers: Vec<&str> = run.output.rows.iter().map(|r| r.chaser_copy.as_str()).collect();
        assert_eq!(chasers, vec!["c1 Ana", "c2", "c3"]);
    }

    #[test]
    fn test_required_role_must_have_template() {
        let templates = TemplateSet::from_texts(&strings(&["  "]), &strings(&["b"]), &[]);
        let err = MergeRunUseCase::new(MergeConfig::default())
            .run_table(&people(), &templates)
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[test]
    fn test_blank_identity_field_is_rejected() {
        let templates = TemplateSet::from_texts(&strings(&["s"]), &strings(&["b"]), &[]);
        let config = MergeConfig {
            identity_field: " ".to_string(),
            ..Default::default()
        };
        let err = MergeRunUseCase::new(config)
            .run_table(&people(), &templates)
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[test]
    fn test_read_failure_is_input_read_error() {
        let templates = TemplateSet::from_texts(&strings(&["s"]), &strings(&["b"]), &[]);
        let err = MergeRunUseCase::new(MergeConfig::default())
            .run(&BrokenSource, &templates)
            .unwrap_err();
        assert!(matches!(err, AppError::InputRead(_)));
    }

    #[test]
    fn test_check_reports_mapping() {
        let templates = TemplateSet::from_texts(
            &strings(&["{{ name }}"]),
            &strings(&["{{e_mail}}"]),
            &[],
        );
        let report = MergeRunUseCase::new(MergeConfig::default())
            .check(&FixedSource(people()), &templates)
            .unwrap();
        assert!(report.is_complete());
        assert_eq!(report.mapping.entries(), vec![("e_mail", "EMAIL"), ("name", "Name")]);
    }

    #[test]
    fn test_empty_table_produces_empty_output() {
        let templates = TemplateSet::from_texts(&strings(&["{{name}}"]), &strings(&["b"]), &[]);
        let run = MergeRunUseCase::new(MergeConfig::default())
            .run_table(&table(&["name"], &[]), &templates)
            .unwrap();
        assert!(run.output.is_empty());
    }

    #[test]
    fn test_validation_still_runs_on_empty_table() {
        let templates = TemplateSet::from_texts(&strings(&["{{missing}}"]), &strings(&["b"]), &[]);
        let err = MergeRunUseCase::new(MergeConfig::default())
            .run_table(&table(&["name"], &[]), &templates)
            .unwrap_err();
        assert!(matches!(err, AppError::UnmappedPlaceholders(_)));
    }
}
