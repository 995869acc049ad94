pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;

mod app;

pub use app::run;
pub use application::use_cases::merge_run::{MergeRun, MergeRunUseCase, RunStage, RunSummary};
pub use domain::error::{AppError, Result};
pub use domain::merge_config::{MergeConfig, OutputShape};
pub use domain::merge_result::{MergeOutput, MergedRow};
pub use domain::table::{CellValue, DataTable, Row};
pub use domain::template::{Template, TemplateRole, TemplateSet};
