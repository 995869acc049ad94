pub mod mapping_validator;
pub mod merge_run;
pub mod placeholder;
pub mod result_assembler;
pub mod rotation;
pub mod row_merger;
