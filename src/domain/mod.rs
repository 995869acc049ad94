pub mod error;
pub mod header_map;
pub mod merge_config;
pub mod merge_result;
pub mod table;
pub mod template;
