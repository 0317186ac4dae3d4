//! CLI command handlers.

pub mod config;
pub mod fields;
pub mod parse_tag;
pub mod validate;

pub use config::{run_config_schema, run_config_show};
pub use fields::run_fields;
pub use parse_tag::run_parse_tag;
pub use validate::{DEMO_SORT_VALUE, RejectionPolicy, SortCheck, run_sort_check};
