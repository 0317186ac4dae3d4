//! # sortguard-config
//!
//! Runtime configuration (locale, logging, default target), env and file
//! loading, and the sort request DTO.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

/// Environment variable parsing and merging.
pub mod env;
/// Config loading helpers (env + file).
pub mod load;
/// Sort request DTOs and validation.
pub mod requests;
/// Configuration schema types and helpers.
pub mod schema;

pub use env::{
    ENV_DEFAULT_TARGET, ENV_LOCALE, ENV_LOG_FORMAT, ENV_LOG_LEVEL, EnvParseError, SortguardEnv,
    apply_env_overrides,
};
pub use load::{
    load_config_from_path, load_config_from_sources, load_config_std_env, to_pretty_json,
    to_pretty_toml,
};
pub use requests::{
    RequestValidationError, SortRequest, SortRequestDto, ValidatedSortRequest,
    parse_sort_request_json, sort_request_schema, validate_sort_request,
};
pub use schema::{
    CURRENT_CONFIG_VERSION, ConfigSchemaError, DEFAULT_LOG_LEVEL, LogConfig, LogFormat,
    SortguardConfig, ValidatedSortguardConfig,
};

/// Returns the config crate version.
#[must_use]
pub const fn config_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
