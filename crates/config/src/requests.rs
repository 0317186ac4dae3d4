//! Sort request DTOs and validation helpers.
//!
//! Requests are boundary inputs (CLI/JSON) and are checked for shape here.
//! Membership of `sortField` in a reference struct's allowed set is checked
//! by the caller, which knows the registered targets.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sortguard_shared::{ErrorCode, ErrorEnvelope, Result, Validate, Validated, ValidationError};
use std::fmt;

/// Sort request payload (boundary DTO).
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    JsonSchema,
    sortguard_validate_derive::Validate,
)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[validate(error = "RequestValidationError")]
pub struct SortRequestDto {
    /// Requested sort column.
    #[validate(field = "sortField", non_empty)]
    pub sort_field: String,
    /// Reference target name; falls back to the configured default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(
        field = "target",
        non_empty,
        custom = "validate_request_target"
    )]
    pub target: Option<String>,
}

/// Validated sort request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortRequest {
    /// Sort column exactly as requested.
    pub sort_field: Box<str>,
    /// Normalized target name.
    pub target: Option<Box<str>>,
}

/// Validated sort request proof.
pub type ValidatedSortRequest = Validated<SortRequest>;

/// Request validation errors mapped to `ErrorEnvelope`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestValidationError {
    /// A required string field is empty after trimming.
    EmptyField {
        /// Field name that failed validation.
        field: &'static str,
    },
    /// A string field contains invalid content.
    InvalidField {
        /// Field name that failed validation.
        field: &'static str,
        /// Short reason describing why validation failed.
        reason: &'static str,
    },
    /// A field is not one of the allowed values.
    NotOneOf {
        /// Field name that failed validation.
        field: &'static str,
        /// Value provided.
        value: String,
        /// Allowed values, in declaration order.
        allowed: Vec<String>,
    },
}

impl RequestValidationError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::EmptyField { .. } => ErrorCode::new("request", "empty_field"),
            Self::InvalidField { .. } => ErrorCode::new("request", "invalid_field"),
            Self::NotOneOf { .. } => ErrorCode::new("request", "not_one_of"),
        }
    }
}

impl fmt::Display for RequestValidationError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyField { field } => write!(formatter, "{field} must be non-empty"),
            Self::InvalidField { field, reason } => {
                write!(formatter, "{field} is invalid: {reason}")
            },
            Self::NotOneOf {
                field,
                value,
                allowed,
            } => write!(
                formatter,
                "{field} must be one of [{}], got {value}",
                allowed.join(", ")
            ),
        }
    }
}

impl std::error::Error for RequestValidationError {}

impl ValidationError for RequestValidationError {
    fn empty(field: &'static str) -> Self {
        Self::EmptyField { field }
    }

    fn invalid(field: &'static str, reason: &'static str) -> Self {
        Self::InvalidField { field, reason }
    }

    fn not_one_of(field: &'static str, value: String, allowed: Vec<String>) -> Self {
        Self::NotOneOf {
            field,
            value,
            allowed,
        }
    }
}

impl From<RequestValidationError> for ErrorEnvelope {
    fn from(error: RequestValidationError) -> Self {
        let code = error.error_code();
        let message = error.to_string();
        let envelope = Self::expected(code, message);

        match error {
            RequestValidationError::EmptyField { field } => envelope.with_metadata("field", field),
            RequestValidationError::InvalidField { field, reason } => envelope
                .with_metadata("field", field)
                .with_metadata("reason", reason),
            RequestValidationError::NotOneOf {
                field,
                value,
                allowed,
            } => envelope
                .with_metadata("field", field)
                .with_metadata("value", value)
                .with_metadata("allowed", allowed.join(",")),
        }
    }
}

/// Target names in requests follow the config naming rule.
pub fn validate_request_target(value: Option<&String>) -> Result<(), RequestValidationError> {
    crate::schema::validate_target_name(value.map(|raw| raw.trim().to_ascii_lowercase()).as_ref())
        .map_err(|_| RequestValidationError::InvalidField {
            field: "target",
            reason: "expected lowercase words joined by '-'",
        })
}

/// Validate and normalize a sort request.
pub fn validate_sort_request(dto: &SortRequestDto) -> Result<ValidatedSortRequest> {
    dto.validate().map_err(ErrorEnvelope::from)?;
    Ok(Validated::new(SortRequest {
        sort_field: dto.sort_field.as_str().into(),
        target: dto
            .target
            .as_deref()
            .map(|target| target.trim().to_ascii_lowercase().into_boxed_str()),
    }))
}

/// Parse and validate a sort request from JSON.
pub fn parse_sort_request_json(input: &str) -> Result<ValidatedSortRequest> {
    let dto: SortRequestDto = serde_json::from_str(input).map_err(|error| {
        ErrorEnvelope::expected(
            ErrorCode::new("request", "invalid_json"),
            format!("invalid sort request JSON: {error}"),
        )
        .with_metadata("request_kind", "sort")
    })?;
    validate_sort_request(&dto)
}

/// JSON Schema for `SortRequestDto`.
#[must_use]
pub fn sort_request_schema() -> schemars::Schema {
    schemars::schema_for!(SortRequestDto)
}
