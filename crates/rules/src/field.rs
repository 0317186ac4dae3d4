//! Candidate fields, per-call context, and field-level failures.

use serde::Serialize;
use sortguard_domain::{SortFieldTable, SortTarget};
use sortguard_shared::{ErrorCode, ErrorEnvelope};
use std::fmt;

/// Per-call validation context.
///
/// Carries the reference struct the `is-sort` rule checks against. Passing it
/// per call keeps concurrent validations with different reference types
/// independent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationContext {
    sort_fields: Option<SortFieldTable>,
}

impl ValidationContext {
    /// Context with no reference struct.
    #[must_use]
    pub const fn new() -> Self {
        Self { sort_fields: None }
    }

    /// Context checking sort values against `T`.
    #[must_use]
    pub fn with_sort_target<T: SortTarget>() -> Self {
        Self::with_table(SortFieldTable::of::<T>())
    }

    /// Context checking sort values against an explicit descriptor table.
    #[must_use]
    pub const fn with_table(table: SortFieldTable) -> Self {
        Self {
            sort_fields: Some(table),
        }
    }

    /// Reference struct table, if any.
    #[must_use]
    pub const fn sort_fields(&self) -> Option<&SortFieldTable> {
        self.sort_fields.as_ref()
    }
}

/// One field of a candidate struct as seen by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRef<'a> {
    /// Field name reported in errors.
    pub name: &'static str,
    /// Current string value.
    pub value: &'a str,
    /// Rule names to run, in order.
    pub rules: &'static [&'static str],
}

impl<'a> FieldRef<'a> {
    /// Describe a field.
    #[must_use]
    pub const fn new(name: &'static str, value: &'a str, rules: &'static [&'static str]) -> Self {
        Self { name, value, rules }
    }
}

/// Candidate struct exposing its rule-tagged fields.
pub trait Inspect {
    /// Fields carrying rules, in declaration order.
    fn inspect(&self) -> Vec<FieldRef<'_>>;
}

/// Input handed to a rule predicate.
#[derive(Debug, Clone, Copy)]
pub struct FieldLevel<'a> {
    field: &'a str,
    value: &'a str,
    context: &'a ValidationContext,
}

impl<'a> FieldLevel<'a> {
    pub(crate) const fn new(field: &'a str, value: &'a str, context: &'a ValidationContext) -> Self {
        Self {
            field,
            value,
            context,
        }
    }

    /// Name of the field being validated.
    #[must_use]
    pub const fn field(&self) -> &'a str {
        self.field
    }

    /// Current value of the field.
    #[must_use]
    pub const fn value(&self) -> &'a str {
        self.value
    }

    /// Context of the current validation call.
    #[must_use]
    pub const fn context(&self) -> &'a ValidationContext {
        self.context
    }
}

/// A field that failed one rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    field: String,
    tag: String,
    value: String,
    #[serde(skip)]
    sort_fields: Option<SortFieldTable>,
}

impl FieldError {
    pub(crate) fn new(level: &FieldLevel<'_>, tag: &str) -> Self {
        Self {
            field: level.field().to_owned(),
            tag: tag.to_owned(),
            value: level.value().to_owned(),
            sort_fields: level.context().sort_fields().copied(),
        }
    }

    /// Name of the failed field.
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Rule that failed.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Rejected value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Reference struct in effect when the rule failed.
    #[must_use]
    pub const fn sort_fields(&self) -> Option<&SortFieldTable> {
        self.sort_fields.as_ref()
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "field validation for '{}' failed on the '{}' tag",
            self.field, self.tag
        )
    }
}

impl std::error::Error for FieldError {}

/// All field failures of one validation call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub(crate) fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }

    /// Returns true when no field failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of failed fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate failures in field order.
    pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, error) in self.0.iter().enumerate() {
            if index > 0 {
                formatter.write_str("\n")?;
            }
            write!(formatter, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl From<ValidationErrors> for ErrorEnvelope {
    fn from(errors: ValidationErrors) -> Self {
        let fields = errors
            .iter()
            .map(FieldError::field)
            .collect::<Vec<_>>()
            .join(",");
        let tags = errors
            .iter()
            .map(FieldError::tag)
            .collect::<Vec<_>>()
            .join(",");
        Self::expected(ErrorCode::validation_failed(), errors.to_string())
            .with_metadata("fields", fields)
            .with_metadata("tags", tags)
    }
}
