//! Validation traits for derived field rules.

/// Trait for validation errors used by `Validate`.
pub trait ValidationError: Sized {
    /// A required field was empty.
    fn empty(field: &'static str) -> Self;

    /// A field value is invalid for a specific reason.
    fn invalid(field: &'static str, reason: &'static str) -> Self;

    /// A field value is not a member of the allowed set.
    fn not_one_of(field: &'static str, value: String, allowed: Vec<String>) -> Self;
}

/// Validate a value using compile-time derived rules.
pub trait Validate {
    /// Error type returned by validation.
    type Error: ValidationError;

    /// Validate the value, stopping at the first failing rule.
    fn validate(&self) -> Result<(), Self::Error>;
}
