//! # sortguard-rules
//!
//! Named-rule validation engine.
//!
//! Rules and their translations are registered once at startup on a
//! [`Validator`]. Candidate structs implement [`Inspect`] to list their
//! rule-tagged fields, and every call receives a [`ValidationContext`]
//! naming the reference struct used by the `is-sort` rule.
//!
//! ```
//! use sortguard_domain::{FieldDescriptor, SortFieldTable};
//! use sortguard_rules::{FieldRef, IS_SORT_TAG, Locale, ValidationContext, build_validator};
//!
//! const COLUMNS: SortFieldTable = SortFieldTable {
//!     name: "Columns",
//!     fields: &[FieldDescriptor::new("CreatedAt").with_sort("-")],
//! };
//!
//! let validator = build_validator()?;
//! let context = ValidationContext::with_table(COLUMNS);
//! let field = FieldRef::new("SortField", "updated_at", &[IS_SORT_TAG]);
//! if let Err(error) = validator.validate_field(field, &context) {
//!     let message = validator.translator(Locale::En).translate(&error);
//!     assert_eq!(message, "SortField must be one of [created_at], got updated_at");
//! }
//! # Ok::<(), sortguard_rules::RegistrationError>(())
//! ```

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod field;
pub mod is_sort;
pub mod registry;
pub mod translate;

pub use field::{FieldError, FieldLevel, FieldRef, Inspect, ValidationContext, ValidationErrors};
pub use is_sort::{
    IS_SORT_MESSAGE_EN, IS_SORT_MESSAGE_ZH, IS_SORT_TAG, allowed_for, install_sort_rule, is_sort,
    translate_is_sort,
};
pub use registry::{
    REQUIRED_TAG, RegistrationError, RuleFn, TranslateFn, Translator, Validator,
};
pub use translate::{Locale, Template, UnknownLocale};

/// Build a validator with built-in translations for every locale and the
/// `is-sort` rule installed.
pub fn build_validator() -> Result<Validator, RegistrationError> {
    let mut validator = Validator::new();
    for locale in Locale::ALL {
        validator.register_default_translations(locale)?;
    }
    install_sort_rule(&mut validator)?;
    tracing::info!(target: "sortguard::rules", validator = ?validator, "validator ready");
    Ok(validator)
}
