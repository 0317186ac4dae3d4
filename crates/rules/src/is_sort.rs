//! The `is-sort` rule: a value must name an allowed sort field of the
//! reference struct carried by the validation context.

use crate::field::{FieldError, FieldLevel};
use crate::registry::{RegistrationError, Validator};
use crate::translate::{Locale, Template};
use sortguard_domain::AllowedSortValues;

/// Rule name.
pub const IS_SORT_TAG: &str = "is-sort";

/// English message: `{0}` field, `{1}` value, `{2}` allowed values.
pub const IS_SORT_MESSAGE_EN: &str = "{0} must be one of [{2}], got {1}";

/// Chinese message: `{0}` field, `{1}` value, `{2}` allowed values.
pub const IS_SORT_MESSAGE_ZH: &str = "{0}的值{1}必须是{2}中的一个";

/// Rule predicate.
///
/// Fails when the context has no reference struct, when the reference
/// struct yields no sort values, or when the value is not among them.
pub fn is_sort(field: &FieldLevel<'_>) -> bool {
    let Some(table) = field.context().sort_fields() else {
        tracing::warn!(
            target: "sortguard::rules",
            field = field.field(),
            "is-sort used without a reference struct"
        );
        return false;
    };
    let allowed = table.allowed_sort_values();
    let duplicates = allowed.duplicates();
    if !duplicates.is_empty() {
        tracing::warn!(
            target: "sortguard::rules",
            target_type = table.name,
            ?duplicates,
            "reference struct maps several fields to the same sort value"
        );
    }
    allowed.contains(field.value())
}

/// Render an `is-sort` failure with the allowed values joined by `, `.
pub fn translate_is_sort(template: &Template, error: &FieldError) -> String {
    let allowed = allowed_for(error).to_string();
    template.render(&[error.field(), error.value(), &allowed])
}

/// Allowed values recorded for a failed `is-sort` field.
#[must_use]
pub fn allowed_for(error: &FieldError) -> AllowedSortValues {
    error
        .sort_fields()
        .map(|table| table.allowed_sort_values())
        .unwrap_or_default()
}

/// Register the `is-sort` rule and its translations.
pub fn install_sort_rule(validator: &mut Validator) -> Result<(), RegistrationError> {
    validator.register_validation(IS_SORT_TAG, is_sort)?;
    for locale in Locale::ALL {
        let template = match locale {
            Locale::En => IS_SORT_MESSAGE_EN,
            Locale::Zh => IS_SORT_MESSAGE_ZH,
        };
        validator.register_translation(IS_SORT_TAG, locale, template, translate_is_sort)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{FieldRef, ValidationContext};
    use sortguard_domain::{FieldDescriptor, SortFieldTable};

    const COLUMNS: SortFieldTable = SortFieldTable {
        name: "Columns",
        fields: &[
            FieldDescriptor::new("FieldStr1")
                .with_sort("Default")
                .with_column("column:field_str1"),
            FieldDescriptor::new("FieldStr2").with_sort("-"),
        ],
    };

    const EMPTY: SortFieldTable = SortFieldTable {
        name: "Empty",
        fields: &[FieldDescriptor::new("Id")],
    };

    fn validator() -> Result<Validator, RegistrationError> {
        let mut validator = Validator::new();
        install_sort_rule(&mut validator)?;
        Ok(validator)
    }

    fn check(value: &str, context: &ValidationContext) -> Result<(), RegistrationError> {
        let validator = validator()?;
        let field = FieldRef::new("SortField", value, &[IS_SORT_TAG]);
        assert!(validator.validate_field(field, context).is_ok());
        Ok(())
    }

    #[test]
    fn accepts_allowed_values() -> Result<(), RegistrationError> {
        let context = ValidationContext::with_table(COLUMNS);
        check("field_str1", &context)?;
        check("field_str2", &context)
    }

    #[test]
    fn rejects_without_reference_or_values() -> Result<(), RegistrationError> {
        let validator = validator()?;
        let field = FieldRef::new("SortField", "field_str1", &[IS_SORT_TAG]);
        assert!(validator.validate_field(field, &ValidationContext::new()).is_err());
        assert!(
            validator
                .validate_field(field, &ValidationContext::with_table(EMPTY))
                .is_err()
        );
        Ok(())
    }

    #[test]
    fn translates_with_curated_allowed_list() -> Result<(), Box<dyn std::error::Error>> {
        let validator = validator()?;
        let field = FieldRef::new("SortField", "bogus", &[IS_SORT_TAG]);
        let error = validator
            .validate_field(field, &ValidationContext::with_table(COLUMNS))
            .err()
            .ok_or("bogus should be rejected")?;

        assert_eq!(
            validator.translator(Locale::Zh).translate(&error),
            "SortField的值bogus必须是field_str1, field_str2中的一个"
        );
        assert_eq!(
            validator.translator(Locale::En).translate(&error),
            "SortField must be one of [field_str1, field_str2], got bogus"
        );
        assert_eq!(allowed_for(&error).len(), 2);
        Ok(())
    }

    #[test]
    fn installing_twice_is_rejected() -> Result<(), RegistrationError> {
        let mut validator = validator()?;
        assert_eq!(
            install_sort_rule(&mut validator),
            Err(RegistrationError::DuplicateRule {
                tag: IS_SORT_TAG.into()
            })
        );
        Ok(())
    }
}
