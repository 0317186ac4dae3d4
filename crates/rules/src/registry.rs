//! Named-rule registry and validation entrypoints.

use crate::field::{FieldError, FieldLevel, FieldRef, Inspect, ValidationContext, ValidationErrors};
use crate::translate::{Locale, Template};
use sortguard_shared::{ErrorCode, ErrorEnvelope};
use std::collections::BTreeMap;
use std::fmt;

/// Rule predicate: returns true when the field passes.
pub type RuleFn = Box<dyn Fn(&FieldLevel<'_>) -> bool + Send + Sync>;

/// Message renderer for a failed rule.
pub type TranslateFn = Box<dyn Fn(&Template, &FieldError) -> String + Send + Sync>;

/// Built-in rule: trimmed value must be non-empty.
pub const REQUIRED_TAG: &str = "required";

struct Translation {
    template: Template,
    render: TranslateFn,
}

/// Rule and translation registry.
///
/// Registration happens once at startup; validation only reads, so a built
/// `Validator` can be shared across threads.
pub struct Validator {
    rules: BTreeMap<Box<str>, RuleFn>,
    translations: BTreeMap<(Box<str>, Locale), Translation>,
}

impl fmt::Debug for Validator {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Validator")
            .field("rules", &self.rules.keys().collect::<Vec<_>>())
            .field("translations", &self.translations.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator {
    /// Validator with the built-in rules registered.
    #[must_use]
    pub fn new() -> Self {
        let mut rules: BTreeMap<Box<str>, RuleFn> = BTreeMap::new();
        rules.insert(
            REQUIRED_TAG.into(),
            Box::new(|field: &FieldLevel<'_>| !field.value().trim().is_empty()),
        );
        Self {
            rules,
            translations: BTreeMap::new(),
        }
    }

    /// Register a named rule.
    pub fn register_validation<F>(&mut self, tag: &str, rule: F) -> Result<(), RegistrationError>
    where
        F: Fn(&FieldLevel<'_>) -> bool + Send + Sync + 'static,
    {
        let tag = tag.trim();
        if tag.is_empty() {
            return Err(RegistrationError::EmptyTag);
        }
        if self.rules.contains_key(tag) {
            return Err(RegistrationError::DuplicateRule { tag: tag.into() });
        }
        self.rules.insert(tag.into(), Box::new(rule));
        tracing::debug!(target: "sortguard::rules", tag, "registered validation rule");
        Ok(())
    }

    /// Register the message for `tag` in `locale`.
    ///
    /// The rule must already be registered and the template must reference
    /// the field name as `{0}`.
    pub fn register_translation<F>(
        &mut self,
        tag: &str,
        locale: Locale,
        template: &str,
        render: F,
    ) -> Result<(), RegistrationError>
    where
        F: Fn(&Template, &FieldError) -> String + Send + Sync + 'static,
    {
        let tag = tag.trim();
        if tag.is_empty() {
            return Err(RegistrationError::EmptyTag);
        }
        if !self.rules.contains_key(tag) {
            return Err(RegistrationError::UnknownRule { tag: tag.into() });
        }
        let template = Template::new(template);
        if !template.has_placeholder(0) {
            return Err(RegistrationError::MissingFieldPlaceholder { tag: tag.into() });
        }
        let key = (Box::<str>::from(tag), locale);
        if self.translations.contains_key(&key) {
            return Err(RegistrationError::DuplicateTranslation {
                tag: tag.into(),
                locale,
            });
        }
        self.translations.insert(
            key,
            Translation {
                template,
                render: Box::new(render),
            },
        );
        tracing::debug!(target: "sortguard::rules", tag, %locale, "registered translation");
        Ok(())
    }

    /// Register messages for the built-in rules in `locale`.
    pub fn register_default_translations(&mut self, locale: Locale) -> Result<(), RegistrationError> {
        let template = match locale {
            Locale::En => "{0} is a required field",
            Locale::Zh => "{0}为必填字段",
        };
        self.register_translation(REQUIRED_TAG, locale, template, |template, error| {
            template.render(&[error.field()])
        })
    }

    /// Returns true when a rule is registered under `tag`.
    #[must_use]
    pub fn has_rule(&self, tag: &str) -> bool {
        self.rules.contains_key(tag)
    }

    /// Validate a single field against its rules, stopping at the first
    /// failing rule.
    pub fn validate_field(
        &self,
        field: FieldRef<'_>,
        context: &ValidationContext,
    ) -> Result<(), FieldError> {
        let level = FieldLevel::new(field.name, field.value, context);
        for tag in field.rules {
            let passed = match self.rules.get(*tag) {
                Some(rule) => rule(&level),
                None => {
                    tracing::warn!(
                        target: "sortguard::rules",
                        field = field.name,
                        tag,
                        "undefined validation rule, failing field"
                    );
                    false
                },
            };
            if !passed {
                tracing::debug!(
                    target: "sortguard::rules",
                    field = field.name,
                    tag,
                    "field failed validation"
                );
                return Err(FieldError::new(&level, tag));
            }
        }
        Ok(())
    }

    /// Validate every inspected field of `candidate`, collecting one error
    /// per failing field.
    pub fn validate_struct<T>(
        &self,
        candidate: &T,
        context: &ValidationContext,
    ) -> Result<(), ValidationErrors>
    where
        T: Inspect + ?Sized,
    {
        let mut errors = ValidationErrors::default();
        for field in candidate.inspect() {
            if let Err(error) = self.validate_field(field, context) {
                errors.push(error);
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Translator rendering messages in `locale`.
    #[must_use]
    pub const fn translator(&self, locale: Locale) -> Translator<'_> {
        Translator {
            validator: self,
            locale,
        }
    }
}

/// Renders field errors in one locale.
#[derive(Debug, Clone, Copy)]
pub struct Translator<'a> {
    validator: &'a Validator,
    locale: Locale,
}

impl Translator<'_> {
    /// Locale this translator renders.
    #[must_use]
    pub const fn locale(&self) -> Locale {
        self.locale
    }

    /// Render `error`; falls back to the untranslated description when no
    /// message is registered for its rule.
    #[must_use]
    pub fn translate(&self, error: &FieldError) -> String {
        let key = (Box::<str>::from(error.tag()), self.locale);
        match self.validator.translations.get(&key) {
            Some(translation) => (translation.render)(&translation.template, error),
            None => error.to_string(),
        }
    }
}

/// Rule or translation registration failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    /// Rule name was empty after trimming.
    EmptyTag,
    /// A rule with this name already exists.
    DuplicateRule {
        /// Rule name.
        tag: Box<str>,
    },
    /// Translation registered for a rule that does not exist.
    UnknownRule {
        /// Rule name.
        tag: Box<str>,
    },
    /// A translation for this rule and locale already exists.
    DuplicateTranslation {
        /// Rule name.
        tag: Box<str>,
        /// Locale of the existing translation.
        locale: Locale,
    },
    /// Template does not reference the field name as `{0}`.
    MissingFieldPlaceholder {
        /// Rule name.
        tag: Box<str>,
    },
}

impl RegistrationError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::EmptyTag => ErrorCode::new("rules", "empty_tag"),
            Self::DuplicateRule { .. } => ErrorCode::new("rules", "duplicate_rule"),
            Self::UnknownRule { .. } => ErrorCode::new("rules", "unknown_rule"),
            Self::DuplicateTranslation { .. } => ErrorCode::new("rules", "duplicate_translation"),
            Self::MissingFieldPlaceholder { .. } => {
                ErrorCode::new("rules", "missing_field_placeholder")
            },
        }
    }
}

impl fmt::Display for RegistrationError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTag => formatter.write_str("rule name must be non-empty"),
            Self::DuplicateRule { tag } => write!(formatter, "rule `{tag}` is already registered"),
            Self::UnknownRule { tag } => {
                write!(formatter, "cannot translate unregistered rule `{tag}`")
            },
            Self::DuplicateTranslation { tag, locale } => {
                write!(formatter, "rule `{tag}` already has a {locale} translation")
            },
            Self::MissingFieldPlaceholder { tag } => {
                write!(formatter, "translation for `{tag}` must reference {{0}}")
            },
        }
    }
}

impl std::error::Error for RegistrationError {}

impl From<RegistrationError> for ErrorEnvelope {
    fn from(error: RegistrationError) -> Self {
        let code = error.error_code();
        let mut envelope = Self::invariant(code, error.to_string());
        match error {
            RegistrationError::EmptyTag => {},
            RegistrationError::DuplicateRule { tag }
            | RegistrationError::UnknownRule { tag }
            | RegistrationError::MissingFieldPlaceholder { tag } => {
                envelope = envelope.with_metadata("tag", tag);
            },
            RegistrationError::DuplicateTranslation { tag, locale } => {
                envelope = envelope
                    .with_metadata("tag", tag)
                    .with_metadata("locale", locale.as_str());
            },
        }
        envelope
    }
}
