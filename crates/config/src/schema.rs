//! Configuration schema types and validation.

use serde::{Deserialize, Serialize};
use sortguard_rules::Locale;
use sortguard_shared::{ErrorCode, ErrorEnvelope, Validate, Validated, ValidationError};
use std::fmt;
use std::str::FromStr;

/// Current config schema version.
pub const CURRENT_CONFIG_VERSION: u32 = 1;

/// Default log filter.
pub const DEFAULT_LOG_LEVEL: &str = "info";

const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Stable identifier (`text`, `json`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Json => "json",
        }
    }
}

impl FromStr for LogFormat {
    type Err = ConfigSchemaError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(ConfigSchemaError::NotOneOf {
                field: "log.format",
                value: input.to_owned(),
                allowed: vec!["text".to_owned(), "json".to_owned()],
            }),
        }
    }
}

/// Logging section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sortguard_validate_derive::Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
#[validate(error = "ConfigSchemaError")]
pub struct LogConfig {
    /// `EnvFilter` directives, e.g. `info` or `info,sortguard::rules=debug`.
    #[validate(field = "log.level", non_empty)]
    pub level: String,
    /// Output format.
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_owned(),
            format: LogFormat::default(),
        }
    }
}

impl LogConfig {
    fn normalize(&mut self) {
        self.level = self.level.trim().to_ascii_lowercase();
    }

    fn validate_directives(&self) -> Result<(), ConfigSchemaError> {
        for directive in self.level.split(',') {
            let level = directive
                .rsplit_once('=')
                .map_or(directive, |(_, level)| level)
                .trim();
            if !LOG_LEVELS.contains(&level) {
                return Err(ConfigSchemaError::InvalidLogLevel {
                    directive: directive.trim().to_owned(),
                });
            }
        }
        Ok(())
    }
}

/// Effective runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sortguard_validate_derive::Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
#[validate(error = "ConfigSchemaError")]
pub struct SortguardConfig {
    /// Schema version.
    pub version: u32,
    /// Locale used for validation messages.
    pub locale: Locale,
    /// Reference target used when a command omits `--target`.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(
        field = "defaultTarget",
        non_empty,
        custom = "validate_target_name"
    )]
    pub default_target: Option<String>,
    /// Logging settings.
    pub log: LogConfig,
}

impl Default for SortguardConfig {
    fn default() -> Self {
        Self {
            version: CURRENT_CONFIG_VERSION,
            locale: Locale::default(),
            default_target: None,
            log: LogConfig::default(),
        }
    }
}

/// Validated config proof.
pub type ValidatedSortguardConfig = Validated<SortguardConfig>;

impl SortguardConfig {
    /// Normalize and validate the config.
    pub fn validate_and_normalize(mut self) -> Result<ValidatedSortguardConfig, ConfigSchemaError> {
        if self.version != CURRENT_CONFIG_VERSION {
            return Err(ConfigSchemaError::UnsupportedVersion {
                found: self.version,
                supported: CURRENT_CONFIG_VERSION,
            });
        }
        self.log.normalize();
        self.default_target = self
            .default_target
            .map(|target| target.trim().to_ascii_lowercase());

        self.validate()?;
        self.log.validate()?;
        self.log.validate_directives()?;
        Ok(Validated::new(self))
    }
}

/// Target names are lowercase ASCII words joined by `-`.
pub fn validate_target_name(value: Option<&String>) -> Result<(), ConfigSchemaError> {
    let Some(value) = value else {
        return Ok(());
    };
    let well_formed = value.split('-').all(|part| {
        !part.is_empty()
            && part
                .bytes()
                .all(|byte| byte.is_ascii_lowercase() || byte.is_ascii_digit())
    });
    if well_formed {
        Ok(())
    } else {
        Err(ConfigSchemaError::InvalidField {
            field: "defaultTarget",
            reason: "expected lowercase words joined by '-'",
        })
    }
}

/// Config validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSchemaError {
    /// The config version is not supported by this binary.
    UnsupportedVersion {
        /// Version found in the config.
        found: u32,
        /// Version supported by this crate.
        supported: u32,
    },
    /// A required string field is empty after trimming.
    EmptyField {
        /// Field path in the config file.
        field: &'static str,
    },
    /// A field contains invalid content.
    InvalidField {
        /// Field path in the config file.
        field: &'static str,
        /// Short reason.
        reason: &'static str,
    },
    /// A field is not one of the accepted values.
    NotOneOf {
        /// Field path in the config file.
        field: &'static str,
        /// Value provided.
        value: String,
        /// Accepted values.
        allowed: Vec<String>,
    },
    /// A log filter directive names an unknown level.
    InvalidLogLevel {
        /// Offending directive.
        directive: String,
    },
}

impl ConfigSchemaError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::UnsupportedVersion { .. } => ErrorCode::new("config", "unsupported_version"),
            Self::EmptyField { .. } => ErrorCode::new("config", "empty_field"),
            Self::InvalidField { .. } => ErrorCode::new("config", "invalid_field"),
            Self::NotOneOf { .. } => ErrorCode::new("config", "not_one_of"),
            Self::InvalidLogLevel { .. } => ErrorCode::new("config", "invalid_log_level"),
        }
    }
}

impl fmt::Display for ConfigSchemaError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedVersion { found, supported } => write!(
                formatter,
                "unsupported config version {found} (supported: {supported})"
            ),
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
            Self::InvalidLogLevel { directive } => {
                write!(formatter, "log.level directive `{directive}` has an unknown level")
            },
        }
    }
}

impl std::error::Error for ConfigSchemaError {}

impl ValidationError for ConfigSchemaError {
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

impl From<ConfigSchemaError> for ErrorEnvelope {
    fn from(error: ConfigSchemaError) -> Self {
        let code = error.error_code();
        let message = error.to_string();
        let envelope = Self::expected(code, message);

        match error {
            ConfigSchemaError::UnsupportedVersion { found, supported } => envelope
                .with_metadata("found", found.to_string())
                .with_metadata("supported", supported.to_string()),
            ConfigSchemaError::EmptyField { field } => envelope.with_metadata("field", field),
            ConfigSchemaError::InvalidField { field, reason } => envelope
                .with_metadata("field", field)
                .with_metadata("reason", reason),
            ConfigSchemaError::NotOneOf {
                field,
                value,
                allowed,
            } => envelope
                .with_metadata("field", field)
                .with_metadata("value", value)
                .with_metadata("allowed", allowed.join(",")),
            ConfigSchemaError::InvalidLogLevel { directive } => envelope
                .with_metadata("field", "log.level")
                .with_metadata("directive", directive),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() -> Result<(), ConfigSchemaError> {
        let config = SortguardConfig::default().validate_and_normalize()?;
        assert_eq!(config.locale, Locale::En);
        assert_eq!(config.log.level, DEFAULT_LOG_LEVEL);
        assert_eq!(config.log.format, LogFormat::Text);
        Ok(())
    }

    #[test]
    fn rejects_unknown_version() {
        let config = SortguardConfig {
            version: 7,
            ..SortguardConfig::default()
        };
        assert_eq!(
            config.validate_and_normalize(),
            Err(ConfigSchemaError::UnsupportedVersion {
                found: 7,
                supported: CURRENT_CONFIG_VERSION
            })
        );
    }

    #[test]
    fn accepts_per_target_directives() -> Result<(), ConfigSchemaError> {
        let mut config = SortguardConfig::default();
        config.log.level = " INFO,sortguard::rules=debug ".to_owned();
        let validated = config.validate_and_normalize()?;
        assert_eq!(validated.log.level, "info,sortguard::rules=debug");
        Ok(())
    }

    #[test]
    fn rejects_bad_log_levels() {
        let mut config = SortguardConfig::default();
        config.log.level = "info,sortguard=loud".to_owned();
        assert_eq!(
            config.validate_and_normalize(),
            Err(ConfigSchemaError::InvalidLogLevel {
                directive: "sortguard=loud".to_owned()
            })
        );

        let mut blank = SortguardConfig::default();
        blank.log.level = "   ".to_owned();
        assert_eq!(
            blank.validate_and_normalize(),
            Err(ConfigSchemaError::EmptyField { field: "log.level" })
        );
    }

    #[test]
    fn default_target_is_normalized_and_checked() -> Result<(), ConfigSchemaError> {
        let config = SortguardConfig {
            default_target: Some(" Articles-Legacy ".to_owned()),
            ..SortguardConfig::default()
        };
        let validated = config.validate_and_normalize()?;
        assert_eq!(validated.default_target.as_deref(), Some("articles-legacy"));

        let bad = SortguardConfig {
            default_target: Some("my target".to_owned()),
            ..SortguardConfig::default()
        };
        assert!(matches!(
            bad.validate_and_normalize(),
            Err(ConfigSchemaError::InvalidField {
                field: "defaultTarget",
                ..
            })
        ));
        Ok(())
    }

    #[test]
    fn log_format_parses_case_insensitively() {
        assert_eq!("JSON".parse::<LogFormat>(), Ok(LogFormat::Json));
        assert!("yaml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn errors_convert_to_envelopes() {
        let envelope = ErrorEnvelope::from(ConfigSchemaError::EmptyField { field: "log.level" });
        assert_eq!(envelope.code, ErrorCode::new("config", "empty_field"));
        assert_eq!(
            envelope.metadata.get("field").map(String::as_str),
            Some("log.level")
        );
    }
}
