//! Environment variable parsing and env-to-config merging.
//!
//! Env parsing is strict: a variable that is present but blank or
//! unparseable fails instead of being ignored.

use crate::schema::{ConfigSchemaError, LogFormat, SortguardConfig, ValidatedSortguardConfig};
use sortguard_rules::Locale;
use sortguard_shared::{ErrorCode, ErrorEnvelope};
use std::collections::BTreeMap;
use std::fmt;

/// Env var: message locale.
pub const ENV_LOCALE: &str = "SORTGUARD_LOCALE";
/// Env var: log filter directives.
pub const ENV_LOG_LEVEL: &str = "SORTGUARD_LOG_LEVEL";
/// Env var: log output format.
pub const ENV_LOG_FORMAT: &str = "SORTGUARD_LOG_FORMAT";
/// Env var: default reference target.
pub const ENV_DEFAULT_TARGET: &str = "SORTGUARD_DEFAULT_TARGET";

const ALL_ENV_VARS: [&str; 4] = [ENV_LOCALE, ENV_LOG_LEVEL, ENV_LOG_FORMAT, ENV_DEFAULT_TARGET];

/// Env overrides, parsed but not yet merged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortguardEnv {
    /// Locale override.
    pub locale: Option<Locale>,
    /// Log filter override.
    pub log_level: Option<String>,
    /// Log format override.
    pub log_format: Option<LogFormat>,
    /// Default target override.
    pub default_target: Option<String>,
}

impl SortguardEnv {
    /// Parse overrides from an explicit map.
    pub fn from_map(map: &BTreeMap<String, String>) -> Result<Self, EnvParseError> {
        Ok(Self {
            locale: parse_optional(map, ENV_LOCALE, |value| value.parse::<Locale>().ok())?,
            log_level: parse_optional_trimmed(map, ENV_LOG_LEVEL)?,
            log_format: parse_optional(map, ENV_LOG_FORMAT, |value| {
                value.parse::<LogFormat>().ok()
            })?,
            default_target: parse_optional_trimmed(map, ENV_DEFAULT_TARGET)?,
        })
    }

    /// Parse overrides from the process environment.
    pub fn from_std_env() -> Result<Self, EnvParseError> {
        let mut map = BTreeMap::new();
        for name in ALL_ENV_VARS {
            if let Ok(value) = std::env::var(name) {
                map.insert(name.to_owned(), value);
            }
        }
        Self::from_map(&map)
    }

    /// Returns true when no override is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.locale.is_none()
            && self.log_level.is_none()
            && self.log_format.is_none()
            && self.default_target.is_none()
    }
}

/// Apply env overrides on top of `config`, then validate the result.
pub fn apply_env_overrides(
    mut config: SortguardConfig,
    env: &SortguardEnv,
) -> Result<ValidatedSortguardConfig, ConfigSchemaError> {
    if let Some(locale) = env.locale {
        config.locale = locale;
    }
    if let Some(level) = env.log_level.as_ref() {
        config.log.level.clone_from(level);
    }
    if let Some(format) = env.log_format {
        config.log.format = format;
    }
    if let Some(target) = env.default_target.as_ref() {
        config.default_target = Some(target.clone());
    }
    config.validate_and_normalize()
}

fn parse_optional_trimmed(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<String>, EnvParseError> {
    let Some(raw) = map.get(var) else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(EnvParseError::EmptyValue { var });
    }
    Ok(Some(trimmed.to_owned()))
}

fn parse_optional<T>(
    map: &BTreeMap<String, String>,
    var: &'static str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<Option<T>, EnvParseError> {
    let Some(value) = parse_optional_trimmed(map, var)? else {
        return Ok(None);
    };
    parse(&value)
        .map(Some)
        .ok_or(EnvParseError::InvalidEnum { var, value })
}

/// Env parsing failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvParseError {
    /// An env var was present but empty after trimming.
    EmptyValue {
        /// Env var name.
        var: &'static str,
    },
    /// Enum env var had an invalid value.
    InvalidEnum {
        /// Env var name.
        var: &'static str,
        /// Raw input value.
        value: String,
    },
}

impl fmt::Display for EnvParseError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyValue { var } => write!(formatter, "{var} must be non-empty"),
            Self::InvalidEnum { var, value } => {
                write!(formatter, "{var} has an unsupported value `{value}`")
            },
        }
    }
}

impl std::error::Error for EnvParseError {}

impl From<EnvParseError> for ErrorEnvelope {
    fn from(error: EnvParseError) -> Self {
        let message = error.to_string();
        match error {
            EnvParseError::EmptyValue { var } => {
                Self::expected(ErrorCode::new("config", "env_empty_value"), message)
                    .with_metadata("var", var)
            },
            EnvParseError::InvalidEnum { var, value } => {
                Self::expected(ErrorCode::new("config", "env_invalid_value"), message)
                    .with_metadata("var", var)
                    .with_metadata("value", value)
            },
        }
    }
}
