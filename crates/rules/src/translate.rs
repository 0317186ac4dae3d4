//! Locales and message templates.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported message locales.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// English.
    #[default]
    En,
    /// Simplified Chinese.
    Zh,
}

impl Locale {
    /// All supported locales.
    pub const ALL: [Self; 2] = [Self::En, Self::Zh];

    /// Stable identifier (`en`, `zh`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Zh => "zh",
        }
    }

    /// Message printed when a candidate passes validation.
    #[must_use]
    pub const fn validation_passed(self) -> &'static str {
        match self {
            Self::En => "validation passed",
            Self::Zh => "验证通过",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Unknown locale identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLocale(pub String);

impl fmt::Display for UnknownLocale {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "unknown locale `{}` (expected en or zh)", self.0)
    }
}

impl std::error::Error for UnknownLocale {}

impl FromStr for Locale {
    type Err = UnknownLocale;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_ascii_lowercase().as_str() {
            "en" | "en-us" | "en_us" => Ok(Self::En),
            "zh" | "zh-cn" | "zh_cn" => Ok(Self::Zh),
            _ => Err(UnknownLocale(input.to_owned())),
        }
    }
}

/// Message template with positional `{N}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    text: Box<str>,
}

impl Template {
    /// Wrap template text.
    #[must_use]
    pub fn new(text: impl Into<Box<str>>) -> Self {
        Self { text: text.into() }
    }

    /// Raw template text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns true when the template references placeholder `index`.
    #[must_use]
    pub fn has_placeholder(&self, index: usize) -> bool {
        self.text.contains(&format!("{{{index}}}"))
    }

    /// Substitute `{N}` with `params[N]` in a single pass.
    ///
    /// Placeholders without a matching param and unterminated braces are
    /// kept verbatim.
    #[must_use]
    pub fn render(&self, params: &[&str]) -> String {
        let mut output = String::with_capacity(self.text.len());
        let mut rest = &*self.text;
        while let Some(open) = rest.find('{') {
            let (literal, tail) = rest.split_at(open);
            output.push_str(literal);
            let substituted = tail.find('}').and_then(|close| {
                let index: usize = tail.get(1..close)?.parse().ok()?;
                let param = params.get(index)?;
                Some((param, close))
            });
            match substituted {
                Some((param, close)) => {
                    output.push_str(param);
                    rest = tail.get(close + 1..).unwrap_or_default();
                },
                None => {
                    output.push('{');
                    rest = tail.get(1..).unwrap_or_default();
                },
            }
        }
        output.push_str(rest);
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_locale_aliases() {
        assert_eq!("zh".parse::<Locale>(), Ok(Locale::Zh));
        assert_eq!(" EN ".parse::<Locale>(), Ok(Locale::En));
        assert_eq!("zh-CN".parse::<Locale>(), Ok(Locale::Zh));
        assert!("fr".parse::<Locale>().is_err());
    }

    #[test]
    fn renders_positional_params() {
        let template = Template::new("{0}的值{1}必须是{2}中的一个");
        assert_eq!(
            template.render(&["SortField", "bogus", "a, b"]),
            "SortField的值bogus必须是a, b中的一个"
        );
    }

    #[test]
    fn params_are_not_rescanned() {
        let template = Template::new("{0} / {1}");
        assert_eq!(template.render(&["{1}", "x"]), "{1} / x");
    }

    #[test]
    fn unknown_placeholders_stay_verbatim() {
        let template = Template::new("{0} {5} {x} {");
        assert_eq!(template.render(&["a"]), "a {5} {x} {");
    }

    #[test]
    fn detects_placeholders() {
        let template = Template::new("{0} must be one of [{2}]");
        assert!(template.has_placeholder(0));
        assert!(!template.has_placeholder(1));
        assert!(template.has_placeholder(2));
    }
}
