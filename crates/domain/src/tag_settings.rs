//! Parser for `key:value;key:value` field tag settings.
//!
//! Parsing runs in two stages so escaping stays auditable:
//!
//! 1. [`LogicalSegments`] splits on the separator and folds a segment that
//!    ends in `\` into the next one (the backslash is dropped and the
//!    separator restored).
//! 2. Each logical segment is split once on `:` into an uppercased key and a
//!    raw value. A key without a value maps to itself.
//!
//! Parsing never fails. Empty keys are dropped and later keys overwrite
//! earlier ones.

use serde::Serialize;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::collections::btree_map;

/// Default separator between tag settings.
pub const TAG_SEPARATOR: char = ';';

/// Setting key naming the storage column.
pub const COLUMN_KEY: &str = "COLUMN";

const ESCAPE: char = '\\';

/// Parsed tag settings keyed by uppercased, trimmed key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TagSettings {
    entries: BTreeMap<String, String>,
}

impl TagSettings {
    /// Parse a raw tag string using `separator` between settings.
    #[must_use]
    pub fn parse(raw: &str, separator: char) -> Self {
        let mut entries = BTreeMap::new();
        for segment in LogicalSegments::new(raw, separator) {
            let (key, value) = match segment.split_once(':') {
                Some((key, value)) => (normalize_key(key), value.to_owned()),
                None => {
                    let key = normalize_key(&segment);
                    let value = key.clone();
                    (key, value)
                },
            };
            if key.is_empty() {
                continue;
            }
            entries.insert(key, value);
        }
        Self { entries }
    }

    /// Parse with the default `;` separator.
    #[must_use]
    pub fn parse_default(raw: &str) -> Self {
        Self::parse(raw, TAG_SEPARATOR)
    }

    /// Look up a setting by key. Keys are matched after uppercasing.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(&normalize_key(key)).map(String::as_str)
    }

    /// The non-empty `COLUMN` value, if present.
    #[must_use]
    pub fn column(&self) -> Option<&str> {
        self.entries
            .get(COLUMN_KEY)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    /// Number of parsed settings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when nothing was parsed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate settings in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, String> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a TagSettings {
    type Item = (&'a String, &'a String);
    type IntoIter = btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn normalize_key(raw: &str) -> String {
    raw.to_uppercase().trim().to_owned()
}

/// Segments of a tag string after escaped separators are folded back in.
#[derive(Debug, Clone)]
pub struct LogicalSegments<'a> {
    parts: std::str::Split<'a, char>,
    separator: char,
}

impl<'a> LogicalSegments<'a> {
    /// Start splitting `raw` on `separator`.
    #[must_use]
    pub fn new(raw: &'a str, separator: char) -> Self {
        Self {
            parts: raw.split(separator),
            separator,
        }
    }
}

impl<'a> Iterator for LogicalSegments<'a> {
    type Item = Cow<'a, str>;

    fn next(&mut self) -> Option<Self::Item> {
        let first = self.parts.next()?;
        let Some(open) = first.strip_suffix(ESCAPE) else {
            return Some(Cow::Borrowed(first));
        };

        let mut joined = open.to_owned();
        for part in self.parts.by_ref() {
            joined.push(self.separator);
            match part.strip_suffix(ESCAPE) {
                Some(still_open) => joined.push_str(still_open),
                None => {
                    joined.push_str(part);
                    return Some(Cow::Owned(joined));
                },
            }
        }
        // Escape on the final segment: nothing left to join.
        Some(Cow::Owned(joined))
    }
}
