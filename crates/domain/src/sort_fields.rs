//! Allowed sort values derived from a reference struct's field tags.
//!
//! Each field of a reference struct carries an optional sort-intent tag and an
//! optional column tag. [`allowed_sort_values`] applies, per field and first
//! match wins:
//!
//! 1. intent `Default` with a non-empty `COLUMN` setting: the column value
//! 2. any other non-empty intent except `-`: the intent verbatim
//! 3. intent `-`: the field identifier converted with [`to_column_name`]
//! 4. otherwise the field is skipped
//!
//! Duplicate results are kept in order.

use crate::naming::to_column_name;
use crate::tag_settings::TagSettings;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// Sort intent selecting the column tag.
pub const SORT_INTENT_DEFAULT: &str = "Default";

/// Sort intent deriving the value from the field identifier.
pub const SORT_INTENT_DERIVED: &str = "-";

/// Tag metadata for one field of a reference struct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    /// Declared field identifier.
    pub name: &'static str,
    /// Sort-intent tag, if any.
    pub sort_tag: Option<&'static str>,
    /// Raw `;`-delimited column tag, if any.
    pub column_tag: Option<&'static str>,
}

impl FieldDescriptor {
    /// Descriptor for a field with no tags.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            sort_tag: None,
            column_tag: None,
        }
    }

    /// Attach a sort-intent tag.
    #[must_use]
    pub const fn with_sort(mut self, tag: &'static str) -> Self {
        self.sort_tag = Some(tag);
        self
    }

    /// Attach a column tag.
    #[must_use]
    pub const fn with_column(mut self, tag: &'static str) -> Self {
        self.column_tag = Some(tag);
        self
    }

    /// Classify the sort-intent tag.
    #[must_use]
    pub fn intent(&self) -> SortIntent<'static> {
        SortIntent::classify(self.sort_tag)
    }

    /// Resolve the allowed sort value contributed by this field.
    #[must_use]
    pub fn sort_value(&self) -> Option<String> {
        let intent = self.intent();
        if intent == SortIntent::Default {
            let settings = self.column_tag.map(TagSettings::parse_default);
            if let Some(column) = settings.as_ref().and_then(TagSettings::column) {
                return Some(column.to_owned());
            }
        }
        match intent {
            SortIntent::Custom(name) => Some(name.to_owned()),
            SortIntent::Derived => Some(to_column_name(self.name)),
            SortIntent::Default | SortIntent::Absent => None,
        }
    }
}

/// Classified sort-intent tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortIntent<'a> {
    /// No tag, or an empty one.
    Absent,
    /// `Default`: use the `COLUMN` setting of the column tag.
    Default,
    /// `-`: derive from the field identifier.
    Derived,
    /// Explicit sort name.
    Custom(&'a str),
}

impl<'a> SortIntent<'a> {
    /// Classify a raw tag value. Matching is exact and case-sensitive.
    #[must_use]
    pub fn classify(tag: Option<&'a str>) -> Self {
        match tag {
            None | Some("") => Self::Absent,
            Some(SORT_INTENT_DEFAULT) => Self::Default,
            Some(SORT_INTENT_DERIVED) => Self::Derived,
            Some(custom) => Self::Custom(custom),
        }
    }
}

/// Reference struct exposing its field tags.
///
/// Usually implemented with `#[derive(SortTarget)]`; a hand-written impl
/// returning a static descriptor table works the same way.
pub trait SortTarget {
    /// Name of the reference type.
    fn target_name() -> &'static str;

    /// Field descriptors in declaration order.
    fn sort_fields() -> &'static [FieldDescriptor];
}

/// Type-erased handle to a reference struct's descriptor table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SortFieldTable {
    /// Name of the reference type.
    pub name: &'static str,
    /// Field descriptors in declaration order.
    pub fields: &'static [FieldDescriptor],
}

impl SortFieldTable {
    /// Capture the table of a `SortTarget`.
    #[must_use]
    pub fn of<T: SortTarget>() -> Self {
        Self {
            name: T::target_name(),
            fields: T::sort_fields(),
        }
    }

    /// Compute the allowed sort values for this table.
    #[must_use]
    pub fn allowed_sort_values(&self) -> AllowedSortValues {
        allowed_sort_values(self.fields)
    }
}

/// Ordered allowed sort values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AllowedSortValues(Vec<String>);

impl AllowedSortValues {
    /// Returns true when `value` is one of the allowed values.
    #[must_use]
    pub fn contains(&self, value: &str) -> bool {
        self.0.iter().any(|allowed| allowed == value)
    }

    /// Number of values, counting duplicates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true when no field contributed a value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the values in field order.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Values that appear more than once, in order of first repetition.
    #[must_use]
    pub fn duplicates(&self) -> Vec<&str> {
        let mut seen = BTreeSet::new();
        let mut repeated = Vec::new();
        for value in &self.0 {
            let value = value.as_str();
            if !seen.insert(value) && !repeated.contains(&value) {
                repeated.push(value);
            }
        }
        repeated
    }

    /// Consume into the underlying values.
    #[must_use]
    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl fmt::Display for AllowedSortValues {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0.join(", "))
    }
}

impl FromIterator<String> for AllowedSortValues {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Compute allowed sort values for a descriptor table.
#[must_use]
pub fn allowed_sort_values(fields: &[FieldDescriptor]) -> AllowedSortValues {
    fields.iter().filter_map(FieldDescriptor::sort_value).collect()
}

/// Compute allowed sort values for a `SortTarget`.
#[must_use]
pub fn allowed_sort_values_of<T: SortTarget>() -> AllowedSortValues {
    allowed_sort_values(T::sort_fields())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(fields: &[FieldDescriptor]) -> Vec<String> {
        allowed_sort_values(fields).into_vec()
    }

    #[test]
    fn default_intent_uses_column() {
        let fields = [FieldDescriptor::new("FieldStr1")
            .with_sort("Default")
            .with_column("column:field_str1")];
        assert_eq!(values(&fields), vec!["field_str1"]);
    }

    #[test]
    fn derived_intent_converts_identifier() {
        let fields = [FieldDescriptor::new("FieldStr2").with_sort("-")];
        assert_eq!(values(&fields), vec!["field_str2"]);
    }

    #[test]
    fn custom_intent_ignores_column() {
        let fields = [FieldDescriptor::new("FieldStr4")
            .with_sort("custom_name")
            .with_column("column:ignored")];
        assert_eq!(values(&fields), vec!["custom_name"]);
    }

    #[test]
    fn default_without_column_is_skipped() {
        let fields = [
            FieldDescriptor::new("A").with_sort("Default"),
            FieldDescriptor::new("B")
                .with_sort("Default")
                .with_column("type:int"),
            FieldDescriptor::new("C")
                .with_sort("Default")
                .with_column("column:"),
        ];
        assert!(allowed_sort_values(&fields).is_empty());
    }

    #[test]
    fn absent_and_empty_intents_are_skipped() {
        let fields = [
            FieldDescriptor::new("Plain"),
            FieldDescriptor::new("Blank").with_sort(""),
            FieldDescriptor::new("ColumnOnly").with_column("column:only"),
        ];
        assert!(allowed_sort_values(&fields).is_empty());
    }

    #[test]
    fn intent_matching_is_case_sensitive() {
        let fields = [FieldDescriptor::new("Field")
            .with_sort("default")
            .with_column("column:field")];
        assert_eq!(values(&fields), vec!["default"]);
    }

    #[test]
    fn keeps_field_order_and_duplicates() {
        let fields = [
            FieldDescriptor::new("FieldStr1")
                .with_sort("Default")
                .with_column("column:field_str2"),
            FieldDescriptor::new("FieldStr2").with_sort("-"),
            FieldDescriptor::new("Other").with_sort("str5"),
        ];
        let allowed = allowed_sort_values(&fields);
        assert_eq!(allowed.as_slice(), ["field_str2", "field_str2", "str5"]);
        assert_eq!(allowed.duplicates(), vec!["field_str2"]);
        assert_eq!(allowed.to_string(), "field_str2, field_str2, str5");
    }

    #[test]
    fn classify_covers_all_intents() {
        assert_eq!(SortIntent::classify(None), SortIntent::Absent);
        assert_eq!(SortIntent::classify(Some("")), SortIntent::Absent);
        assert_eq!(SortIntent::classify(Some("Default")), SortIntent::Default);
        assert_eq!(SortIntent::classify(Some("-")), SortIntent::Derived);
        assert_eq!(
            SortIntent::classify(Some("str4")),
            SortIntent::Custom("str4")
        );
    }
}
