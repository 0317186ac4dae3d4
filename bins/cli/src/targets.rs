//! Reference structs the CLI can validate sort values against.

use crate::error::CliError;
use sortguard_domain::{FieldDescriptor, SortFieldTable, SortTarget};
use sortguard_validate_derive::SortTarget;

/// Name used when neither `--target` nor the config picks one.
pub const DEFAULT_TARGET: &str = "articles";

/// Article table with the sort column mapped to `field_str1`.
#[expect(dead_code, reason = "reference rows are only read through their sort tags")]
#[derive(SortTarget)]
pub struct Articles {
    #[sort(intent = "Default", column = "column:field_str1")]
    field_str1: String,
    #[sort(intent = "-")]
    field_str2: String,
    #[sort(intent = "-")]
    field_str3: String,
    #[sort(intent = "str4")]
    field_str4: String,
    #[sort(intent = "str5")]
    field_str5: String,
}

/// Article table before the `field_str1` column was renamed.
#[expect(dead_code, reason = "reference rows are only read through their sort tags")]
#[derive(SortTarget)]
pub struct ArticlesLegacy {
    #[sort(intent = "Default", column = "column:field_str")]
    field_str1: String,
    #[sort(intent = "-")]
    field_str2: String,
    #[sort(intent = "-")]
    field_str3: String,
    #[sort(intent = "str4")]
    field_str4: String,
    #[sort(intent = "str5")]
    field_str5: String,
}

/// Comment table described by hand instead of derived.
pub struct Comments;

const COMMENT_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::new("CreatedAt")
        .with_sort("Default")
        .with_column("column:created_at;type:datetime"),
    FieldDescriptor::new("AuthorName").with_sort("-"),
    FieldDescriptor::new("Score").with_sort("score"),
    FieldDescriptor::new("Body"),
];

impl SortTarget for Comments {
    fn target_name() -> &'static str {
        "Comments"
    }

    fn sort_fields() -> &'static [FieldDescriptor] {
        COMMENT_FIELDS
    }
}

/// One named reference struct.
#[derive(Debug, Clone, Copy)]
pub struct TargetEntry {
    pub name: &'static str,
    pub table: SortFieldTable,
}

/// Name-to-table lookup for the CLI.
#[derive(Debug, Clone)]
pub struct TargetRegistry {
    entries: Vec<TargetEntry>,
}

impl TargetRegistry {
    /// Registry with every built-in reference struct.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            entries: vec![
                TargetEntry {
                    name: "articles",
                    table: SortFieldTable::of::<Articles>(),
                },
                TargetEntry {
                    name: "articles-legacy",
                    table: SortFieldTable::of::<ArticlesLegacy>(),
                },
                TargetEntry {
                    name: "comments",
                    table: SortFieldTable::of::<Comments>(),
                },
            ],
        }
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|entry| entry.name)
    }

    /// Look up a target by name, ignoring case and surrounding whitespace.
    pub fn get(&self, name: &str) -> Result<TargetEntry, CliError> {
        let wanted = name.trim().to_ascii_lowercase();
        self.entries
            .iter()
            .find(|entry| entry.name == wanted)
            .copied()
            .ok_or_else(|| {
                CliError::InvalidInput(format!(
                    "unknown target `{name}` (known: {})",
                    self.names().collect::<Vec<_>>().join(", ")
                ))
            })
    }
}

/// Target chosen by flag, then config, then [`DEFAULT_TARGET`].
pub fn resolve_target_name<'a>(flag: Option<&'a str>, configured: Option<&'a str>) -> &'a str {
    flag.or(configured).unwrap_or(DEFAULT_TARGET)
}
