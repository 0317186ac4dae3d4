//! # sortguard-domain
//!
//! Field-tag parsing and allowed sort-value extraction.
//!
//! - **Tag settings** - `TagSettings`, the `key:value;...` parser
//! - **Naming** - `to_column_name`
//! - **Sort fields** - `FieldDescriptor`, `SortTarget`, `allowed_sort_values`
//!
//! ## Dependency Rules
//!
//! - No workspace dependencies
//! - Pure functions with no I/O or global state

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod naming;
pub mod sort_fields;
pub mod tag_settings;

pub use naming::to_column_name;
pub use sort_fields::{
    AllowedSortValues, FieldDescriptor, SORT_INTENT_DEFAULT, SORT_INTENT_DERIVED, SortFieldTable,
    SortIntent, SortTarget, allowed_sort_values, allowed_sort_values_of,
};
pub use tag_settings::{COLUMN_KEY, LogicalSegments, TAG_SEPARATOR, TagSettings};

/// Returns the domain crate version.
#[must_use]
pub const fn domain_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_crate_compiles() {
        let version = domain_crate_version();
        assert!(!version.is_empty());
    }
}
