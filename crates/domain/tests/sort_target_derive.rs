//! Integration coverage for the `SortTarget` and `Validate` derives.

use sortguard_domain::{FieldDescriptor, SortTarget, allowed_sort_values_of};
use sortguard_shared::{Validate, ValidationError};

#[allow(dead_code, reason = "reference structs are only read through their tags")]
#[derive(sortguard_validate_derive::SortTarget)]
struct ArticleColumns {
    #[sort(intent = "Default", column = "column:field_str1")]
    field_str1: String,
    #[sort(intent = "-")]
    field_str2: String,
    #[sort(intent = "-")]
    field_str3: String,
    #[sort(intent = "str4")]
    field_str4: String,
    #[sort(intent = "str5", column = "column:ignored")]
    field_str5: String,
    untagged: u64,
}

#[allow(dead_code, reason = "reference structs are only read through their tags")]
#[derive(sortguard_validate_derive::SortTarget)]
struct Untagged {
    id: u64,
}

#[derive(Debug, PartialEq, Eq)]
enum SortRequestError {
    Empty(&'static str),
    NotOneOf {
        field: &'static str,
        value: String,
        allowed: Vec<String>,
    },
    Other,
}

impl ValidationError for SortRequestError {
    fn empty(field: &'static str) -> Self {
        Self::Empty(field)
    }

    fn invalid(_field: &'static str, _reason: &'static str) -> Self {
        Self::Other
    }

    fn not_one_of(field: &'static str, value: String, allowed: Vec<String>) -> Self {
        Self::NotOneOf {
            field,
            value,
            allowed,
        }
    }
}

#[derive(Debug, sortguard_validate_derive::Validate)]
#[validate(error = "SortRequestError")]
struct ListArticlesRequest {
    #[validate(field = "sortField", non_empty, sort_field(target = "ArticleColumns"))]
    sort_field: String,
    #[validate(field = "thenBy", sort_field(target = "ArticleColumns"))]
    then_by: Option<String>,
}

fn request(sort_field: &str, then_by: Option<&str>) -> ListArticlesRequest {
    ListArticlesRequest {
        sort_field: sort_field.to_owned(),
        then_by: then_by.map(str::to_owned),
    }
}

#[test]
fn derive_emits_descriptors_in_declaration_order() {
    let fields = ArticleColumns::sort_fields();
    assert_eq!(ArticleColumns::target_name(), "ArticleColumns");
    assert_eq!(fields.len(), 6);
    assert_eq!(
        fields.first(),
        Some(
            &FieldDescriptor::new("field_str1")
                .with_sort("Default")
                .with_column("column:field_str1")
        )
    );
    assert_eq!(fields.last(), Some(&FieldDescriptor::new("untagged")));
}

#[test]
fn derive_feeds_the_extractor() {
    let allowed = allowed_sort_values_of::<ArticleColumns>();
    assert_eq!(
        allowed.as_slice(),
        ["field_str1", "field_str2", "field_str3", "str4", "str5"]
    );
    assert!(allowed_sort_values_of::<Untagged>().is_empty());
}

#[test]
fn sort_field_accepts_allowed_values() {
    assert_eq!(request("field_str1", None).validate(), Ok(()));
    assert_eq!(request("str5", Some("field_str3")).validate(), Ok(()));
}

#[test]
fn sort_field_rejects_unknown_values_with_allowed_set() {
    let result = request("bogus", None).validate();
    assert_eq!(
        result,
        Err(SortRequestError::NotOneOf {
            field: "sortField",
            value: "bogus".to_owned(),
            allowed: vec![
                "field_str1".to_owned(),
                "field_str2".to_owned(),
                "field_str3".to_owned(),
                "str4".to_owned(),
                "str5".to_owned(),
            ],
        })
    );
}

#[test]
fn sort_field_checks_optional_fields_when_present() {
    let result = request("str4", Some("FieldStr2")).validate();
    assert!(matches!(
        result,
        Err(SortRequestError::NotOneOf { field: "thenBy", .. })
    ));
}

#[test]
fn non_empty_runs_before_sort_field() {
    assert_eq!(
        request("  ", None).validate(),
        Err(SortRequestError::Empty("sortField"))
    );
}
