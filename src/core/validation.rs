//! Field validation
//!
//! The validator is a fail-fast gate evaluated before any storage round trip:
//! a field list is either valid as a whole or rejected as a whole.

use crate::core::error::{FieldError, ShapeResult};
use crate::core::shape::Shapeable;

/// Check a comma-separated field list against a set of known field names
///
/// Blank input means "all fields" and is always valid. Otherwise every
/// trimmed token must match a known field, ignoring case.
pub fn validate<'a>(
    known_fields: impl IntoIterator<Item = &'a str> + Clone,
    requested: &str,
) -> bool {
    first_unknown_field(known_fields, requested).is_none()
}

/// Check a comma-separated field list against the declared fields of a type
pub fn type_has_fields<T: Shapeable>(requested: &str) -> bool {
    validate(T::field_names().iter().copied(), requested)
}

/// Like [`type_has_fields`], reporting the first offending token
pub fn require_fields<T: Shapeable>(requested: &str) -> ShapeResult<()> {
    match first_unknown_field(T::field_names().iter().copied(), requested) {
        None => Ok(()),
        Some(field) => {
            tracing::warn!(
                resource_kind = T::resource_kind(),
                field = %field,
                "Rejected unknown field in field list"
            );
            Err(FieldError::UnknownField {
                resource_kind: T::resource_kind().to_string(),
                field,
            }
            .into())
        }
    }
}

fn first_unknown_field<'a>(
    known_fields: impl IntoIterator<Item = &'a str> + Clone,
    requested: &str,
) -> Option<String> {
    if requested.trim().is_empty() {
        return None;
    }

    requested
        .split(',')
        .map(str::trim)
        .find(|token| {
            !known_fields
                .clone()
                .into_iter()
                .any(|known| known.eq_ignore_ascii_case(token))
        })
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::{FieldError, ShapeError};
    use crate::core::field::FieldValue;

    const KNOWN: [&str; 4] = ["id", "title", "description", "authorId"];

    #[test]
    fn test_blank_is_valid() {
        assert!(validate(KNOWN, ""));
        assert!(validate(KNOWN, "   "));
    }

    #[test]
    fn test_subset_is_valid() {
        assert!(validate(KNOWN, "title"));
        assert!(validate(KNOWN, "id, title ,authorid"));
        assert!(validate(KNOWN, "TITLE,Description"));
    }

    #[test]
    fn test_single_unknown_fails_whole_list() {
        assert!(!validate(KNOWN, "title,price"));
        assert!(!validate(KNOWN, "price"));
    }

    #[test]
    fn test_empty_token_fails() {
        assert!(!validate(KNOWN, "title,"));
        assert!(!validate(KNOWN, ",,"));
    }

    struct Course;

    impl Shapeable for Course {
        fn resource_kind() -> &'static str {
            "Course"
        }

        fn field_names() -> &'static [&'static str] {
            &KNOWN
        }

        fn field_value(&self, _field: &str) -> Option<FieldValue> {
            None
        }
    }

    #[test]
    fn test_type_has_fields() {
        assert!(type_has_fields::<Course>("title,authorId"));
        assert!(!type_has_fields::<Course>("title,author"));
    }

    #[test]
    fn test_require_fields_reports_first_unknown() {
        let err = require_fields::<Course>("title, price, cost").unwrap_err();
        match err {
            ShapeError::Field(FieldError::UnknownField {
                resource_kind,
                field,
            }) => {
                assert_eq!(resource_kind, "Course");
                assert_eq!(field, "price");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
