//! Sort-key mapping
//!
//! Translates a client `orderBy` expression such as `"name desc, age"` into
//! the backing-field orderings understood by storage, using the
//! [`MappingRegistry`].
//!
//! # Composition order
//!
//! Query APIs built from successive stable `order_by` applications make the
//! *last* applied key the primary one. The mapper therefore walks clauses, and
//! the backing fields of each clause, last-to-first: that walk is the
//! application order. [`resolve_order`] returns the same terms in precedence
//! order (primary key first), which is what [`apply_order`] consumes.
//!
//! [`apply_order`]: crate::storage::apply_order

use crate::core::error::FieldError;
use crate::core::mapping::MappingRegistry;
use serde::Serialize;
use std::fmt;

const DESCENDING_SUFFIX: &str = " desc";

/// One comma-separated segment of an order-by expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortClause {
    pub logical_name: String,
    pub descending: bool,
}

impl SortClause {
    /// Parse a single clause
    ///
    /// The clause is trimmed; it is descending when it ends with `" desc"`
    /// (exact, case-sensitive). The logical name is the text before the first
    /// space, or the whole trimmed clause.
    pub fn parse(segment: &str) -> Self {
        let trimmed = segment.trim();
        let descending = trimmed.ends_with(DESCENDING_SUFFIX);
        let logical_name = match trimmed.find(' ') {
            Some(idx) => &trimmed[..idx],
            None => trimmed,
        };

        Self {
            logical_name: logical_name.to_string(),
            descending,
        }
    }
}

/// A backing field and direction, ready for the storage layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedOrderTerm {
    pub backing_field: String,
    pub descending: bool,
}

impl ResolvedOrderTerm {
    pub fn new(backing_field: impl Into<String>, descending: bool) -> Self {
        Self {
            backing_field: backing_field.into(),
            descending,
        }
    }
}

impl fmt::Display for ResolvedOrderTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let direction = if self.descending {
            "descending"
        } else {
            "ascending"
        };
        write!(f, "{} {}", self.backing_field, direction)
    }
}

/// Parse an order-by expression into clauses, in the order written
pub fn parse_clauses(raw_expression: &str) -> Vec<SortClause> {
    if raw_expression.trim().is_empty() {
        return Vec::new();
    }
    raw_expression.split(',').map(SortClause::parse).collect()
}

/// Resolve an order-by expression in application order
///
/// Each term is meant to be applied as a fresh stable sort, the last one
/// becoming the primary key.
pub fn resolve_application_order(
    resource_kind: &str,
    raw_expression: &str,
    registry: &MappingRegistry,
) -> Result<Vec<ResolvedOrderTerm>, FieldError> {
    let clauses = parse_clauses(raw_expression);
    let mut terms = Vec::new();

    for clause in clauses.iter().rev() {
        let entry = registry.lookup(resource_kind, &clause.logical_name)?;
        let descending = clause.descending != entry.reverse_direction;

        for backing_field in entry.backing_fields.iter().rev() {
            terms.push(ResolvedOrderTerm::new(backing_field, descending));
        }
    }

    Ok(terms)
}

/// Resolve an order-by expression in precedence order (primary key first)
///
/// An empty expression yields no terms; the caller falls back to its
/// default ordering. Unknown logical names fail with
/// [`FieldError::UnknownField`]. Repeated clauses are kept as written.
pub fn resolve_order(
    resource_kind: &str,
    raw_expression: &str,
    registry: &MappingRegistry,
) -> Result<Vec<ResolvedOrderTerm>, FieldError> {
    let mut terms = resolve_application_order(resource_kind, raw_expression, registry)?;
    terms.reverse();

    tracing::debug!(
        resource_kind,
        order_by = raw_expression,
        terms = ?terms.iter().map(ToString::to_string).collect::<Vec<_>>(),
        "Resolved sort expression"
    );

    Ok(terms)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> MappingRegistry {
        let mut registry = MappingRegistry::new();
        registry
            .register("Author", "Id", vec!["Id".to_string()], false)
            .unwrap();
        registry
            .register(
                "Author",
                "Name",
                vec!["FirstName".to_string(), "LastName".to_string()],
                false,
            )
            .unwrap();
        registry
            .register("Author", "Age", vec!["DateOfBirth".to_string()], true)
            .unwrap();
        registry
            .register(
                "Author",
                "MainCategory",
                vec!["MainCategory".to_string()],
                false,
            )
            .unwrap();
        registry
    }

    #[test]
    fn test_parse_clause() {
        assert_eq!(
            SortClause::parse("  name desc "),
            SortClause {
                logical_name: "name".to_string(),
                descending: true
            }
        );
        assert_eq!(
            SortClause::parse("age asc"),
            SortClause {
                logical_name: "age".to_string(),
                descending: false
            }
        );
        assert_eq!(
            SortClause::parse("mainCategory"),
            SortClause {
                logical_name: "mainCategory".to_string(),
                descending: false
            }
        );
    }

    #[test]
    fn test_desc_token_is_case_sensitive() {
        assert!(!SortClause::parse("name DESC").descending);
    }

    #[test]
    fn test_empty_expression_yields_no_terms() {
        let registry = registry();
        assert!(resolve_order("Author", "", &registry).unwrap().is_empty());
        assert!(resolve_order("Author", "  ", &registry).unwrap().is_empty());
    }

    #[test]
    fn test_composite_field_descending() {
        let registry = registry();
        let terms = resolve_order("Author", "name desc", &registry).unwrap();
        assert_eq!(
            terms,
            vec![
                ResolvedOrderTerm::new("FirstName", true),
                ResolvedOrderTerm::new("LastName", true),
            ]
        );
    }

    #[test]
    fn test_application_order_is_reversed() {
        let registry = registry();
        let terms = resolve_application_order("Author", "name desc", &registry).unwrap();
        assert_eq!(
            terms,
            vec![
                ResolvedOrderTerm::new("LastName", true),
                ResolvedOrderTerm::new("FirstName", true),
            ]
        );
    }

    #[test]
    fn test_reverse_flag_flips_direction() {
        let registry = registry();
        assert_eq!(
            resolve_order("Author", "age", &registry).unwrap(),
            vec![ResolvedOrderTerm::new("DateOfBirth", true)]
        );
        assert_eq!(
            resolve_order("Author", "age desc", &registry).unwrap(),
            vec![ResolvedOrderTerm::new("DateOfBirth", false)]
        );
    }

    #[test]
    fn test_multi_clause_precedence() {
        let registry = registry();
        let terms = resolve_order("Author", "mainCategory, name desc", &registry).unwrap();
        assert_eq!(
            terms,
            vec![
                ResolvedOrderTerm::new("MainCategory", false),
                ResolvedOrderTerm::new("FirstName", true),
                ResolvedOrderTerm::new("LastName", true),
            ]
        );

        let terms = resolve_order("Author", "age,mainCategory", &registry).unwrap();
        assert_eq!(
            terms,
            vec![
                ResolvedOrderTerm::new("DateOfBirth", true),
                ResolvedOrderTerm::new("MainCategory", false),
            ]
        );
    }

    #[test]
    fn test_repeated_clauses_are_not_deduplicated() {
        let registry = registry();
        let terms = resolve_order("Author", "id, id desc", &registry).unwrap();
        assert_eq!(
            terms,
            vec![
                ResolvedOrderTerm::new("Id", false),
                ResolvedOrderTerm::new("Id", true),
            ]
        );
    }

    #[test]
    fn test_unknown_field_is_an_error() {
        let registry = registry();
        let err = resolve_order("Author", "name, height desc", &registry).unwrap_err();
        assert_eq!(
            err,
            FieldError::UnknownField {
                resource_kind: "Author".to_string(),
                field: "height".to_string(),
            }
        );
    }

    #[test]
    fn test_trailing_comma_is_an_error() {
        let registry = registry();
        assert!(resolve_order("Author", "name,", &registry).is_err());
    }

    #[test]
    fn test_term_display() {
        assert_eq!(
            ResolvedOrderTerm::new("FirstName", true).to_string(),
            "FirstName descending"
        );
    }
}
