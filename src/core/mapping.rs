//! Mapping registry relating logical resource fields to backing fields
//!
//! The registry is built once at process start from the declarative
//! `mappings` list of [`ShapingConfig`](crate::config::ShapingConfig) and is
//! read-only afterwards. All key comparisons are case-insensitive.

use crate::config::{MappingConfig, ShapingConfig};
use crate::core::error::{FieldError, MappingError};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

static GLOBAL_REGISTRY: OnceLock<Arc<MappingRegistry>> = OnceLock::new();

/// One logical field of a resource and the backing fields it expands to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingEntry {
    /// Client-facing name (e.g., "Name")
    pub logical_name: String,

    /// Backing fields in declaration order, never empty (e.g., ["FirstName", "LastName"])
    pub backing_fields: Vec<String>,

    /// Whether sorting on this field inverts the backing field's natural order
    pub reverse_direction: bool,
}

/// Mapping entries of a single resource kind
#[derive(Debug, Clone, Default)]
struct ResourceMapping {
    resource_kind: String,
    /// lowercase logical name -> entry, in registration order
    entries: IndexMap<String, MappingEntry>,
}

/// Process-wide table of logical-to-backing field mappings
///
/// # Example
///
/// ```rust,ignore
/// let mut registry = MappingRegistry::new();
/// registry.register("Author", "Name", vec!["FirstName".into(), "LastName".into()], false)?;
/// registry.register("Author", "Age", vec!["DateOfBirth".into()], true)?;
///
/// let entry = registry.lookup("author", "name")?;
/// assert_eq!(entry.backing_fields, vec!["FirstName", "LastName"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MappingRegistry {
    /// lowercase resource kind -> mapping
    resources: HashMap<String, ResourceMapping>,
}

impl MappingRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a declarative list of mappings
    ///
    /// Fails on the first duplicate or empty entry.
    pub fn from_mappings<'a>(
        mappings: impl IntoIterator<Item = &'a MappingConfig>,
    ) -> Result<Self, MappingError> {
        let mut registry = Self::new();
        for mapping in mappings {
            registry.register(
                &mapping.resource_kind,
                &mapping.logical_name,
                mapping.backing_fields.clone(),
                mapping.reverse,
            )?;
        }
        tracing::info!(
            resource_kinds = registry.resources.len(),
            "Mapping registry built"
        );
        Ok(registry)
    }

    /// Build a registry from the `mappings` section of a configuration
    pub fn from_config(config: &ShapingConfig) -> Result<Self, MappingError> {
        Self::from_mappings(&config.mappings)
    }

    /// Register one mapping entry
    pub fn register(
        &mut self,
        resource_kind: &str,
        logical_name: &str,
        backing_fields: Vec<String>,
        reverse: bool,
    ) -> Result<(), MappingError> {
        if backing_fields.is_empty() {
            return Err(MappingError::EmptyBackingFields {
                resource_kind: resource_kind.to_string(),
                logical_name: logical_name.to_string(),
            });
        }

        let resource = self
            .resources
            .entry(resource_kind.to_lowercase())
            .or_insert_with(|| ResourceMapping {
                resource_kind: resource_kind.to_string(),
                entries: IndexMap::new(),
            });

        let key = logical_name.to_lowercase();
        if resource.entries.contains_key(&key) {
            return Err(MappingError::DuplicateMapping {
                resource_kind: resource.resource_kind.clone(),
                logical_name: logical_name.to_string(),
            });
        }

        resource.entries.insert(
            key,
            MappingEntry {
                logical_name: logical_name.to_string(),
                backing_fields,
                reverse_direction: reverse,
            },
        );
        Ok(())
    }

    /// Look up the entry registered for a logical field name
    pub fn lookup(
        &self,
        resource_kind: &str,
        logical_name: &str,
    ) -> Result<&MappingEntry, FieldError> {
        let resource = self
            .resources
            .get(&resource_kind.to_lowercase())
            .ok_or_else(|| FieldError::UnknownResourceKind {
                resource_kind: resource_kind.to_string(),
            })?;

        resource
            .entries
            .get(&logical_name.to_lowercase())
            .ok_or_else(|| FieldError::UnknownField {
                resource_kind: resource.resource_kind.clone(),
                field: logical_name.to_string(),
            })
    }

    /// Whether any mapping is registered for the resource kind
    pub fn has_mapping(&self, resource_kind: &str) -> bool {
        self.resources.contains_key(&resource_kind.to_lowercase())
    }

    /// All entries of a resource kind, in registration order
    pub fn entries(&self, resource_kind: &str) -> impl Iterator<Item = &MappingEntry> {
        self.resources
            .get(&resource_kind.to_lowercase())
            .into_iter()
            .flat_map(|resource| resource.entries.values())
    }

    /// Check that every clause of an order-by expression names a registered field
    ///
    /// A blank expression is always valid. Direction tokens are ignored: the
    /// logical name is the text before the first space of each trimmed clause.
    pub fn valid_mapping_exists_for(&self, resource_kind: &str, order_by: &str) -> bool {
        if order_by.trim().is_empty() {
            return true;
        }
        if !self.has_mapping(resource_kind) {
            return false;
        }

        order_by.split(',').all(|clause| {
            let trimmed = clause.trim();
            let logical_name = trimmed.split(' ').next().unwrap_or_default();
            self.lookup(resource_kind, logical_name).is_ok()
        })
    }

    /// Install the process-wide registry
    ///
    /// Must be called once, before any request is served.
    pub fn install_global(
        registry: MappingRegistry,
    ) -> Result<Arc<MappingRegistry>, MappingError> {
        let registry = Arc::new(registry);
        GLOBAL_REGISTRY
            .set(registry.clone())
            .map_err(|_| MappingError::AlreadyInstalled)?;
        Ok(registry)
    }

    /// The process-wide registry, if installed
    pub fn global() -> Option<Arc<MappingRegistry>> {
        GLOBAL_REGISTRY.get().cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn author_registry() -> MappingRegistry {
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
    }

    #[test]
    fn test_lookup_returns_registered_entry() {
        let registry = author_registry();
        let entry = registry.lookup("Author", "Name").unwrap();
        assert_eq!(
            entry,
            &MappingEntry {
                logical_name: "Name".to_string(),
                backing_fields: vec!["FirstName".to_string(), "LastName".to_string()],
                reverse_direction: false,
            }
        );
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let registry = author_registry();
        assert!(registry.lookup("author", "AGE").is_ok());
        assert!(registry.lookup("AUTHOR", "name").is_ok());
    }

    #[test]
    fn test_lookup_unknown_field() {
        let registry = author_registry();
        let err = registry.lookup("Author", "Height").unwrap_err();
        assert_eq!(
            err,
            FieldError::UnknownField {
                resource_kind: "Author".to_string(),
                field: "Height".to_string(),
            }
        );
    }

    #[test]
    fn test_lookup_unknown_resource_kind() {
        let registry = author_registry();
        assert!(matches!(
            registry.lookup("Course", "Title"),
            Err(FieldError::UnknownResourceKind { .. })
        ));
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let mut registry = author_registry();
        let err = registry
            .register("author", "NAME", vec!["LastName".to_string()], false)
            .unwrap_err();
        assert!(matches!(err, MappingError::DuplicateMapping { .. }));
    }

    #[test]
    fn test_same_name_on_different_kinds() {
        let mut registry = author_registry();
        assert!(
            registry
                .register("Course", "Id", vec!["Id".to_string()], false)
                .is_ok()
        );
    }

    #[test]
    fn test_empty_backing_fields_rejected() {
        let mut registry = MappingRegistry::new();
        let err = registry
            .register("Author", "Nothing", vec![], false)
            .unwrap_err();
        assert!(matches!(err, MappingError::EmptyBackingFields { .. }));
        assert!(!registry.has_mapping("Author"));
    }

    #[test]
    fn test_has_mapping() {
        let registry = author_registry();
        assert!(registry.has_mapping("Author"));
        assert!(!registry.has_mapping("Course"));
    }

    #[test]
    fn test_entries_in_registration_order() {
        let registry = author_registry();
        let names: Vec<&str> = registry
            .entries("Author")
            .map(|e| e.logical_name.as_str())
            .collect();
        assert_eq!(names, vec!["Id", "Name", "Age"]);
        assert_eq!(registry.entries("Course").count(), 0);
    }

    #[test]
    fn test_valid_mapping_exists_for() {
        let registry = author_registry();
        assert!(registry.valid_mapping_exists_for("Author", ""));
        assert!(registry.valid_mapping_exists_for("Author", "   "));
        assert!(registry.valid_mapping_exists_for("Author", "name"));
        assert!(registry.valid_mapping_exists_for("Author", "name desc, age"));
        assert!(!registry.valid_mapping_exists_for("Author", "name, height desc"));
        assert!(!registry.valid_mapping_exists_for("Course", "title"));
    }

    #[test]
    fn test_from_config_default() {
        let registry = MappingRegistry::from_config(&ShapingConfig::default_config()).unwrap();
        assert!(registry.has_mapping("Author"));
        assert!(registry.has_mapping("Course"));
        assert!(registry.lookup("Course", "authorId").is_ok());
    }
}
