//! Field projection ("data shaping")
//!
//! A [`Shapeable`] type declares its public output fields in a fixed order.
//! Given a comma-separated field list, the projector resolves each token to a
//! declared field once, then copies the selected values out of each source
//! object into an insertion-ordered [`ShapedRecord`].

use crate::core::error::{ShapeError, ShapeResult};
use crate::core::field::FieldValue;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// An output type whose fields can be selected by name
///
/// Implemented through [`impl_shapeable!`](crate::impl_shapeable) for the
/// resource projections.
pub trait Shapeable {
    /// Resource kind used in error messages (e.g., "Author")
    fn resource_kind() -> &'static str;

    /// Public output fields, in declaration order
    fn field_names() -> &'static [&'static str];

    /// Value of a declared field; `field` must be one of [`Self::field_names`]
    fn field_value(&self, field: &str) -> Option<FieldValue>;

    /// Resolve a client-supplied name to the declared field name
    fn resolve_field(name: &str) -> Option<&'static str> {
        Self::field_names()
            .iter()
            .copied()
            .find(|declared| declared.eq_ignore_ascii_case(name))
    }

    /// The identifier field, kept in every shaped record
    fn identifier_field() -> Option<&'static str> {
        Self::resolve_field("id")
    }
}

/// An ordered mapping from field name to value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShapedRecord(IndexMap<String, FieldValue>);

impl ShapedRecord {
    /// Create a new empty record
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Append a field, replacing any previous value under the same name
    pub fn insert(&mut self, field: impl Into<String>, value: FieldValue) {
        self.0.insert(field.into(), value);
    }

    /// Get a field value by its exact name
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.0.get(field)
    }

    /// Field names, in order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Fields and values, in order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Convert into a JSON object, preserving field order
    pub fn into_json(self) -> ShapeResult<serde_json::Map<String, serde_json::Value>> {
        self.0
            .into_iter()
            .map(|(field, value)| {
                let value = serde_json::to_value(value).map_err(|e| {
                    tracing::error!(field = %field, error = %e, "Failed to serialize field value");
                    ShapeError::Internal(format!("Field '{}' could not be serialized: {}", field, e))
                })?;
                Ok((field, value))
            })
            .collect()
    }
}

/// The resolved set of fields to copy out of a source type
///
/// Resolution happens once per request; the selection is then applied to
/// every source object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSelection {
    fields: Vec<&'static str>,
}

impl FieldSelection {
    /// Resolve a comma-separated field list against a shapeable type
    ///
    /// A blank list selects every declared field. A token that matches no
    /// field is a contract breach: the field validator must have rejected it
    /// before the storage query ran.
    pub fn resolve<T: Shapeable>(requested: &str) -> ShapeResult<Self> {
        if requested.trim().is_empty() {
            return Ok(Self {
                fields: T::field_names().to_vec(),
            });
        }

        let mut fields = Vec::new();
        for token in requested.split(',') {
            let name = token.trim();
            let Some(declared) = T::resolve_field(name) else {
                tracing::error!(
                    resource_kind = T::resource_kind(),
                    field = name,
                    "Projector reached a field the validator should have rejected"
                );
                return Err(ShapeError::Internal(format!(
                    "Field '{}' wasn't found on {}",
                    name,
                    T::resource_kind()
                )));
            };
            fields.push(declared);
        }

        if let Some(id) = T::identifier_field() {
            if !fields.contains(&id) {
                fields.insert(0, id);
            }
        }

        Ok(Self { fields })
    }

    /// Selected field names, in output order
    pub fn fields(&self) -> &[&'static str] {
        &self.fields
    }

    /// Copy the selected fields out of a source object
    pub fn apply<T: Shapeable>(&self, source: &T) -> ShapedRecord {
        let mut record = ShapedRecord::new();
        for field in &self.fields {
            let value = source.field_value(field).unwrap_or(FieldValue::Null);
            record.insert(*field, value);
        }
        record
    }
}

/// Lazy sequence of shaped records over a source sequence
///
/// Yields one record per source item, in source order. Consuming the
/// iterator consumes the source; it cannot be restarted.
pub struct ShapedRecords<I> {
    source: I,
    selection: FieldSelection,
}

impl<'a, T, I> Iterator for ShapedRecords<I>
where
    T: Shapeable + 'a,
    I: Iterator<Item = &'a T>,
{
    type Item = ShapedRecord;

    fn next(&mut self) -> Option<Self::Item> {
        self.source.next().map(|item| self.selection.apply(item))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.source.size_hint()
    }
}

/// Shape a single object
pub fn shape<T: Shapeable>(source: &T, requested: &str) -> ShapeResult<ShapedRecord> {
    let selection = FieldSelection::resolve::<T>(requested)?;
    Ok(selection.apply(source))
}

/// Shape every element of a sequence, lazily
///
/// Field resolution happens eagerly so that a contract breach is reported
/// before any record is produced.
pub fn shape_all<'a, T, I>(
    source: I,
    requested: &str,
) -> ShapeResult<ShapedRecords<I::IntoIter>>
where
    T: Shapeable + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let selection = FieldSelection::resolve::<T>(requested)?;
    Ok(ShapedRecords {
        source: source.into_iter(),
        selection,
    })
}
