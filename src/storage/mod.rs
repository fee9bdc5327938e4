//! Storage collaborators
//!
//! The engine never touches storage directly: handlers resolve an order-by
//! expression into [`ResolvedOrderTerm`]s and hand them to a
//! [`ResourceStore`], which applies them with [`apply_order`].

pub mod in_memory;

pub use in_memory::InMemoryStore;

use crate::core::field::FieldValue;
use crate::core::query::PagedList;
use crate::core::sort::ResolvedOrderTerm;
use anyhow::Result;
use async_trait::async_trait;
use std::cmp::Ordering;
use uuid::Uuid;

/// Access to backing field values by name
pub trait Sortable {
    /// Value of a backing field, matched case-insensitively
    fn backing_value(&self, field: &str) -> Option<FieldValue>;
}

/// A stored backing entity
pub trait Record: Sortable + Clone + Send + Sync + 'static {
    fn id(&self) -> Uuid;
}

/// Predicate selecting records of a collection query
pub type RecordFilter<'a, T> = &'a (dyn Fn(&T) -> bool + Send + Sync);

/// Sort items by resolved terms, first term primary
///
/// The sort is stable: items equal under every term keep their relative
/// order. A backing field the item does not expose compares as null.
pub fn apply_order<T: Sortable>(items: &mut [T], terms: &[ResolvedOrderTerm]) {
    if terms.is_empty() {
        return;
    }

    items.sort_by(|a, b| {
        for term in terms {
            let left = a.backing_value(&term.backing_field).unwrap_or(FieldValue::Null);
            let right = b.backing_value(&term.backing_field).unwrap_or(FieldValue::Null);
            let ordering = if term.descending {
                right.compare(&left)
            } else {
                left.compare(&right)
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    });
}

/// Read access to a collection of backing entities
#[async_trait]
pub trait ResourceStore<T: Record>: Send + Sync {
    /// Get a record by id
    async fn get(&self, id: &Uuid) -> Result<Option<T>>;

    /// All records, in insertion order
    async fn list(&self) -> Result<Vec<T>>;

    /// Records matching a filter, in insertion order
    async fn find(&self, filter: RecordFilter<'_, T>) -> Result<Vec<T>>;

    /// Insert a record, replacing any record with the same id
    async fn insert(&self, item: T) -> Result<T>;

    /// Filter, order and slice one page
    async fn page(
        &self,
        filter: RecordFilter<'_, T>,
        terms: &[ResolvedOrderTerm],
        page_number: usize,
        page_size: usize,
    ) -> Result<PagedList<T>> {
        let mut items = self.find(filter).await?;
        apply_order(&mut items, terms);
        Ok(PagedList::create(items, page_number, page_size))
    }
}
