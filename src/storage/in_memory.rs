//! In-memory implementation of ResourceStore for testing and development

use crate::storage::{Record, RecordFilter, ResourceStore};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// In-memory, insertion-ordered resource store
///
/// Useful for testing and development. Uses RwLock for thread-safe access.
#[derive(Clone)]
pub struct InMemoryStore<T> {
    items: Arc<RwLock<Vec<T>>>,
}

impl<T: Record> InMemoryStore<T> {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            items: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Create a store holding the given records
    pub fn with_items(items: impl IntoIterator<Item = T>) -> Self {
        Self {
            items: Arc::new(RwLock::new(items.into_iter().collect())),
        }
    }
}

impl<T: Record> Default for InMemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Record> ResourceStore<T> for InMemoryStore<T> {
    async fn get(&self, id: &Uuid) -> Result<Option<T>> {
        let items = self
            .items
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(items.iter().find(|item| item.id() == *id).cloned())
    }

    async fn list(&self) -> Result<Vec<T>> {
        let items = self
            .items
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(items.clone())
    }

    async fn find(&self, filter: RecordFilter<'_, T>) -> Result<Vec<T>> {
        let items = self
            .items
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(items.iter().filter(|item| filter(*item)).cloned().collect())
    }

    async fn insert(&self, item: T) -> Result<T> {
        let mut items = self
            .items
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        match items.iter_mut().find(|existing| existing.id() == item.id()) {
            Some(existing) => *existing = item.clone(),
            None => items.push(item.clone()),
        }

        Ok(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::field::FieldValue;
    use crate::core::sort::ResolvedOrderTerm;

    #[derive(Debug, Clone, PartialEq)]
    struct Tag {
        id: Uuid,
        label: String,
    }

    crate::impl_record!(Tag, {
        "Id" => id,
        "Label" => label,
    });

    fn tag(label: &str) -> Tag {
        Tag {
            id: Uuid::new_v4(),
            label: label.to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let store = InMemoryStore::new();
        let created = store.insert(tag("rust")).await.unwrap();

        let fetched = store.get(&created.id).await.unwrap();
        assert_eq!(fetched, Some(created));
        assert_eq!(store.get(&Uuid::new_v4()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_insert_replaces_same_id() {
        let store = InMemoryStore::new();
        let mut item = store.insert(tag("rust")).await.unwrap();
        item.label = "axum".to_string();
        store.insert(item.clone()).await.unwrap();

        let all = store.list().await.unwrap();
        assert_eq!(all, vec![item]);
    }

    #[tokio::test]
    async fn test_find_keeps_insertion_order() {
        let store = InMemoryStore::with_items(vec![tag("b"), tag("a"), tag("bb")]);
        let found = store
            .find(&|t: &Tag| t.label.starts_with('b'))
            .await
            .unwrap();
        let labels: Vec<&str> = found.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["b", "bb"]);
    }

    #[tokio::test]
    async fn test_page_filters_orders_and_slices() {
        let store = InMemoryStore::with_items(["e", "c", "a", "d", "b"].map(tag));
        let page = store
            .page(&|_: &Tag| true, &[ResolvedOrderTerm::new("label", true)], 2, 2)
            .await
            .unwrap();

        let labels: Vec<&str> = page.items.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["c", "b"]);
        assert_eq!(page.total_count, 5);
        assert_eq!(page.total_pages, 3);
        assert!(page.has_next());
        assert!(page.has_previous());
    }

    #[test]
    fn test_backing_value_is_case_insensitive() {
        use crate::storage::Sortable;
        let item = tag("rust");
        assert_eq!(item.backing_value("LABEL"), Some(FieldValue::from("rust")));
        assert_eq!(item.backing_value("colour"), None);
    }
}
