//! Resource query parameters and pagination utilities

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Largest page a client may request
pub const MAX_PAGE_SIZE: usize = 25;

/// Collection query parameters
///
/// Extracted from camelCase query strings. Every parameter has a default.
///
/// # Example
/// ```rust,ignore
/// pub async fn list_authors(
///     Query(params): Query<ResourceParameters>,
/// ) -> Response {
///     // params.page_number() defaults to 1
///     // params.page_size() defaults to 10, never more than 25
/// }
///
/// // Usage:
/// GET /api/authors?pageNumber=2&pageSize=5
/// GET /api/authors?orderBy=age desc,name&fields=id,name
/// GET /api/authors?mainCategory=Rum&searchQuery=an
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResourceParameters {
    /// Exact category filter
    pub main_category: Option<String>,

    /// Substring search
    pub search_query: Option<String>,

    /// Page number (starts at 1)
    pub page_number: usize,

    /// Requested page size, clamped by [`ResourceParameters::page_size`]
    pub page_size: usize,

    /// Order-by expression over logical field names
    ///
    /// # Format
    /// Comma-separated clauses, each `name` or `name desc`
    pub order_by: String,

    /// Comma-separated field list; blank means every field
    pub fields: Option<String>,
}

impl Default for ResourceParameters {
    fn default() -> Self {
        Self {
            main_category: None,
            search_query: None,
            page_number: 1,
            page_size: 10,
            order_by: "name".to_string(),
            fields: None,
        }
    }
}

impl ResourceParameters {
    /// Get page number, ensuring minimum of 1
    pub fn page_number(&self) -> usize {
        self.page_number.max(1)
    }

    /// Get page size, between 1 and [`MAX_PAGE_SIZE`]
    pub fn page_size(&self) -> usize {
        self.page_size.clamp(1, MAX_PAGE_SIZE)
    }

    /// The field list, empty when absent
    pub fn fields(&self) -> &str {
        self.fields.as_deref().unwrap_or_default()
    }

    /// The parameter set re-encoded by collection links
    ///
    /// Insertion order is stable; absent optional values are omitted.
    pub fn to_query_pairs(&self) -> IndexMap<String, String> {
        let mut pairs = IndexMap::new();
        if let Some(fields) = self.fields.as_deref().filter(|f| !f.trim().is_empty()) {
            pairs.insert("fields".to_string(), fields.to_string());
        }
        pairs.insert("orderBy".to_string(), self.order_by.clone());
        pairs.insert("pageNumber".to_string(), self.page_number().to_string());
        pairs.insert("pageSize".to_string(), self.page_size().to_string());
        if let Some(category) = &self.main_category {
            pairs.insert("mainCategory".to_string(), category.clone());
        }
        if let Some(search) = &self.search_query {
            pairs.insert("searchQuery".to_string(), search.clone());
        }
        pairs
    }
}

/// Query parameters of single-resource endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FieldsQuery {
    pub fields: Option<String>,
}

impl FieldsQuery {
    pub fn fields(&self) -> &str {
        self.fields.as_deref().unwrap_or_default()
    }
}

/// One page of an ordered collection
#[derive(Debug, Clone, PartialEq)]
pub struct PagedList<T> {
    /// Items of the current page, in order
    pub items: Vec<T>,

    /// Current page number (starts at 1)
    pub current_page: usize,

    /// Total number of pages
    pub total_pages: usize,

    /// Number of items per page
    pub page_size: usize,

    /// Total number of items (after filters)
    pub total_count: usize,
}

impl<T> PagedList<T> {
    /// Slice one page out of a full, already ordered collection
    pub fn create(source: Vec<T>, page_number: usize, page_size: usize) -> Self {
        // Ensure page size is at least 1 to avoid division by zero
        let page_size = page_size.max(1);
        let page_number = page_number.max(1);
        let total_count = source.len();
        let total_pages = total_count.div_ceil(page_size);

        let items = source
            .into_iter()
            .skip((page_number - 1).saturating_mul(page_size))
            .take(page_size)
            .collect();

        Self {
            items,
            current_page: page_number,
            total_pages,
            page_size,
            total_count,
        }
    }

    /// Whether there is a previous page
    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    /// Whether there is a next page
    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// Pagination metadata without navigation links
    pub fn metadata(&self) -> PaginationMetadata {
        PaginationMetadata {
            total_count: self.total_count,
            page_size: self.page_size,
            page_number: self.current_page,
            total_pages: self.total_pages,
            previous_page_link: None,
            next_page_link: None,
        }
    }
}

/// Pagination metadata sent in the `X-Pagination` header
///
/// The page links are only set for representations that carry no
/// hypermedia of their own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMetadata {
    pub total_count: usize,
    pub page_size: usize,
    pub page_number: usize,
    pub total_pages: usize,
    #[serde(default)]
    pub previous_page_link: Option<String>,
    #[serde(default)]
    pub next_page_link: Option<String>,
}

impl PaginationMetadata {
    /// Attach the previous/next page links
    pub fn with_page_links(
        mut self,
        previous_page_link: Option<String>,
        next_page_link: Option<String>,
    ) -> Self {
        self.previous_page_link = previous_page_link;
        self.next_page_link = next_page_link;
        self
    }
}
