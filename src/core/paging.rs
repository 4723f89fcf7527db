//! Page windowing and pagination metadata

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Name of the response header carrying serialized [`MetaData`]
pub const PAGINATION_HEADER: &str = "X-Pagination";

/// Pagination metadata
///
/// `current_page` is echoed from the request, never re-derived from the data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaData {
    /// Current page number (starts at 1)
    pub current_page: usize,

    /// Total number of pages, `ceil(total_count / page_size)`
    pub total_pages: usize,

    /// Number of items per page
    pub page_size: usize,

    /// Total number of items after filters, before windowing
    pub total_count: usize,

    /// Whether there is a previous page
    pub has_previous: bool,

    /// Whether there is a next page
    pub has_next: bool,
}

impl MetaData {
    pub fn new(current_page: usize, page_size: usize, total_count: usize) -> Self {
        // Ensure page size is at least 1 to avoid division by zero
        let page_size = page_size.max(1);
        let total_pages = total_count.div_ceil(page_size);

        Self {
            current_page,
            total_pages,
            page_size,
            total_count,
            has_previous: current_page > 1,
            has_next: current_page < total_pages,
        }
    }

    /// Serialized form used for the `X-Pagination` header
    pub fn to_header_value(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Offset of the first item of a one-indexed page
pub fn page_offset(page_number: usize, page_size: usize) -> usize {
    page_number.max(1).saturating_sub(1).saturating_mul(page_size)
}

/// A source that can be counted and windowed without materializing everything
///
/// Implemented by deferred storage queries. Counting happens before any
/// window is fetched, so the total always describes the filtered sequence.
#[async_trait]
pub trait PageSource<T>: Send + Sync {
    /// Number of items matching the query, before windowing
    async fn count(&self) -> Result<usize>;

    /// Items `[offset, offset + limit)` of the ordered query
    async fn window(&self, offset: usize, limit: usize) -> Result<Vec<T>>;
}

/// One page of items plus metadata describing its position
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PagedList<T> {
    items: Vec<T>,
    meta: MetaData,
}

impl<T> PagedList<T> {
    /// Wrap an already windowed page
    pub fn new(items: Vec<T>, total_count: usize, page_number: usize, page_size: usize) -> Self {
        let page_number = page_number.max(1);
        let page_size = page_size.max(1);
        let mut items = items;
        items.truncate(page_size);

        Self {
            items,
            meta: MetaData::new(page_number, page_size, total_count),
        }
    }

    /// Window an in-memory, already ordered sequence
    pub fn to_paged_list<I>(source: I, page_number: usize, page_size: usize) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let page_number = page_number.max(1);
        let page_size = page_size.max(1);
        let source: Vec<T> = source.into_iter().collect();
        let total_count = source.len();

        let items = source
            .into_iter()
            .skip(page_offset(page_number, page_size))
            .take(page_size)
            .collect();

        Self::new(items, total_count, page_number, page_size)
    }

    /// Window a deferred query: count first, then fetch only the page
    pub async fn from_source<S>(source: &S, page_number: usize, page_size: usize) -> Result<Self>
    where
        S: PageSource<T> + ?Sized,
    {
        let page_number = page_number.max(1);
        let page_size = page_size.max(1);

        let total_count = source.count().await?;
        let items = source
            .window(page_offset(page_number, page_size), page_size)
            .await?;

        tracing::debug!(
            page_number,
            page_size,
            total_count,
            returned = items.len(),
            "windowed page"
        );

        Ok(Self::new(items, total_count, page_number, page_size))
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn meta(&self) -> &MetaData {
        &self.meta
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Map items while keeping the metadata
    pub fn map<U, F>(self, f: F) -> PagedList<U>
    where
        F: FnMut(T) -> U,
    {
        PagedList {
            items: self.items.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }

    pub fn into_parts(self) -> (Vec<T>, MetaData) {
        (self.items, self.meta)
    }
}

impl<T> IntoIterator for PagedList<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a PagedList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
