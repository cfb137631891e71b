//! Table configuration.

use std::collections::HashMap;

use super::filter::FilterState;
use super::sort::SortState;

/// Default page size used when client-side pagination is turned on.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Configuration for a table controller.
///
/// Pagination is manual by default: the controller returns the full filtered
/// and sorted set and the host pages it (typically against a backend).
///
/// # Example
///
/// ```
/// use worksheet_lib::table::{SortState, TableOptions};
///
/// let options = TableOptions::default()
///     .with_sort(SortState::desc("created_at"))
///     .with_client_pagination(25);
/// assert!(!options.manual_pagination);
/// ```
#[derive(Debug, Clone)]
pub struct TableOptions {
    /// When `true` the controller never slices the view into pages.
    ///
    /// Default: `true`
    pub manual_pagination: bool,

    /// Rows per page when `manual_pagination` is `false`.
    ///
    /// Default: 20
    pub page_size: usize,

    /// Sort applied on construction.
    pub initial_sort: SortState,

    /// Column filters applied on construction.
    pub initial_filters: FilterState,

    /// Column visibility applied on construction.
    pub initial_visibility: HashMap<String, bool>,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            manual_pagination: true,
            page_size: DEFAULT_PAGE_SIZE,
            initial_sort: SortState::default(),
            initial_filters: FilterState::default(),
            initial_visibility: HashMap::new(),
        }
    }
}

impl TableOptions {
    /// Creates options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables client-side pagination with the given page size.
    pub fn with_client_pagination(mut self, page_size: usize) -> Self {
        self.manual_pagination = false;
        self.page_size = page_size;
        self
    }

    /// Sets the initial sort.
    pub fn with_sort(mut self, sort: SortState) -> Self {
        self.initial_sort = sort;
        self
    }

    /// Sets the initial column filters.
    pub fn with_filters(mut self, filters: FilterState) -> Self {
        self.initial_filters = filters;
        self
    }

    /// Hides a column initially.
    pub fn with_hidden(mut self, column: impl Into<String>) -> Self {
        self.initial_visibility.insert(column.into(), false);
        self
    }
}

/// Current page of a client-paginated view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationState {
    /// Zero-based page index.
    pub page_index: usize,
    /// Rows per page. Never zero.
    pub page_size: usize,
}

impl PaginationState {
    /// Number of pages needed for `rows` rows. At least one.
    pub fn page_count(&self, rows: usize) -> usize {
        rows.div_ceil(self.page_size).max(1)
    }

    /// Row range of the current page within `rows` rows.
    pub fn range(&self, rows: usize) -> std::ops::Range<usize> {
        let start = (self.page_index * self.page_size).min(rows);
        let end = (start + self.page_size).min(rows);
        start..end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_range() {
        let page = PaginationState {
            page_index: 1,
            page_size: 2,
        };
        assert_eq!(page.range(5), 2..4);
        assert_eq!(page.page_count(5), 3);
        assert_eq!(page.page_count(0), 1);
    }

    #[test]
    fn test_page_past_end_is_empty() {
        let page = PaginationState {
            page_index: 9,
            page_size: 10,
        };
        assert_eq!(page.range(15), 15..15);
    }
}
