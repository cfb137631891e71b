//! The table view controller.

use std::cell::OnceCell;
use std::collections::HashMap;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use log::debug;
use log::warn;

use super::column::CellContext;
use super::column::ColumnDef;
use super::column::HeaderContext;
use super::column::Renderer;
use super::filter::FilterState;
use super::filter::FilterValue;
use super::filter::contains_ignore_case;
use super::identity::IdentityFn;
use super::identity::RowKey;
use super::identity::default_identity;
use super::options::PaginationState;
use super::options::TableOptions;
use super::selection::Coverage;
use super::selection::Selection;
use super::sort::Direction;
use super::sort::SortState;
use super::sort::compare_keys;
use super::sort::next_in_cycle;
use crate::error::TableError;
use crate::model::Row;
use crate::model::Value;

/// Host callback receiving the selected records after every selection change.
pub type SelectionListener<T> = Box<dyn FnMut(&[&T])>;

/// A row of the current view.
#[derive(Debug)]
pub struct VisibleRow<'a, T> {
    /// Position within the returned rows.
    pub view_index: usize,
    /// Position within the record set passed to `set_records`.
    pub source_index: usize,
    /// Identity of the row.
    pub key: &'a RowKey,
    /// The record itself.
    pub record: &'a T,
}

impl<T> Clone for VisibleRow<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for VisibleRow<'_, T> {}

/// Projects a record set into sorted, filtered, selectable rows.
///
/// The controller owns sort, filter, visibility and selection state. Every
/// operation is a state transition followed by lazy recomputation of the
/// view: filter first, then a stable multi-key sort, then (only with
/// client-side pagination) a page slice. Selection changes are reported to
/// the listener synchronously, before the mutating call returns.
///
/// Column descriptors are validated once in the constructor; after that no
/// operation can fail. Operations naming unknown columns or rows are ignored.
///
/// # Example
///
/// ```
/// use worksheet_lib::model::Record;
/// use worksheet_lib::table::{ColumnDef, Direction, RowKey, TableOptions, TabularViewController};
///
/// let columns = vec![ColumnDef::field("id"), ColumnDef::field("name")];
/// let mut table: TabularViewController<Record> =
///     TabularViewController::new(columns, TableOptions::default()).unwrap();
///
/// table.set_records(vec![
///     Record::new().set("id", 1i64).set("name", "B"),
///     Record::new().set("id", 2i64).set("name", "A"),
/// ]);
/// table.set_sort("name", Some(Direction::Asc));
/// table.toggle_row_selected(RowKey::Number(1), true);
///
/// let order: Vec<_> = table.visible_rows().iter().map(|r| r.key.clone()).collect();
/// assert_eq!(order, vec![RowKey::Number(2), RowKey::Number(1)]);
/// assert_eq!(table.selected_records().len(), 1);
/// ```
pub struct TabularViewController<T, O = String> {
    columns: Vec<ColumnDef<T, O>>,
    identity: IdentityFn<T>,

    records: Vec<T>,
    keys: Vec<RowKey>,
    key_set: HashSet<RowKey>,

    sort: SortState,
    filters: FilterState,
    global_filter: Option<String>,
    visibility: HashMap<String, bool>,
    selection: Selection,
    pagination: Option<PaginationState>,

    reset_trigger: bool,
    listener: Option<SelectionListener<T>>,

    /// Filtered and sorted source indices, before any page slice.
    view: OnceCell<Vec<usize>>,
}

impl<T: Row + 'static, O: 'static> TabularViewController<T, O> {
    /// Creates a controller using the default identity chain
    /// (`id`, then `worksheet_id`, then the row position).
    pub fn new(columns: Vec<ColumnDef<T, O>>, options: TableOptions) -> Result<Self, TableError> {
        Self::with_identity(columns, options, Arc::new(default_identity::<T>))
    }
}

impl<T: 'static, O: 'static> TabularViewController<T, O> {
    /// Creates a controller with a host-supplied identity extractor.
    ///
    /// Rows for which the extractor returns `None` are keyed by position.
    pub fn with_identity(
        columns: Vec<ColumnDef<T, O>>,
        options: TableOptions,
        identity: IdentityFn<T>,
    ) -> Result<Self, TableError> {
        validate_columns(&columns)?;

        let mut controller = Self {
            columns,
            identity,
            records: Vec::new(),
            keys: Vec::new(),
            key_set: HashSet::new(),
            sort: SortState::default(),
            filters: FilterState::default(),
            global_filter: None,
            visibility: HashMap::new(),
            selection: Selection::new(),
            pagination: None,
            reset_trigger: false,
            listener: None,
            view: OnceCell::new(),
        };

        for (column, direction) in options.initial_sort.entries() {
            let def = controller
                .column(column)
                .ok_or_else(|| TableError::unknown_column(column, "sort"))?;
            if !def.enable_sorting() {
                return Err(TableError::NotSortable {
                    column: column.clone(),
                });
            }
            controller.sort.push(column.clone(), *direction);
        }

        for (column, filter) in options.initial_filters.iter() {
            let def = controller
                .column(column)
                .ok_or_else(|| TableError::unknown_column(column, "filter"))?;
            if def.accessor().is_none() {
                return Err(TableError::NotFilterable {
                    column: column.to_string(),
                });
            }
            controller.filters.set(column, Some(filter.clone()));
        }

        for (column, visible) in &options.initial_visibility {
            if controller.column(column).is_none() {
                return Err(TableError::unknown_column(column, "visibility"));
            }
            controller.set_column_visibility(column, *visible);
        }

        if !options.manual_pagination {
            if options.page_size == 0 {
                return Err(TableError::ZeroPageSize);
            }
            controller.pagination = Some(PaginationState {
                page_index: 0,
                page_size: options.page_size,
            });
        }

        Ok(controller)
    }

    /// Sets the selection listener (builder pattern).
    pub fn on_selection_change<F>(mut self, listener: F) -> Self
    where
        F: FnMut(&[&T]) + 'static,
    {
        self.listener = Some(Box::new(listener));
        self
    }

    /// Sets or replaces the selection listener.
    pub fn set_selection_listener(&mut self, listener: Option<SelectionListener<T>>) {
        self.listener = listener;
    }
}

impl<T, O> TabularViewController<T, O> {
    // =========================================================================
    // Records
    // =========================================================================

    /// Replaces the record set.
    ///
    /// Selected keys whose rows disappeared stay in the selection until it is
    /// cleared, but are never reported.
    pub fn set_records(&mut self, records: Vec<T>) {
        let mut positional = 0usize;
        let keys: Vec<RowKey> = records
            .iter()
            .enumerate()
            .map(|(i, record)| {
                (self.identity)(record).unwrap_or_else(|| {
                    positional += 1;
                    RowKey::Position(i)
                })
            })
            .collect();

        if positional > 0 {
            warn!(
                "{} of {} rows have no identity field; keyed by position",
                positional,
                records.len()
            );
        }

        let key_set: HashSet<RowKey> = keys.iter().cloned().collect();
        if key_set.len() != keys.len() {
            warn!(
                "Record set contains {} duplicate row keys",
                keys.len() - key_set.len()
            );
        }

        self.records = records;
        self.keys = keys;
        self.key_set = key_set;
        self.invalidate();
        self.clamp_page();
    }

    /// The current record set, in input order.
    pub fn records(&self) -> &[T] {
        &self.records
    }

    /// Key of the record at a source index.
    pub fn key_at(&self, source_index: usize) -> Option<&RowKey> {
        self.keys.get(source_index)
    }

    /// Returns `true` if a record with this key is in the current record set.
    pub fn contains_key(&self, key: &RowKey) -> bool {
        self.key_set.contains(key)
    }

    // =========================================================================
    // Columns
    // =========================================================================

    /// All columns in display order.
    pub fn columns(&self) -> &[ColumnDef<T, O>] {
        &self.columns
    }

    /// Looks up a column by id.
    pub fn column(&self, id: &str) -> Option<&ColumnDef<T, O>> {
        self.columns.iter().find(|c| c.id() == id)
    }

    /// Columns that are currently shown, in display order.
    pub fn visible_columns(&self) -> Vec<&ColumnDef<T, O>> {
        self.columns
            .iter()
            .filter(|c| self.is_column_visible(c.id()))
            .collect()
    }

    /// Returns whether a column is shown. Columns are visible unless hidden.
    pub fn is_column_visible(&self, id: &str) -> bool {
        self.visibility.get(id).copied().unwrap_or(true)
    }

    /// Shows or hides a column.
    ///
    /// Hiding a column with hiding disabled is ignored.
    pub fn set_column_visibility(&mut self, id: &str, visible: bool) {
        let Some(column) = self.column(id) else {
            debug!("Ignoring visibility change for unknown column '{}'", id);
            return;
        };
        if !visible && !column.enable_hiding() {
            debug!("Column '{}' cannot be hidden", id);
            return;
        }
        self.visibility.insert(id.to_string(), visible);
        // The global filter only searches visible columns.
        if self.global_filter.is_some() {
            self.invalidate();
            self.clamp_page();
        }
    }

    // =========================================================================
    // Sorting
    // =========================================================================

    /// Current sort state.
    pub fn sort_state(&self) -> &SortState {
        &self.sort
    }

    /// Sorts by a single column, or removes the column from the sort.
    ///
    /// `Some(direction)` makes the column the only sort key. `None` drops
    /// the column's entry and leaves other keys in place.
    pub fn set_sort(&mut self, column: &str, direction: Option<Direction>) {
        if !self.can_sort(column) {
            return;
        }
        match direction {
            Some(d) => self.sort.replace(column.to_string(), d),
            None => self.sort.remove(column),
        }
        self.on_view_state_change();
    }

    /// Advances a column through the header click cycle: asc, desc, unsorted.
    ///
    /// A column not yet sorted starts ascending. With `multi` the column is
    /// added to (or cycled within) the existing keys; otherwise it becomes
    /// the only key.
    pub fn toggle_sort(&mut self, column: &str, multi: bool) {
        if !self.can_sort(column) {
            return;
        }
        let next = next_in_cycle(self.sort.direction(column));
        match (next, multi) {
            (Some(d), true) => self.sort.push(column.to_string(), d),
            (Some(d), false) => self.sort.replace(column.to_string(), d),
            (None, true) => self.sort.remove(column),
            (None, false) => self.sort.clear(),
        }
        self.on_view_state_change();
    }

    /// Replaces the whole multi-key sort state.
    ///
    /// Entries for unknown or unsortable columns are dropped.
    pub fn set_sort_state(&mut self, mut sort: SortState) {
        let before = sort.len();
        sort.retain(|column| {
            self.columns
                .iter()
                .any(|c| c.id() == column && c.enable_sorting())
        });
        if sort.len() != before {
            debug!("Dropped {} unsortable sort keys", before - sort.len());
        }
        self.sort = sort;
        self.on_view_state_change();
    }

    /// Removes all sort keys, restoring input order.
    pub fn clear_sort(&mut self) {
        self.sort.clear();
        self.on_view_state_change();
    }

    fn can_sort(&self, column: &str) -> bool {
        match self.column(column) {
            Some(c) if c.enable_sorting() => true,
            Some(_) => {
                debug!("Column '{}' does not accept sorting", column);
                false
            }
            None => {
                debug!("Ignoring sort on unknown column '{}'", column);
                false
            }
        }
    }

    // =========================================================================
    // Filtering
    // =========================================================================

    /// Current column filters.
    pub fn filter_state(&self) -> &FilterState {
        &self.filters
    }

    /// Sets or removes the filter on a column.
    pub fn set_filter(&mut self, column: &str, value: Option<FilterValue>) {
        match self.column(column) {
            Some(c) if c.accessor().is_some() => {}
            Some(_) => {
                debug!("Column '{}' has no value to filter on", column);
                return;
            }
            None => {
                debug!("Ignoring filter on unknown column '{}'", column);
                return;
            }
        }
        self.filters.set(column, value);
        self.on_view_state_change();
    }

    /// Removes all column filters.
    pub fn clear_filters(&mut self) {
        self.filters.clear();
        self.on_view_state_change();
    }

    /// Current global search text.
    pub fn global_filter(&self) -> Option<&str> {
        self.global_filter.as_deref()
    }

    /// Sets the global search text. Empty text clears it.
    ///
    /// A row passes when any visible data column contains the text.
    pub fn set_global_filter(&mut self, text: Option<String>) {
        self.global_filter = text.filter(|t| !t.is_empty());
        self.on_view_state_change();
    }

    // =========================================================================
    // View
    // =========================================================================

    /// Rows after filtering, sorting and (with client pagination) paging.
    pub fn visible_rows(&self) -> Vec<VisibleRow<'_, T>> {
        self.page_indices()
            .iter()
            .enumerate()
            .map(|(view_index, &source_index)| VisibleRow {
                view_index,
                source_index,
                key: &self.keys[source_index],
                record: &self.records[source_index],
            })
            .collect()
    }

    /// Number of rows passing the filters, ignoring pagination.
    pub fn filtered_row_count(&self) -> usize {
        self.view().len()
    }

    fn view(&self) -> &[usize] {
        self.view.get_or_init(|| self.compute_view())
    }

    fn page_indices(&self) -> &[usize] {
        let all = self.view();
        match &self.pagination {
            Some(page) => &all[page.range(all.len())],
            None => all,
        }
    }

    fn compute_view(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..self.records.len())
            .filter(|&i| self.passes_filters(&self.records[i]))
            .collect();

        let sort_columns: Vec<(&ColumnDef<T, O>, Direction)> = self
            .sort
            .entries()
            .iter()
            .filter_map(|(id, d)| self.column(id).map(|c| (c, *d)))
            .collect();

        if !sort_columns.is_empty() {
            let directions: Vec<Direction> = sort_columns.iter().map(|(_, d)| *d).collect();
            let mut keyed: Vec<(usize, Vec<Value>)> = indices
                .iter()
                .map(|&i| {
                    let record = &self.records[i];
                    let values: Vec<Value> = sort_columns.iter().map(|(c, _)| c.value(record)).collect();
                    (i, values)
                })
                .collect();
            // `sort_by` is stable: ties keep input order.
            keyed.sort_by(|a, b| compare_keys(&a.1, &b.1, &directions));
            indices = keyed.into_iter().map(|(i, _)| i).collect();
        }

        indices
    }

    fn passes_filters(&self, record: &T) -> bool {
        for (id, filter) in self.filters.iter() {
            let Some(column) = self.column(id) else {
                continue;
            };
            if !column.filter_matches(&column.value(record), filter) {
                return false;
            }
        }

        match &self.global_filter {
            Some(needle) => self
                .columns
                .iter()
                .filter(|c| c.accessor().is_some() && self.is_column_visible(c.id()))
                .any(|c| contains_ignore_case(&c.value(record).display_text(), needle)),
            None => true,
        }
    }

    fn invalidate(&mut self) {
        self.view = OnceCell::new();
    }

    fn on_view_state_change(&mut self) {
        self.invalidate();
        if let Some(page) = &mut self.pagination {
            page.page_index = 0;
        }
    }

    // =========================================================================
    // Pagination
    // =========================================================================

    /// Current page, or `None` when pagination is manual.
    pub fn pagination(&self) -> Option<PaginationState> {
        self.pagination
    }

    /// Number of pages in the filtered view. Always 1 when pagination is manual.
    pub fn page_count(&self) -> usize {
        match &self.pagination {
            Some(page) => page.page_count(self.filtered_row_count()),
            None => 1,
        }
    }

    /// Moves to a page, clamped to the last page.
    pub fn set_page(&mut self, page_index: usize) {
        let last = self.page_count() - 1;
        if let Some(page) = &mut self.pagination {
            page.page_index = page_index.min(last);
        }
    }

    /// Pulls the page index back onto the last page after the view shrank.
    fn clamp_page(&mut self) {
        let last = self.page_count() - 1;
        if let Some(page) = &mut self.pagination {
            page.page_index = page.page_index.min(last);
        }
    }

    /// Changes the page size and returns to the first page. Zero is ignored.
    pub fn set_page_size(&mut self, page_size: usize) {
        if page_size == 0 {
            debug!("Ignoring zero page size");
            return;
        }
        if let Some(page) = &mut self.pagination {
            page.page_size = page_size;
            page.page_index = 0;
        }
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Raw selection state, stale keys included.
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Returns `true` if the row with this key is selected.
    pub fn is_row_selected(&self, key: &RowKey) -> bool {
        self.selection.is_selected(key)
    }

    /// Selects or deselects one row.
    ///
    /// Keys not present in the current record set are not added.
    pub fn toggle_row_selected(&mut self, key: RowKey, selected: bool) {
        if selected && !self.key_set.contains(&key) {
            debug!("Ignoring selection of unknown row {}", key);
        } else {
            self.selection.set(key, selected);
        }
        self.notify_selection();
    }

    /// Selects exactly the visible rows, or clears the selection.
    ///
    /// With client pagination, "visible" means the current page.
    pub fn toggle_all_visible_selected(&mut self, selected: bool) {
        if selected {
            let keys: Vec<RowKey> = self
                .page_indices()
                .iter()
                .map(|&i| self.keys[i].clone())
                .collect();
            self.selection.replace(keys);
        } else {
            self.selection.clear();
        }
        self.notify_selection();
    }

    /// Every visible row is selected, and at least one row is visible.
    pub fn is_all_selected(&self) -> bool {
        self.coverage() == Coverage::All
    }

    /// At least one, but not every, visible row is selected.
    pub fn is_some_selected(&self) -> bool {
        self.coverage() == Coverage::Partial
    }

    fn coverage(&self) -> Coverage {
        self.selection
            .coverage(self.page_indices().iter().map(|&i| &self.keys[i]))
    }

    /// Empties the selection.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.notify_selection();
    }

    /// Feeds the host's reset flag. A change from `false` to `true` clears
    /// the selection; staying `true` does nothing further.
    pub fn set_reset_trigger(&mut self, active: bool) {
        let rising = active && !self.reset_trigger;
        self.reset_trigger = active;
        if rising {
            debug!("Selection reset triggered");
            self.clear_selection();
        }
    }

    /// Selected records in current view order (filtered and sorted, ignoring
    /// pagination). Selected keys without a matching current row are skipped.
    pub fn selected_records(&self) -> Vec<&T> {
        if self.selection.is_empty() {
            return Vec::new();
        }
        self.view()
            .iter()
            .filter(|&&i| self.selection.is_selected(&self.keys[i]))
            .map(|&i| &self.records[i])
            .collect()
    }

    fn notify_selection(&mut self) {
        if let Some(mut listener) = self.listener.take() {
            listener(&self.selected_records());
            self.listener = Some(listener);
        }
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Renders a column header through its renderer, or as its title.
    pub fn render_header(&self, column_id: &str) -> Option<O>
    where
        O: From<String>,
    {
        let column = self.column(column_id)?;
        let coverage = self.coverage();
        let ctx = HeaderContext {
            column_id: column.id(),
            title: column.title(),
            sort: self.sort.direction(column.id()),
            sort_index: self.sort.index_of(column.id()),
            can_sort: column.enable_sorting(),
            all_selected: coverage == Coverage::All,
            some_selected: coverage == Coverage::Partial,
        };
        Some(match column.header_renderer_ref() {
            Some(renderer) => renderer.render(&ctx),
            None => O::from(ctx.title.to_string()),
        })
    }

    /// Renders one cell through its renderer, or as the value's display text.
    pub fn render_cell(&self, row: &VisibleRow<'_, T>, column_id: &str) -> Option<O>
    where
        O: From<String>,
    {
        let column = self.column(column_id)?;
        let value = column.value(row.record);
        let ctx = CellContext {
            column_id: column.id(),
            row: row.record,
            key: row.key,
            value: &value,
            selected: self.selection.is_selected(row.key),
            view_index: row.view_index,
        };
        Some(match column.cell_renderer_ref() {
            Some(renderer) => renderer.render(&ctx),
            None => O::from(value.display_text()),
        })
    }

    /// Renders every visible column of a row.
    pub fn render_row(&self, row: &VisibleRow<'_, T>) -> Vec<O>
    where
        O: From<String>,
    {
        self.visible_columns()
            .iter()
            .filter_map(|c| self.render_cell(row, c.id()))
            .collect()
    }
}

impl<T, O> fmt::Debug for TabularViewController<T, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TabularViewController")
            .field("columns", &self.columns)
            .field("records", &self.records.len())
            .field("sort", &self.sort)
            .field("filters", &self.filters)
            .field("global_filter", &self.global_filter)
            .field("visibility", &self.visibility)
            .field("selected", &self.selection.len())
            .field("pagination", &self.pagination)
            .finish()
    }
}

/// Rejects malformed column descriptors.
fn validate_columns<T, O>(columns: &[ColumnDef<T, O>]) -> Result<(), TableError> {
    let mut seen = HashSet::new();
    for (position, column) in columns.iter().enumerate() {
        let id = column.id();
        if id.is_empty() {
            return Err(TableError::EmptyColumnId { position });
        }
        if !seen.insert(id) {
            return Err(TableError::DuplicateColumn {
                column: id.to_string(),
            });
        }
        if column.accessor().is_none() {
            if !column.is_display() {
                return Err(TableError::MissingAccessor {
                    column: id.to_string(),
                });
            }
            if column.enable_sorting() {
                return Err(TableError::SortingWithoutAccessor {
                    column: id.to_string(),
                });
            }
        }
    }
    Ok(())
}
