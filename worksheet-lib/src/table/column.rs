//! Column descriptors and render contexts.

use std::fmt;
use std::sync::Arc;

use super::filter::FilterFn;
use super::filter::FilterValue;
use super::identity::RowKey;
use super::sort::Direction;
use crate::model::Row;
use crate::model::Value;

/// An opaque render callback.
///
/// The controller never inspects what a renderer produces; it only invokes
/// it with a context. Any `Fn(&Ctx) -> Out` closure is a renderer.
pub trait Renderer<Ctx: ?Sized, Out> {
    /// Renders output for the given context.
    fn render(&self, ctx: &Ctx) -> Out;
}

impl<Ctx: ?Sized, Out, F> Renderer<Ctx, Out> for F
where
    F: Fn(&Ctx) -> Out,
{
    fn render(&self, ctx: &Ctx) -> Out {
        self(ctx)
    }
}

/// Context passed to header renderers.
#[derive(Debug, Clone, Copy)]
pub struct HeaderContext<'a> {
    /// Column id.
    pub column_id: &'a str,
    /// Header text declared on the column (defaults to the id).
    pub title: &'a str,
    /// Direction the column is sorted in, if it is a sort key.
    pub sort: Option<Direction>,
    /// Position among the sort keys (0 = primary).
    pub sort_index: Option<usize>,
    /// Whether the column accepts sorting.
    pub can_sort: bool,
    /// Every visible row is selected.
    pub all_selected: bool,
    /// Some, but not all, visible rows are selected.
    pub some_selected: bool,
}

/// Context passed to cell renderers.
#[derive(Debug)]
pub struct CellContext<'a, T> {
    /// Column id.
    pub column_id: &'a str,
    /// The row being rendered.
    pub row: &'a T,
    /// Identity of the row.
    pub key: &'a RowKey,
    /// Accessor output for this column (`Null` for display columns).
    pub value: &'a Value,
    /// Whether the row is selected.
    pub selected: bool,
    /// Position of the row in the visible view.
    pub view_index: usize,
}

pub(crate) type HeaderRenderer<O> = Arc<dyn for<'a> Renderer<HeaderContext<'a>, O>>;
pub(crate) type CellRenderer<T, O> = Arc<dyn for<'a> Renderer<CellContext<'a, T>, O>>;

/// How a column reads its value from a row.
pub struct Accessor<T> {
    key: Option<String>,
    get: Arc<dyn Fn(&T) -> Value>,
}

impl<T> Clone for Accessor<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            get: Arc::clone(&self.get),
        }
    }
}

impl<T> Accessor<T> {
    /// Field name read by this accessor, if it is field-keyed.
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Reads the column value from a row.
    pub fn value(&self, row: &T) -> Value {
        (self.get)(row)
    }
}

impl<T> fmt::Debug for Accessor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.key {
            Some(key) => write!(f, "Accessor::Key({:?})", key),
            None => write!(f, "Accessor::Fn"),
        }
    }
}

/// Describes one projected column.
///
/// Columns are either data columns, which need an accessor, or display
/// columns (e.g. a selection checkbox), which never sort or filter.
/// Sorting and hiding are enabled by default.
///
/// # Example
///
/// ```
/// use worksheet_lib::model::{Record, Value};
/// use worksheet_lib::table::ColumnDef;
///
/// let columns: Vec<ColumnDef<Record>> = vec![
///     ColumnDef::display("select"),
///     ColumnDef::field("title").header_text("Title"),
///     ColumnDef::new("questions")
///         .accessor_fn(|r: &Record| r.get("items").cloned().unwrap_or(Value::Null))
///         .hideable(false),
/// ];
/// ```
pub struct ColumnDef<T, O = String> {
    id: String,
    title: Option<String>,
    accessor: Option<Accessor<T>>,
    display: bool,
    header_renderer: Option<HeaderRenderer<O>>,
    cell_renderer: Option<CellRenderer<T, O>>,
    enable_sorting: bool,
    enable_hiding: bool,
    filter_fn: Option<FilterFn>,
}

impl<T: 'static, O: 'static> ColumnDef<T, O> {
    /// Creates a data column. An accessor must be attached before the
    /// column is handed to a controller.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: None,
            accessor: None,
            display: false,
            header_renderer: None,
            cell_renderer: None,
            enable_sorting: true,
            enable_hiding: true,
            filter_fn: None,
        }
    }

    /// Creates a display-only column with sorting disabled.
    pub fn display(id: impl Into<String>) -> Self {
        let mut column = Self::new(id);
        column.display = true;
        column.enable_sorting = false;
        column
    }

    /// Reads the column value through a function.
    pub fn accessor_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&T) -> Value + 'static,
    {
        self.accessor = Some(Accessor {
            key: None,
            get: Arc::new(f),
        });
        self
    }

    /// Sets the header text given to the header renderer.
    pub fn header_text(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the header renderer.
    pub fn header<F>(mut self, f: F) -> Self
    where
        F: Fn(&HeaderContext<'_>) -> O + 'static,
    {
        self.header_renderer = Some(Arc::new(f));
        self
    }

    /// Sets a header renderer implemented as a type.
    pub fn header_renderer<R>(mut self, renderer: R) -> Self
    where
        R: for<'a> Renderer<HeaderContext<'a>, O> + 'static,
    {
        self.header_renderer = Some(Arc::new(renderer));
        self
    }

    /// Sets the cell renderer.
    pub fn cell<F>(mut self, f: F) -> Self
    where
        F: Fn(&CellContext<'_, T>) -> O + 'static,
    {
        self.cell_renderer = Some(Arc::new(f));
        self
    }

    /// Sets a cell renderer implemented as a type.
    pub fn cell_renderer<R>(mut self, renderer: R) -> Self
    where
        R: for<'a> Renderer<CellContext<'a, T>, O> + 'static,
    {
        self.cell_renderer = Some(Arc::new(renderer));
        self
    }

    /// Enables or disables sorting on this column.
    pub fn sortable(mut self, enabled: bool) -> Self {
        self.enable_sorting = enabled;
        self
    }

    /// Enables or disables hiding this column.
    pub fn hideable(mut self, enabled: bool) -> Self {
        self.enable_hiding = enabled;
        self
    }

    /// Replaces built-in filter matching for this column.
    pub fn filter_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value, &FilterValue) -> bool + 'static,
    {
        self.filter_fn = Some(Arc::new(f));
        self
    }
}

impl<T: Row + 'static, O: 'static> ColumnDef<T, O> {
    /// Creates a data column reading the field with the same name as the id.
    pub fn field(id: impl Into<String>) -> Self {
        let id = id.into();
        let key = id.clone();
        Self::new(id).accessor_key(key)
    }

    /// Reads the column value from a named field. Absent fields read as `Null`.
    pub fn accessor_key(mut self, field: impl Into<String>) -> Self {
        let field = field.into();
        let name = field.clone();
        self.accessor = Some(Accessor {
            key: Some(field),
            get: Arc::new(move |row: &T| row.field(&name).unwrap_or(Value::Null)),
        });
        self
    }
}

impl<T, O> ColumnDef<T, O> {
    /// Column id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Header text, falling back to the id.
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.id)
    }

    /// The column's accessor, if any.
    pub fn accessor(&self) -> Option<&Accessor<T>> {
        self.accessor.as_ref()
    }

    /// Returns `true` for display-only columns.
    pub fn is_display(&self) -> bool {
        self.display
    }

    /// Whether the column accepts sorting.
    pub fn enable_sorting(&self) -> bool {
        self.enable_sorting
    }

    /// Whether the column may be hidden.
    pub fn enable_hiding(&self) -> bool {
        self.enable_hiding
    }

    /// Reads this column's value from a row; display columns yield `Null`.
    pub fn value(&self, row: &T) -> Value {
        self.accessor
            .as_ref()
            .map(|a| a.value(row))
            .unwrap_or(Value::Null)
    }

    /// Applies a filter to a cell value, using the custom function if set.
    pub fn filter_matches(&self, cell: &Value, filter: &FilterValue) -> bool {
        match &self.filter_fn {
            Some(f) => f(cell, filter),
            None => filter.matches(cell),
        }
    }

    pub(crate) fn header_renderer_ref(&self) -> Option<&HeaderRenderer<O>> {
        self.header_renderer.as_ref()
    }

    pub(crate) fn cell_renderer_ref(&self) -> Option<&CellRenderer<T, O>> {
        self.cell_renderer.as_ref()
    }
}

impl<T, O> fmt::Debug for ColumnDef<T, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDef")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("accessor", &self.accessor)
            .field("display", &self.display)
            .field("enable_sorting", &self.enable_sorting)
            .field("enable_hiding", &self.enable_hiding)
            .field("custom_filter", &self.filter_fn.is_some())
            .finish()
    }
}
