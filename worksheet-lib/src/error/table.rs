//! Table setup errors

/// Errors detected while configuring a table controller.
///
/// Column descriptors and initial state are validated when the controller is
/// built. Once construction succeeds, no table operation can fail.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    /// A column was declared with an empty id.
    #[error("Column at position {position} has an empty id")]
    EmptyColumnId { position: usize },

    /// Two columns share the same id.
    #[error("Duplicate column id '{column}'")]
    DuplicateColumn { column: String },

    /// A data column has neither a field key nor an accessor function.
    #[error("Column '{column}' has no accessor")]
    MissingAccessor { column: String },

    /// A display-only column was marked sortable.
    #[error("Column '{column}' enables sorting but has no accessor to sort by")]
    SortingWithoutAccessor { column: String },

    /// Initial sort refers to a column that does not accept sorting.
    #[error("Column '{column}' does not accept sorting")]
    NotSortable { column: String },

    /// Initial filter targets a display column, which has no value to filter.
    #[error("Column '{column}' has no accessor to filter on")]
    NotFilterable { column: String },

    /// Initial table state refers to a column that was not declared.
    #[error("Unknown column '{column}' in initial {state} state")]
    UnknownColumn { column: String, state: &'static str },

    /// A page size of zero was requested with client-side pagination.
    #[error("Page size must be greater than zero")]
    ZeroPageSize,
}

impl TableError {
    /// Creates a new unknown column error.
    pub fn unknown_column(column: impl Into<String>, state: &'static str) -> Self {
        Self::UnknownColumn {
            column: column.into(),
            state,
        }
    }
}
