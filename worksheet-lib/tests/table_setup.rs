//! Tests for table controller construction errors.

use worksheet_lib::error::TableError;
use worksheet_lib::model::Record;
use worksheet_lib::table::{
    ColumnDef, FilterState, FilterValue, SortState, TableOptions, TabularViewController,
};

fn build(
    columns: Vec<ColumnDef<Record>>,
    options: TableOptions,
) -> Result<TabularViewController<Record>, TableError> {
    TabularViewController::new(columns, options)
}

#[test]
fn test_valid_columns_build() {
    let columns = vec![
        ColumnDef::display("select"),
        ColumnDef::field("id"),
        ColumnDef::field("title").header_text("Title"),
    ];
    let table = build(columns, TableOptions::default()).unwrap();
    assert_eq!(table.columns().len(), 3);
    assert!(table.records().is_empty());
    assert!(table.visible_rows().is_empty());
}

#[test]
fn test_empty_column_id() {
    let err = build(vec![ColumnDef::field("id"), ColumnDef::field("")], TableOptions::default())
        .unwrap_err();
    assert_eq!(err, TableError::EmptyColumnId { position: 1 });
}

#[test]
fn test_duplicate_column() {
    let err = build(
        vec![ColumnDef::field("id"), ColumnDef::field("id")],
        TableOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, TableError::DuplicateColumn { column } if column == "id"));
}

#[test]
fn test_data_column_without_accessor() {
    let err = build(vec![ColumnDef::new("score")], TableOptions::default()).unwrap_err();
    assert!(matches!(err, TableError::MissingAccessor { .. }));
    assert_eq!(err.to_string(), "Column 'score' has no accessor");
}

#[test]
fn test_sortable_display_column() {
    let err = build(
        vec![ColumnDef::display("actions").sortable(true)],
        TableOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, TableError::SortingWithoutAccessor { .. }));
}

#[test]
fn test_initial_sort_validation() {
    let columns = || {
        vec![
            ColumnDef::field("id"),
            ColumnDef::field("name").sortable(false),
        ]
    };

    let err = build(columns(), TableOptions::default().with_sort(SortState::asc("missing")))
        .unwrap_err();
    assert_eq!(err, TableError::unknown_column("missing", "sort"));

    let err = build(columns(), TableOptions::default().with_sort(SortState::asc("name")))
        .unwrap_err();
    assert!(matches!(err, TableError::NotSortable { .. }));

    let table = build(columns(), TableOptions::default().with_sort(SortState::desc("id"))).unwrap();
    assert_eq!(table.sort_state().len(), 1);
}

#[test]
fn test_initial_filter_validation() {
    let columns = || vec![ColumnDef::display("select"), ColumnDef::field("name")];

    let options = TableOptions::default()
        .with_filters(FilterState::new().with("select", FilterValue::text("x")));
    let err = build(columns(), options).unwrap_err();
    assert!(matches!(err, TableError::NotFilterable { .. }));

    let options = TableOptions::default()
        .with_filters(FilterState::new().with("name", FilterValue::text("kim")));
    let table = build(columns(), options).unwrap();
    assert!(table.filter_state().get("name").is_some());
}

#[test]
fn test_initial_visibility_validation() {
    let err = build(
        vec![ColumnDef::field("id")],
        TableOptions::default().with_hidden("nope"),
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "Unknown column 'nope' in initial visibility state");

    let table = build(
        vec![ColumnDef::field("id"), ColumnDef::field("notes")],
        TableOptions::default().with_hidden("notes"),
    )
    .unwrap();
    assert!(!table.is_column_visible("notes"));
}

#[test]
fn test_zero_page_size() {
    let err = build(
        vec![ColumnDef::field("id")],
        TableOptions::default().with_client_pagination(0),
    )
    .unwrap_err();
    assert_eq!(err, TableError::ZeroPageSize);

    // Page size is irrelevant with manual pagination.
    let mut options = TableOptions::default();
    options.page_size = 0;
    assert!(build(vec![ColumnDef::field("id")], options).is_ok());
}
