//! worksheet - print a sorted, filtered view of worksheet records.
//!
//! Usage:
//!   worksheet rows.json                          # every row, input order
//!   worksheet rows.json -s subject,score:desc    # multi-key sort
//!   worksheet rows.json -f title=fraction        # column filter
//!   worksheet rows.json --select 3,7             # print selected records
//!   worksheet rows.json --page-size 20 --page 2  # client-side paging

mod args;
mod error;
mod paths;
mod render;

use std::collections::BTreeSet;
use std::fs;
use std::fs::File;

use clap::Parser;
use log::debug;
use log::info;
use log::warn;
use simplelog::ColorChoice;
use simplelog::CombinedLogger;
use simplelog::Config;
use simplelog::LevelFilter;
use simplelog::SharedLogger;
use simplelog::TermLogger;
use simplelog::TerminalMode;
use simplelog::WriteLogger;
use worksheet_lib::model::Record;
use worksheet_lib::table::ColumnDef;
use worksheet_lib::table::Direction;
use worksheet_lib::table::FilterValue;
use worksheet_lib::table::PRIMARY_ID_FIELD;
use worksheet_lib::table::RowKey;
use worksheet_lib::table::SortState;
use worksheet_lib::table::TableOptions;
use worksheet_lib::table::TabularViewController;

use crate::args::Args;
use crate::error::CliError;
use crate::render::format_table;

/// Id of the checkbox column shown before the data columns.
const SELECT_COLUMN: &str = "select";

fn main() {
    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), CliError> {
    init_logging(args.verbose)?;

    let text = fs::read_to_string(&args.input).map_err(|source| CliError::Read {
        path: args.input.clone(),
        source,
    })?;
    let records: Vec<Record> = serde_json::from_str(&text)?;
    info!("Loaded {} records from {}", records.len(), args.input.display());

    let fields = if args.columns.is_empty() {
        discover_fields(&records)
    } else {
        args.columns.clone()
    };

    let mut options = TableOptions::default();
    if let Some(sort) = args.sort.clone() {
        options = options.with_sort(sort);
    }
    for column in &args.hide {
        options = options.with_hidden(column);
    }
    if let Some(page_size) = args.page_size {
        options = options.with_client_pagination(page_size);
    }

    let mut table = TabularViewController::new(build_columns(&fields), options)?
        .on_selection_change(|rows: &[&Record]| debug!("Selection now holds {} rows", rows.len()));
    table.set_records(records);

    for (column, needle) in &args.filters {
        if table.column(column).is_none() {
            warn!("Ignoring filter on unknown column '{}'", column);
        }
        table.set_filter(column, Some(FilterValue::text(needle.as_str())));
    }
    table.set_global_filter(args.search.clone());
    if let Some(page) = args.page {
        table.set_page(page.saturating_sub(1));
    }

    for key in &args.select {
        match resolve_key(&table, key) {
            Some(key) => table.toggle_row_selected(key, true),
            None => warn!("No row with key {}", key),
        }
    }
    if args.select_all {
        table.toggle_all_visible_selected(true);
    }

    print_view(&table);

    let selected = table.selected_records();
    if !selected.is_empty() {
        println!();
        println!("Selected {} records:", selected.len());
        println!("{}", serde_json::to_string_pretty(&selected)?);
    }

    Ok(())
}

fn init_logging(verbose: bool) -> Result<(), CliError> {
    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();

    if verbose {
        loggers.push(TermLogger::new(
            LevelFilter::Debug,
            Config::default(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ));
    }

    if let Some(path) = paths::log_file() {
        let file = path
            .parent()
            .map_or(Ok(()), fs::create_dir_all)
            .and_then(|_| File::create(&path));
        match file {
            Ok(file) => loggers.push(WriteLogger::new(LevelFilter::Debug, Config::default(), file)),
            Err(e) => eprintln!("Warning: cannot write log file {}: {}", path.display(), e),
        }
    }

    if !loggers.is_empty() {
        CombinedLogger::init(loggers)?;
    }
    Ok(())
}

/// Finds the row key a `--select` value refers to.
///
/// Ids may be stored as numbers or as numeric strings, so a key that matches
/// no row is retried in its other form.
fn resolve_key(table: &TabularViewController<Record>, key: &RowKey) -> Option<RowKey> {
    if table.contains_key(key) {
        return Some(key.clone());
    }
    let other = match key {
        RowKey::Number(n) => RowKey::Text(n.to_string()),
        RowKey::Text(s) => RowKey::Number(s.parse().ok()?),
        RowKey::Position(_) => return None,
    };
    table.contains_key(&other).then_some(other)
}

/// Every field name found in the records, `id` first and the rest sorted.
fn discover_fields(records: &[Record]) -> Vec<String> {
    let names: BTreeSet<&str> = records
        .iter()
        .flat_map(|r| r.fields().keys().map(String::as_str))
        .collect();

    let mut fields = Vec::with_capacity(names.len());
    if names.contains(PRIMARY_ID_FIELD) {
        fields.push(PRIMARY_ID_FIELD.to_string());
    }
    fields.extend(
        names
            .into_iter()
            .filter(|n| *n != PRIMARY_ID_FIELD)
            .map(str::to_string),
    );
    fields
}

fn build_columns(fields: &[String]) -> Vec<ColumnDef<Record>> {
    let select: ColumnDef<Record> = ColumnDef::display(SELECT_COLUMN)
        .hideable(false)
        .header(|ctx| {
            let mark = if ctx.all_selected {
                "x"
            } else if ctx.some_selected {
                "-"
            } else {
                " "
            };
            format!("[{}]", mark)
        })
        .cell(|ctx| {
            let mark = if ctx.selected { "x" } else { " " };
            format!("[{}]", mark)
        });

    let mut columns = vec![select];
    for field in fields {
        columns.push(ColumnDef::field(field.as_str()).header(|ctx| {
            match (ctx.sort, ctx.sort_index) {
                (Some(direction), Some(index)) => {
                    format!("{} {}{}", ctx.title, arrow(direction), index + 1)
                }
                _ => ctx.title.to_string(),
            }
        }));
    }
    columns
}

fn arrow(direction: Direction) -> &'static str {
    match direction {
        Direction::Asc => "^",
        Direction::Desc => "v",
    }
}

fn print_view(table: &TabularViewController<Record>) {
    let headers: Vec<String> = table
        .visible_columns()
        .iter()
        .filter_map(|c| table.render_header(c.id()))
        .collect();
    let rows: Vec<Vec<String>> = table
        .visible_rows()
        .iter()
        .map(|row| table.render_row(row))
        .collect();

    print!("{}", format_table(&headers, &rows));

    match table.pagination() {
        Some(page) => println!(
            "{} rows, page {} of {}",
            table.filtered_row_count(),
            page.page_index + 1,
            table.page_count()
        ),
        None => println!("{} of {} rows", table.filtered_row_count(), table.records().len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discover_fields_puts_id_first() {
        let records: Vec<Record> = serde_json::from_str(
            r#"[{"title": "Fractions", "id": 2}, {"id": 1, "subject": "math"}]"#,
        )
        .unwrap();
        assert_eq!(discover_fields(&records), vec!["id", "subject", "title"]);
    }

    #[test]
    fn test_resolve_key_matches_numeric_string_ids() {
        let fields = vec!["title".to_string()];
        let mut table: TabularViewController<Record> =
            TabularViewController::new(build_columns(&fields), TableOptions::default()).unwrap();
        table.set_records(
            serde_json::from_str(
                r#"[{"worksheet_id": "12", "title": "Fractions"}, {"id": 7, "title": "Ratios"}]"#,
            )
            .unwrap(),
        );

        assert_eq!(
            resolve_key(&table, &RowKey::Number(12)),
            Some(RowKey::Text("12".to_string()))
        );
        assert_eq!(
            resolve_key(&table, &RowKey::Text("7".to_string())),
            Some(RowKey::Number(7))
        );
        assert_eq!(resolve_key(&table, &RowKey::Number(7)), Some(RowKey::Number(7)));
        assert_eq!(resolve_key(&table, &RowKey::Number(99)), None);
        assert_eq!(resolve_key(&table, &RowKey::Text("ws-1".to_string())), None);
    }

    #[test]
    fn test_build_columns_validates() {
        let fields = vec!["id".to_string(), "title".to_string()];
        let table: TabularViewController<Record> =
            TabularViewController::new(build_columns(&fields), TableOptions::default()).unwrap();
        assert_eq!(table.columns().len(), 3);
        assert_eq!(table.render_header(SELECT_COLUMN).as_deref(), Some("[ ]"));
    }

    #[test]
    fn test_sorted_header_shows_priority() {
        let fields = vec!["id".to_string(), "title".to_string()];
        let options = TableOptions::default()
            .with_sort(SortState::asc("title").then_desc("id"));
        let table: TabularViewController<Record> =
            TabularViewController::new(build_columns(&fields), options).unwrap();
        assert_eq!(table.render_header("title").as_deref(), Some("title ^1"));
        assert_eq!(table.render_header("id").as_deref(), Some("id v2"));
    }
}
