//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;
use worksheet_lib::table::Direction;
use worksheet_lib::table::RowKey;
use worksheet_lib::table::SortState;

/// Sort, filter and select worksheet records from a JSON file.
#[derive(Debug, Parser)]
#[command(name = "worksheet", about = "Worksheet table viewer")]
pub struct Args {
    /// JSON file holding an array of record objects.
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Comma-separated columns to show, in order.
    /// Default: every field found, `id` first, the rest alphabetically.
    #[arg(short = 'c', long, value_delimiter = ',', value_name = "COLS")]
    pub columns: Vec<String>,

    /// Sort keys, highest priority first: `name:asc,id:desc`.
    /// The direction defaults to ascending.
    #[arg(short = 's', long, value_parser = parse_sort, value_name = "KEYS")]
    pub sort: Option<SortState>,

    /// Column filter `COL=TEXT` (case-insensitive contains). Repeatable.
    #[arg(short = 'f', long = "filter", value_parser = parse_filter, value_name = "COL=TEXT")]
    pub filters: Vec<(String, String)>,

    /// Search every visible column for this text.
    #[arg(long, value_name = "TEXT")]
    pub search: Option<String>,

    /// Columns to hide. Repeatable or comma-separated.
    #[arg(long, value_delimiter = ',', value_name = "COLS")]
    pub hide: Vec<String>,

    /// Row keys to select. Numeric keys also match ids stored as strings.
    #[arg(long, value_delimiter = ',', value_parser = parse_key, value_name = "KEYS")]
    pub select: Vec<RowKey>,

    /// Select every visible row (the current page with --page-size).
    #[arg(long, conflicts_with = "select")]
    pub select_all: bool,

    /// Enable client-side pagination with this many rows per page.
    #[arg(long, value_name = "ROWS")]
    pub page_size: Option<usize>,

    /// Page to show, starting at 1. Requires --page-size.
    #[arg(long, requires = "page_size", value_name = "N")]
    pub page: Option<usize>,

    /// Also log to stderr.
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

/// Parses `col[:dir],col[:dir],...` into a sort state.
pub fn parse_sort(s: &str) -> Result<SortState, String> {
    let mut sort = SortState::new();
    for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (column, direction) = match part.split_once(':') {
            Some((column, dir)) => {
                let direction = Direction::parse(dir)
                    .ok_or_else(|| format!("unknown sort direction '{}'", dir))?;
                (column.trim(), direction)
            }
            None => (part, Direction::Asc),
        };
        if column.is_empty() {
            return Err(format!("missing column in sort key '{}'", part));
        }
        sort = sort.then(column, direction);
    }
    if sort.is_empty() {
        return Err("no sort keys given".to_string());
    }
    Ok(sort)
}

/// Parses a `COL=TEXT` filter.
pub fn parse_filter(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((column, text)) if !column.trim().is_empty() => {
            Ok((column.trim().to_string(), text.to_string()))
        }
        _ => Err(format!("expected COL=TEXT, got '{}'", s)),
    }
}

/// Parses a row key: integers become numeric keys, anything else text.
pub fn parse_key(s: &str) -> Result<RowKey, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty row key".to_string());
    }
    Ok(match s.parse::<i64>() {
        Ok(n) => RowKey::Number(n),
        Err(_) => RowKey::Text(s.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sort() {
        let sort = parse_sort("name:asc, id:DESC,created_at").unwrap();
        assert_eq!(
            sort.entries(),
            &[
                ("name".to_string(), Direction::Asc),
                ("id".to_string(), Direction::Desc),
                ("created_at".to_string(), Direction::Asc),
            ]
        );
    }

    #[test]
    fn test_parse_sort_errors() {
        assert!(parse_sort("name:sideways").is_err());
        assert!(parse_sort(":asc").is_err());
        assert!(parse_sort(" , ").is_err());
    }

    #[test]
    fn test_parse_filter() {
        assert_eq!(
            parse_filter("title=frac=tions").unwrap(),
            ("title".to_string(), "frac=tions".to_string())
        );
        assert!(parse_filter("title").is_err());
        assert!(parse_filter("=x").is_err());
    }

    #[test]
    fn test_parse_key() {
        assert_eq!(parse_key("42").unwrap(), RowKey::Number(42));
        assert_eq!(parse_key("ws-7").unwrap(), RowKey::Text("ws-7".to_string()));
        assert!(parse_key(" ").is_err());
    }

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from([
            "worksheet",
            "rows.json",
            "--sort",
            "name,id:desc",
            "--filter",
            "name=a",
            "--hide",
            "notes,created_at",
            "--select",
            "1,3",
            "--page-size",
            "10",
            "--page",
            "2",
        ])
        .unwrap();
        assert_eq!(args.input, PathBuf::from("rows.json"));
        assert_eq!(args.sort.map(|s| s.len()), Some(2));
        assert_eq!(args.filters, vec![("name".to_string(), "a".to_string())]);
        assert_eq!(args.hide, vec!["notes", "created_at"]);
        assert_eq!(args.select, vec![RowKey::Number(1), RowKey::Number(3)]);
        assert_eq!(args.page, Some(2));
    }

    #[test]
    fn test_page_requires_page_size() {
        assert!(Args::try_parse_from(["worksheet", "rows.json", "--page", "2"]).is_err());
    }

    #[test]
    fn test_select_all_conflicts_with_select() {
        let result =
            Args::try_parse_from(["worksheet", "rows.json", "--select", "1", "--select-all"]);
        assert!(result.is_err());
    }
}
