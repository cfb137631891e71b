//! Table view state: sorting, filtering, column visibility and row selection.
//!
//! [`TabularViewController`] takes an ordered record set and a list of
//! [`ColumnDef`]s and projects them into the rows a host should display:
//! - Column filters and a global search, applied first
//! - Stable multi-column sorting (asc, desc, unsorted click cycle)
//! - Column visibility
//! - Key-based row selection that survives re-sorting and re-fetching
//! - Optional client-side pagination (off by default)
//!
//! Rendering is left to the host: header and cell renderers are opaque
//! callables the controller invokes with a context.
//!
//! # Example
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use worksheet_lib::model::Record;
//! use worksheet_lib::table::{ColumnDef, FilterValue, RowKey, TableOptions, TabularViewController};
//!
//! let picked = Rc::new(RefCell::new(0));
//! let sink = Rc::clone(&picked);
//!
//! let columns = vec![
//!     ColumnDef::display("select"),
//!     ColumnDef::field("title"),
//!     ColumnDef::field("subject"),
//! ];
//! let mut table: TabularViewController<Record> =
//!     TabularViewController::new(columns, TableOptions::default())
//!         .unwrap()
//!         .on_selection_change(move |rows| *sink.borrow_mut() = rows.len());
//!
//! table.set_records(vec![
//!     Record::new().set("worksheet_id", 10i64).set("title", "Fractions").set("subject", "math"),
//!     Record::new().set("worksheet_id", 11i64).set("title", "Spelling").set("subject", "english"),
//! ]);
//! table.set_filter("subject", Some(FilterValue::text("math")));
//! table.toggle_all_visible_selected(true);
//!
//! assert_eq!(*picked.borrow(), 1);
//! assert!(table.is_row_selected(&RowKey::Number(10)));
//! ```

mod column;
mod controller;
mod filter;
mod identity;
mod options;
mod selection;
mod sort;

pub use column::*;
pub use controller::*;
pub use filter::*;
pub use identity::*;
pub use options::*;
pub use selection::*;
pub use sort::*;
