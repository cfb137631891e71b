//! Error types

mod field;
mod table;

pub use field::*;
pub use table::*;
