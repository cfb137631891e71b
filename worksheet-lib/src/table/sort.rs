//! Sort state for table columns.

use std::cmp::Ordering;

use serde::Deserialize;
use serde::Serialize;

use crate::model::Value;

/// Sort direction for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Ascending order (A-Z, 0-9).
    Asc,
    /// Descending order (Z-A, 9-0).
    Desc,
}

impl Direction {
    /// Returns the opposite direction.
    pub fn reverse(self) -> Self {
        match self {
            Direction::Asc => Direction::Desc,
            Direction::Desc => Direction::Asc,
        }
    }

    /// Applies this direction to an ascending comparison.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Direction::Asc => ordering,
            Direction::Desc => ordering.reverse(),
        }
    }

    /// Parses `asc` / `desc` (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Some(Direction::Asc),
            "desc" | "descending" => Some(Direction::Desc),
            _ => None,
        }
    }
}

/// Next step of the header click cycle: asc, desc, unsorted, asc, ...
pub fn next_in_cycle(current: Option<Direction>) -> Option<Direction> {
    match current {
        None => Some(Direction::Asc),
        Some(Direction::Asc) => Some(Direction::Desc),
        Some(Direction::Desc) => None,
    }
}

/// Ordered multi-column sort state.
///
/// Entries are evaluated left to right: the first entry is the primary key,
/// later entries only break ties. An empty state preserves input order.
///
/// # Example
///
/// ```
/// use worksheet_lib::table::SortState;
///
/// let sort = SortState::asc("subject").then_desc("created_at");
/// assert_eq!(sort.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    entries: Vec<(String, Direction)>,
}

impl SortState {
    /// Creates an empty sort state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an ascending sort on a column.
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            entries: vec![(column.into(), Direction::Asc)],
        }
    }

    /// Creates a descending sort on a column.
    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            entries: vec![(column.into(), Direction::Desc)],
        }
    }

    /// Adds a secondary ascending key.
    pub fn then_asc(self, column: impl Into<String>) -> Self {
        self.then(column, Direction::Asc)
    }

    /// Adds a secondary descending key.
    pub fn then_desc(self, column: impl Into<String>) -> Self {
        self.then(column, Direction::Desc)
    }

    /// Adds a secondary key, replacing any existing entry for the column.
    pub fn then(mut self, column: impl Into<String>, direction: Direction) -> Self {
        self.push(column.into(), direction);
        self
    }

    /// Returns the ordered entries.
    pub fn entries(&self) -> &[(String, Direction)] {
        &self.entries
    }

    /// Returns the number of sort keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no sort is active.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the direction a column is sorted in, if any.
    pub fn direction(&self, column: &str) -> Option<Direction> {
        self.entries
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, d)| *d)
    }

    /// Returns the position of a column among the sort keys.
    pub fn index_of(&self, column: &str) -> Option<usize> {
        self.entries.iter().position(|(c, _)| c == column)
    }

    /// Makes the column the only sort key.
    pub fn replace(&mut self, column: String, direction: Direction) {
        self.entries.clear();
        self.entries.push((column, direction));
    }

    /// Sets the direction of an existing key in place, or appends a new one.
    pub fn push(&mut self, column: String, direction: Direction) {
        match self.entries.iter_mut().find(|(c, _)| *c == column) {
            Some(entry) => entry.1 = direction,
            None => self.entries.push((column, direction)),
        }
    }

    /// Removes a column from the sort keys.
    pub fn remove(&mut self, column: &str) {
        self.entries.retain(|(c, _)| c != column);
    }

    /// Removes all sort keys.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Keeps only the entries accepted by `keep`.
    pub(crate) fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.entries.retain(|(c, _)| keep(c));
    }
}

/// Compares two rows' key tuples under a list of directions.
///
/// `a` and `b` hold one value per sort entry, in entry order.
pub(crate) fn compare_keys(a: &[Value], b: &[Value], directions: &[Direction]) -> Ordering {
    a.iter()
        .zip(b)
        .zip(directions)
        .map(|((x, y), dir)| dir.apply(x.total_cmp(y)))
        .find(|o| o.is_ne())
        .unwrap_or(Ordering::Equal)
}
