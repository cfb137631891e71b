//! Column filter values and the filter state map.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use crate::model::Value;

/// Custom per-column filter: `(cell value, filter value) -> keep row`.
pub type FilterFn = Arc<dyn Fn(&Value, &FilterValue) -> bool>;

/// A filter applied to a single column.
///
/// # Example
///
/// ```
/// use worksheet_lib::model::Value;
/// use worksheet_lib::table::FilterValue;
///
/// let by_subject = FilterValue::one_of(["math", "english"]);
/// assert!(by_subject.matches(&Value::from("math")));
///
/// let passing = FilterValue::at_least(60i64);
/// assert!(!passing.matches(&Value::from(45i64)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    /// Case-insensitive substring of the cell's display text.
    Text(String),
    /// Cell equals the value.
    Equals(Value),
    /// Cell equals any of the values.
    OneOf(Vec<Value>),
    /// Cell lies within the inclusive bounds. Missing bounds are open.
    Range {
        min: Option<Value>,
        max: Option<Value>,
    },
    /// Opaque payload understood only by a column's custom filter function.
    Custom(serde_json::Value),
}

impl FilterValue {
    /// Creates a text filter.
    pub fn text(needle: impl Into<String>) -> Self {
        FilterValue::Text(needle.into())
    }

    /// Creates an equality filter.
    pub fn equals(value: impl Into<Value>) -> Self {
        FilterValue::Equals(value.into())
    }

    /// Creates a membership filter.
    pub fn one_of<V: Into<Value>>(values: impl IntoIterator<Item = V>) -> Self {
        FilterValue::OneOf(values.into_iter().map(Into::into).collect())
    }

    /// Creates an inclusive range filter.
    pub fn between(min: impl Into<Value>, max: impl Into<Value>) -> Self {
        FilterValue::Range {
            min: Some(min.into()),
            max: Some(max.into()),
        }
    }

    /// Creates a lower-bounded range filter.
    pub fn at_least(min: impl Into<Value>) -> Self {
        FilterValue::Range {
            min: Some(min.into()),
            max: None,
        }
    }

    /// Creates an upper-bounded range filter.
    pub fn at_most(max: impl Into<Value>) -> Self {
        FilterValue::Range {
            min: None,
            max: Some(max.into()),
        }
    }

    /// Built-in matching used when a column has no custom filter function.
    ///
    /// `Custom` payloads have no built-in meaning and match every row.
    pub fn matches(&self, cell: &Value) -> bool {
        match self {
            FilterValue::Text(needle) => contains_ignore_case(&cell.display_text(), needle),
            FilterValue::Equals(v) => cell.total_cmp(v) == Ordering::Equal,
            FilterValue::OneOf(values) => values.iter().any(|v| cell.total_cmp(v) == Ordering::Equal),
            FilterValue::Range { min, max } => {
                if cell.is_null() {
                    return false;
                }
                let above = min.as_ref().is_none_or(|m| cell.total_cmp(m) != Ordering::Less);
                let below = max.as_ref().is_none_or(|m| cell.total_cmp(m) != Ordering::Greater);
                above && below
            }
            FilterValue::Custom(_) => true,
        }
    }
}

/// Case-insensitive substring test. An empty needle matches everything.
pub(crate) fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Active column filters keyed by column id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    filters: HashMap<String, FilterValue>,
}

impl FilterState {
    /// Creates an empty filter state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a filter (builder pattern).
    pub fn with(mut self, column: impl Into<String>, value: FilterValue) -> Self {
        self.filters.insert(column.into(), value);
        self
    }

    /// Sets or removes the filter for a column.
    pub fn set(&mut self, column: impl Into<String>, value: Option<FilterValue>) {
        let column = column.into();
        match value {
            Some(v) => {
                self.filters.insert(column, v);
            }
            None => {
                self.filters.remove(&column);
            }
        }
    }

    /// Returns the filter on a column.
    pub fn get(&self, column: &str) -> Option<&FilterValue> {
        self.filters.get(column)
    }

    /// Iterates over `(column, filter)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.filters.iter().map(|(c, f)| (c.as_str(), f))
    }

    /// Returns `true` if no column filter is active.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Returns the number of active filters.
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Removes all filters.
    pub fn clear(&mut self) {
        self.filters.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_is_case_insensitive() {
        let f = FilterValue::text("frac");
        assert!(f.matches(&Value::from("Fractions 1")));
        assert!(!f.matches(&Value::from("Decimals")));
        assert!(FilterValue::text("").matches(&Value::Null));
    }

    #[test]
    fn test_text_on_numbers() {
        assert!(FilterValue::text("12").matches(&Value::Int(3120)));
    }

    #[test]
    fn test_range_bounds_inclusive() {
        let f = FilterValue::between(60i64, 80i64);
        assert!(f.matches(&Value::Int(60)));
        assert!(f.matches(&Value::Float(80.0)));
        assert!(!f.matches(&Value::Int(81)));
        assert!(!f.matches(&Value::Null));
    }

    #[test]
    fn test_one_of() {
        let f = FilterValue::one_of([1i64, 3]);
        assert!(f.matches(&Value::Int(3)));
        assert!(!f.matches(&Value::Int(2)));
    }

    #[test]
    fn test_state_set_none_removes() {
        let mut state = FilterState::new().with("name", FilterValue::text("A"));
        assert_eq!(state.len(), 1);
        state.set("name", None);
        assert!(state.is_empty());
    }
}
