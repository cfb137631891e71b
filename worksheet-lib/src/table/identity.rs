//! Row identity keys and extractors.

use std::fmt;
use std::sync::Arc;

use crate::model::Row;
use crate::model::Value;

/// Field tried first by the default identity chain.
pub const PRIMARY_ID_FIELD: &str = "id";

/// Field tried when the primary id is absent.
pub const FALLBACK_ID_FIELD: &str = "worksheet_id";

/// Stable identity of a row within a record set.
///
/// Keys track selection across re-renders and serve as rendering keys.
/// `Position` is only produced when a row carries no identity at all; it is
/// distinct from every `Number` and `Text` key so it can never collide with a
/// real id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RowKey {
    /// Numeric id.
    Number(i64),
    /// Textual id (e.g. a UUID string).
    Text(String),
    /// Position of the row in the record set it came from.
    Position(usize),
}

impl RowKey {
    /// Converts a field value into a key.
    ///
    /// Integers and integral floats become `Number`, non-empty strings
    /// become `Text`. Everything else has no usable identity.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Int(v) => Some(RowKey::Number(*v)),
            Value::Float(v) if v.fract() == 0.0 && v.is_finite() => Some(RowKey::Number(*v as i64)),
            Value::String(s) if !s.is_empty() => Some(RowKey::Text(s.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowKey::Number(n) => write!(f, "{}", n),
            RowKey::Text(s) => write!(f, "{}", s),
            RowKey::Position(i) => write!(f, "#{}", i),
        }
    }
}

impl From<i64> for RowKey {
    fn from(v: i64) -> Self {
        RowKey::Number(v)
    }
}

impl From<i32> for RowKey {
    fn from(v: i32) -> Self {
        RowKey::Number(v as i64)
    }
}

impl From<&str> for RowKey {
    fn from(v: &str) -> Self {
        RowKey::Text(v.to_string())
    }
}

impl From<String> for RowKey {
    fn from(v: String) -> Self {
        RowKey::Text(v)
    }
}

/// Derives a row's identity. `None` means the row has no identity.
pub type IdentityFn<T> = Arc<dyn Fn(&T) -> Option<RowKey>>;

/// Default identity chain: `id`, then `worksheet_id`.
pub fn default_identity<T: Row>(row: &T) -> Option<RowKey> {
    [PRIMARY_ID_FIELD, FALLBACK_ID_FIELD]
        .iter()
        .find_map(|name| row.field(name).as_ref().and_then(RowKey::from_value))
}

/// Identity chain over an explicit list of fields, tried in order.
pub fn field_chain<T: Row + 'static>(fields: &[&str]) -> IdentityFn<T> {
    let fields: Vec<String> = fields.iter().map(|f| f.to_string()).collect();
    Arc::new(move |row: &T| {
        fields
            .iter()
            .find_map(|name| row.field(name).as_ref().and_then(RowKey::from_value))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Record;

    #[test]
    fn test_default_prefers_id() {
        let row = Record::new().set("id", 4i64).set("worksheet_id", "ws-9");
        assert_eq!(default_identity(&row), Some(RowKey::Number(4)));
    }

    #[test]
    fn test_default_falls_back_to_worksheet_id() {
        let row = Record::new().set("worksheet_id", "ws-9");
        assert_eq!(default_identity(&row), Some(RowKey::from("ws-9")));

        let null_id = Record::new().set("id", Value::Null).set("worksheet_id", 12i64);
        assert_eq!(default_identity(&null_id), Some(RowKey::Number(12)));
    }

    #[test]
    fn test_default_none() {
        let row = Record::new().set("title", "no id");
        assert_eq!(default_identity(&row), None);
    }

    #[test]
    fn test_field_chain() {
        let identity = field_chain::<Record>(&["submission_id", "id"]);
        let row = Record::new().set("id", 1i64).set("submission_id", 77i64);
        assert_eq!(identity(&row), Some(RowKey::Number(77)));
    }

    #[test]
    fn test_integral_float() {
        assert_eq!(RowKey::from_value(&Value::Float(3.0)), Some(RowKey::Number(3)));
        assert_eq!(RowKey::from_value(&Value::Float(3.5)), None);
    }
}
