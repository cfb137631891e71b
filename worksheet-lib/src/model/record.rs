//! Dynamic worksheet record

use std::collections::HashMap;

use serde::Deserialize;
use serde::Serialize;

use super::Value;
use crate::error::FieldError;

/// Access to named fields of a row.
///
/// Field-keyed column accessors and the default identity chain read rows
/// through this trait. Returning `None` means the field is absent, which is
/// different from a present `Value::Null`.
pub trait Row {
    /// Returns the value of the named field, if the row has it.
    fn field(&self, name: &str) -> Option<Value>;
}

/// A dynamic record, such as a worksheet or a graded submission.
///
/// Records hold field values as a `HashMap<String, Value>` and serialize
/// transparently as a JSON object. Typed getters provide checked access.
///
/// # Example
///
/// ```
/// use worksheet_lib::model::Record;
///
/// let record = Record::new()
///     .set("worksheet_id", 12i64)
///     .set("title", "Fractions 1");
///
/// assert_eq!(record.get_string("title").unwrap(), Some("Fractions 1"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: HashMap<String, Value>,
}

impl Record {
    /// Creates a new empty record.
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Raw field access
    // =========================================================================

    /// Returns a reference to the field value, if it exists.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Returns `true` if the record contains the given field.
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Returns a reference to all fields.
    pub fn fields(&self) -> &HashMap<String, Value> {
        &self.fields
    }

    /// Returns a mutable reference to all fields.
    pub fn fields_mut(&mut self) -> &mut HashMap<String, Value> {
        &mut self.fields
    }

    // =========================================================================
    // Setters
    // =========================================================================

    /// Sets a field value (builder pattern).
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Inserts a field value.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Removes a field, returning its value if it existed.
    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.fields.remove(field)
    }

    // =========================================================================
    // Typed getters
    // =========================================================================

    /// Returns a string field.
    ///
    /// `Ok(None)` if the field is missing or null.
    pub fn get_string(&self, field: &str) -> Result<Option<&str>, FieldError> {
        match self.fields.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(other) => Err(FieldError::type_mismatch(field, "string", other.type_name())),
        }
    }

    /// Returns an integer field.
    pub fn get_i64(&self, field: &str) -> Result<Option<i64>, FieldError> {
        match self.fields.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Int(v)) => Ok(Some(*v)),
            Some(other) => Err(FieldError::type_mismatch(field, "int", other.type_name())),
        }
    }

    /// Returns a numeric field as a float. Integers are widened.
    pub fn get_f64(&self, field: &str) -> Result<Option<f64>, FieldError> {
        match self.fields.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(v @ (Value::Int(_) | Value::Float(_))) => Ok(v.as_f64()),
            Some(other) => Err(FieldError::type_mismatch(field, "float", other.type_name())),
        }
    }

    /// Returns a boolean field.
    pub fn get_bool(&self, field: &str) -> Result<Option<bool>, FieldError> {
        match self.fields.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Bool(v)) => Ok(Some(*v)),
            Some(other) => Err(FieldError::type_mismatch(field, "bool", other.type_name())),
        }
    }

    /// Returns a field that must be present.
    pub fn require(&self, field: &str) -> Result<&Value, FieldError> {
        self.fields.get(field).ok_or_else(|| FieldError::missing(field))
    }
}

impl Row for Record {
    fn field(&self, name: &str) -> Option<Value> {
        self.fields.get(name).cloned()
    }
}

impl Row for serde_json::Value {
    fn field(&self, name: &str) -> Option<Value> {
        self.get(name).cloned().map(Value::from)
    }
}

impl Row for HashMap<String, Value> {
    fn field(&self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_getters() {
        let record = Record::new()
            .set("title", "Fractions")
            .set("score", 90i64)
            .set("graded", true);

        assert_eq!(record.get_string("title").unwrap(), Some("Fractions"));
        assert_eq!(record.get_i64("score").unwrap(), Some(90));
        assert_eq!(record.get_f64("score").unwrap(), Some(90.0));
        assert_eq!(record.get_bool("graded").unwrap(), Some(true));
        assert_eq!(record.get_string("missing").unwrap(), None);
    }

    #[test]
    fn test_type_mismatch() {
        let record = Record::new().set("score", 90i64);
        let err = record.get_string("score").unwrap_err();
        assert!(matches!(
            err,
            FieldError::TypeMismatch {
                expected: "string",
                actual: "int",
                ..
            }
        ));
    }

    #[test]
    fn test_require_missing() {
        let record = Record::new();
        assert!(matches!(record.require("id"), Err(FieldError::Missing { .. })));
    }

    #[test]
    fn test_deserialize_object() {
        let record: Record =
            serde_json::from_str(r#"{"worksheet_id": 7, "subject": "math", "due": null}"#)
                .unwrap();
        assert_eq!(record.get_i64("worksheet_id").unwrap(), Some(7));
        assert_eq!(record.field("subject"), Some(Value::from("math")));
        assert_eq!(record.field("due"), Some(Value::Null));
        assert_eq!(record.field("nope"), None);
    }

    #[test]
    fn test_json_row() {
        let row = serde_json::json!({"id": 3, "name": "A"});
        assert_eq!(row.field("id"), Some(Value::Int(3)));
        assert_eq!(row.field("name"), Some(Value::from("A")));
    }
}
