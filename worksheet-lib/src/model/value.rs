//! Value enum for dynamic field values

use std::cmp::Ordering;
use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// A dynamic value that can hold any worksheet field.
///
/// Rows handed to the table controller expose their fields as `Value`s so
/// that sorting, filtering and default rendering work without knowing the
/// concrete row type.
///
/// # Type Mapping
///
/// | JSON | Rust Variant |
/// |------|--------------|
/// | null | `Null` |
/// | boolean | `Bool` |
/// | integer | `Int` |
/// | number | `Float` |
/// | RFC 3339 string | `DateTime` |
/// | string | `String` |
/// | array, object | `Json` |
///
/// # Example
///
/// ```
/// use worksheet_lib::model::Value;
///
/// let title = Value::from("Fractions 1");
/// let score = Value::from(87i64);
/// let graded = Value::from(true);
/// let empty = Value::Null;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Null/empty value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// 64-bit integer.
    Int(i64),
    /// 64-bit floating point.
    Float(f64),
    /// Date and time in UTC.
    DateTime(DateTime<Utc>),
    /// String value.
    String(String),
    /// Fallback for arrays and objects.
    Json(serde_json::Value),
}

impl Value {
    /// Returns `true` if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the type name of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::DateTime(_) => "datetime",
            Value::String(_) => "string",
            Value::Json(_) => "json",
        }
    }

    /// Returns the value as a float if it is numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Text used for display and text matching. `Null` renders as empty.
    pub fn display_text(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    /// Rank of the variant family in the total order.
    fn rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Int(_) | Value::Float(_) => 2,
            Value::DateTime(_) => 3,
            Value::String(_) => 4,
            Value::Json(_) => 5,
        }
    }

    /// Total ordering used by table sorting.
    ///
    /// Values of different families order by family:
    /// null, bool, number, datetime, string, json. Integers and floats
    /// compare exactly by numeric value; NaN sorts at the end matching its
    /// sign. Strings compare case-insensitively, with byte order breaking
    /// ties.
    pub fn total_cmp(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => cmp_floats(*a, *b),
            (Value::Int(a), Value::Float(b)) => cmp_int_float(*a, *b),
            (Value::Float(a), Value::Int(b)) => cmp_int_float(*b, *a).reverse(),
            (Value::DateTime(a), Value::DateTime(b)) => a.cmp(b),
            (Value::String(a), Value::String(b)) => a
                .to_lowercase()
                .cmp(&b.to_lowercase())
                .then_with(|| a.cmp(b)),
            (Value::Json(a), Value::Json(b)) => a.to_string().cmp(&b.to_string()),
            (a, b) => a.rank().cmp(&b.rank()),
        }
    }
}

/// 2^63, the first float above every `i64`.
const I64_UPPER: f64 = 9_223_372_036_854_775_808.0;

/// Numeric float order where `-0.0 == 0.0`, so it agrees with
/// [`cmp_int_float`].
fn cmp_floats(a: f64, b: f64) -> Ordering {
    if a == b {
        Ordering::Equal
    } else {
        a.total_cmp(&b)
    }
}

/// Exact comparison of an integer with a float, without rounding the integer.
fn cmp_int_float(i: i64, f: f64) -> Ordering {
    if f.is_nan() {
        return if f.is_sign_negative() {
            Ordering::Greater
        } else {
            Ordering::Less
        };
    }
    if f >= I64_UPPER {
        return Ordering::Less;
    }
    if f < -I64_UPPER {
        return Ordering::Greater;
    }
    // In range, so the truncation is exact.
    let whole = f.trunc() as i64;
    i.cmp(&whole).then_with(|| {
        let frac = f.fract();
        if frac > 0.0 {
            Ordering::Less
        } else if frac < 0.0 {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    })
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::DateTime(v) => write!(f, "{}", v.to_rfc3339()),
            Value::String(v) => write!(f, "{}", v),
            Value::Json(v) => write!(f, "{}", v),
        }
    }
}

// =============================================================================
// From implementations
// =============================================================================

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::DateTime(v)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => n.as_f64().map(Value::Float).unwrap_or(Value::Null),
            },
            serde_json::Value::String(s) => match DateTime::parse_from_rfc3339(&s) {
                Ok(dt) => Value::DateTime(dt.with_timezone(&Utc)),
                Err(_) => Value::String(s),
            },
            other => Value::Json(other),
        }
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => Value::Null,
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_cross_compare() {
        assert_eq!(Value::Int(2).total_cmp(&Value::Float(2.5)), Ordering::Less);
        assert_eq!(Value::Float(3.0).total_cmp(&Value::Int(3)), Ordering::Equal);
    }

    #[test]
    fn test_numeric_compare_is_exact_past_f64_precision() {
        let big = 1i64 << 53;
        let int_above = Value::Int(big + 1);
        let int_at = Value::Int(big);
        let float_at = Value::Float(big as f64);

        assert_eq!(int_above.total_cmp(&float_at), Ordering::Greater);
        assert_eq!(float_at.total_cmp(&int_above), Ordering::Less);
        assert_eq!(float_at.total_cmp(&int_at), Ordering::Equal);
        assert_eq!(int_above.total_cmp(&int_at), Ordering::Greater);

        assert_eq!(Value::Int(i64::MAX).total_cmp(&Value::Float(I64_UPPER)), Ordering::Less);
        assert_eq!(Value::Int(i64::MIN).total_cmp(&Value::Float(-I64_UPPER)), Ordering::Equal);
        assert_eq!(Value::Int(-3).total_cmp(&Value::Float(-2.5)), Ordering::Less);
        assert_eq!(Value::Int(-2).total_cmp(&Value::Float(-2.5)), Ordering::Greater);
        assert_eq!(Value::Int(0).total_cmp(&Value::Float(-0.0)), Ordering::Equal);
        assert_eq!(Value::Float(-0.0).total_cmp(&Value::Float(0.0)), Ordering::Equal);
        assert_eq!(Value::Int(i64::MAX).total_cmp(&Value::Float(f64::NAN)), Ordering::Less);
    }

    #[test]
    fn test_mixed_numbers_sort_without_panicking() {
        let big = 1i64 << 53;
        let mut values = vec![
            Value::Int(big + 1),
            Value::Float(big as f64),
            Value::Int(big),
            Value::Float(1.5),
            Value::Int(-7),
        ];
        values.sort_by(Value::total_cmp);
        assert_eq!(
            values,
            vec![
                Value::Int(-7),
                Value::Float(1.5),
                Value::Float(big as f64),
                Value::Int(big),
                Value::Int(big + 1),
            ]
        );
    }

    #[test]
    fn test_strings_compare_case_insensitively() {
        assert_eq!(Value::from("a").total_cmp(&Value::from("B")), Ordering::Less);
        assert_eq!(Value::from("b").total_cmp(&Value::from("A")), Ordering::Greater);
        // Same letters: byte order keeps the order total.
        assert_eq!(Value::from("A").total_cmp(&Value::from("a")), Ordering::Less);
        assert_eq!(Value::from("a").total_cmp(&Value::from("a")), Ordering::Equal);
    }

    #[test]
    fn test_family_order() {
        assert_eq!(Value::Null.total_cmp(&Value::Int(0)), Ordering::Less);
        assert_eq!(Value::from("a").total_cmp(&Value::Int(99)), Ordering::Greater);
        assert_eq!(Value::Bool(true).total_cmp(&Value::Int(-5)), Ordering::Less);
    }

    #[test]
    fn test_from_json() {
        assert_eq!(Value::from(serde_json::json!(3)), Value::Int(3));
        assert_eq!(Value::from(serde_json::json!(1.5)), Value::Float(1.5));
        assert_eq!(Value::from(serde_json::json!("math")), Value::from("math"));
        assert!(matches!(
            Value::from(serde_json::json!("2024-03-01T09:00:00Z")),
            Value::DateTime(_)
        ));
    }

    #[test]
    fn test_deserialize_untagged() {
        let v: Value = serde_json::from_str("42").unwrap();
        assert_eq!(v, Value::Int(42));
        let v: Value = serde_json::from_str("\"korean\"").unwrap();
        assert_eq!(v, Value::from("korean"));
        let v: Value = serde_json::from_str("null").unwrap();
        assert!(v.is_null());
    }

    #[test]
    fn test_display_text() {
        assert_eq!(Value::Null.display_text(), "");
        assert_eq!(Value::from("B").display_text(), "B");
        assert_eq!(Value::Int(7).display_text(), "7");
    }
}
