//! Scalar cell values and the normalized form used to compare join keys.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single cell of a [`crate::table::Table`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

/// Hashable, totally ordered form of a non-missing value.
///
/// Integral floats collapse onto `Int` so that `2` and `2.0` match, and
/// `-0.0` collapses onto `0.0`. Text never equals a number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeyValue {
    Bool(bool),
    Int(i64),
    Float(u64),
    Text(String),
}

impl Value {
    /// Null and NaN are both treated as missing.
    pub fn is_missing(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Float(f) => f.is_nan(),
            _ => false,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_)) && !self.is_missing()
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Normalized key for equality tests. `None` for missing values, which
    /// never match anything (not even another missing value).
    pub fn key(&self) -> Option<KeyValue> {
        match self {
            Value::Null => None,
            Value::Bool(b) => Some(KeyValue::Bool(*b)),
            Value::Int(i) => Some(KeyValue::Int(*i)),
            Value::Float(f) => {
                if f.is_nan() {
                    return None;
                }
                if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64 {
                    Some(KeyValue::Int(*f as i64))
                } else {
                    Some(KeyValue::Float(f.to_bits()))
                }
            }
            Value::Text(s) => Some(KeyValue::Text(s.clone())),
        }
    }

    /// Text rendering used when values of different types must be compared
    /// as strings. `None` for missing values.
    pub fn render(&self) -> Option<String> {
        if self.is_missing() {
            None
        } else {
            Some(self.to_string())
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}
