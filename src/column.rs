//! Named value sequences and their inferred kind.

use crate::value::{KeyValue, Value};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d"];
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Classification of a column derived from its values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Numeric,
    Text,
    Temporal,
    Unknown,
}

impl ColumnKind {
    /// Classify a value sequence. Only non-missing values are inspected:
    /// - nothing left → `Unknown`
    /// - all ints/floats → `Numeric`
    /// - all booleans → `Unknown`
    /// - all text that parses as a date or datetime → `Temporal`
    /// - anything else (text or mixed) → `Text`
    pub fn classify(values: &[Value]) -> Self {
        let mut present = values.iter().filter(|v| !v.is_missing()).peekable();
        if present.peek().is_none() {
            return ColumnKind::Unknown;
        }

        let (mut numeric, mut boolean, mut text, mut temporal) = (0usize, 0usize, 0usize, 0usize);
        for value in present {
            match value {
                Value::Int(_) | Value::Float(_) => numeric += 1,
                Value::Bool(_) => boolean += 1,
                Value::Text(s) => {
                    text += 1;
                    if looks_temporal(s) {
                        temporal += 1;
                    }
                }
                Value::Null => {}
            }
        }

        if text == 0 && boolean == 0 {
            ColumnKind::Numeric
        } else if text == 0 && numeric == 0 {
            ColumnKind::Unknown
        } else if numeric == 0 && boolean == 0 && temporal == text {
            ColumnKind::Temporal
        } else {
            ColumnKind::Text
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnKind::Numeric => "numeric",
            ColumnKind::Text => "text",
            ColumnKind::Temporal => "temporal",
            ColumnKind::Unknown => "unknown",
        }
    }
}

/// True when `s` parses as one of the accepted date or datetime layouts.
pub fn looks_temporal(s: &str) -> bool {
    let s = s.trim();
    if s.is_empty() {
        return false;
    }
    DATE_FORMATS
        .iter()
        .any(|fmt| NaiveDate::parse_from_str(s, fmt).is_ok())
        || DATETIME_FORMATS
            .iter()
            .any(|fmt| NaiveDateTime::parse_from_str(s, fmt).is_ok())
        || DateTime::parse_from_rfc3339(s).is_ok()
}

/// A named column. The kind is classified once, at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    values: Vec<Value>,
    kind: ColumnKind,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        let kind = ColumnKind::classify(&values);
        Self {
            name: name.into(),
            values,
            kind,
        }
    }

    /// Build a column from anything convertible into [`Value`].
    pub fn from_values<T: Into<Value>>(name: impl Into<String>, values: impl IntoIterator<Item = T>) -> Self {
        Self::new(name, values.into_iter().map(Into::into).collect())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn kind(&self) -> ColumnKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, row: usize) -> Option<&Value> {
        self.values.get(row)
    }

    pub fn missing_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_missing()).count()
    }

    /// Distinct non-missing values under join-key equality.
    pub fn distinct_keys(&self) -> HashSet<KeyValue> {
        self.values.iter().filter_map(Value::key).collect()
    }

    /// Distinct non-missing values rendered as text.
    pub fn distinct_rendered(&self) -> HashSet<String> {
        self.values.iter().filter_map(Value::render).collect()
    }

    /// Distinct non-missing values divided by row count; 0 for an empty column.
    pub fn uniqueness_ratio(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        self.distinct_keys().len() as f64 / self.values.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_numeric() {
        let col = Column::from_values("v", vec![Value::Int(1), Value::Float(2.5), Value::Null]);
        assert_eq!(col.kind(), ColumnKind::Numeric);
    }

    #[test]
    fn test_classify_text_and_mixed() {
        assert_eq!(Column::from_values("n", vec!["a", "b"]).kind(), ColumnKind::Text);
        let mixed = Column::from_values("m", vec![Value::Int(1), Value::from("x")]);
        assert_eq!(mixed.kind(), ColumnKind::Text);
    }

    #[test]
    fn test_classify_temporal() {
        let col = Column::from_values("d", vec!["2024-01-15", "15/02/2024", "2024-03-01T10:00:00"]);
        assert_eq!(col.kind(), ColumnKind::Temporal);

        let partly = Column::from_values("d", vec!["2024-01-15", "not a date"]);
        assert_eq!(partly.kind(), ColumnKind::Text);
    }

    #[test]
    fn test_classify_unknown() {
        assert_eq!(Column::from_values("e", Vec::<Value>::new()).kind(), ColumnKind::Unknown);
        assert_eq!(Column::from_values("n", vec![Value::Null, Value::Null]).kind(), ColumnKind::Unknown);
        assert_eq!(Column::from_values("b", vec![true, false]).kind(), ColumnKind::Unknown);
    }

    #[test]
    fn test_classification_is_deterministic() {
        let values = vec![Value::from("2024-01-01"), Value::Null, Value::from("abc")];
        assert_eq!(ColumnKind::classify(&values), ColumnKind::classify(&values));
    }

    #[test]
    fn test_uniqueness_ratio() {
        let col = Column::from_values("id", vec![Value::Int(1), Value::Int(1), Value::Int(2), Value::Null]);
        assert!((col.uniqueness_ratio() - 0.5).abs() < 1e-12);
        assert_eq!(Column::from_values("x", Vec::<Value>::new()).uniqueness_ratio(), 0.0);
    }
}
