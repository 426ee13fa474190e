//! Immutable rectangular table consumed and produced by the crosser.

use crate::column::Column;
use crate::error::{CrossError, Result};
use crate::value::Value;
use std::collections::HashSet;

/// Ordered, distinct-named columns of equal length.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<Column>,
    height: usize,
}

impl Table {
    /// Build a table, validating that names are distinct and lengths agree.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let height = columns.first().map(Column::len).unwrap_or(0);
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.name()) {
                return Err(CrossError::DuplicateColumn(column.name().to_string()));
            }
            if column.len() != height {
                return Err(CrossError::LengthMismatch {
                    column: column.name().to_string(),
                    expected: height,
                    found: column.len(),
                });
            }
        }
        Ok(Self { columns, height })
    }

    /// A table with the given column names and no rows.
    pub fn empty_with_columns<S: AsRef<str>>(names: &[S]) -> Result<Self> {
        Self::new(
            names
                .iter()
                .map(|n| Column::new(n.as_ref(), Vec::new()))
                .collect(),
        )
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.height == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name() == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn cell(&self, row: usize, column: &str) -> Option<&Value> {
        self.column(column).and_then(|c| c.get(row))
    }

    /// Values of one row, in column order.
    pub fn row(&self, row: usize) -> Option<Vec<&Value>> {
        if row >= self.height {
            return None;
        }
        Some(self.columns.iter().filter_map(|c| c.get(row)).collect())
    }

    pub fn cell_count(&self) -> usize {
        self.height * self.columns.len()
    }

    pub fn missing_cell_count(&self) -> usize {
        self.columns.iter().map(Column::missing_count).sum()
    }

    /// First `n` rows as a new table.
    pub fn head(&self, n: usize) -> Table {
        let n = n.min(self.height);
        let columns = self
            .columns
            .iter()
            .map(|c| Column::new(c.name(), c.values()[..n].to_vec()))
            .collect();
        Table { columns, height: n }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_duplicate_names() {
        let err = Table::new(vec![
            Column::from_values("id", vec![1, 2]),
            Column::from_values("id", vec![3, 4]),
        ])
        .unwrap_err();
        assert!(matches!(err, CrossError::DuplicateColumn(name) if name == "id"));
    }

    #[test]
    fn test_rejects_ragged_columns() {
        let err = Table::new(vec![
            Column::from_values("id", vec![1, 2]),
            Column::from_values("name", vec!["a"]),
        ])
        .unwrap_err();
        assert!(matches!(err, CrossError::LengthMismatch { expected: 2, found: 1, .. }));
    }

    #[test]
    fn test_shape_and_missing_cells() {
        let table = Table::new(vec![
            Column::from_values("id", vec![Value::Int(1), Value::Null]),
            Column::from_values("name", vec![Value::from("a"), Value::Float(f64::NAN)]),
        ])
        .unwrap();
        assert_eq!(table.height(), 2);
        assert_eq!(table.width(), 2);
        assert_eq!(table.cell_count(), 4);
        assert_eq!(table.missing_cell_count(), 2);
        assert_eq!(table.cell(0, "name"), Some(&Value::from("a")));
        assert_eq!(table.head(1).height(), 1);
    }

    #[test]
    fn test_empty_table() {
        let table = Table::empty_with_columns(&["a", "b"]).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.width(), 2);
        assert_eq!(table.cell_count(), 0);
        assert!(table.row(0).is_none());
    }
}
