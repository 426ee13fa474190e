//! Join quality metrics.

use crate::table::Table;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Flat record of how well a join performed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    pub rows_1: usize,
    pub rows_2: usize,
    pub rows_result: usize,
    pub columns_1: usize,
    pub columns_2: usize,
    pub columns_result: usize,
    /// rows(result) / rows(table 1), capped at 1
    pub match_rate_1: f64,
    /// rows(result) / rows(table 2), capped at 1
    pub match_rate_2: f64,
    /// Uncapped ratio; exceeds 1 when repeated keys multiply rows
    pub raw_match_rate_1: f64,
    pub raw_match_rate_2: f64,
    pub missing_cells: usize,
    /// Fraction of non-missing cells in the result; 1 for a zero-cell result
    pub completeness: f64,
    /// Unweighted mean of both match rates and completeness
    pub composite_score: f64,
}

/// Score a join result against its two inputs. Pure; never fails.
pub fn evaluate_quality(left: &Table, right: &Table, result: &Table) -> QualityReport {
    let rows_result = result.height();
    let raw_match_rate_1 = ratio(rows_result, left.height());
    let raw_match_rate_2 = ratio(rows_result, right.height());
    let match_rate_1 = raw_match_rate_1.min(1.0);
    let match_rate_2 = raw_match_rate_2.min(1.0);

    let cells = result.cell_count();
    let missing_cells = result.missing_cell_count();
    let completeness = if cells == 0 {
        1.0
    } else {
        1.0 - missing_cells as f64 / cells as f64
    };

    QualityReport {
        rows_1: left.height(),
        rows_2: right.height(),
        rows_result,
        columns_1: left.width(),
        columns_2: right.width(),
        columns_result: result.width(),
        match_rate_1,
        match_rate_2,
        raw_match_rate_1,
        raw_match_rate_2,
        missing_cells,
        completeness,
        composite_score: (match_rate_1 + match_rate_2 + completeness) / 3.0,
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

impl fmt::Display for QualityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Rows: {} x {} -> {}", self.rows_1, self.rows_2, self.rows_result)?;
        writeln!(f, "Match rate (1st): {:.1}%", self.match_rate_1 * 100.0)?;
        writeln!(f, "Match rate (2nd): {:.1}%", self.match_rate_2 * 100.0)?;
        writeln!(f, "Completeness:     {:.1}%", self.completeness * 100.0)?;
        write!(f, "Overall quality:  {:.1}%", self.composite_score * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::Column;
    use crate::value::Value;

    fn rows(n: usize) -> Table {
        Table::new(vec![Column::from_values("x", (0..n as i64).collect::<Vec<_>>())]).unwrap()
    }

    #[test]
    fn test_zero_row_inputs() {
        let empty = Table::empty_with_columns(&["x"]).unwrap();
        let report = evaluate_quality(&empty, &empty, &empty);
        assert_eq!(report.match_rate_1, 0.0);
        assert_eq!(report.match_rate_2, 0.0);
        assert_eq!(report.completeness, 1.0);
        assert!((report.composite_score - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_completeness_counts_missing_cells() {
        let result = Table::new(vec![
            Column::from_values("a", vec![Value::Int(1), Value::Null]),
            Column::from_values("b", vec![Value::Int(1), Value::Int(2)]),
        ])
        .unwrap();
        let report = evaluate_quality(&rows(2), &rows(4), &result);
        assert_eq!(report.missing_cells, 1);
        assert!((report.completeness - 0.75).abs() < 1e-12);
        assert_eq!(report.match_rate_1, 1.0);
        assert_eq!(report.match_rate_2, 0.5);
        assert!((report.composite_score - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_match_rate_capped() {
        let report = evaluate_quality(&rows(2), &rows(2), &rows(4));
        assert_eq!(report.raw_match_rate_1, 2.0);
        assert_eq!(report.match_rate_1, 1.0);
        assert!(report.composite_score <= 1.0);
    }
}
