//! Data Crosser
//!
//! Entry point tying the pipeline together: discover candidate keys, join on a
//! chosen pair, score the result. Configuration is injected once at
//! construction; the crosser holds no other state and never mutates its inputs.

use crate::config::CrosserConfig;
use crate::error::Result;
use crate::join::{join_tables, JoinMode, JoinOptions, Suffixes};
use crate::key_discovery::{discover_candidates_with, CandidateKeyPair};
use crate::quality::{evaluate_quality, QualityReport};
use crate::table::Table;
use tracing::info;

/// A finished crossing: the joined table plus its quality report.
#[derive(Debug, Clone)]
pub struct Crossing {
    pub left_key: String,
    pub right_key: String,
    pub mode: JoinMode,
    pub table: Table,
    pub report: QualityReport,
}

#[derive(Debug, Clone, Default)]
pub struct DataCrosser {
    config: CrosserConfig,
}

impl DataCrosser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CrosserConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CrosserConfig {
        &self.config
    }

    /// Ranked candidate key pairs; empty when nothing looks joinable.
    pub fn discover(&self, left: &Table, right: &Table) -> Vec<CandidateKeyPair> {
        discover_candidates_with(left, right, &self.config)
    }

    /// Join options for `mode` using the configured default suffixes.
    pub fn join_options(&self, mode: JoinMode) -> JoinOptions {
        let (a, b) = &self.config.default_suffixes;
        JoinOptions::new(mode).with_suffixes(Suffixes::new(a.clone(), b.clone()))
    }

    pub fn join(
        &self,
        left: &Table,
        right: &Table,
        left_key: &str,
        right_key: &str,
        mode: JoinMode,
    ) -> Result<Table> {
        join_tables(left, right, left_key, right_key, &self.join_options(mode))
    }

    pub fn evaluate(&self, left: &Table, right: &Table, result: &Table) -> QualityReport {
        evaluate_quality(left, right, result)
    }

    /// Join and score in one call.
    pub fn cross(
        &self,
        left: &Table,
        right: &Table,
        left_key: &str,
        right_key: &str,
        options: &JoinOptions,
    ) -> Result<Crossing> {
        let table = join_tables(left, right, left_key, right_key, options)?;
        let report = evaluate_quality(left, right, &table);
        info!(
            "Crossing '{}' = '{}' scored {:.3} (completeness {:.3})",
            left_key, right_key, report.composite_score, report.completeness
        );
        Ok(Crossing {
            left_key: left_key.to_string(),
            right_key: right_key.to_string(),
            mode: options.mode,
            table,
            report,
        })
    }

    /// Discover, take the top-ranked pair and cross on it. `None` when no
    /// candidate exists, so the caller can fall back to manual selection.
    pub fn cross_best(&self, left: &Table, right: &Table, mode: JoinMode) -> Result<Option<Crossing>> {
        let Some(best) = self.discover(left, right).into_iter().next() else {
            return Ok(None);
        };
        let options = self.join_options(mode);
        self.cross(left, right, &best.left_column, &best.right_column, &options)
            .map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::Column;

    #[test]
    fn test_cross_best_uses_top_candidate() {
        let t1 = Table::new(vec![
            Column::from_values("id", vec![1, 2, 3]),
            Column::from_values("name", vec!["a", "b", "c"]),
        ])
        .unwrap();
        let t2 = Table::new(vec![
            Column::from_values("id", vec![2, 3, 4]),
            Column::from_values("val", vec![20, 30, 40]),
        ])
        .unwrap();

        let crossing = DataCrosser::new()
            .cross_best(&t1, &t2, JoinMode::Inner)
            .unwrap()
            .unwrap();
        assert_eq!(crossing.left_key, "id");
        assert_eq!(crossing.table.height(), 2);
    }

    #[test]
    fn test_cross_best_none_without_candidates() {
        let t1 = Table::new(vec![Column::from_values("a", vec![1, 2])]).unwrap();
        let t2 = Table::new(vec![Column::from_values("b", vec![1, 2])]).unwrap();
        assert!(DataCrosser::new().cross_best(&t1, &t2, JoinMode::Left).unwrap().is_none());
    }

    #[test]
    fn test_configured_suffixes() {
        let config = CrosserConfig {
            default_suffixes: ("_A".to_string(), "_B".to_string()),
            ..CrosserConfig::default()
        };
        let t1 = Table::new(vec![Column::from_values("id", vec![1])]).unwrap();
        let t2 = Table::new(vec![Column::from_values("id", vec![1])]).unwrap();
        let joined = DataCrosser::with_config(config)
            .join(&t1, &t2, "id", "id", JoinMode::Inner)
            .unwrap();
        assert_eq!(joined.column_names(), vec!["id_A", "id_B"]);
    }
}
