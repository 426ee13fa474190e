//! Key Discovery
//!
//! Proposes which column pairs of two unrelated tables can serve as a join key:
//! 1. Same-name columns that look identifier-like in both tables (always reported)
//! 2. Differently named text or date-string columns whose value sets overlap enough
//!
//! Candidates are ranked by overlap score. Ties keep discovery order: same-name
//! pairs first, then cross-name pairs, each by column position in table 1 then table 2.

use crate::column::{Column, ColumnKind};
use crate::config::CrosserConfig;
use crate::table::Table;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::hash::Hash;
use tracing::{debug, info};

/// How a candidate pair was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchOrigin {
    SameName,
    CrossName,
}

/// Hypothesis that `left_column` (table 1) and `right_column` (table 2) relate rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateKeyPair {
    pub left_column: String,
    pub right_column: String,
    /// Overlap score in [0, 1]
    pub score: f64,
    pub origin: MatchOrigin,
}

/// Rank candidate key pairs using the default thresholds.
pub fn discover_candidates(left: &Table, right: &Table) -> Vec<CandidateKeyPair> {
    discover_candidates_with(left, right, &CrosserConfig::default())
}

/// Rank candidate key pairs, highest score first.
///
/// An empty result is a normal outcome for unrelated tables, not an error.
pub fn discover_candidates_with(
    left: &Table,
    right: &Table,
    config: &CrosserConfig,
) -> Vec<CandidateKeyPair> {
    let mut candidates = same_name_candidates(left, right, config);
    candidates.extend(cross_name_candidates(left, right, config));

    // sort_by is stable: equal scores keep emission order
    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));

    if candidates.is_empty() {
        info!(
            "No key candidates found between tables ({} x {} columns)",
            left.width(),
            right.width()
        );
    } else {
        debug!("Discovered {} key candidates", candidates.len());
    }
    candidates
}

fn same_name_candidates(left: &Table, right: &Table, config: &CrosserConfig) -> Vec<CandidateKeyPair> {
    let mut candidates = Vec::new();

    for col_left in left.columns() {
        let Some(col_right) = right.column(col_left.name()) else {
            continue;
        };
        if !identifier_like(col_left, col_right, config) {
            debug!(
                "Same-name column '{}' rejected: uniqueness {:.3} / {:.3}",
                col_left.name(),
                col_left.uniqueness_ratio(),
                col_right.uniqueness_ratio()
            );
            continue;
        }

        let score = overlap_score(&col_left.distinct_keys(), &col_right.distinct_keys());
        candidates.push(CandidateKeyPair {
            left_column: col_left.name().to_string(),
            right_column: col_right.name().to_string(),
            score,
            origin: MatchOrigin::SameName,
        });
    }

    candidates
}

// Numeric and unknown columns are never compared across names.
fn comparable_across_names(column: &Column) -> bool {
    matches!(column.kind(), ColumnKind::Text | ColumnKind::Temporal)
}

fn cross_name_candidates(left: &Table, right: &Table, config: &CrosserConfig) -> Vec<CandidateKeyPair> {
    let mut candidates = Vec::new();

    for col_left in left.columns() {
        if !comparable_across_names(col_left) {
            continue;
        }
        for col_right in right.columns() {
            if col_left.name() == col_right.name() || !comparable_across_names(col_right) {
                continue;
            }
            if !identifier_like(col_left, col_right, config) {
                continue;
            }

            let score = overlap_score(&col_left.distinct_rendered(), &col_right.distinct_rendered());
            if score > config.cross_name_min_overlap {
                candidates.push(CandidateKeyPair {
                    left_column: col_left.name().to_string(),
                    right_column: col_right.name().to_string(),
                    score,
                    origin: MatchOrigin::CrossName,
                });
            }
        }
    }

    candidates
}

fn identifier_like(a: &Column, b: &Column, config: &CrosserConfig) -> bool {
    a.uniqueness_ratio() > config.uniqueness_threshold
        && b.uniqueness_ratio() > config.uniqueness_threshold
}

/// Shared distinct values relative to the larger of the two sets; 0 when both are empty.
pub fn overlap_score<T: Eq + Hash>(a: &HashSet<T>, b: &HashSet<T>) -> f64 {
    let denominator = a.len().max(b.len());
    if denominator == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / denominator as f64
}
