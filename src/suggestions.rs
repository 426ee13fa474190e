//! Crossing suggestions across many datasets, and name-only column hints for
//! when value-based discovery comes up empty.

use crate::config::CrosserConfig;
use crate::key_discovery::discover_candidates_with;
use crate::table::Table;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use strsim::jaro_winkler;
use tracing::debug;

/// Column-name keyword families (Portuguese and English catalog vocabulary).
const KEYWORD_FAMILIES: &[(&str, &[&str])] = &[
    ("id", &["id", "codigo", "code", "identificador"]),
    ("name", &["nome", "name", "razao_social", "razao social"]),
    ("date", &["data", "date", "dt", "periodo"]),
    ("value", &["valor", "value", "montante", "amount"]),
    ("municipality", &["municipio", "cidade", "city", "local"]),
    ("state", &["estado", "uf", "state", "provincia"]),
    ("document", &["cpf", "cnpj", "documento", "document"]),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossingSuggestion {
    pub left_dataset: String,
    pub right_dataset: String,
    pub left_column: String,
    pub right_column: String,
    pub score: f64,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum HintReason {
    SameName,
    Keyword { family: String },
    SimilarName { similarity: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnHint {
    pub left_column: String,
    pub right_column: String,
    #[serde(flatten)]
    pub reason: HintReason,
}

/// Candidate crossings between every pair of datasets, best first.
///
/// Pairs are visited in input order (`i < j`); only candidates scoring above
/// `suggestion_min_score` are kept.
pub fn suggest_crossings(datasets: &[(&str, &Table)], config: &CrosserConfig) -> Vec<CrossingSuggestion> {
    let mut suggestions = Vec::new();

    for ((name_a, table_a), (name_b, table_b)) in datasets.iter().tuple_combinations() {
        for candidate in discover_candidates_with(table_a, table_b, config) {
            if candidate.score <= config.suggestion_min_score {
                continue;
            }
            suggestions.push(CrossingSuggestion {
                description: format!(
                    "Cross '{}' and '{}' using '{}' and '{}' (score: {:.2})",
                    name_a, name_b, candidate.left_column, candidate.right_column, candidate.score
                ),
                left_dataset: name_a.to_string(),
                right_dataset: name_b.to_string(),
                left_column: candidate.left_column,
                right_column: candidate.right_column,
                score: candidate.score,
            });
        }
    }

    suggestions.sort_by(|a, b| b.score.total_cmp(&a.score));
    debug!("{} crossing suggestions across {} datasets", suggestions.len(), datasets.len());
    suggestions
}

/// Name-based pairing hints. Each pair is reported once, with the first reason found:
/// same name, then shared keyword family, then similar normalized names.
pub fn column_name_hints(left: &Table, right: &Table, config: &CrosserConfig) -> Vec<ColumnHint> {
    let mut hints = Vec::new();
    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut push = |hints: &mut Vec<ColumnHint>, l: &str, r: &str, reason: HintReason| {
        if seen.insert((l.to_string(), r.to_string())) {
            hints.push(ColumnHint {
                left_column: l.to_string(),
                right_column: r.to_string(),
                reason,
            });
        }
    };

    for name in left.column_names() {
        if right.has_column(name) {
            push(&mut hints, name, name, HintReason::SameName);
        }
    }

    for (family, terms) in KEYWORD_FAMILIES {
        let in_family = |name: &str| {
            let lower = name.to_lowercase();
            terms.iter().any(|t| lower.contains(t))
        };
        for l in left.column_names().into_iter().filter(|n| in_family(*n)) {
            for r in right.column_names().into_iter().filter(|n| in_family(*n)) {
                if l != r {
                    push(
                        &mut hints,
                        l,
                        r,
                        HintReason::Keyword {
                            family: family.to_string(),
                        },
                    );
                }
            }
        }
    }

    for l in left.column_names() {
        for r in right.column_names() {
            if l == r {
                continue;
            }
            let similarity = jaro_winkler(&normalize_name(l), &normalize_name(r));
            if similarity >= config.name_similarity_threshold {
                push(&mut hints, l, r, HintReason::SimilarName { similarity });
            }
        }
    }

    hints
}

/// Lowercase, with every run of non-alphanumerics collapsed to one underscore.
fn normalize_name(name: &str) -> String {
    name.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .join("_")
}
