//! Join Execution
//!
//! Standard relational equi-join of two tables on one key column each.
//! Missing keys never match, repeated keys produce the full cross-product,
//! and both key columns are kept in the output.

use crate::column::Column;
use crate::error::{CrossError, Result};
use crate::table::Table;
use crate::value::{KeyValue, Value};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

/// Which unmatched rows survive the join.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinMode {
    Inner,
    Left,
    Right,
    Outer,
}

impl JoinMode {
    pub const ALL: [JoinMode; 4] = [JoinMode::Inner, JoinMode::Left, JoinMode::Right, JoinMode::Outer];

    pub fn as_str(&self) -> &'static str {
        match self {
            JoinMode::Inner => "inner",
            JoinMode::Left => "left",
            JoinMode::Right => "right",
            JoinMode::Outer => "outer",
        }
    }

    fn keeps_unmatched_left(&self) -> bool {
        matches!(self, JoinMode::Left | JoinMode::Outer)
    }

    fn keeps_unmatched_right(&self) -> bool {
        matches!(self, JoinMode::Right | JoinMode::Outer)
    }
}

impl FromStr for JoinMode {
    type Err = CrossError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "inner" => Ok(JoinMode::Inner),
            "left" => Ok(JoinMode::Left),
            "right" => Ok(JoinMode::Right),
            "outer" => Ok(JoinMode::Outer),
            _ => Err(CrossError::InvalidJoinMode { mode: s.to_string() }),
        }
    }
}

impl fmt::Display for JoinMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Suffixes appended to colliding column names of each side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suffixes {
    pub left: String,
    pub right: String,
}

impl Suffixes {
    pub fn new(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.left.is_empty() || self.right.is_empty() {
            return Err(CrossError::InvalidSuffixes(
                "suffixes must not be empty".to_string(),
            ));
        }
        if self.left == self.right {
            return Err(CrossError::InvalidSuffixes(format!(
                "both sides use '{}'",
                self.left
            )));
        }
        Ok(())
    }
}

impl Default for Suffixes {
    fn default() -> Self {
        Self::new("_1", "_2")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct JoinOptions {
    pub mode: JoinMode,
    pub suffixes: Suffixes,
    /// Names used for the two inputs in error messages
    pub labels: (String, String),
}

impl JoinOptions {
    pub fn new(mode: JoinMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn with_suffixes(mut self, suffixes: Suffixes) -> Self {
        self.suffixes = suffixes;
        self
    }

    pub fn with_labels(mut self, left: impl Into<String>, right: impl Into<String>) -> Self {
        self.labels = (left.into(), right.into());
        self
    }
}

impl Default for JoinOptions {
    fn default() -> Self {
        Self {
            mode: JoinMode::Inner,
            suffixes: Suffixes::default(),
            labels: ("first".to_string(), "second".to_string()),
        }
    }
}

/// Join `left` and `right` on `left[left_key] == right[right_key]`.
///
/// Output rows follow table-1 order; table-2 rows without a match (right/outer)
/// are appended afterwards in table-2 order.
pub fn join_tables(
    left: &Table,
    right: &Table,
    left_key: &str,
    right_key: &str,
    options: &JoinOptions,
) -> Result<Table> {
    let key_left = left.column(left_key).ok_or_else(|| CrossError::MissingColumn {
        column: left_key.to_string(),
        table: options.labels.0.clone(),
    })?;
    let key_right = right.column(right_key).ok_or_else(|| CrossError::MissingColumn {
        column: right_key.to_string(),
        table: options.labels.1.clone(),
    })?;
    options.suffixes.validate()?;

    info!(
        "Joining on '{}' = '{}' ({} join, {} x {} rows)",
        left_key,
        right_key,
        options.mode,
        left.height(),
        right.height()
    );

    let pairs = match_rows(key_left, key_right, options.mode);
    let names = output_names(left, right, &options.suffixes);

    let mut columns = Vec::with_capacity(names.len());
    let mut names = names.into_iter();
    for column in left.columns() {
        let name = names.next().unwrap_or_else(|| column.name().to_string());
        columns.push(gather(column, name, pairs.iter().map(|(l, _)| *l)));
    }
    for column in right.columns() {
        let name = names.next().unwrap_or_else(|| column.name().to_string());
        columns.push(gather(column, name, pairs.iter().map(|(_, r)| *r)));
    }

    let result = Table::new(columns)?;
    info!("Join produced {} rows, {} columns", result.height(), result.width());
    Ok(result)
}

/// Row index pairs of the join output, in output order.
fn match_rows(key_left: &Column, key_right: &Column, mode: JoinMode) -> Vec<(Option<usize>, Option<usize>)> {
    let mut index: HashMap<KeyValue, Vec<usize>> = HashMap::new();
    for (row, value) in key_right.values().iter().enumerate() {
        if let Some(key) = value.key() {
            index.entry(key).or_default().push(row);
        }
    }

    let mut matched_right = vec![false; key_right.len()];
    let mut pairs = Vec::new();

    for (row, value) in key_left.values().iter().enumerate() {
        match value.key().and_then(|k| index.get(&k)) {
            Some(rows) => {
                for &r in rows {
                    matched_right[r] = true;
                    pairs.push((Some(row), Some(r)));
                }
            }
            None if mode.keeps_unmatched_left() => pairs.push((Some(row), None)),
            None => {}
        }
    }

    if mode.keeps_unmatched_right() {
        pairs.extend(
            matched_right
                .iter()
                .enumerate()
                .filter(|(_, matched)| !**matched)
                .map(|(r, _)| (None, Some(r))),
        );
    }

    debug!("Matched {} output rows", pairs.len());
    pairs
}

/// Output column names: table-1 columns then table-2 columns, with both sides
/// of every shared name suffixed.
fn output_names(left: &Table, right: &Table, suffixes: &Suffixes) -> Vec<String> {
    let left_names: HashSet<&str> = left.column_names().into_iter().collect();
    let right_names: HashSet<&str> = right.column_names().into_iter().collect();
    let colliding: HashSet<&str> = left_names.intersection(&right_names).copied().collect();

    // Unsuffixed names keep priority; suffixed names are extended until unique.
    let mut used: HashSet<String> = left_names
        .iter()
        .chain(right_names.iter())
        .filter(|n| !colliding.contains(*n))
        .map(|n| n.to_string())
        .collect();

    let sides = left
        .column_names()
        .into_iter()
        .map(|n| (n, suffixes.left.as_str()))
        .chain(right.column_names().into_iter().map(|n| (n, suffixes.right.as_str())))
        .collect::<Vec<_>>();

    sides
        .into_iter()
        .map(|(name, suffix)| {
            if !colliding.contains(name) {
                return name.to_string();
            }
            let mut candidate = format!("{}{}", name, suffix);
            while used.contains(&candidate) {
                candidate.push_str(suffix);
            }
            used.insert(candidate.clone());
            candidate
        })
        .collect()
}

fn gather(column: &Column, name: String, rows: impl Iterator<Item = Option<usize>>) -> Column {
    let values = rows
        .map(|row| {
            row.and_then(|r| column.get(r))
                .cloned()
                .unwrap_or(Value::Null)
        })
        .collect();
    Column::new(name, values)
}
