//! Dataset Registry - named tables loaded during a session
//!
//! Keeps every table the user has loaded (from a catalog or from a previous
//! crossing) under a unique name, in insertion order, together with where it
//! came from. Crossing two registered datasets registers the result as a new
//! dataset. Only the manifest (names + origin metadata) is persisted; tables
//! are always reloaded from their source.

use crate::crosser::DataCrosser;
use crate::error::{CrossError, Result};
use crate::join::{JoinMode, JoinOptions, Suffixes};
use crate::quality::QualityReport;
use crate::suggestions::{suggest_crossings, CrossingSuggestion};
use crate::table::Table;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Origin recorded for datasets produced by crossing two others.
pub const CROSSING_ORIGIN: &str = "Crossing";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetInfo {
    pub name: String,
    /// Catalog the data came from (e.g. "Portal da Transparência", "dados.gov.br")
    pub origin: Option<String>,
    pub category: Option<String>,
    pub row_count: usize,
    pub column_count: usize,
}

#[derive(Debug, Clone)]
struct RegisteredDataset {
    info: DatasetInfo,
    table: Table,
}

/// Result of crossing two registered datasets.
#[derive(Debug, Clone)]
pub struct RegisteredCrossing {
    /// Name the joined table was registered under
    pub name: String,
    pub report: QualityReport,
}

#[derive(Debug, Clone, Default)]
pub struct DatasetRegistry {
    datasets: Vec<RegisteredDataset>,
    crosser: DataCrosser,
}

impl DatasetRegistry {
    pub fn new(crosser: DataCrosser) -> Self {
        Self {
            datasets: Vec::new(),
            crosser,
        }
    }

    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }

    pub fn register(
        &mut self,
        name: impl Into<String>,
        table: Table,
        origin: Option<&str>,
        category: Option<&str>,
    ) -> Result<&DatasetInfo> {
        let name = name.into();
        if self.position(&name).is_some() {
            return Err(CrossError::DuplicateDataset(name));
        }
        Ok(self.insert(name, table, origin, category))
    }

    fn insert(&mut self, name: String, table: Table, origin: Option<&str>, category: Option<&str>) -> &DatasetInfo {
        let info = DatasetInfo {
            name,
            origin: origin.map(str::to_string),
            category: category.map(str::to_string),
            row_count: table.height(),
            column_count: table.width(),
        };
        info!(
            "Registered dataset '{}' ({} rows, {} columns)",
            info.name, info.row_count, info.column_count
        );
        self.datasets.push(RegisteredDataset { info, table });
        let last = self.datasets.len() - 1;
        &self.datasets[last].info
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.datasets.iter().position(|d| d.info.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&Table> {
        self.datasets.iter().find(|d| d.info.name == name).map(|d| &d.table)
    }

    pub fn info(&self, name: &str) -> Option<&DatasetInfo> {
        self.datasets.iter().find(|d| d.info.name == name).map(|d| &d.info)
    }

    pub fn names(&self) -> Vec<&str> {
        self.datasets.iter().map(|d| d.info.name.as_str()).collect()
    }

    pub fn infos(&self) -> Vec<&DatasetInfo> {
        self.datasets.iter().map(|d| &d.info).collect()
    }

    pub fn remove(&mut self, name: &str) -> Result<Table> {
        let idx = self
            .position(name)
            .ok_or_else(|| CrossError::UnknownDataset(name.to_string()))?;
        Ok(self.datasets.remove(idx).table)
    }

    fn require(&self, name: &str) -> Result<&Table> {
        self.get(name)
            .ok_or_else(|| CrossError::UnknownDataset(name.to_string()))
    }

    /// Cross two registered datasets and register the result as
    /// `"Crossing <left> + <right>"`, replacing an earlier crossing of the same pair.
    /// Colliding columns are suffixed with `_<dataset name>`, or `_<name>_1` and
    /// `_<name>_2` when a dataset is crossed with itself.
    ///
    /// A dataset already registered under the crossing name from another origin
    /// is never overwritten.
    pub fn cross(
        &mut self,
        left: &str,
        right: &str,
        left_key: &str,
        right_key: &str,
        mode: JoinMode,
    ) -> Result<RegisteredCrossing> {
        let name = format!("Crossing {} + {}", left, right);
        let previous = self.position(&name);
        if let Some(idx) = previous {
            if self.datasets[idx].info.origin.as_deref() != Some(CROSSING_ORIGIN) {
                return Err(CrossError::DuplicateDataset(name));
            }
        }

        let crossing = {
            let left_table = self.require(left)?;
            let right_table = self.require(right)?;
            let options = JoinOptions::new(mode)
                .with_suffixes(dataset_suffixes(left, right))
                .with_labels(left, right);
            self.crosser
                .cross(left_table, right_table, left_key, right_key, &options)?
        };

        if let Some(idx) = previous {
            self.datasets.remove(idx);
        }
        self.insert(name.clone(), crossing.table, Some(CROSSING_ORIGIN), None);

        Ok(RegisteredCrossing {
            name,
            report: crossing.report,
        })
    }

    /// Crossing suggestions across every registered dataset.
    pub fn suggest(&self) -> Vec<CrossingSuggestion> {
        let datasets: Vec<(&str, &Table)> = self
            .datasets
            .iter()
            .map(|d| (d.info.name.as_str(), &d.table))
            .collect();
        suggest_crossings(&datasets, self.crosser.config())
    }

    pub fn manifest(&self) -> Vec<DatasetInfo> {
        self.datasets.iter().map(|d| d.info.clone()).collect()
    }

    /// Save the manifest as pretty JSON.
    pub fn save_manifest(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = serde_json::to_string_pretty(&self.manifest())?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load a manifest written by [`DatasetRegistry::save_manifest`].
    pub fn load_manifest(path: impl AsRef<Path>) -> Result<Vec<DatasetInfo>> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

fn dataset_suffixes(left: &str, right: &str) -> Suffixes {
    if left == right {
        Suffixes::new(format!("_{}_1", left), format!("_{}_2", right))
    } else {
        Suffixes::new(format!("_{}", left), format!("_{}", right))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::Column;

    fn registry() -> DatasetRegistry {
        let mut registry = DatasetRegistry::default();
        registry
            .register(
                "contracts",
                Table::new(vec![
                    Column::from_values("cnpj", vec!["11", "22", "33"]),
                    Column::from_values("valor", vec![10.0, 20.0, 30.0]),
                ])
                .unwrap(),
                Some("Portal da Transparência"),
                Some("Contratos"),
            )
            .unwrap();
        registry
            .register(
                "companies",
                Table::new(vec![
                    Column::from_values("cnpj", vec!["22", "33", "44"]),
                    Column::from_values("razao_social", vec!["B", "C", "D"]),
                ])
                .unwrap(),
                Some("dados.gov.br"),
                None,
            )
            .unwrap();
        registry
    }

    #[test]
    fn test_register_rejects_duplicates() {
        let mut registry = registry();
        let err = registry
            .register("contracts", Table::default(), None, None)
            .unwrap_err();
        assert!(matches!(err, CrossError::DuplicateDataset(_)));
        assert_eq!(registry.names(), vec!["contracts", "companies"]);
    }

    #[test]
    fn test_cross_registers_result() {
        let mut registry = registry();
        let crossing = registry
            .cross("contracts", "companies", "cnpj", "cnpj", JoinMode::Inner)
            .unwrap();

        assert_eq!(crossing.name, "Crossing contracts + companies");
        assert_eq!(crossing.report.rows_result, 2);

        let table = registry.get(&crossing.name).unwrap();
        assert!(table.has_column("cnpj_contracts"));
        assert!(table.has_column("cnpj_companies"));
        assert_eq!(
            registry.info(&crossing.name).unwrap().origin.as_deref(),
            Some(CROSSING_ORIGIN)
        );

        // Crossing again replaces instead of failing
        registry
            .cross("contracts", "companies", "cnpj", "cnpj", JoinMode::Left)
            .unwrap();
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_self_cross_gets_distinct_suffixes() {
        let mut registry = registry();
        let crossing = registry
            .cross("contracts", "contracts", "cnpj", "cnpj", JoinMode::Inner)
            .unwrap();

        assert_eq!(crossing.name, "Crossing contracts + contracts");
        assert_eq!(crossing.report.rows_result, 3);
        let table = registry.get(&crossing.name).unwrap();
        assert_eq!(
            table.column_names(),
            vec!["cnpj_contracts_1", "valor_contracts_1", "cnpj_contracts_2", "valor_contracts_2"]
        );
    }

    #[test]
    fn test_cross_keeps_user_dataset_with_crossing_name() {
        let mut registry = registry();
        registry
            .register("Crossing contracts + companies", Table::default(), Some("dados.gov.br"), None)
            .unwrap();

        let err = registry
            .cross("contracts", "companies", "cnpj", "cnpj", JoinMode::Inner)
            .unwrap_err();
        assert!(matches!(err, CrossError::DuplicateDataset(_)));
        assert_eq!(registry.len(), 3);
        assert_eq!(
            registry.info("Crossing contracts + companies").unwrap().origin.as_deref(),
            Some("dados.gov.br")
        );
    }

    #[test]
    fn test_cross_reports_dataset_name_for_missing_key() {
        let mut registry = registry();
        let err = registry
            .cross("contracts", "companies", "cnpj", "nope", JoinMode::Inner)
            .unwrap_err();
        assert!(err.to_string().contains("companies"));

        let err = registry
            .cross("contracts", "ghost", "cnpj", "cnpj", JoinMode::Inner)
            .unwrap_err();
        assert!(matches!(err, CrossError::UnknownDataset(_)));
    }

    #[test]
    fn test_manifest_round_trip() {
        let registry = registry();
        let path = std::env::temp_dir().join("data_crosser_registry_manifest.json");
        registry.save_manifest(&path).unwrap();
        let loaded = DatasetRegistry::load_manifest(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded, registry.manifest());
        assert_eq!(loaded[0].category.as_deref(), Some("Contratos"));
    }

    #[test]
    fn test_suggest_uses_registered_names() {
        let registry = registry();
        let suggestions = registry.suggest();
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].left_dataset, "contracts");
        assert!((suggestions[0].score - 2.0 / 3.0).abs() < 1e-12);
    }
}
