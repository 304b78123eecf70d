use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use crate::utils::fetch::{fetch_bytes, FetchError};
use crate::utils::validation::MAX_CATALOG_DATASETS;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to fetch catalog: {0}")]
    Fetch(#[from] FetchError),

    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Catalog has too many datasets (>{0})")]
    TooManyDatasets(usize),

    #[error("Dataset '{0}' not found in catalog")]
    UnknownDataset(String),

    #[error("Dataset catalog is unavailable: {0}")]
    Unavailable(String),

    #[error("Dataset catalog is still loading")]
    Loading,
}

/// A selectable dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    pub label: String,
    pub source_url: String,
}

impl Dataset {
    pub fn new(label: impl Into<String>, source_url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            source_url: source_url.into(),
        }
    }
}

/// Catalog entry as published in `files.json`
#[derive(Debug, Deserialize)]
struct CatalogEntry {
    s3_url: String,
    label: String,
}

/// The loaded dataset catalog with a label index
#[derive(Debug, Clone, Default)]
pub struct DatasetCatalog {
    /// All datasets, in published order
    pub datasets: Vec<Dataset>,

    /// Index: label -> index of its first occurrence in datasets vec
    label_to_index: HashMap<String, usize>,
}

impl DatasetCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch and parse a catalog from a URL or local path
    pub async fn load(client: &reqwest::Client, location: &str) -> Result<Self, CatalogError> {
        let bytes = fetch_bytes(client, location).await?;
        let entries: Vec<CatalogEntry> = serde_json::from_slice(&bytes)?;
        Self::from_entries(entries)
    }

    /// Parse catalog from JSON string
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let entries: Vec<CatalogEntry> = serde_json::from_str(json)?;
        Self::from_entries(entries)
    }

    fn from_entries(entries: Vec<CatalogEntry>) -> Result<Self, CatalogError> {
        if entries.len() > MAX_CATALOG_DATASETS {
            return Err(CatalogError::TooManyDatasets(MAX_CATALOG_DATASETS));
        }

        let mut catalog = Self::new();
        for entry in entries {
            catalog.add_dataset(Dataset::new(entry.label, entry.s3_url));
        }
        Ok(catalog)
    }

    /// Add a dataset to the catalog
    pub fn add_dataset(&mut self, dataset: Dataset) {
        let index = self.datasets.len();
        if self.label_to_index.contains_key(&dataset.label) {
            tracing::warn!(
                "Duplicate dataset label '{}'; selection by label resolves to the first",
                dataset.label
            );
        } else {
            self.label_to_index.insert(dataset.label.clone(), index);
        }
        self.datasets.push(dataset);
    }

    /// Get a dataset by label
    pub fn get(&self, label: &str) -> Option<&Dataset> {
        self.label_to_index
            .get(label)
            .map(|&idx| &self.datasets[idx])
    }

    /// Resolve labels to datasets, keeping the order of `labels`.
    ///
    /// The selection borrows from the catalog; nothing is copied.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::UnknownDataset` for the first label not in the catalog.
    pub fn select<S: AsRef<str>>(&self, labels: &[S]) -> Result<Vec<&Dataset>, CatalogError> {
        labels
            .iter()
            .map(|label| {
                let label = label.as_ref();
                self.get(label)
                    .ok_or_else(|| CatalogError::UnknownDataset(label.to_string()))
            })
            .collect()
    }

    /// Number of datasets in catalog
    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    /// Check if catalog is empty
    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }
}

/// Availability of the dataset catalog while the startup fetch is in flight
#[derive(Debug, Clone, Default)]
pub enum CatalogState {
    #[default]
    Loading,
    Ready(DatasetCatalog),
    Unavailable(String),
}

impl CatalogState {
    /// Fetch the catalog, turning any failure into `Unavailable`
    pub async fn fetch(client: &reqwest::Client, location: &str) -> Self {
        match DatasetCatalog::load(client, location).await {
            Ok(catalog) => {
                tracing::info!("Loaded {} datasets from {}", catalog.len(), location);
                Self::Ready(catalog)
            }
            Err(e) => {
                tracing::warn!("Dataset catalog unavailable: {}", e);
                Self::Unavailable(e.to_string())
            }
        }
    }

    /// The loaded catalog.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Loading` or `CatalogError::Unavailable` when no
    /// catalog is ready.
    pub fn catalog(&self) -> Result<&DatasetCatalog, CatalogError> {
        match self {
            Self::Ready(catalog) => Ok(catalog),
            Self::Loading => Err(CatalogError::Loading),
            Self::Unavailable(reason) => Err(CatalogError::Unavailable(reason.clone())),
        }
    }

    /// Short status name used in API responses
    #[must_use]
    pub fn status(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Ready(_) => "ready",
            Self::Unavailable(_) => "unavailable",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const FILES_JSON: &str = r#"[
        {"s3_url": "https://bucket.s3.amazonaws.com/a.bw", "label": "Sample A"},
        {"s3_url": "https://bucket.s3.amazonaws.com/b.bw", "label": "Sample B"},
        {"s3_url": "https://bucket.s3.amazonaws.com/c.bw", "label": "Sample C"}
    ]"#;

    #[test]
    fn test_from_json() {
        let catalog = DatasetCatalog::from_json(FILES_JSON).unwrap();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.datasets[1].label, "Sample B");
        assert_eq!(
            catalog.datasets[1].source_url,
            "https://bucket.s3.amazonaws.com/b.bw"
        );
    }

    #[test]
    fn test_select_keeps_requested_order() {
        let catalog = DatasetCatalog::from_json(FILES_JSON).unwrap();
        let selection = catalog.select(&["Sample C", "Sample A"]).unwrap();
        let labels: Vec<&str> = selection.iter().map(|d| d.label.as_str()).collect();
        assert_eq!(labels, ["Sample C", "Sample A"]);

        // Selection borrows the catalog's datasets
        assert!(std::ptr::eq(selection[1], &catalog.datasets[0]));
    }

    #[test]
    fn test_select_unknown_label() {
        let catalog = DatasetCatalog::from_json(FILES_JSON).unwrap();
        let result = catalog.select(&["Sample A", "Sample Z"]);
        assert!(matches!(result, Err(CatalogError::UnknownDataset(label)) if label == "Sample Z"));
    }

    #[test]
    fn test_duplicate_label_resolves_to_first() {
        let mut catalog = DatasetCatalog::new();
        catalog.add_dataset(Dataset::new("A", "first.bw"));
        catalog.add_dataset(Dataset::new("A", "second.bw"));
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("A").unwrap().source_url, "first.bw");
    }

    #[test]
    fn test_invalid_json() {
        let result = DatasetCatalog::from_json(r#"[{"label": "missing url"}]"#);
        assert!(matches!(result, Err(CatalogError::Parse(_))));
    }

    #[tokio::test]
    async fn test_state_ready_from_file() {
        let mut file = NamedTempFile::with_suffix(".json").unwrap();
        file.write_all(FILES_JSON.as_bytes()).unwrap();

        let client = reqwest::Client::new();
        let state = CatalogState::fetch(&client, file.path().to_str().unwrap()).await;
        assert_eq!(state.status(), "ready");
        assert_eq!(state.catalog().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_state_unavailable_on_failure() {
        let client = reqwest::Client::new();
        let state = CatalogState::fetch(&client, "/nonexistent/facet-view/files.json").await;
        assert_eq!(state.status(), "unavailable");
        assert!(matches!(state.catalog(), Err(CatalogError::Unavailable(_))));
    }

    #[test]
    fn test_state_loading() {
        let state = CatalogState::default();
        assert_eq!(state.status(), "loading");
        assert!(matches!(state.catalog(), Err(CatalogError::Loading)));
    }
}
