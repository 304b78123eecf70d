//! Runtime settings.
//!
//! Every field has a default, so a settings file only needs the keys it
//! overrides:
//!
//! ```json
//! { "catalog_url": "files.json", "fixed_prefix_count": 1 }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::core::region::{parse_region, Region, RegionError};
use crate::core::types::ViewId;
use crate::navigation::{default_reference_window, NavigationController, DEFAULT_ANIMATION_MS};
use crate::view::manager::DEFAULT_FIXED_PREFIX;

/// Published list of selectable datasets
pub const DEFAULT_CATALOG_URL: &str = "https://aveit.s3.amazonaws.com/misc/specificancer/files.json";

/// Chromosome sizes used to translate navigation regions
pub const DEFAULT_ASSEMBLY_CHROM_SIZES_URL: &str = "//s3.amazonaws.com/pkerp/data/hg19/chromSizes.tsv";

/// Chromosome sizes attached to every dataset track
pub const DEFAULT_TRACK_CHROM_SIZES_URL: &str =
    "https://aveit.s3.amazonaws.com/higlass/data/sequence/hg38.chrom.sizes";

pub const DEFAULT_VIEW_ID: &str = "aa";

pub const DEFAULT_EXPORT_FILE_NAME: &str = "cohort.svg";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to read settings: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse settings: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Invalid reference window: {0}")]
    ReferenceWindow(#[from] RegionError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Dataset catalog URL or path
    pub catalog_url: String,

    /// Chrom sizes for the assembly the view is navigated in
    pub assembly_chrom_sizes_url: String,

    /// Chrom sizes attached to dataset tracks
    pub track_chrom_sizes_url: String,

    pub view_id: String,

    /// Number of reserved tracks kept at the top of the view
    pub fixed_prefix_count: usize,

    pub animation_ms: u64,

    /// Secondary range sent with every zoom, as a region expression
    pub reference_window: String,

    pub export_file_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            assembly_chrom_sizes_url: DEFAULT_ASSEMBLY_CHROM_SIZES_URL.to_string(),
            track_chrom_sizes_url: DEFAULT_TRACK_CHROM_SIZES_URL.to_string(),
            view_id: DEFAULT_VIEW_ID.to_string(),
            fixed_prefix_count: DEFAULT_FIXED_PREFIX,
            animation_ms: DEFAULT_ANIMATION_MS,
            reference_window: default_reference_window().to_string(),
            export_file_name: DEFAULT_EXPORT_FILE_NAME.to_string(),
        }
    }
}

impl Settings {
    /// Load settings from `path`, or defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from_file(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&content)?;
        tracing::debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        // Surface a bad window at load time rather than on first navigation
        settings.reference_window()?;
        Ok(settings)
    }

    pub fn view_id(&self) -> ViewId {
        ViewId::new(&self.view_id)
    }

    pub fn reference_window(&self) -> Result<Region, RegionError> {
        parse_region(&self.reference_window)
    }

    /// A navigation controller configured from these settings
    pub fn navigation_controller(&self) -> Result<NavigationController, SettingsError> {
        Ok(NavigationController::new(self.view_id())
            .with_duration(Duration::from_millis(self.animation_ms))
            .with_reference_window(self.reference_window()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.view_id, "aa");
        assert_eq!(settings.fixed_prefix_count, 2);
        assert_eq!(settings.animation_ms, 2500);
        assert_eq!(
            settings.reference_window().unwrap(),
            Region::new("chr1", 0, "chr1", 1000)
        );
    }

    #[test]
    fn test_default_window_matches_controller() {
        let settings = Settings::default();
        assert_eq!(settings.reference_window, "chr1:0-chr1:1000");
        assert_eq!(settings.reference_window().unwrap(), default_reference_window());
    }

    #[test]
    fn test_partial_override() {
        let settings = Settings::from_json(r#"{"fixed_prefix_count": 1, "animation_ms": 100}"#).unwrap();
        assert_eq!(settings.fixed_prefix_count, 1);
        assert_eq!(settings.animation_ms, 100);
        assert_eq!(settings.catalog_url, DEFAULT_CATALOG_URL);
    }

    #[test]
    fn test_invalid_reference_window() {
        let result = Settings::from_json(r#"{"reference_window": "chr1:0"}"#);
        assert!(matches!(result, Err(SettingsError::ReferenceWindow(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::with_suffix(".json").unwrap();
        file.write_all(br#"{"view_id": "main"}"#).unwrap();

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.view_id(), ViewId::new("main"));
    }
}
