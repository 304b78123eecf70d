use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::core::types::ViewId;
use crate::view::track::Track;

#[derive(Error, Debug)]
pub enum ViewConfigError {
    #[error("Failed to read view configuration: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse view configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Engine view configuration: a list of views plus engine-level settings.
///
/// Only the `top` track list of each view is interpreted; everything else is
/// preserved through the `extra` maps so a configuration round-trips.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewConfig {
    pub views: Vec<View>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct View {
    pub uid: ViewId,

    #[serde(default)]
    pub tracks: ViewTracks,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewTracks {
    #[serde(default)]
    pub top: Vec<Track>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ViewConfig {
    /// Load the default view configuration compiled into the binary
    pub fn load_embedded() -> Result<Self, ViewConfigError> {
        // Validated at compile time by build.rs
        const EMBEDDED_VIEWCONF: &str = include_str!("../../viewconfs/default.json");
        Self::from_json(EMBEDDED_VIEWCONF)
    }

    /// Load a view configuration from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, ViewConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self, ViewConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ViewConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn view(&self, id: &ViewId) -> Option<&View> {
        self.views.iter().find(|v| &v.uid == id)
    }

    pub fn view_mut(&mut self, id: &ViewId) -> Option<&mut View> {
        self.views.iter_mut().find(|v| &v.uid == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::track::TrackKind;

    #[test]
    fn test_load_embedded() {
        let config = ViewConfig::load_embedded().unwrap();
        let view = config.view(&ViewId::new("aa")).unwrap();
        assert_eq!(view.tracks.top.len(), 2);
        assert!(view
            .tracks
            .top
            .iter()
            .all(|t| matches!(t.kind, TrackKind::Other(_))));
    }

    #[test]
    fn test_unknown_fields_round_trip() {
        let json = r#"{
            "editable": true,
            "views": [{
                "uid": "v1",
                "initialXDomain": [0, 100],
                "tracks": {"top": [], "left": []}
            }]
        }"#;
        let config = ViewConfig::from_json(json).unwrap();
        let round_trip: serde_json::Value =
            serde_json::from_str(&config.to_json().unwrap()).unwrap();
        let original: serde_json::Value = serde_json::from_str(json).unwrap();
        assert_eq!(round_trip, original);
    }

    #[test]
    fn test_view_lookup() {
        let config = ViewConfig::load_embedded().unwrap();
        assert!(config.view(&ViewId::new("missing")).is_none());
    }
}
