use serde::{Deserialize, Serialize};

use crate::catalog::store::Dataset;
use crate::core::types::TrackId;

/// Engine track type used for spacers
pub const SPACER_TRACK_TYPE: &str = "text";

/// Engine track type used for dataset tracks
pub const DATA_TRACK_TYPE: &str = "bar";

/// Engine data source type for bigWig files
pub const BIGWIG_DATA_TYPE: &str = "bbi";

pub const SPACER_SIZE: TrackSize = TrackSize {
    width: 568,
    height: 10,
};

pub const DATA_TRACK_SIZE: TrackSize = TrackSize {
    width: 20,
    height: 50,
};

/// What a track contributes to the view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TrackKind {
    /// Blank separator between dataset tracks
    Spacer,
    /// A dataset's display lane
    DataTrack,
    /// Any other engine-native track type, carried verbatim
    Other(String),
}

impl From<String> for TrackKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            SPACER_TRACK_TYPE => Self::Spacer,
            DATA_TRACK_TYPE => Self::DataTrack,
            _ => Self::Other(s),
        }
    }
}

impl From<TrackKind> for String {
    fn from(kind: TrackKind) -> Self {
        match kind {
            TrackKind::Spacer => SPACER_TRACK_TYPE.to_string(),
            TrackKind::DataTrack => DATA_TRACK_TYPE.to_string(),
            TrackKind::Other(s) => s,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackSize {
    pub width: u32,
    pub height: u32,
}

/// Where a dataset track reads its values from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackData {
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
    pub chrom_sizes_url: String,
}

impl From<TrackData> for serde_json::Value {
    fn from(data: TrackData) -> Self {
        serde_json::json!({
            "type": data.kind,
            "url": data.url,
            "chromSizesUrl": data.chrom_sizes_url,
        })
    }
}

/// One entry of a view's track list, in the engine's wire format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    #[serde(rename = "uid")]
    pub id: TrackId,

    #[serde(rename = "type")]
    pub kind: TrackKind,

    /// Data source block; any shape the engine understands
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,

    /// Renderer options; opaque to the core
    #[serde(
        default,
        rename = "options",
        skip_serializing_if = "serde_json::Value::is_null"
    )]
    pub display_options: serde_json::Value,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,

    /// Engine fields the core does not interpret
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Ordered track list; order is the visual stacking order
pub type TrackSequence = Vec<Track>;

impl Track {
    /// Blank text track used to separate dataset tracks
    pub fn spacer(id: TrackId) -> Self {
        Self {
            id,
            kind: TrackKind::Spacer,
            data: None,
            display_options: serde_json::json!({
                "backgroundColor": "#ffffff",
                "textColor": "#333333",
                "fontSize": 14,
                "fontFamily": "Arial",
                "fontWeight": "normal",
                "offsetY": 0,
                "align": "left",
                "text": "",
            }),
            width: Some(SPACER_SIZE.width),
            height: Some(SPACER_SIZE.height),
            extra: serde_json::Map::new(),
        }
    }

    /// Bar track over a bigWig dataset, labelled with the dataset label
    pub fn data_track(id: TrackId, dataset: &Dataset, chrom_sizes_url: &str) -> Self {
        Self {
            id,
            kind: TrackKind::DataTrack,
            data: Some(
                TrackData {
                    kind: BIGWIG_DATA_TYPE.to_string(),
                    url: dataset.source_url.clone(),
                    chrom_sizes_url: chrom_sizes_url.to_string(),
                }
                .into(),
            ),
            display_options: serde_json::json!({
                "labelPosition": "bottomLeft",
                "labelLeftMargin": 0,
                "labelRightMargin": 0,
                "labelTopMargin": 0,
                "labelColor": "black",
                "labelBottomMargin": 0,
                "labelShowResolution": false,
                "labelShowAssembly": true,
                "axisPositionHorizontal": "right",
                "axisLabelFormatting": "scientific",
                "barFillColor": "darkgreen",
                "valueScaling": "linear",
                "trackBorderWidth": 0,
                "trackBorderColor": "black",
                "labelTextOpacity": 1.0,
                "name": dataset.label,
            }),
            width: Some(DATA_TRACK_SIZE.width),
            height: Some(DATA_TRACK_SIZE.height),
            extra: serde_json::Map::new(),
        }
    }

    /// The `url` of the data block, if it has one
    pub fn source_url(&self) -> Option<&str> {
        self.data.as_ref()?.get("url")?.as_str()
    }

    /// Width and height, when the track declares both
    pub fn size(&self) -> Option<TrackSize> {
        Some(TrackSize {
            width: self.width?,
            height: self.height?,
        })
    }

    /// Display name from the renderer options, if any
    pub fn name(&self) -> Option<&str> {
        self.display_options.get("name").and_then(|v| v.as_str())
    }

    /// Equal in everything but the identifier
    pub fn same_content(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.data == other.data
            && self.display_options == other.display_options
            && self.width == other.width
            && self.height == other.height
            && self.extra == other.extra
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_engine_type() {
        assert_eq!(TrackKind::from("text".to_string()), TrackKind::Spacer);
        assert_eq!(TrackKind::from("bar".to_string()), TrackKind::DataTrack);
        assert_eq!(
            TrackKind::from("horizontal-gene-annotations".to_string()),
            TrackKind::Other("horizontal-gene-annotations".to_string())
        );
    }

    #[test]
    fn test_data_track_wire_format() {
        let dataset = Dataset::new("Sample A", "https://example.org/a.bw");
        let track = Track::data_track(TrackId::new("t1"), &dataset, "https://example.org/hg38.chrom.sizes");
        let json = serde_json::to_value(&track).unwrap();

        assert_eq!(json["uid"], "t1");
        assert_eq!(json["type"], "bar");
        assert_eq!(json["data"]["type"], "bbi");
        assert_eq!(json["data"]["url"], "https://example.org/a.bw");
        assert_eq!(json["data"]["chromSizesUrl"], "https://example.org/hg38.chrom.sizes");
        assert_eq!(json["options"]["name"], "Sample A");
        assert_eq!(json["width"], 20);
        assert_eq!(json["height"], 50);
        assert_eq!(track.source_url(), Some("https://example.org/a.bw"));
    }

    #[test]
    fn test_spacer_has_no_data() {
        let track = Track::spacer(TrackId::new("s1"));
        let json = serde_json::to_value(&track).unwrap();
        assert_eq!(json["type"], "text");
        assert!(json.get("data").is_none());
        assert_eq!(track.size(), Some(SPACER_SIZE));
    }

    #[test]
    fn test_engine_native_track_round_trips() {
        let raw = serde_json::json!({
            "uid": "gene-annotations",
            "type": "horizontal-gene-annotations",
            "server": "https://higlass.io/api/v1",
            "tilesetUid": "OHJakQICQD6gTD7skx4EWA",
            "options": {"name": "Genes"},
            "height": 60
        });
        let track: Track = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(
            track.kind,
            TrackKind::Other("horizontal-gene-annotations".to_string())
        );
        assert_eq!(track.name(), Some("Genes"));
        assert!(track.size().is_none());
        assert_eq!(serde_json::to_value(&track).unwrap(), raw);
    }

    #[test]
    fn test_prefix_track_data_round_trips() {
        for data in [
            serde_json::json!({"type": "divided", "children": []}),
            serde_json::json!({"type": "bbi", "url": "https://example.org/p.bw"}),
        ] {
            let raw = serde_json::json!({
                "uid": "p",
                "type": "line",
                "data": data,
                "height": 40
            });
            let track: Track = serde_json::from_value(raw.clone()).unwrap();
            assert_eq!(track.kind, TrackKind::Other("line".to_string()));
            assert_eq!(serde_json::to_value(&track).unwrap(), raw);
        }
    }

    #[test]
    fn test_source_url_requires_string_url() {
        let track: Track = serde_json::from_value(serde_json::json!({
            "uid": "p",
            "type": "line",
            "data": {"type": "divided", "children": []}
        }))
        .unwrap();
        assert_eq!(track.source_url(), None);
    }

    #[test]
    fn test_same_content_ignores_id() {
        let a = Track::spacer(TrackId::new("a"));
        let b = Track::spacer(TrackId::new("b"));
        assert_ne!(a, b);
        assert!(a.same_content(&b));
    }
}
