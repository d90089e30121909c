//! Scene and dataset documents

use serde::{Deserialize, Serialize};

use crate::core::InfoConfig;
use crate::scene::directions::DirectionFrame;
use crate::scene::liquid::LiquidParams;
use crate::scene::object::PlacedObject;
use crate::scene::relationships::RelationshipGraph;

/// Ground truth for one generated image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneRecord {
    /// Dataset split name
    pub split: String,
    /// Global image index
    pub image_index: usize,
    /// Image file name, without directory
    pub image_filename: String,
    /// Objects in placement order
    pub objects: Vec<PlacedObject>,
    /// The scene's direction frame
    pub directions: DirectionFrame,
    /// Pairwise relationships
    pub relationships: RelationshipGraph,
    /// Present only in liquid scenes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub liquid_params: Option<LiquidParams>,
}

impl SceneRecord {
    /// Pretty-printed JSON with two-space indentation
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Parse a scene document
    pub fn from_json_str(contents: &str) -> serde_json::Result<Self> {
        serde_json::from_str(contents)
    }
}

/// Metadata block of the aggregate document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetInfo {
    /// Creation date
    pub date: String,
    /// Dataset version
    pub version: String,
    /// Split name
    pub split: String,
    /// License string
    pub license: String,
}

impl DatasetInfo {
    /// Build from configuration; `today` is used when no date is configured
    pub fn from_config(info: &InfoConfig, split: impl Into<String>, today: impl Into<String>) -> Self {
        Self {
            date: info.date.clone().unwrap_or_else(|| today.into()),
            version: info.version.clone(),
            split: split.into(),
            license: info.license.clone(),
        }
    }
}

/// Every scene of a run plus its metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetDocument {
    /// Metadata
    pub info: DatasetInfo,
    /// Scenes in image-index order
    pub scenes: Vec<SceneRecord>,
}

impl DatasetDocument {
    /// Combine scenes, ordering them by image index
    pub fn new(info: DatasetInfo, mut scenes: Vec<SceneRecord>) -> Self {
        scenes.sort_by_key(|scene| scene.image_index);
        Self { info, scenes }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use crate::scene::liquid::LiquidSetup;
    use crate::scene::object::{ObjectAssets, PixelCoords};

    fn object(shape: &str, position: Vec3, liquid_src: bool) -> PlacedObject {
        PlacedObject {
            shape: shape.to_string(),
            size: "small".to_string(),
            material: "metal".to_string(),
            position,
            rotation: 123.25,
            pixel_coords: PixelCoords(200, 180, 11.75),
            color: "blue".to_string(),
            liquid_src,
            assets: ObjectAssets::default(),
        }
    }

    fn record(image_index: usize, liquid: LiquidSetup) -> SceneRecord {
        let frame = DirectionFrame::from_axes(
            Vec3::new(0.6, 0.8, 0.0),
            Vec3::new(-0.8, 0.6, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
        );
        let objects = vec![
            object("cylinder", Vec3::new(-1.25, 0.5, 2.5), true),
            object("sphere", Vec3::new(1.75, -2.0, 0.0), false),
        ];
        let relationships = RelationshipGraph::infer(&objects, &frame, 0.2);
        SceneRecord {
            split: "new".to_string(),
            image_index,
            image_filename: format!("CLEVR_new_{image_index:06}.png"),
            objects,
            directions: frame,
            relationships,
            liquid_params: liquid.params(),
        }
    }

    #[test]
    fn test_scene_round_trip() {
        let original = record(7, LiquidSetup::Viscous);
        let json = original.to_json_pretty().unwrap();
        let parsed = SceneRecord::from_json_str(&json).unwrap();

        assert_eq!(parsed.objects.len(), original.objects.len());
        for (a, b) in parsed.objects.iter().zip(&original.objects) {
            assert_eq!(a.shape, b.shape);
            assert_eq!(a.position, b.position);
            assert_eq!(a.pixel_coords, b.pixel_coords);
        }
        assert_eq!(parsed.relationships, original.relationships);
        assert_eq!(parsed.directions, original.directions);
        assert_eq!(parsed.liquid_params, original.liquid_params);
    }

    #[test]
    fn test_document_layout() {
        let json = record(3, LiquidSetup::None).to_json_pretty().unwrap();
        assert!(json.starts_with("{\n  \"split\": \"new\""));
        assert!(!json.contains("liquid_params"));

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            ["split", "image_index", "image_filename", "objects", "directions", "relationships"]
        );
        let relations: Vec<&str> =
            value["relationships"].as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(relations, ["behind", "front", "left", "right"]);
        assert_eq!(value["directions"]["front"], serde_json::json!([-0.6, -0.8, -0.0]));
    }

    #[test]
    fn test_dataset_orders_scenes() {
        let info = DatasetInfo::from_config(&InfoConfig::default(), "new", "10/17/2026");
        let document = DatasetDocument::new(
            info,
            vec![record(2, LiquidSetup::None), record(0, LiquidSetup::None), record(1, LiquidSetup::Water)],
        );
        let indices: Vec<usize> = document.scenes.iter().map(|s| s.image_index).collect();
        assert_eq!(indices, [0, 1, 2]);
        assert_eq!(document.info.date, "10/17/2026");
        assert_eq!(document.info.version, "1.0");
    }

    #[test]
    fn test_configured_date_wins() {
        let config = InfoConfig {
            date: Some("01/02/2003".to_string()),
            ..InfoConfig::default()
        };
        let info = DatasetInfo::from_config(&config, "train", "10/17/2026");
        assert_eq!(info.date, "01/02/2003");
        assert_eq!(info.split, "train");
    }
}
