//! Placed objects as written to scene documents

use serde::{Deserialize, Serialize};

use crate::foundation::math::Vec3;
use crate::physics::BoundingSphere;

/// Image-space projection of an object center: `(x_px, y_px, depth)`
///
/// Serialized as a three-element array. Pixel y grows downward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PixelCoords(pub i32, pub i32, pub f64);

/// Host-facing attributes that are not part of the scene document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectAssets {
    /// Shape asset identifier
    pub shape: String,
    /// Material asset identifier
    pub material: String,
    /// Normalized RGBA color
    pub rgba: [f64; 4],
    /// Effective radius, already divided by sqrt(2) for cubes
    pub radius: f64,
}

/// One object of a scene, in placement order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedObject {
    /// Shape display name
    pub shape: String,
    /// Size display name
    pub size: String,
    /// Material display name
    pub material: String,
    /// World-space center
    #[serde(rename = "3d_coords")]
    pub position: Vec3,
    /// Rotation about the ground normal, degrees in `[0, 360)`
    pub rotation: f64,
    /// Projection through the scene camera
    pub pixel_coords: PixelCoords,
    /// Color display name
    pub color: String,
    /// Whether this object emits liquid
    pub liquid_src: bool,
    /// Asset identifiers and effective radius used while building the scene
    #[serde(skip)]
    pub assets: ObjectAssets,
}

impl PlacedObject {
    /// Sphere used for the spacing checks
    pub fn bounding_sphere(&self) -> BoundingSphere {
        BoundingSphere::new(self.position, self.assets.radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object() -> PlacedObject {
        PlacedObject {
            shape: "sphere".to_string(),
            size: "large".to_string(),
            material: "rubber".to_string(),
            position: Vec3::new(1.0, -2.0, 0.0),
            rotation: 45.0,
            pixel_coords: PixelCoords(120, 300, 9.5),
            color: "red".to_string(),
            liquid_src: false,
            assets: ObjectAssets {
                shape: "Sphere".to_string(),
                material: "Rubber".to_string(),
                rgba: [0.5, 0.1, 0.1, 1.0],
                radius: 0.7,
            },
        }
    }

    #[test]
    fn test_document_field_names() {
        let value = serde_json::to_value(object()).unwrap();
        let fields: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(
            fields,
            [
                "shape",
                "size",
                "material",
                "3d_coords",
                "rotation",
                "pixel_coords",
                "color",
                "liquid_src"
            ]
        );
        assert_eq!(value["3d_coords"], serde_json::json!([1.0, -2.0, 0.0]));
        assert_eq!(value["pixel_coords"], serde_json::json!([120, 300, 9.5]));
    }

    #[test]
    fn test_bounding_sphere_uses_effective_radius() {
        let sphere = object().bounding_sphere();
        assert_eq!(sphere.radius, 0.7);
        assert_eq!(sphere.center, Vec3::new(1.0, -2.0, 0.0));
    }
}
