//! Properties document loader
//!
//! Loads the object vocabulary (shapes, materials, sizes, colors and liquid
//! materials) from a JSON document. Entries keep document order, since the
//! role-tied material pair is taken from the first two materials.

use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value};

use super::CatalogError;

/// A display name paired with the host asset it resolves to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Name written to scene documents (e.g. `"cube"`)
    pub name: String,
    /// Host asset identifier (e.g. `"SmoothCube_v2"`)
    pub asset: String,
}

impl CatalogEntry {
    /// Create a new entry
    pub fn new(name: impl Into<String>, asset: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            asset: asset.into(),
        }
    }

    /// Whether the asset is the plain `Cube` model
    ///
    /// That model is authored at its circumscribed-sphere size, so its
    /// radius is scaled down by sqrt(2). Other cube assets keep theirs.
    pub fn is_cube(&self) -> bool {
        self.asset == "Cube"
    }
}

/// A named object size
#[derive(Debug, Clone, PartialEq)]
pub struct SizeEntry {
    /// Display name (e.g. `"large"`)
    pub name: String,
    /// Bounding radius / model scale
    pub radius: f64,
}

/// A named color with its normalized RGBA value
#[derive(Debug, Clone, PartialEq)]
pub struct ColorEntry {
    /// Display name (e.g. `"red"`)
    pub name: String,
    /// Components in `[0, 1]`, alpha always 1
    pub rgba: [f64; 4],
}

impl ColorEntry {
    /// Build from 0-255 RGB components
    pub fn from_rgb(name: impl Into<String>, rgb: [f64; 3]) -> Result<Self, CatalogError> {
        let name = name.into();
        if let Some(c) = rgb.iter().find(|c| !(0.0..=255.0).contains(*c)) {
            return Err(CatalogError::InvalidColor {
                name,
                reason: format!("component {c} outside 0-255"),
            });
        }
        Ok(Self {
            name,
            rgba: [rgb[0] / 255.0, rgb[1] / 255.0, rgb[2] / 255.0, 1.0],
        })
    }
}

#[derive(Deserialize)]
struct RawProperties {
    shapes: Map<String, Value>,
    colors: Map<String, Value>,
    materials: Map<String, Value>,
    sizes: Map<String, Value>,
    #[serde(default)]
    liquid_materials: Map<String, Value>,
}

/// The full object vocabulary
///
/// Read-only once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    shapes: Vec<CatalogEntry>,
    materials: Vec<CatalogEntry>,
    sizes: Vec<SizeEntry>,
    colors: Vec<ColorEntry>,
    liquid_materials: Vec<CatalogEntry>,
}

impl Catalog {
    /// Load the catalog from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let catalog = Self::from_json_str(&contents, &path.display().to_string())?;
        log::info!(
            "Loaded catalog {:?}: {} shapes, {} materials, {} sizes, {} colors, {} liquid materials",
            path,
            catalog.shapes.len(),
            catalog.materials.len(),
            catalog.sizes.len(),
            catalog.colors.len(),
            catalog.liquid_materials.len()
        );
        Ok(catalog)
    }

    /// Parse a catalog document; `source` names it in error messages
    pub fn from_json_str(contents: &str, source: &str) -> Result<Self, CatalogError> {
        let raw: RawProperties =
            serde_json::from_str(contents).map_err(|e| CatalogError::Parse {
                path: source.to_string(),
                source: e,
            })?;

        let shapes = named_assets("shapes", raw.shapes, source)?;
        let materials = named_assets("materials", raw.materials, source)?;
        let liquid_materials = named_assets("liquid_materials", raw.liquid_materials, source)?;

        let sizes = ordered::<f64>("sizes", raw.sizes, source)?
            .into_iter()
            .map(|(name, radius)| {
                if radius.is_finite() && radius > 0.0 {
                    Ok(SizeEntry { name, radius })
                } else {
                    Err(CatalogError::InvalidSize { name, radius })
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        let colors = ordered::<[f64; 3]>("colors", raw.colors, source)?
            .into_iter()
            .map(|(name, rgb)| ColorEntry::from_rgb(name, rgb))
            .collect::<Result<Vec<_>, _>>()?;

        let catalog = Self {
            shapes,
            materials,
            sizes,
            colors,
            liquid_materials,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Build a catalog directly from entries
    pub fn from_entries(
        shapes: Vec<CatalogEntry>,
        materials: Vec<CatalogEntry>,
        sizes: Vec<SizeEntry>,
        colors: Vec<ColorEntry>,
        liquid_materials: Vec<CatalogEntry>,
    ) -> Result<Self, CatalogError> {
        let catalog = Self {
            shapes,
            materials,
            sizes,
            colors,
            liquid_materials,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    fn validate(&self) -> Result<(), CatalogError> {
        if self.shapes.is_empty() {
            return Err(CatalogError::Empty { section: "shapes" });
        }
        if self.materials.is_empty() {
            return Err(CatalogError::Empty { section: "materials" });
        }
        if self.sizes.is_empty() {
            return Err(CatalogError::Empty { section: "sizes" });
        }
        if self.colors.is_empty() {
            return Err(CatalogError::Empty { section: "colors" });
        }
        Ok(())
    }

    /// Shapes in document order
    pub fn shapes(&self) -> &[CatalogEntry] {
        &self.shapes
    }

    /// Materials in document order
    pub fn materials(&self) -> &[CatalogEntry] {
        &self.materials
    }

    /// Sizes in document order
    pub fn sizes(&self) -> &[SizeEntry] {
        &self.sizes
    }

    /// Colors in document order
    pub fn colors(&self) -> &[ColorEntry] {
        &self.colors
    }

    /// Liquid materials in document order (possibly empty)
    pub fn liquid_materials(&self) -> &[CatalogEntry] {
        &self.liquid_materials
    }

    /// Look up a shape by display name
    pub fn shape(&self, name: &str) -> Option<&CatalogEntry> {
        self.shapes.iter().find(|s| s.name == name)
    }

    /// Look up a color by display name
    pub fn color(&self, name: &str) -> Option<&ColorEntry> {
        self.colors.iter().find(|c| c.name == name)
    }

    /// The two materials handed out to the source and effector roles
    pub fn material_pair(&self) -> Result<[&CatalogEntry; 2], CatalogError> {
        match self.materials.as_slice() {
            [first, second, ..] => Ok([first, second]),
            _ => Err(CatalogError::NotEnoughMaterials {
                found: self.materials.len(),
            }),
        }
    }
}

fn ordered<T: serde::de::DeserializeOwned>(
    section: &'static str,
    map: Map<String, Value>,
    source: &str,
) -> Result<Vec<(String, T)>, CatalogError> {
    map.into_iter()
        .map(|(name, value)| match serde_json::from_value(value) {
            Ok(v) => Ok((name, v)),
            Err(e) => Err(CatalogError::InvalidEntry {
                path: source.to_string(),
                section,
                name,
                reason: e.to_string(),
            }),
        })
        .collect()
}

fn named_assets(
    section: &'static str,
    map: Map<String, Value>,
    source: &str,
) -> Result<Vec<CatalogEntry>, CatalogError> {
    Ok(ordered::<String>(section, map, source)?
        .into_iter()
        .map(|(name, asset)| CatalogEntry { name, asset })
        .collect())
}
