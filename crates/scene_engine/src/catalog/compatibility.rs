//! Shape/color compatibility restrictions
//!
//! An optional document mapping each shape display name to the color names
//! it may be drawn with. When present, shapes are drawn from the table's keys
//! and colors from the chosen shape's list.

use std::path::Path;

use serde_json::{Map, Value};

use super::{Catalog, CatalogError};

/// Allowed colors per shape, in document order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompatibilityTable {
    entries: Vec<(String, Vec<String>)>,
}

impl CompatibilityTable {
    /// Load a table from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let table = Self::from_json_str(&contents, &path.display().to_string())?;
        log::info!("Loaded shape/color combinations {:?}: {} shapes", path, table.entries.len());
        Ok(table)
    }

    /// Parse a table document; `source` names it in error messages
    pub fn from_json_str(contents: &str, source: &str) -> Result<Self, CatalogError> {
        let raw: Map<String, Value> =
            serde_json::from_str(contents).map_err(|e| CatalogError::Parse {
                path: source.to_string(),
                source: e,
            })?;

        let mut entries = Vec::with_capacity(raw.len());
        for (shape, colors) in raw {
            let colors: Vec<String> = match serde_json::from_value(colors) {
                Ok(colors) => colors,
                Err(e) => {
                    return Err(CatalogError::InvalidEntry {
                        path: source.to_string(),
                        section: "shape_color_combos",
                        name: shape,
                        reason: e.to_string(),
                    })
                }
            };
            entries.push((shape, colors));
        }
        Self::new(entries)
    }

    /// Build a table from `(shape, colors)` pairs
    pub fn new(entries: Vec<(String, Vec<String>)>) -> Result<Self, CatalogError> {
        if entries.is_empty() {
            return Err(CatalogError::Empty { section: "shape_color_combos" });
        }
        if let Some((shape, _)) = entries.iter().find(|(_, colors)| colors.is_empty()) {
            return Err(CatalogError::NoAllowedColors { shape: shape.clone() });
        }
        Ok(Self { entries })
    }

    /// Check every name against the catalog
    pub fn validate_against(&self, catalog: &Catalog) -> Result<(), CatalogError> {
        for (shape, colors) in &self.entries {
            if catalog.shape(shape).is_none() {
                return Err(CatalogError::UnknownShape { name: shape.clone() });
            }
            if let Some(color) = colors.iter().find(|c| catalog.color(c).is_none()) {
                return Err(CatalogError::UnknownColor {
                    shape: shape.clone(),
                    color: color.clone(),
                });
            }
        }
        Ok(())
    }

    /// `(shape, allowed colors)` pairs
    pub fn entries(&self) -> &[(String, Vec<String>)] {
        &self.entries
    }

    /// Allowed colors for a shape
    pub fn allowed_colors(&self, shape: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(s, _)| s == shape)
            .map(|(_, colors)| colors.as_slice())
    }

    /// Whether the pair is permitted
    pub fn allows(&self, shape: &str, color: &str) -> bool {
        self.allowed_colors(shape)
            .is_some_and(|colors| colors.iter().any(|c| c == color))
    }
}
