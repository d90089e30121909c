//! Object vocabulary
//!
//! The catalog lists every shape, material, size and color a scene may use.
//! [`Vocabulary`] resolves a catalog together with an optional
//! [`CompatibilityTable`] and owns the attribute sampling distributions.

pub mod compatibility;
pub mod properties;

use rand::Rng;
use thiserror::Error;

use crate::core::InputConfig;

pub use compatibility::CompatibilityTable;
pub use properties::{Catalog, CatalogEntry, ColorEntry, SizeEntry};

/// Catalog and compatibility loading errors
///
/// All of these are fatal at load time.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Document could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        /// Document path
        path: String,
        /// Underlying error
        source: std::io::Error,
    },

    /// Document is not valid JSON of the expected shape
    #[error("failed to parse {path}: {source}")]
    Parse {
        /// Document path
        path: String,
        /// Underlying error
        source: serde_json::Error,
    },

    /// A single entry has the wrong type
    #[error("{path}: invalid {section} entry '{name}': {reason}")]
    InvalidEntry {
        /// Document path
        path: String,
        /// Section the entry lives in
        section: &'static str,
        /// Entry name
        name: String,
        /// What went wrong
        reason: String,
    },

    /// A required section has no entries
    #[error("catalog section '{section}' is empty")]
    Empty {
        /// Section name
        section: &'static str,
    },

    /// Color outside the 0-255 range
    #[error("invalid color '{name}': {reason}")]
    InvalidColor {
        /// Color name
        name: String,
        /// What went wrong
        reason: String,
    },

    /// Size radius must be finite and positive
    #[error("invalid size '{name}': radius {radius}")]
    InvalidSize {
        /// Size name
        name: String,
        /// Offending radius
        radius: f64,
    },

    /// Compatibility table names a shape the catalog lacks
    #[error("shape/color combinations reference unknown shape '{name}'")]
    UnknownShape {
        /// Shape name
        name: String,
    },

    /// Compatibility table names a color the catalog lacks
    #[error("shape/color combinations allow unknown color '{color}' for shape '{shape}'")]
    UnknownColor {
        /// Shape name
        shape: String,
        /// Color name
        color: String,
    },

    /// Compatibility table lists no colors for a shape
    #[error("shape '{shape}' has no allowed colors")]
    NoAllowedColors {
        /// Shape name
        shape: String,
    },

    /// The role-tied material pair needs two materials
    #[error("at least two materials are required, found {found}")]
    NotEnoughMaterials {
        /// Number of materials in the catalog
        found: usize,
    },
}

/// A catalog resolved against its optional compatibility restrictions
#[derive(Debug, Clone)]
pub struct Vocabulary {
    catalog: Catalog,
    combos: Option<CompatibilityTable>,
}

impl Vocabulary {
    /// Resolve a catalog and optional table, checking they agree
    pub fn new(catalog: Catalog, combos: Option<CompatibilityTable>) -> Result<Self, CatalogError> {
        catalog.material_pair()?;
        if let Some(table) = &combos {
            table.validate_against(&catalog)?;
        }
        Ok(Self { catalog, combos })
    }

    /// Load both documents named by the input configuration
    pub fn load(input: &InputConfig) -> Result<Self, CatalogError> {
        let catalog = Catalog::load(&input.properties_json)?;
        let combos = input
            .shape_color_combos_json
            .as_ref()
            .map(CompatibilityTable::load)
            .transpose()?;
        Self::new(catalog, combos)
    }

    /// The underlying catalog
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Draw a size uniformly
    pub fn sample_size<R: Rng + ?Sized>(&self, rng: &mut R) -> &SizeEntry {
        pick(rng, self.catalog.sizes())
    }

    /// Draw a shape and color
    ///
    /// With a compatibility table the shape is uniform over the table's keys
    /// and the color uniform over that shape's list; otherwise both are
    /// independent and uniform over the catalog.
    pub fn sample_appearance<R: Rng + ?Sized>(&self, rng: &mut R) -> (&CatalogEntry, &ColorEntry) {
        if let Some(table) = &self.combos {
            let (shape_name, colors) = pick(rng, table.entries());
            let color_name = pick(rng, colors);
            // Names were checked against the catalog in `new`.
            if let (Some(shape), Some(color)) =
                (self.catalog.shape(shape_name), self.catalog.color(color_name))
            {
                return (shape, color);
            }
        }
        (pick(rng, self.catalog.shapes()), pick(rng, self.catalog.colors()))
    }

    /// Materials for the source and effector slots
    pub fn material_pair(&self) -> Result<[&CatalogEntry; 2], CatalogError> {
        self.catalog.material_pair()
    }

    /// Draw a liquid material, `None` if the catalog lists none
    pub fn sample_liquid_material<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&CatalogEntry> {
        let liquids = self.catalog.liquid_materials();
        if liquids.is_empty() {
            None
        } else {
            Some(pick(rng, liquids))
        }
    }
}

/// Uniform choice from a slice the caller knows to be non-empty
fn pick<'a, T, R: Rng + ?Sized>(rng: &mut R, items: &'a [T]) -> &'a T {
    &items[rng.gen_range(0..items.len())]
}
