//! # Scene Engine
//!
//! Procedural scene construction for synthetic visual-reasoning datasets.
//!
//! ## Features
//!
//! - **Catalog**: shapes, materials, sizes and colors loaded from JSON, with
//!   optional shape/color restrictions
//! - **Direction Frame**: camera-relative cardinal directions on the ground
//! - **Placement**: rejection sampling under distance and directional margin
//!   constraints, with bounded whole-scene restarts
//! - **Relationships**: left/right/front/behind graphs between objects
//! - **Generation**: one scene end to end against a pluggable scene host,
//!   including liquid scenes and bounded render retry
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scene_engine::prelude::*;
//! use rand::SeedableRng;
//!
//! fn run(host: &mut dyn SceneHost) -> Result<SceneRecord, Box<dyn std::error::Error>> {
//!     let config = GeneratorConfig::load_from_file("generator.toml")?;
//!     config.validate()?;
//!     let vocabulary = Vocabulary::load(&config.input)?;
//!     let generator = SceneGenerator::new(&vocabulary, &config)?;
//!
//!     let mut rng = rand::rngs::StdRng::seed_from_u64(7);
//!     let request = SceneRequest {
//!         image_index: 0,
//!         image_path: "CLEVR_new_000000.png".into(),
//!         num_objects: 2,
//!     };
//!     Ok(generator.generate(host, &mut rng, &request)?)
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod catalog;
pub mod config;
pub mod core;
pub mod foundation;
pub mod physics;
pub mod render;
pub mod scene;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        catalog::{Catalog, CatalogError, CompatibilityTable, Vocabulary},
        config::{Config, ConfigError},
        core::GeneratorConfig,
        foundation::math::{Quat, Vec3},
        render::{Camera, CameraProjection, HostError, ObjectHandle, ObjectSpawn, RenderError, SceneHost},
        scene::{
            DatasetDocument, DatasetInfo, Direction, DirectionFrame, PlacedObject, RelationshipGraph,
            SceneError, SceneGenerator, SceneRecord, SceneRequest,
        },
    };
}
