//! # Scene Host
//!
//! The 3D environment scenes are materialized in. The generator drives it
//! through [`SceneHost`]; a real renderer, a test double or the headless host
//! of the dataset binary can sit behind it.

use std::path::Path;

use thiserror::Error;

use crate::core::RenderSettings;
use crate::foundation::math::Vec3;
use crate::render::camera::Camera;
use crate::scene::liquid::LiquidDomain;
use crate::scene::role::FluidRole;

/// Scene host failures
#[derive(Error, Debug)]
pub enum HostError {
    /// An operation failed inside the host
    #[error("scene host {operation} failed: {message}")]
    Failed {
        /// Operation name
        operation: &'static str,
        /// Host-provided detail
        message: String,
    },

    /// The host does not implement an optional operation
    #[error("scene host does not support {0}")]
    Unsupported(&'static str),

    /// The handle does not refer to a live object
    #[error("unknown object handle {0:?}")]
    UnknownObject(ObjectHandle),

    /// I/O error while writing host output
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Opaque reference to an object living in the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectHandle(pub u64);

/// Request to materialize one object
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectSpawn<'a> {
    /// Shape asset identifier
    pub shape_asset: &'a str,
    /// Uniform scale, the object's effective radius
    pub radius: f64,
    /// World-space center
    pub position: Vec3,
    /// Rotation about the ground normal in degrees
    pub rotation_degrees: f64,
    /// Material asset identifier
    pub material_asset: &'a str,
    /// Material base color
    pub rgba: [f64; 4],
    /// Liquid behaviour, set only in liquid scenes
    pub fluid: Option<FluidRole>,
}

/// Collaborator that owns scene state and the render pipeline
pub trait SceneHost {
    /// Return to the empty base scene
    fn reset(&mut self) -> Result<(), HostError>;

    /// The scene camera
    fn camera(&self) -> &Camera;

    /// Normal of the ground plane objects rest on
    fn ground_normal(&self) -> Vec3;

    /// Apply render settings and the image path of the next render
    fn configure_render(&mut self, settings: &RenderSettings, image_path: &Path) -> Result<(), HostError>;

    /// Add an object to the scene
    fn spawn_object(&mut self, spawn: &ObjectSpawn<'_>) -> Result<ObjectHandle, HostError>;

    /// Remove an object from the scene
    fn delete_object(&mut self, handle: ObjectHandle) -> Result<(), HostError>;

    /// Visible pixels per object, in the order given
    ///
    /// `Ok(None)` means the host cannot count pixels.
    fn visible_pixel_counts(&mut self, _handles: &[ObjectHandle]) -> Result<Option<Vec<u32>>, HostError> {
        Ok(None)
    }

    /// Create the liquid domain
    fn add_liquid_domain(&mut self, domain: &LiquidDomain) -> Result<(), HostError>;

    /// Simulate `frames` frames and jump to the last one
    fn bake_liquid(&mut self, frames: u32) -> Result<(), HostError>;

    /// Render the configured image
    fn render(&mut self) -> Result<(), HostError>;

    /// Save the full host scene to `path`
    fn save_snapshot(&mut self, _path: &Path) -> Result<(), HostError> {
        Err(HostError::Unsupported("snapshots"))
    }
}
