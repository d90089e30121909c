//! # Unified Configuration System
//!
//! Every knob the dataset generator exposes lives here, grouped by the
//! subsystem that reads it. The whole tree is serializable, so a run can be
//! described by a TOML, RON or JSON file and then overridden from the command
//! line.
//!
//! ## Configuration Categories
//!
//! - **Input**: catalog and compatibility documents
//! - **Placement**: object counts, spacing constraints, retry budgets
//! - **Relations**: relationship inference threshold
//! - **Render**: settings forwarded to the scene host, render retry policy
//! - **Liquid**: optional liquid-domain scenes
//! - **Output**: file naming and destinations
//! - **Info**: metadata block of the aggregate document
//! - **Engine**: logging and seeding

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::{Config, ConfigError};
use crate::scene::role::Role;

/// Where the vocabulary documents come from
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InputConfig {
    /// JSON file defining shapes, materials, sizes and colors
    pub properties_json: PathBuf,
    /// Optional JSON file mapping shape names to their allowed color names
    pub shape_color_combos_json: Option<PathBuf>,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            properties_json: PathBuf::from("data/properties.json"),
            shape_color_combos_json: None,
        }
    }
}

/// # Placement Configuration
///
/// Constraints and budgets for the rejection sampler.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlacementConfig {
    /// Minimum number of objects per scene
    pub min_objects: usize,
    /// Maximum number of objects per scene
    pub max_objects: usize,
    /// Minimum surface-to-surface distance between objects
    pub min_dist: f64,
    /// Minimum separation along each cardinal direction once two objects
    /// are not coincident in that direction
    pub margin: f64,
    /// Attempts to place one object before the whole scene is restarted
    pub max_retries: u32,
    /// Whole-scene restarts before the configuration is declared infeasible
    pub max_restarts: u32,
    /// Ask the scene host for per-object pixel counts after placement
    pub check_visibility: bool,
    /// Minimum visible pixels per object when visibility checking is on
    pub min_pixels_per_object: u32,
}

impl PlacementConfig {
    /// Create a placement configuration with the dataset defaults
    pub fn new() -> Self {
        Self {
            min_objects: 2,
            max_objects: 2,
            min_dist: 0.25,
            margin: 0.4,
            max_retries: 50,
            max_restarts: 1000,
            check_visibility: false,
            min_pixels_per_object: 200,
        }
    }

    /// Set the object count range (inclusive)
    pub fn with_object_range(mut self, min: usize, max: usize) -> Self {
        self.min_objects = min;
        self.max_objects = max;
        self
    }

    /// Set distance and directional margin constraints
    pub fn with_spacing(mut self, min_dist: f64, margin: f64) -> Self {
        self.min_dist = min_dist;
        self.margin = margin;
        self
    }

    /// Set per-object retry and whole-scene restart budgets
    pub fn with_budgets(mut self, max_retries: u32, max_restarts: u32) -> Self {
        self.max_retries = max_retries;
        self.max_restarts = max_restarts;
        self
    }

    /// Enable the post-placement visibility check
    pub fn with_visibility_check(mut self, min_pixels_per_object: u32) -> Self {
        self.check_visibility = true;
        self.min_pixels_per_object = min_pixels_per_object;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_objects > self.max_objects {
            return Err(ConfigError::Invalid(format!(
                "min_objects ({}) is greater than max_objects ({})",
                self.min_objects, self.max_objects
            )));
        }
        // Every index up to max_objects - 1 needs a placement policy.
        let last = self.max_objects.checked_sub(1).map(Role::for_index);
        if let Some(last) = last.filter(|role| role.placement_policy().is_none()) {
            return Err(ConfigError::Invalid(format!(
                "max_objects = {} is unsupported: object {} would take the {:?} role, \
                 which has no placement policy (at most {} objects)",
                self.max_objects,
                self.max_objects - 1,
                last,
                Role::SUPPORTED_OBJECTS
            )));
        }
        if self.min_dist.is_nan() || self.min_dist < 0.0 {
            return Err(ConfigError::Invalid("min_dist must be non-negative".to_string()));
        }
        if self.margin.is_nan() || self.margin < 0.0 {
            return Err(ConfigError::Invalid("margin must be non-negative".to_string()));
        }
        if self.max_retries == 0 {
            return Err(ConfigError::Invalid("max_retries must be at least 1".to_string()));
        }
        if self.max_restarts == 0 {
            return Err(ConfigError::Invalid("max_restarts must be at least 1".to_string()));
        }
        Ok(())
    }
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Relationship inference settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RelationConfig {
    /// A pair is related along a direction only when the projected
    /// displacement exceeds this threshold
    pub eps: f64,
}

impl Default for RelationConfig {
    fn default() -> Self {
        Self { eps: 0.2 }
    }
}

/// # Render Settings
///
/// Forwarded verbatim to the scene host. Only `width` and `height` matter to
/// the core (pixel projection); the rest is opaque host configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderSettings {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Samples per pixel
    pub num_samples: u32,
    /// Minimum transparent bounces
    pub min_bounces: u32,
    /// Maximum transparent bounces
    pub max_bounces: u32,
    /// Render tile size
    pub tile_size: u32,
    /// Prefer GPU rendering when the host supports it
    pub use_gpu: bool,
    /// Render attempts before giving up on an image
    pub max_render_attempts: u32,
    /// Delay before the first render retry, doubled on each further retry
    pub retry_backoff_ms: u64,
    /// Largest random offset added to each camera coordinate per scene
    pub camera_jitter: f64,
    /// Largest random offset added to each key light coordinate per scene
    pub key_light_jitter: f64,
    /// Largest random offset added to each fill light coordinate per scene
    pub fill_light_jitter: f64,
    /// Largest random offset added to each back light coordinate per scene
    pub back_light_jitter: f64,
}

impl RenderSettings {
    /// Set output resolution
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Initial retry delay as a [`Duration`]
    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "image size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.max_render_attempts == 0 {
            return Err(ConfigError::Invalid(
                "max_render_attempts must be at least 1".to_string(),
            ));
        }
        if self.min_bounces > self.max_bounces {
            return Err(ConfigError::Invalid(
                "min_bounces must not exceed max_bounces".to_string(),
            ));
        }
        for (name, jitter) in [
            ("camera_jitter", self.camera_jitter),
            ("key_light_jitter", self.key_light_jitter),
            ("fill_light_jitter", self.fill_light_jitter),
            ("back_light_jitter", self.back_light_jitter),
        ] {
            if jitter.is_nan() || jitter < 0.0 {
                return Err(ConfigError::Invalid(format!("{name} must be non-negative")));
            }
        }
        Ok(())
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            num_samples: 128,
            min_bounces: 8,
            max_bounces: 8,
            tile_size: 256,
            use_gpu: false,
            max_render_attempts: 5,
            retry_backoff_ms: 250,
            camera_jitter: 0.5,
            key_light_jitter: 1.0,
            fill_light_jitter: 1.0,
            back_light_jitter: 1.0,
        }
    }
}

/// Liquid-domain scene settings
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LiquidConfig {
    /// Randomly turn scenes into liquid scenes (none / water / viscous)
    pub enabled: bool,
}

/// # Output Configuration
///
/// Naming and destinations of everything the generator writes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// First image index, so runs can be split across machines
    pub start_idx: usize,
    /// Number of images to generate
    pub num_images: usize,
    /// Prefix prepended to every output file name
    pub filename_prefix: String,
    /// Dataset split name, stored in every scene
    pub split: String,
    /// Directory for rendered images
    pub image_dir: PathBuf,
    /// Directory for per-image scene documents
    pub scene_dir: PathBuf,
    /// Directory handed to the host for simulation caches
    pub cache_dir: PathBuf,
    /// Aggregate document path
    pub scene_file: PathBuf,
    /// Directory for host snapshots
    pub snapshot_dir: PathBuf,
    /// Ask the host to save a snapshot of every scene
    pub save_snapshots: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            start_idx: 0,
            num_images: 5,
            filename_prefix: "CLEVR".to_string(),
            split: "new".to_string(),
            image_dir: PathBuf::from("../output/images/"),
            scene_dir: PathBuf::from("../output/scenes/"),
            cache_dir: PathBuf::from("../output/cache/"),
            scene_file: PathBuf::from("../output/CLEVR_scenes.json"),
            snapshot_dir: PathBuf::from("output/snapshots"),
            save_snapshots: false,
        }
    }
}

/// Metadata stored in the aggregate document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InfoConfig {
    /// Dataset version string
    pub version: String,
    /// License string
    pub license: String,
    /// Date string; today's date when unset
    pub date: Option<String>,
}

impl Default for InfoConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            license: "Creative Commons Attribution (CC-BY 4.0)".to_string(),
            date: None,
        }
    }
}

/// # Engine Configuration
///
/// Logging and reproducibility settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Default log filter
    pub log_level: String,
    /// Master seed; scenes are seeded from it and their image index.
    /// Drawn from entropy when unset.
    pub seed: Option<u64>,
}

impl EngineConfig {
    /// Create a new engine configuration
    pub fn new() -> Self {
        Self {
            log_level: "info".to_string(),
            seed: None,
        }
    }

    /// Set log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Fix the master seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Complete Generator Configuration
///
/// Top-level configuration for a dataset run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Catalog inputs
    pub input: InputConfig,
    /// Placement constraints
    pub placement: PlacementConfig,
    /// Relationship inference
    pub relations: RelationConfig,
    /// Host render settings
    pub render: RenderSettings,
    /// Liquid scenes
    pub liquid: LiquidConfig,
    /// Output layout
    pub output: OutputConfig,
    /// Aggregate metadata
    pub info: InfoConfig,
    /// Logging and seeding
    pub engine: EngineConfig,
}

impl GeneratorConfig {
    /// Validate the entire configuration
    ///
    /// Run this before any scene is attempted; every error here is fatal.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.placement.validate()?;
        self.render.validate()?;
        if self.relations.eps.is_nan() || self.relations.eps < 0.0 {
            return Err(ConfigError::Invalid("relation eps must be non-negative".to_string()));
        }
        if self.output.filename_prefix.is_empty() {
            return Err(ConfigError::Invalid("filename_prefix cannot be empty".to_string()));
        }
        if self.output.split.is_empty() {
            return Err(ConfigError::Invalid("split cannot be empty".to_string()));
        }
        Ok(())
    }
}

impl Config for GeneratorConfig {}
