//! Command-line arguments
//!
//! Every flag is optional and overrides the value from `--config` (or the
//! built-in default when no file is given).

use std::path::PathBuf;

use clap::Parser;
use scene_engine::core::GeneratorConfig;

/// Generate a synthetic scene dataset
#[derive(Parser, Debug, Default)]
#[command(name = "dataset_gen", version, about)]
pub struct Args {
    /// Configuration file (.toml, .ron or .json)
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Write the effective configuration to this file and exit
    #[arg(long, value_name = "PATH")]
    pub save_config: Option<PathBuf>,

    /// JSON file defining shapes, materials, sizes and colors
    #[arg(long)]
    pub properties_json: Option<PathBuf>,

    /// Optional JSON file restricting the colors each shape may take
    #[arg(long)]
    pub shape_color_combos_json: Option<PathBuf>,

    /// Minimum number of objects per scene
    #[arg(long)]
    pub min_objects: Option<usize>,

    /// Maximum number of objects per scene
    #[arg(long)]
    pub max_objects: Option<usize>,

    /// Minimum surface-to-surface distance between objects
    #[arg(long)]
    pub min_dist: Option<f64>,

    /// Minimum separation along each cardinal direction
    #[arg(long)]
    pub margin: Option<f64>,

    /// Reject scenes where an object shows fewer visible pixels than this
    #[arg(long)]
    pub min_pixels_per_object: Option<u32>,

    /// Placement attempts per object before the scene restarts
    #[arg(long)]
    pub max_retries: Option<u32>,

    /// Scene restarts before giving up
    #[arg(long)]
    pub max_restarts: Option<u32>,

    /// First image index
    #[arg(long)]
    pub start_idx: Option<usize>,

    /// Number of images to generate
    #[arg(long)]
    pub num_images: Option<usize>,

    /// Prefix of every output file name
    #[arg(long)]
    pub filename_prefix: Option<String>,

    /// Dataset split name
    #[arg(long)]
    pub split: Option<String>,

    /// Directory for rendered images
    #[arg(long)]
    pub output_image_dir: Option<PathBuf>,

    /// Directory for per-image scene documents
    #[arg(long)]
    pub output_scene_dir: Option<PathBuf>,

    /// Aggregate scene document
    #[arg(long)]
    pub output_scene_file: Option<PathBuf>,

    /// Directory for liquid simulation caches
    #[arg(long)]
    pub output_cache_dir: Option<PathBuf>,

    /// Directory for host snapshots
    #[arg(long)]
    pub output_snapshot_dir: Option<PathBuf>,

    /// Save a host snapshot of every scene
    #[arg(long)]
    pub save_snapshots: bool,

    /// Dataset version string
    #[arg(long)]
    pub version_string: Option<String>,

    /// License string
    #[arg(long)]
    pub license: Option<String>,

    /// Date string, defaults to today
    #[arg(long)]
    pub date: Option<String>,

    /// Image width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Image height in pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Render on the GPU
    #[arg(long)]
    pub use_gpu: bool,

    /// Samples per pixel
    #[arg(long)]
    pub render_num_samples: Option<u32>,

    /// Minimum transparent bounces
    #[arg(long)]
    pub render_min_bounces: Option<u32>,

    /// Maximum transparent bounces
    #[arg(long)]
    pub render_max_bounces: Option<u32>,

    /// Render tile size
    #[arg(long)]
    pub render_tile_size: Option<u32>,

    /// Largest random camera offset per axis
    #[arg(long)]
    pub camera_jitter: Option<f64>,

    /// Largest random key light offset per axis
    #[arg(long)]
    pub key_light_jitter: Option<f64>,

    /// Largest random fill light offset per axis
    #[arg(long)]
    pub fill_light_jitter: Option<f64>,

    /// Largest random back light offset per axis
    #[arg(long)]
    pub back_light_jitter: Option<f64>,

    /// Randomly turn scenes into water or viscous liquid scenes
    #[arg(long)]
    pub liquid_simulation: bool,

    /// Ask the host for per-object pixel counts
    #[arg(long)]
    pub check_visibility: bool,

    /// Master seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Default log filter, e.g. `info` or `scene_engine=debug`
    #[arg(long)]
    pub log_level: Option<String>,
}

impl Args {
    /// Apply every flag that was given on top of `config`
    pub fn apply(&self, config: &mut GeneratorConfig) {
        fn set<T: Clone>(target: &mut T, value: Option<&T>) {
            if let Some(value) = value {
                *target = value.clone();
            }
        }

        set(&mut config.input.properties_json, self.properties_json.as_ref());
        if self.shape_color_combos_json.is_some() {
            config.input.shape_color_combos_json = self.shape_color_combos_json.clone();
        }

        let placement = &mut config.placement;
        set(&mut placement.min_objects, self.min_objects.as_ref());
        set(&mut placement.max_objects, self.max_objects.as_ref());
        set(&mut placement.min_dist, self.min_dist.as_ref());
        set(&mut placement.margin, self.margin.as_ref());
        set(&mut placement.min_pixels_per_object, self.min_pixels_per_object.as_ref());
        set(&mut placement.max_retries, self.max_retries.as_ref());
        set(&mut placement.max_restarts, self.max_restarts.as_ref());
        placement.check_visibility |= self.check_visibility;

        let output = &mut config.output;
        set(&mut output.start_idx, self.start_idx.as_ref());
        set(&mut output.num_images, self.num_images.as_ref());
        set(&mut output.filename_prefix, self.filename_prefix.as_ref());
        set(&mut output.split, self.split.as_ref());
        set(&mut output.image_dir, self.output_image_dir.as_ref());
        set(&mut output.scene_dir, self.output_scene_dir.as_ref());
        set(&mut output.scene_file, self.output_scene_file.as_ref());
        set(&mut output.cache_dir, self.output_cache_dir.as_ref());
        set(&mut output.snapshot_dir, self.output_snapshot_dir.as_ref());
        output.save_snapshots |= self.save_snapshots;

        set(&mut config.info.version, self.version_string.as_ref());
        set(&mut config.info.license, self.license.as_ref());
        if self.date.is_some() {
            config.info.date = self.date.clone();
        }

        let render = &mut config.render;
        set(&mut render.width, self.width.as_ref());
        set(&mut render.height, self.height.as_ref());
        set(&mut render.num_samples, self.render_num_samples.as_ref());
        set(&mut render.min_bounces, self.render_min_bounces.as_ref());
        set(&mut render.max_bounces, self.render_max_bounces.as_ref());
        set(&mut render.tile_size, self.render_tile_size.as_ref());
        set(&mut render.camera_jitter, self.camera_jitter.as_ref());
        set(&mut render.key_light_jitter, self.key_light_jitter.as_ref());
        set(&mut render.fill_light_jitter, self.fill_light_jitter.as_ref());
        set(&mut render.back_light_jitter, self.back_light_jitter.as_ref());
        render.use_gpu |= self.use_gpu;

        config.liquid.enabled |= self.liquid_simulation;

        if self.seed.is_some() {
            config.engine.seed = self.seed;
        }
        set(&mut config.engine.log_level, self.log_level.as_ref());
    }
}
