//! Dataset driver
//!
//! Generates every image of a run in index order, writes one scene document
//! per image and finally the aggregate document.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use scene_engine::core::{GeneratorConfig, OutputConfig};
use scene_engine::render::{HostError, SceneHost};
use scene_engine::scene::{DatasetDocument, DatasetInfo, SceneGenerator, SceneRecord, SceneRequest};

/// File naming for one run
pub struct OutputLayout<'a> {
    output: &'a OutputConfig,
}

impl<'a> OutputLayout<'a> {
    /// Layout for the given output settings
    pub fn new(output: &'a OutputConfig) -> Self {
        Self { output }
    }

    /// `{prefix}_{split}_{index:06}`
    pub fn stem(&self, index: usize) -> String {
        format!("{}_{}_{:06}", self.output.filename_prefix, self.output.split, index)
    }

    /// Rendered image path
    pub fn image_path(&self, index: usize) -> PathBuf {
        self.output.image_dir.join(format!("{}.png", self.stem(index)))
    }

    /// Scene document path
    pub fn scene_path(&self, index: usize) -> PathBuf {
        self.output.scene_dir.join(format!("{}.json", self.stem(index)))
    }

    /// Host snapshot path
    pub fn snapshot_path(&self, index: usize) -> PathBuf {
        self.output.snapshot_dir.join(format!("{}.ron", self.stem(index)))
    }

    /// Create every output directory the run writes to
    pub fn create_dirs(&self) -> Result<()> {
        let mut dirs = vec![&self.output.image_dir, &self.output.scene_dir, &self.output.cache_dir];
        if self.output.save_snapshots {
            dirs.push(&self.output.snapshot_dir);
        }
        for dir in dirs {
            fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
        }
        if let Some(parent) = self.output.scene_file.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
        }
        Ok(())
    }
}

/// Seed of the scene with the given image index
///
/// Every scene gets its own stream, so any single image can be regenerated
/// from the master seed alone.
pub fn scene_seed(master_seed: u64, image_index: usize) -> u64 {
    master_seed ^ (image_index as u64).wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// Runs a whole dataset against one host
pub struct DatasetRunner<'a> {
    config: &'a GeneratorConfig,
    generator: SceneGenerator<'a>,
    master_seed: u64,
    today: String,
}

impl<'a> DatasetRunner<'a> {
    /// Create a runner; `today` fills the info date when none is configured
    pub fn new(
        config: &'a GeneratorConfig,
        generator: SceneGenerator<'a>,
        master_seed: u64,
        today: impl Into<String>,
    ) -> Self {
        Self {
            config,
            generator,
            master_seed,
            today: today.into(),
        }
    }

    /// Generate every image, then write the aggregate document
    pub fn run<H: SceneHost + ?Sized>(&self, host: &mut H) -> Result<DatasetDocument> {
        let layout = OutputLayout::new(&self.config.output);
        layout.create_dirs()?;

        let output = &self.config.output;
        let mut scenes = Vec::with_capacity(output.num_images);
        for i in 0..output.num_images {
            let index = output.start_idx + i;
            let record = self.generate_one(host, &layout, index)?;
            scenes.push(record);
        }

        let info = DatasetInfo::from_config(&self.config.info, output.split.clone(), self.today.clone());
        let document = DatasetDocument::new(info, scenes);
        write_json(&output.scene_file, &document, false)?;
        log::info!(
            "Wrote {} scenes to {}",
            document.scenes.len(),
            output.scene_file.display()
        );
        Ok(document)
    }

    fn generate_one<H: SceneHost + ?Sized>(
        &self,
        host: &mut H,
        layout: &OutputLayout<'_>,
        index: usize,
    ) -> Result<SceneRecord> {
        let mut rng = StdRng::seed_from_u64(scene_seed(self.master_seed, index));
        let placement = &self.config.placement;
        let request = SceneRequest {
            image_index: index,
            image_path: layout.image_path(index),
            num_objects: rng.gen_range(placement.min_objects..=placement.max_objects),
        };

        let record = self
            .generator
            .generate(host, &mut rng, &request)
            .with_context(|| format!("Failed to generate scene {index}"))?;

        write_json(&layout.scene_path(index), &record, true)?;

        if self.config.output.save_snapshots {
            let path = layout.snapshot_path(index);
            match host.save_snapshot(&path) {
                Ok(()) => log::debug!("Saved snapshot {}", path.display()),
                Err(HostError::Unsupported(what)) => {
                    log::warn!("Scene host does not support {what}; snapshot of scene {index} skipped");
                }
                Err(e) => {
                    return Err(e).with_context(|| format!("Failed to save {}", path.display()));
                }
            }
        }

        Ok(record)
    }
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T, pretty: bool) -> Result<()> {
    let contents = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .with_context(|| format!("Failed to serialize {}", path.display()))?;
    fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))
}
