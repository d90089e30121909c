//! In-memory scene host
//!
//! Keeps scene state in memory and renders nothing. Lets the whole pipeline
//! run, and produce scene documents, without an external renderer.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use scene_engine::core::RenderSettings;
use scene_engine::foundation::math::Vec3;
use scene_engine::render::{Camera, HostError, ObjectHandle, ObjectSpawn, SceneHost};
use scene_engine::scene::{FluidRole, LiquidDomain};

#[derive(Debug, Clone, Serialize)]
struct HostObject {
    handle: u64,
    shape_asset: String,
    radius: f64,
    position: [f64; 3],
    rotation_degrees: f64,
    material_asset: String,
    rgba: [f64; 4],
    fluid: Option<FluidRole>,
}

#[derive(Debug, Clone, Serialize)]
struct HostDomain {
    center: [f64; 3],
    size: f64,
    viscosity: f64,
    material: String,
    cache_dir: PathBuf,
    baked_frames: Option<u32>,
}

/// Offsets applied to the key, fill and back lights of the current scene
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
struct LightOffsets {
    key: [f64; 3],
    fill: [f64; 3],
    back: [f64; 3],
}

#[derive(Serialize)]
struct Snapshot<'a> {
    camera_position: [f64; 3],
    lights: LightOffsets,
    resolution: (u32, u32),
    image_path: Option<&'a Path>,
    objects: Vec<&'a HostObject>,
    liquid: Option<&'a HostDomain>,
}

/// Scene host without a renderer
pub struct HeadlessHost {
    base_camera: Camera,
    camera: Camera,
    camera_jitter: f64,
    rng: StdRng,
    objects: BTreeMap<ObjectHandle, HostObject>,
    next_handle: u64,
    domain: Option<HostDomain>,
    image_path: Option<PathBuf>,
    lights: LightOffsets,
    renders: u32,
}

/// Uniform offset in `[-jitter, jitter]` per axis
fn jitter_offset(rng: &mut StdRng, jitter: f64) -> Vec3 {
    if jitter > 0.0 {
        Vec3::new(
            rng.gen_range(-jitter..=jitter),
            rng.gen_range(-jitter..=jitter),
            rng.gen_range(-jitter..=jitter),
        )
    } else {
        Vec3::zeros()
    }
}

impl HeadlessHost {
    /// Create a host around the dataset camera
    ///
    /// The camera position is jittered on every reset by up to
    /// `camera_jitter` per axis, drawn from a stream seeded with `seed`.
    pub fn new(settings: &RenderSettings, seed: u64) -> Self {
        let camera = Camera::dataset_default(settings.width, settings.height);
        Self {
            base_camera: camera.clone(),
            camera,
            camera_jitter: settings.camera_jitter,
            rng: StdRng::seed_from_u64(seed),
            objects: BTreeMap::new(),
            next_handle: 0,
            domain: None,
            image_path: None,
            lights: LightOffsets::default(),
            renders: 0,
        }
    }

    /// Objects currently in the scene
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Completed renders since creation
    pub fn renders(&self) -> u32 {
        self.renders
    }
}

impl SceneHost for HeadlessHost {
    fn reset(&mut self) -> Result<(), HostError> {
        self.objects.clear();
        self.domain = None;
        self.image_path = None;

        let position = self.base_camera.position + jitter_offset(&mut self.rng, self.camera_jitter);
        self.camera.set_position(position);
        Ok(())
    }

    fn camera(&self) -> &Camera {
        &self.camera
    }

    fn ground_normal(&self) -> Vec3 {
        Vec3::new(0.0, 0.0, 1.0)
    }

    fn configure_render(&mut self, settings: &RenderSettings, image_path: &Path) -> Result<(), HostError> {
        self.camera.set_resolution(settings.width, settings.height);
        self.image_path = Some(image_path.to_path_buf());
        self.lights = LightOffsets {
            key: jitter_offset(&mut self.rng, settings.key_light_jitter).into(),
            fill: jitter_offset(&mut self.rng, settings.fill_light_jitter).into(),
            back: jitter_offset(&mut self.rng, settings.back_light_jitter).into(),
        };
        Ok(())
    }

    fn spawn_object(&mut self, spawn: &ObjectSpawn<'_>) -> Result<ObjectHandle, HostError> {
        let handle = ObjectHandle(self.next_handle);
        self.next_handle += 1;
        self.objects.insert(
            handle,
            HostObject {
                handle: handle.0,
                shape_asset: spawn.shape_asset.to_string(),
                radius: spawn.radius,
                position: spawn.position.into(),
                rotation_degrees: spawn.rotation_degrees,
                material_asset: spawn.material_asset.to_string(),
                rgba: spawn.rgba,
                fluid: spawn.fluid,
            },
        );
        Ok(handle)
    }

    fn delete_object(&mut self, handle: ObjectHandle) -> Result<(), HostError> {
        self.objects
            .remove(&handle)
            .map(|_| ())
            .ok_or(HostError::UnknownObject(handle))
    }

    fn add_liquid_domain(&mut self, domain: &LiquidDomain) -> Result<(), HostError> {
        self.domain = Some(HostDomain {
            center: domain.center.into(),
            size: domain.size,
            viscosity: domain.params.viscosity,
            material: domain.material.clone(),
            cache_dir: domain.cache_dir.clone(),
            baked_frames: None,
        });
        Ok(())
    }

    fn bake_liquid(&mut self, frames: u32) -> Result<(), HostError> {
        let domain = self.domain.as_mut().ok_or_else(|| HostError::Failed {
            operation: "bake_liquid",
            message: "no liquid domain in scene".to_string(),
        })?;
        domain.baked_frames = Some(frames);
        Ok(())
    }

    fn render(&mut self) -> Result<(), HostError> {
        let path = self.image_path.as_ref().ok_or_else(|| HostError::Failed {
            operation: "render",
            message: "render output was not configured".to_string(),
        })?;
        log::debug!("Headless render of {} objects to {:?} skipped", self.objects.len(), path);
        self.renders += 1;
        Ok(())
    }

    fn save_snapshot(&mut self, path: &Path) -> Result<(), HostError> {
        let snapshot = Snapshot {
            camera_position: self.camera.position.into(),
            lights: self.lights,
            resolution: (self.camera.width, self.camera.height),
            image_path: self.image_path.as_deref(),
            objects: self.objects.values().collect(),
            liquid: self.domain.as_ref(),
        };
        let contents = ron::ser::to_string_pretty(&snapshot, ron::ser::PrettyConfig::default())
            .map_err(|e| HostError::Failed {
                operation: "save_snapshot",
                message: e.to_string(),
            })?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}
