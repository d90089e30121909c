//! In-memory scene host and fixture vocabulary shared by the scene tests

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::catalog::{Catalog, CatalogEntry, ColorEntry, CompatibilityTable, SizeEntry, Vocabulary};
use crate::core::{GeneratorConfig, RenderSettings};
use crate::foundation::math::Vec3;
use crate::render::{Camera, HostError, ObjectHandle, ObjectSpawn, SceneHost};
use crate::scene::directions::DirectionFrame;
use crate::scene::liquid::LiquidDomain;
use crate::scene::role::FluidRole;

/// A spawned object as the host sees it
#[derive(Debug, Clone, PartialEq)]
pub struct LiveObject {
    pub shape_asset: String,
    pub position: Vec3,
    pub fluid: Option<FluidRole>,
}

/// Scene host double that records every call
pub struct MockHost {
    pub camera: Camera,
    pub normal: Vec3,
    pub live: BTreeMap<ObjectHandle, LiveObject>,
    next_handle: u64,
    pub resets: u32,
    pub spawned: u32,
    pub deleted: u32,
    pub image_path: Option<PathBuf>,
    /// Renders that fail before one succeeds
    pub render_failures: u32,
    pub render_calls: u32,
    /// Whether visibility queries are answered at all
    pub counts_pixels: bool,
    /// Visibility queries that report an occluded object before all pass
    pub occluded_rounds: u32,
    pub visibility_queries: u32,
    pub domains: Vec<LiquidDomain>,
    pub baked_frames: Vec<u32>,
}

impl MockHost {
    pub fn new() -> Self {
        Self {
            camera: Camera::dataset_default(480, 320),
            normal: Vec3::new(0.0, 0.0, 1.0),
            live: BTreeMap::new(),
            next_handle: 0,
            resets: 0,
            spawned: 0,
            deleted: 0,
            image_path: None,
            render_failures: 0,
            render_calls: 0,
            counts_pixels: true,
            occluded_rounds: 0,
            visibility_queries: 0,
            domains: Vec::new(),
            baked_frames: Vec::new(),
        }
    }
}

impl SceneHost for MockHost {
    fn reset(&mut self) -> Result<(), HostError> {
        self.resets += 1;
        self.live.clear();
        self.domains.clear();
        Ok(())
    }

    fn camera(&self) -> &Camera {
        &self.camera
    }

    fn ground_normal(&self) -> Vec3 {
        self.normal
    }

    fn configure_render(&mut self, settings: &RenderSettings, image_path: &Path) -> Result<(), HostError> {
        self.camera.set_resolution(settings.width, settings.height);
        self.image_path = Some(image_path.to_path_buf());
        Ok(())
    }

    fn spawn_object(&mut self, spawn: &ObjectSpawn<'_>) -> Result<ObjectHandle, HostError> {
        let handle = ObjectHandle(self.next_handle);
        self.next_handle += 1;
        self.spawned += 1;
        self.live.insert(
            handle,
            LiveObject {
                shape_asset: spawn.shape_asset.to_string(),
                position: spawn.position,
                fluid: spawn.fluid,
            },
        );
        Ok(handle)
    }

    fn delete_object(&mut self, handle: ObjectHandle) -> Result<(), HostError> {
        self.live.remove(&handle).ok_or(HostError::UnknownObject(handle))?;
        self.deleted += 1;
        Ok(())
    }

    fn visible_pixel_counts(&mut self, handles: &[ObjectHandle]) -> Result<Option<Vec<u32>>, HostError> {
        if !self.counts_pixels {
            return Ok(None);
        }
        self.visibility_queries += 1;
        let mut counts = vec![5000; handles.len()];
        if self.occluded_rounds > 0 {
            self.occluded_rounds -= 1;
            counts[0] = 0;
        }
        Ok(Some(counts))
    }

    fn add_liquid_domain(&mut self, domain: &LiquidDomain) -> Result<(), HostError> {
        self.domains.push(domain.clone());
        Ok(())
    }

    fn bake_liquid(&mut self, frames: u32) -> Result<(), HostError> {
        self.baked_frames.push(frames);
        Ok(())
    }

    fn render(&mut self) -> Result<(), HostError> {
        self.render_calls += 1;
        if self.render_failures > 0 {
            self.render_failures -= 1;
            return Err(HostError::Failed {
                operation: "render",
                message: "out of device memory".to_string(),
            });
        }
        Ok(())
    }
}

pub fn catalog(with_liquids: bool) -> Catalog {
    let liquids = if with_liquids {
        vec![CatalogEntry::new("water", "Water")]
    } else {
        Vec::new()
    };
    Catalog::from_entries(
        vec![
            CatalogEntry::new("cube", "SmoothCube_v2"),
            CatalogEntry::new("sphere", "Sphere"),
            CatalogEntry::new("cylinder", "SmoothCylinder"),
        ],
        vec![CatalogEntry::new("rubber", "Rubber"), CatalogEntry::new("metal", "MyMetal")],
        vec![
            SizeEntry { name: "large".to_string(), radius: 0.7 },
            SizeEntry { name: "small".to_string(), radius: 0.35 },
        ],
        vec![
            ColorEntry::from_rgb("gray", [87.0, 87.0, 87.0]).unwrap(),
            ColorEntry::from_rgb("red", [173.0, 35.0, 35.0]).unwrap(),
            ColorEntry::from_rgb("blue", [42.0, 75.0, 215.0]).unwrap(),
            ColorEntry::from_rgb("green", [29.0, 105.0, 20.0]).unwrap(),
            ColorEntry::from_rgb("yellow", [255.0, 238.0, 51.0]).unwrap(),
        ],
        liquids,
    )
    .unwrap()
}

pub fn vocabulary() -> Vocabulary {
    Vocabulary::new(catalog(true), None).unwrap()
}

pub fn restricted_vocabulary() -> (Vocabulary, CompatibilityTable) {
    let table = CompatibilityTable::new(vec![
        ("cube".to_string(), vec!["gray".to_string(), "blue".to_string()]),
        ("sphere".to_string(), vec!["yellow".to_string()]),
    ])
    .unwrap();
    (Vocabulary::new(catalog(true), Some(table.clone())).unwrap(), table)
}

pub fn dataset_frame() -> DirectionFrame {
    let camera = Camera::dataset_default(480, 320);
    DirectionFrame::from_camera(&camera.orientation, &Vec3::new(0.0, 0.0, 1.0)).unwrap()
}

/// Defaults with no render backoff so retries do not sleep
pub fn config() -> GeneratorConfig {
    let mut config = GeneratorConfig::default();
    config.render.retry_backoff_ms = 0;
    config.render = config.render.with_resolution(480, 320);
    config
}
