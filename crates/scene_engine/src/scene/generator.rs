//! # Scene Generator
//!
//! Builds one scene end to end against a [`SceneHost`]:
//!
//! 1. reset the host and derive the direction frame from its camera
//! 2. pick the liquid setup
//! 3. place and spawn objects, restarting while any object is occluded
//! 4. project object centers and infer relationships
//! 5. add and bake the liquid domain for liquid scenes
//! 6. render under the retry policy
//!
//! Scene documents only ever contain complete placements; a failed attempt
//! deletes everything it spawned before the next one starts.

use std::cell::Cell;
use std::path::PathBuf;

use rand::Rng;
use thiserror::Error;

use crate::catalog::Vocabulary;
use crate::core::GeneratorConfig;
use crate::render::{
    CameraProjection, HostError, ObjectHandle, ObjectSpawn, RenderError, RetryPolicy, SceneHost,
};
use crate::scene::directions::{DirectionFrame, FrameError};
use crate::scene::liquid::{LiquidDomain, LiquidSetup};
use crate::scene::object::PlacedObject;
use crate::scene::placement::{PlacementEngine, PlacementError};
use crate::scene::record::SceneRecord;
use crate::scene::relationships::RelationshipGraph;
use crate::scene::role::Role;

/// Anything that can stop a scene from being generated
#[derive(Error, Debug)]
pub enum SceneError {
    /// Camera and ground geometry give no usable frame
    #[error("direction frame error: {0}")]
    Frame(#[from] FrameError),

    /// Placement is unsupported or infeasible
    #[error("placement error: {0}")]
    Placement(#[from] PlacementError),

    /// The scene host failed
    #[error("scene host error: {0}")]
    Host(#[from] HostError),

    /// Rendering failed after every retry
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// Liquid scenes need at least one liquid material
    #[error("liquid simulation is enabled but the catalog has no liquid materials")]
    NoLiquidMaterials,
}

/// One image to generate
#[derive(Debug, Clone, PartialEq)]
pub struct SceneRequest {
    /// Global image index
    pub image_index: usize,
    /// Where the host writes the rendered image
    pub image_path: PathBuf,
    /// Objects to place
    pub num_objects: usize,
}

/// Generates scenes from a vocabulary and configuration
pub struct SceneGenerator<'a> {
    vocabulary: &'a Vocabulary,
    config: &'a GeneratorConfig,
    warned_no_visibility: Cell<bool>,
}

impl<'a> SceneGenerator<'a> {
    /// Create a generator, rejecting setups that could never produce a scene
    pub fn new(vocabulary: &'a Vocabulary, config: &'a GeneratorConfig) -> Result<Self, SceneError> {
        if config.liquid.enabled && vocabulary.catalog().liquid_materials().is_empty() {
            return Err(SceneError::NoLiquidMaterials);
        }
        Ok(Self {
            vocabulary,
            config,
            warned_no_visibility: Cell::new(false),
        })
    }

    /// Generate, materialize and render one scene
    pub fn generate<H, R>(
        &self,
        host: &mut H,
        rng: &mut R,
        request: &SceneRequest,
    ) -> Result<SceneRecord, SceneError>
    where
        H: SceneHost + ?Sized,
        R: Rng + ?Sized,
    {
        host.reset()?;
        host.configure_render(&self.config.render, &request.image_path)?;

        let frame = DirectionFrame::from_camera(&host.camera().orientation, &host.ground_normal())?;
        let liquid = LiquidSetup::sample(rng, self.config.liquid.enabled);
        log::debug!("Scene {}: liquid setup {:?}", request.image_index, liquid);

        let mut objects = self.place_visible(host, rng, &frame, request.num_objects, liquid)?;

        for object in &mut objects {
            object.pixel_coords = host.camera().project(&object.position);
        }
        let relationships = RelationshipGraph::infer(&objects, &frame, self.config.relations.eps);

        let liquid_params = liquid.params();
        if let Some(params) = liquid_params {
            let material = self
                .vocabulary
                .sample_liquid_material(rng)
                .ok_or(SceneError::NoLiquidMaterials)?;
            let domain = LiquidDomain::new(params, material.asset.clone(), &self.config.output.cache_dir);
            host.add_liquid_domain(&domain)?;
            host.bake_liquid(params.sim_time)?;
        }

        RetryPolicy::from_settings(&self.config.render).run(|_| host.render())?;

        let image_filename = request
            .image_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        log::info!(
            "Generated scene {} ({} objects, liquid {:?})",
            request.image_index,
            objects.len(),
            liquid
        );

        Ok(SceneRecord {
            split: self.config.output.split.clone(),
            image_index: request.image_index,
            image_filename,
            objects,
            directions: frame,
            relationships,
            liquid_params,
        })
    }

    /// Place and spawn until every object passes the visibility check
    ///
    /// Visibility restarts draw from the same budget as placement restarts.
    fn place_visible<H, R>(
        &self,
        host: &mut H,
        rng: &mut R,
        frame: &DirectionFrame,
        num_objects: usize,
        liquid: LiquidSetup,
    ) -> Result<Vec<PlacedObject>, SceneError>
    where
        H: SceneHost + ?Sized,
        R: Rng + ?Sized,
    {
        let engine = PlacementEngine::new(self.vocabulary, &self.config.placement, frame);
        let mut restarts = 0;
        loop {
            let mut placement = engine.resume(rng, num_objects, restarts)?;
            for (index, object) in placement.objects.iter_mut().enumerate() {
                object.liquid_src = liquid != LiquidSetup::None && Role::for_index(index).is_liquid_source();
            }

            let handles = spawn_all(host, &placement.objects, liquid)?;
            if self.all_visible(host, &handles)? {
                return Ok(placement.objects);
            }

            log::debug!("Some objects are occluded; replacing objects");
            for handle in handles {
                host.delete_object(handle)?;
            }
            restarts = placement.restarts + 1;
        }
    }

    fn all_visible<H: SceneHost + ?Sized>(
        &self,
        host: &mut H,
        handles: &[ObjectHandle],
    ) -> Result<bool, HostError> {
        if !self.config.placement.check_visibility {
            return Ok(true);
        }
        let Some(counts) = host.visible_pixel_counts(handles)? else {
            if !self.warned_no_visibility.replace(true) {
                log::warn!("Scene host cannot count visible pixels; visibility check skipped");
            }
            return Ok(true);
        };
        if counts.len() != handles.len() {
            return Err(HostError::Failed {
                operation: "visible_pixel_counts",
                message: format!("expected {} counts, got {}", handles.len(), counts.len()),
            });
        }

        let min = self.config.placement.min_pixels_per_object;
        match counts.iter().position(|&count| count < min) {
            Some(index) => {
                log::debug!(
                    "Object {} shows {} pixels, needs {}",
                    index,
                    counts[index],
                    min
                );
                Ok(false)
            }
            None => Ok(true),
        }
    }
}

fn spawn_all<H: SceneHost + ?Sized>(
    host: &mut H,
    objects: &[PlacedObject],
    liquid: LiquidSetup,
) -> Result<Vec<ObjectHandle>, HostError> {
    let mut handles = Vec::with_capacity(objects.len());
    for (index, object) in objects.iter().enumerate() {
        let fluid = if liquid == LiquidSetup::None {
            None
        } else {
            Role::for_index(index).placement_policy().map(|policy| policy.fluid)
        };
        let spawn = ObjectSpawn {
            shape_asset: &object.assets.shape,
            radius: object.assets.radius,
            position: object.position,
            rotation_degrees: object.rotation,
            material_asset: &object.assets.material,
            rgba: object.assets.rgba,
            fluid,
        };
        match host.spawn_object(&spawn) {
            Ok(handle) => handles.push(handle),
            Err(e) => {
                for handle in handles {
                    host.delete_object(handle)?;
                }
                return Err(e);
            }
        }
    }
    Ok(handles)
}
