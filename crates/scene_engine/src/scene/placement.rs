//! Constrained object placement
//!
//! Pure rejection sampling. Each object draws candidate positions until one
//! clears every already placed object, or its retry budget runs out. Running
//! out discards the whole scene attempt and starts over from the first
//! object with fresh draws. Restarts are counted and bounded, so an
//! infeasible configuration ends in [`PlacementError::Infeasible`] instead of
//! looping forever.

use rand::Rng;
use thiserror::Error;

use crate::catalog::Vocabulary;
use crate::core::PlacementConfig;
use crate::foundation::math::Vec3;
use crate::physics::BoundingSphere;
use crate::scene::directions::{Direction, DirectionFrame};
use crate::scene::object::{ObjectAssets, PixelCoords, PlacedObject};
use crate::scene::role::Role;

/// Half-extent of the square `x, y` are drawn from
pub const GROUND_EXTENT: f64 = 3.0;

/// Placement errors
///
/// Sampling rejections never show up here; they are absorbed by restarts.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlacementError {
    /// An object index maps to a role without a placement policy
    #[error("object {index} would take the {role:?} role, which has no placement policy")]
    UnsupportedRole {
        /// Placement index
        index: usize,
        /// Role at that index
        role: Role,
    },

    /// Restart budget exhausted
    #[error("placement is infeasible: gave up after {restarts} scene restarts")]
    Infeasible {
        /// Restarts performed
        restarts: u32,
    },

    /// The role-tied material pair needs two materials
    #[error("at least two materials are required, found {found}")]
    NotEnoughMaterials {
        /// Materials in the catalog
        found: usize,
    },
}

/// A complete, accepted placement
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    /// Objects in placement order
    pub objects: Vec<PlacedObject>,
    /// Scene restarts used so far, including any carried in by the caller
    pub restarts: u32,
}

/// Samples object layouts for one scene
pub struct PlacementEngine<'a> {
    vocabulary: &'a Vocabulary,
    config: &'a PlacementConfig,
    frame: &'a DirectionFrame,
}

impl<'a> PlacementEngine<'a> {
    /// Create an engine for one scene
    pub fn new(
        vocabulary: &'a Vocabulary,
        config: &'a PlacementConfig,
        frame: &'a DirectionFrame,
    ) -> Self {
        Self {
            vocabulary,
            config,
            frame,
        }
    }

    /// Place `num_objects` objects with the full restart budget
    pub fn place<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        num_objects: usize,
    ) -> Result<Placement, PlacementError> {
        self.resume(rng, num_objects, 0)
    }

    /// Place `num_objects` objects when `restarts_used` restarts of the
    /// budget have already been spent, e.g. on failed visibility checks
    pub fn resume<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        num_objects: usize,
        restarts_used: u32,
    ) -> Result<Placement, PlacementError> {
        for index in 0..num_objects {
            let role = Role::for_index(index);
            if role.placement_policy().is_none() {
                return Err(PlacementError::UnsupportedRole { index, role });
            }
        }

        let mut restarts = restarts_used;
        loop {
            if restarts > self.config.max_restarts {
                return Err(PlacementError::Infeasible {
                    restarts: self.config.max_restarts,
                });
            }
            if let Some(objects) = self.attempt(rng, num_objects)? {
                if restarts > restarts_used {
                    log::debug!(
                        "Placed {} objects after {} restarts",
                        num_objects,
                        restarts - restarts_used
                    );
                }
                return Ok(Placement { objects, restarts });
            }
            restarts += 1;
        }
    }

    /// One scene attempt; `None` when an object ran out of retries
    fn attempt<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        num_objects: usize,
    ) -> Result<Option<Vec<PlacedObject>>, PlacementError> {
        let materials = self.vocabulary.material_pair().map_err(|_| {
            PlacementError::NotEnoughMaterials {
                found: self.vocabulary.catalog().materials().len(),
            }
        })?;
        let swap = usize::from(rng.gen_bool(0.5));

        let mut objects: Vec<PlacedObject> = Vec::with_capacity(num_objects);
        for index in 0..num_objects {
            let role = Role::for_index(index);
            let policy = role
                .placement_policy()
                .ok_or(PlacementError::UnsupportedRole { index, role })?;

            let size = self.vocabulary.sample_size(rng);

            let mut num_tries = 0;
            let position = loop {
                num_tries += 1;
                if num_tries > self.config.max_retries {
                    log::debug!(
                        "Object {} ({:?}) exceeded {} retries, restarting scene",
                        index,
                        role,
                        self.config.max_retries
                    );
                    return Ok(None);
                }
                let candidate = Vec3::new(
                    rng.gen_range(-GROUND_EXTENT..=GROUND_EXTENT),
                    rng.gen_range(-GROUND_EXTENT..=GROUND_EXTENT),
                    policy.height.sample_z(rng),
                );
                if self.accepts(&BoundingSphere::new(candidate, size.radius), &objects) {
                    break candidate;
                }
            };

            let (shape, color) = self.vocabulary.sample_appearance(rng);
            let radius = if shape.is_cube() {
                size.radius / std::f64::consts::SQRT_2
            } else {
                size.radius
            };
            let rotation = rng.gen_range(0.0..360.0);
            let material = materials[(policy.material_slot + swap) % 2];

            log::trace!(
                "Object {} accepted after {} tries: {} {} {} at {:?}",
                index,
                num_tries,
                size.name,
                color.name,
                shape.name,
                position.as_slice()
            );

            objects.push(PlacedObject {
                shape: shape.name.clone(),
                size: size.name.clone(),
                material: material.name.clone(),
                position,
                rotation,
                pixel_coords: PixelCoords::default(),
                color: color.name.clone(),
                liquid_src: false,
                assets: ObjectAssets {
                    shape: shape.asset.clone(),
                    material: material.asset.clone(),
                    rgba: color.rgba,
                    radius,
                },
            });
        }
        Ok(Some(objects))
    }

    /// Whether a candidate clears every placed object
    pub fn accepts(&self, candidate: &BoundingSphere, placed: &[PlacedObject]) -> bool {
        placed.iter().all(|other| {
            let other = other.bounding_sphere();
            if candidate.clearance(&other) < self.config.min_dist {
                return false;
            }
            let displacement = candidate.center - other.center;
            match ambiguous_direction(&displacement, self.frame, self.config.margin) {
                Some(direction) => {
                    log::trace!("Rejected candidate: ambiguous {} margin", direction.name());
                    false
                }
                None => true,
            }
        })
    }
}

/// Signed separation of a displacement along a direction
///
/// Horizontal directions use the ground-plane components only; vertical
/// directions use the z component only. Frames are Z-up, so horizontal
/// vectors carry no z component to drop.
pub fn directional_margin(displacement: &Vec3, frame: &DirectionFrame, direction: Direction) -> f64 {
    let v = frame.vector(direction);
    match direction {
        Direction::Above | Direction::Below => displacement.z * v.z,
        _ => displacement.x * v.x + displacement.y * v.y,
    }
}

/// First direction along which the displacement falls strictly inside
/// `(0, margin)`, if any
pub fn ambiguous_direction(
    displacement: &Vec3,
    frame: &DirectionFrame,
    margin: f64,
) -> Option<Direction> {
    Direction::ALL.into_iter().find(|&direction| {
        let m = directional_margin(displacement, frame, direction);
        m > 0.0 && m < margin
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, CatalogEntry, ColorEntry, SizeEntry};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn vocabulary(shapes: Vec<CatalogEntry>) -> Vocabulary {
        let catalog = Catalog::from_entries(
            shapes,
            vec![CatalogEntry::new("rubber", "Rubber"), CatalogEntry::new("metal", "MyMetal")],
            vec![
                SizeEntry { name: "large".to_string(), radius: 0.7 },
                SizeEntry { name: "small".to_string(), radius: 0.35 },
            ],
            vec![ColorEntry::from_rgb("red", [173.0, 35.0, 35.0]).unwrap()],
            Vec::new(),
        )
        .unwrap();
        Vocabulary::new(catalog, None).unwrap()
    }

    fn frame() -> DirectionFrame {
        DirectionFrame::from_axes(
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
        )
    }

    #[test]
    fn test_directional_margin_projection() {
        let frame = frame();
        let d = Vec3::new(0.3, -2.0, 1.5);
        assert_eq!(directional_margin(&d, &frame, Direction::Right), 0.3);
        assert_eq!(directional_margin(&d, &frame, Direction::Left), -0.3);
        assert_eq!(directional_margin(&d, &frame, Direction::Front), 2.0);
        assert_eq!(directional_margin(&d, &frame, Direction::Above), 1.5);

        assert_eq!(ambiguous_direction(&d, &frame, 0.4), Some(Direction::Right));
        assert_eq!(ambiguous_direction(&d, &frame, 0.25), None);
        assert_eq!(ambiguous_direction(&Vec3::new(0.0, 0.0, 0.1), &frame, 0.25), Some(Direction::Above));
    }

    #[test]
    fn test_coincident_direction_is_not_ambiguous() {
        // Zero projection means the objects coincide along that direction.
        let d = Vec3::new(0.0, 1.0, 0.0);
        assert_eq!(ambiguous_direction(&d, &frame(), 0.4), None);
    }

    #[test]
    fn test_cube_radius_adjusted() {
        let vocabulary = vocabulary(vec![CatalogEntry::new("cube", "Cube")]);
        let config = PlacementConfig::default();
        let frame = frame();
        let engine = PlacementEngine::new(&vocabulary, &config, &frame);
        let mut rng = StdRng::seed_from_u64(1);

        let placement = engine.place(&mut rng, 2).unwrap();
        for object in &placement.objects {
            let nominal = if object.size == "large" { 0.7 } else { 0.35 };
            approx::assert_relative_eq!(object.assets.radius, nominal / 2f64.sqrt());
        }
    }

    #[test]
    fn test_smooth_cube_keeps_radius() {
        let vocabulary = vocabulary(vec![CatalogEntry::new("cube", "SmoothCube_v2")]);
        let config = PlacementConfig::default();
        let frame = frame();
        let engine = PlacementEngine::new(&vocabulary, &config, &frame);
        let mut rng = StdRng::seed_from_u64(1);

        let placement = engine.place(&mut rng, 2).unwrap();
        for object in &placement.objects {
            let nominal = if object.size == "large" { 0.7 } else { 0.35 };
            approx::assert_relative_eq!(object.assets.radius, nominal);
        }
    }

    #[test]
    fn test_materials_are_role_tied() {
        let vocabulary = vocabulary(vec![CatalogEntry::new("sphere", "Sphere")]);
        let config = PlacementConfig::default();
        let frame = frame();
        let engine = PlacementEngine::new(&vocabulary, &config, &frame);
        let mut rng = StdRng::seed_from_u64(2);

        let mut seen_orders = std::collections::HashSet::new();
        for _ in 0..50 {
            let placement = engine.place(&mut rng, 2).unwrap();
            let (a, b) = (&placement.objects[0], &placement.objects[1]);
            assert_ne!(a.material, b.material);
            seen_orders.insert(a.material.clone());
        }
        assert_eq!(seen_orders.len(), 2);
    }

    #[test]
    fn test_unsupported_role_is_fatal() {
        let vocabulary = vocabulary(vec![CatalogEntry::new("sphere", "Sphere")]);
        let config = PlacementConfig::default();
        let frame = frame();
        let engine = PlacementEngine::new(&vocabulary, &config, &frame);
        let mut rng = StdRng::seed_from_u64(3);

        assert_eq!(
            engine.place(&mut rng, 3).unwrap_err(),
            PlacementError::UnsupportedRole { index: 2, role: Role::Plain }
        );
    }

    #[test]
    fn test_infeasible_after_restart_budget() {
        let vocabulary = vocabulary(vec![CatalogEntry::new("sphere", "Sphere")]);
        // Objects can never be 100 units apart inside a 6x6 square.
        let config = PlacementConfig::default()
            .with_spacing(100.0, 0.4)
            .with_budgets(5, 3);
        let frame = frame();
        let engine = PlacementEngine::new(&vocabulary, &config, &frame);
        let mut rng = StdRng::seed_from_u64(4);

        assert_eq!(
            engine.place(&mut rng, 2).unwrap_err(),
            PlacementError::Infeasible { restarts: 3 }
        );
    }

    #[test]
    fn test_resume_spends_carried_budget() {
        let vocabulary = vocabulary(vec![CatalogEntry::new("sphere", "Sphere")]);
        let config = PlacementConfig::default().with_budgets(50, 2);
        let frame = frame();
        let engine = PlacementEngine::new(&vocabulary, &config, &frame);
        let mut rng = StdRng::seed_from_u64(5);

        assert!(engine.resume(&mut rng, 2, 2).is_ok());
        assert_eq!(
            engine.resume(&mut rng, 2, 3).unwrap_err(),
            PlacementError::Infeasible { restarts: 2 }
        );
    }

    #[test]
    fn test_empty_scene() {
        let vocabulary = vocabulary(vec![CatalogEntry::new("sphere", "Sphere")]);
        let config = PlacementConfig::default();
        let frame = frame();
        let engine = PlacementEngine::new(&vocabulary, &config, &frame);
        let mut rng = StdRng::seed_from_u64(6);

        let placement = engine.place(&mut rng, 0).unwrap();
        assert!(placement.objects.is_empty());
        assert_eq!(placement.restarts, 0);
    }
}
