//! Semantic object roles and their placement policies
//!
//! A role is fixed by placement index, independent of what the object looks
//! like. The first object is the elevated liquid source, the second is the
//! grounded collision effector. Anything beyond that has no policy.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Semantic slot of an object in a scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Elevated object; emits liquid in liquid scenes
    Source,
    /// Grounded object; collides with liquid in liquid scenes
    Effector,
    /// Any further object
    Plain,
}

/// How an object's height is chosen
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HeightPolicy {
    /// `z` drawn uniformly from `[min, max]`
    Elevated {
        /// Lowest allowed height
        min: f64,
        /// Highest allowed height
        max: f64,
    },
    /// `z = 0`
    Grounded,
}

impl HeightPolicy {
    /// Draw a height
    pub fn sample_z<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match *self {
            Self::Elevated { min, max } => rng.gen_range(min..=max),
            Self::Grounded => 0.0,
        }
    }
}

/// What the host should do with an object in a liquid scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FluidRole {
    /// Inflow source of liquid
    Inflow,
    /// Collision effector
    Collision,
}

/// Per-role placement rules
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementPolicy {
    /// Height sampling
    pub height: HeightPolicy,
    /// Index into the scene's material pair before the per-scene swap
    pub material_slot: usize,
    /// Behaviour in liquid scenes
    pub fluid: FluidRole,
}

const POLICY_TABLE: [(Role, PlacementPolicy); 2] = [
    (
        Role::Source,
        PlacementPolicy {
            height: HeightPolicy::Elevated { min: 1.0, max: 4.0 },
            material_slot: 0,
            fluid: FluidRole::Inflow,
        },
    ),
    (
        Role::Effector,
        PlacementPolicy {
            height: HeightPolicy::Grounded,
            material_slot: 1,
            fluid: FluidRole::Collision,
        },
    ),
];

impl Role {
    /// Largest object count every index of which has a policy
    pub const SUPPORTED_OBJECTS: usize = POLICY_TABLE.len();

    /// Role taken by the object at `index` in placement order
    pub fn for_index(index: usize) -> Self {
        match index {
            0 => Self::Source,
            1 => Self::Effector,
            _ => Self::Plain,
        }
    }

    /// Placement rules for this role, `None` if the role is unsupported
    pub fn placement_policy(self) -> Option<PlacementPolicy> {
        POLICY_TABLE
            .iter()
            .find(|(role, _)| *role == self)
            .map(|(_, policy)| *policy)
    }

    /// Whether this object is the liquid source in a liquid scene
    pub fn is_liquid_source(self) -> bool {
        self == Self::Source
    }
}
