//! Optional liquid-domain scenes
//!
//! A liquid scene turns the source object into an inflow and the effector
//! into a collider, then asks the host to bake a liquid domain around them.
//! The simulation itself belongs to the host.

use std::path::PathBuf;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::foundation::math::Vec3;

/// Which kind of liquid, if any, a scene contains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LiquidSetup {
    /// No liquid
    None,
    /// Inviscid liquid
    Water,
    /// Viscous liquid
    Viscous,
}

impl LiquidSetup {
    /// All setups, in the order they are drawn from
    pub const ALL: [Self; 3] = [Self::None, Self::Water, Self::Viscous];

    /// Draw uniformly over all setups when enabled, otherwise `None`
    pub fn sample<R: Rng + ?Sized>(rng: &mut R, enabled: bool) -> Self {
        if enabled {
            Self::ALL[rng.gen_range(0..Self::ALL.len())]
        } else {
            Self::None
        }
    }

    /// Simulation parameters for this setup
    pub fn params(self) -> Option<LiquidParams> {
        match self {
            Self::None => None,
            Self::Water => Some(LiquidParams {
                viscosity: 0.0,
                sim_time: 50,
                rgb: [0.0; 3],
            }),
            Self::Viscous => Some(LiquidParams {
                viscosity: 0.05,
                sim_time: 100,
                rgb: [0.0; 3],
            }),
        }
    }
}

/// Parameter block written to the scene document
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LiquidParams {
    /// Kinematic viscosity; zero disables viscosity
    pub viscosity: f64,
    /// Simulated frames; the rendered frame is the last one
    pub sim_time: u32,
    /// Placeholder color
    pub rgb: [f64; 3],
}

/// Everything the host needs to create a liquid domain
#[derive(Debug, Clone, PartialEq)]
pub struct LiquidDomain {
    /// Domain cube center
    pub center: Vec3,
    /// Domain cube edge length
    pub size: f64,
    /// Simulation parameters
    pub params: LiquidParams,
    /// Liquid material asset
    pub material: String,
    /// Where the host keeps its bake cache
    pub cache_dir: PathBuf,
}

impl LiquidDomain {
    /// The standard domain: a 6-unit cube resting on the ground at the origin
    pub fn new(params: LiquidParams, material: impl Into<String>, cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            center: Vec3::new(0.0, 0.0, 3.0),
            size: 6.0,
            params,
            material: material.into(),
            cache_dir: cache_dir.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_disabled_is_always_none() {
        let mut rng = StdRng::seed_from_u64(0);
        for _ in 0..50 {
            assert_eq!(LiquidSetup::sample(&mut rng, false), LiquidSetup::None);
        }
    }

    #[test]
    fn test_enabled_draws_every_setup() {
        let mut rng = StdRng::seed_from_u64(0);
        let seen: HashSet<_> = (0..200).map(|_| LiquidSetup::sample(&mut rng, true)).collect();
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_params() {
        assert!(LiquidSetup::None.params().is_none());

        let water = LiquidSetup::Water.params().unwrap();
        assert_eq!(water.viscosity, 0.0);
        assert_eq!(water.sim_time, 50);

        let viscous = LiquidSetup::Viscous.params().unwrap();
        assert_eq!(viscous.viscosity, 0.05);
        assert_eq!(viscous.sim_time, 100);
        assert_eq!(viscous.rgb, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_domain_sits_on_ground() {
        let domain = LiquidDomain::new(LiquidSetup::Water.params().unwrap(), "Water", "cache");
        assert_eq!(domain.center.z - domain.size / 2.0, 0.0);
    }
}
