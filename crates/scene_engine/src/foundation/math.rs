//! Math utilities and types
//!
//! Scene placement works in double precision world space (Z-up, ground plane
//! at z = 0), so every alias here is `f64`.

pub use nalgebra::{UnitQuaternion, Vector3};

/// 3D vector type
pub type Vec3 = Vector3<f64>;

/// Unit quaternion type for orientations
pub type Quat = UnitQuaternion<f64>;

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f64 = std::f64::consts::PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f64 = PI / 180.0;

    /// Lengths below this are treated as zero when normalizing
    pub const NORMALIZE_EPSILON: f64 = 1e-9;
}

/// Math utility functions
pub mod utils {
    use super::{constants, Quat, Vec3};

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f64) -> f64 {
        degrees * constants::DEG_TO_RAD
    }

    /// Component of `v` along `axis` (`axis` need not be unit length).
    ///
    /// Returns `None` when `axis` is zero.
    pub fn project_onto(v: &Vec3, axis: &Vec3) -> Option<Vec3> {
        let len_sq = axis.magnitude_squared();
        if len_sq < constants::NORMALIZE_EPSILON * constants::NORMALIZE_EPSILON {
            return None;
        }
        Some(axis * (v.dot(axis) / len_sq))
    }

    /// Normalize, refusing vectors too short to carry a direction.
    pub fn try_normalize(v: &Vec3) -> Option<Vec3> {
        v.try_normalize(constants::NORMALIZE_EPSILON)
    }

    /// Build an orientation from XYZ Euler angles given in degrees.
    ///
    /// Rotation order matches the usual DCC convention: X first, then Y, then Z.
    pub fn quat_from_euler_degrees(x: f64, y: f64, z: f64) -> Quat {
        Quat::from_euler_angles(deg_to_rad(x), deg_to_rad(y), deg_to_rad(z))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_deg_to_rad() {
        assert_relative_eq!(utils::deg_to_rad(180.0), constants::PI);
        assert_relative_eq!(utils::deg_to_rad(90.0), constants::PI / 2.0);
    }

    #[test]
    fn test_project_onto() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        let p = utils::project_onto(&v, &Vec3::new(0.0, 0.0, 2.0)).unwrap();
        assert_relative_eq!(p, Vec3::new(0.0, 0.0, 3.0));

        assert!(utils::project_onto(&v, &Vec3::zeros()).is_none());
    }

    #[test]
    fn test_try_normalize_rejects_zero() {
        assert!(utils::try_normalize(&Vec3::zeros()).is_none());
        let n = utils::try_normalize(&Vec3::new(3.0, 0.0, 4.0)).unwrap();
        assert_relative_eq!(n.magnitude(), 1.0);
    }
}
