//! Bounding spheres
//!
//! Every placed object is approximated by the sphere around its center with
//! the object's (possibly cube-adjusted) radius.

use crate::foundation::math::Vec3;

/// A sphere in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    /// The center position of the sphere in world space
    pub center: Vec3,
    /// The radius of the sphere
    pub radius: f64,
}

impl BoundingSphere {
    /// Creates a new bounding sphere with the given center and radius
    pub fn new(center: Vec3, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Surface-to-surface distance; negative when the spheres overlap
    pub fn clearance(&self, other: &BoundingSphere) -> f64 {
        (self.center - other.center).magnitude() - self.radius - other.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_clearance() {
        let a = BoundingSphere::new(Vec3::new(0.0, 0.0, 0.0), 0.5);
        let b = BoundingSphere::new(Vec3::new(3.0, 0.0, 0.0), 1.0);
        assert_relative_eq!(a.clearance(&b), 1.5);
        assert_relative_eq!(b.clearance(&a), 1.5);
    }

    #[test]
    fn test_overlap() {
        let a = BoundingSphere::new(Vec3::new(0.0, 0.0, 0.0), 1.0);
        let b = BoundingSphere::new(Vec3::new(0.0, 1.5, 0.0), 1.0);
        assert_relative_eq!(a.clearance(&b), -0.5);
    }

    #[test]
    fn test_touching_spheres_have_zero_clearance() {
        let a = BoundingSphere::new(Vec3::new(0.0, 0.0, 0.0), 1.0);
        let b = BoundingSphere::new(Vec3::new(0.0, 0.0, 2.0), 1.0);
        assert_relative_eq!(a.clearance(&b), 0.0);
    }
}
