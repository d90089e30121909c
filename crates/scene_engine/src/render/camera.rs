//! # Scene Camera
//!
//! A pinhole camera used to derive the direction frame and to project object
//! centers to pixel coordinates.
//!
//! ## Coordinate System
//! The camera looks down its local -Z axis with local +Y up and +X right.
//! World space is Z-up. Pixel coordinates put the origin at the top-left
//! corner, so pixel y grows downward.

use crate::foundation::math::{constants, utils, Quat, Vec3};
use crate::scene::object::PixelCoords;

/// Projects world positions into image space
pub trait CameraProjection {
    /// `(x_px, y_px, depth)` of a world position
    fn project(&self, world: &Vec3) -> PixelCoords;
}

/// Pinhole camera with a symmetric field of view
///
/// The field of view spans the larger image dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Camera position in world space
    pub position: Vec3,
    /// World-from-camera rotation
    pub orientation: Quat,
    /// Field of view angle in radians
    pub fov: f64,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
}

impl Camera {
    /// Field of view of the dataset camera, a 35mm lens on a 32mm sensor
    pub const DATASET_FOV_DEGREES: f64 = 49.134;

    /// Create a camera
    ///
    /// # Arguments
    /// * `position` - Camera position in world space
    /// * `orientation` - Rotation taking camera-local axes to world axes
    /// * `fov_degrees` - Field of view in degrees (converted to radians internally)
    /// * `width`, `height` - Image size in pixels
    pub fn new(position: Vec3, orientation: Quat, fov_degrees: f64, width: u32, height: u32) -> Self {
        Self {
            position,
            orientation,
            fov: utils::deg_to_rad(fov_degrees),
            width,
            height,
        }
    }

    /// The fixed camera of the base dataset scene, looking down at the
    /// origin from the front right
    pub fn dataset_default(width: u32, height: u32) -> Self {
        Self::new(
            Vec3::new(7.3589, -6.9258, 4.9583),
            utils::quat_from_euler_degrees(63.559, 0.620, 46.692),
            Self::DATASET_FOV_DEGREES,
            width,
            height,
        )
    }

    /// Move the camera without changing its orientation
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        log::trace!("Camera position updated to: {:?}", position.as_slice());
    }

    /// Change the output resolution
    pub fn set_resolution(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    /// World position expressed in camera-local coordinates
    pub fn world_to_camera(&self, world: &Vec3) -> Vec3 {
        self.orientation.inverse_transform_vector(&(world - self.position))
    }

    /// Normalized view coordinates `(x, y, depth)`
    ///
    /// `x` and `y` are 0 at the left and bottom image edges and 1 at the
    /// right and top edges. Depth is the distance along the view axis. A
    /// point on the camera plane maps to the image center with depth 0.
    pub fn normalized_view(&self, world: &Vec3) -> (f64, f64, f64) {
        let local = self.world_to_camera(world);
        let depth = -local.z;
        if depth.abs() < constants::NORMALIZE_EPSILON {
            return (0.5, 0.5, 0.0);
        }

        let half_extent = (self.fov / 2.0).tan();
        let (w, h) = (f64::from(self.width), f64::from(self.height));
        let (half_w, half_h) = if w >= h {
            (half_extent, half_extent * h / w)
        } else {
            (half_extent * w / h, half_extent)
        };

        let x = local.x / (depth * half_w);
        let y = local.y / (depth * half_h);
        ((x + 1.0) / 2.0, (y + 1.0) / 2.0, depth)
    }
}

impl CameraProjection for Camera {
    #[allow(clippy::cast_possible_truncation)]
    fn project(&self, world: &Vec3) -> PixelCoords {
        let (x, y, depth) = self.normalized_view(world);
        let (w, h) = (f64::from(self.width), f64::from(self.height));
        PixelCoords((x * w).round() as i32, (h - y * h).round() as i32, depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Camera 10 units down -Y, looking along +Y with a 90 degree field of view
    fn facing_north() -> Camera {
        Camera::new(
            Vec3::new(0.0, -10.0, 0.0),
            utils::quat_from_euler_degrees(90.0, 0.0, 0.0),
            90.0,
            200,
            200,
        )
    }

    #[test]
    fn test_optical_axis_hits_center() {
        let camera = facing_north();
        let p = camera.project(&Vec3::new(0.0, 0.0, 0.0));
        assert_eq!((p.0, p.1), (100, 100));
        assert_relative_eq!(p.2, 10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_pixel_axes() {
        let camera = facing_north();

        // World +X is camera right.
        let right = camera.project(&Vec3::new(1.0, 0.0, 0.0));
        assert_eq!((right.0, right.1), (110, 100));

        // World +Z is camera up, and pixel y grows downward.
        let up = camera.project(&Vec3::new(0.0, 0.0, 2.0));
        assert_eq!((up.0, up.1), (100, 80));
    }

    #[test]
    fn test_non_square_image() {
        let mut camera = facing_north();
        camera.set_resolution(400, 200);
        // The field of view spans the width, so the right edge is at x = depth.
        let edge = camera.project(&Vec3::new(10.0, 0.0, 0.0));
        assert_eq!((edge.0, edge.1), (400, 100));
        // Vertically the image covers half the width's extent.
        let top = camera.project(&Vec3::new(0.0, 0.0, 5.0));
        assert_eq!((top.0, top.1), (200, 0));
    }

    #[test]
    fn test_camera_plane_maps_to_center() {
        let camera = facing_north();
        let p = camera.project(&Vec3::new(3.0, -10.0, 1.0));
        assert_eq!(p, PixelCoords(100, 100, 0.0));
    }

    #[test]
    fn test_dataset_camera_sees_origin() {
        let camera = Camera::dataset_default(480, 320);
        let p = camera.project(&Vec3::zeros());
        assert!(p.2 > 0.0);
        assert!((0..480).contains(&p.0));
        assert!((0..320).contains(&p.1));
    }
}
