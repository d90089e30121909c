//! Camera-relative cardinal directions on the ground plane
//!
//! The frame is derived once per scene from the camera orientation and the
//! ground normal, then used both for spacing checks during placement and for
//! labelling relationships.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::foundation::math::{utils, Quat, Vec3};

/// One of the six cardinal directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Away from the camera
    Behind,
    /// Towards the camera
    Front,
    /// Camera left
    Left,
    /// Camera right
    Right,
    /// Along the ground normal
    Above,
    /// Against the ground normal
    Below,
}

impl Direction {
    /// Directions lying in the ground plane, in record order
    pub const HORIZONTAL: [Self; 4] = [Self::Behind, Self::Front, Self::Left, Self::Right];

    /// All six directions, in record order
    pub const ALL: [Self; 6] = [
        Self::Behind,
        Self::Front,
        Self::Left,
        Self::Right,
        Self::Above,
        Self::Below,
    ];

    /// Lowercase name used in scene documents
    pub fn name(self) -> &'static str {
        match self {
            Self::Behind => "behind",
            Self::Front => "front",
            Self::Left => "left",
            Self::Right => "right",
            Self::Above => "above",
            Self::Below => "below",
        }
    }
}

/// Largest horizontal component a unit ground normal may carry
const TILT_TOLERANCE: f64 = 1e-9;

/// Errors building a direction frame
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FrameError {
    /// An axis vanished after projection onto or along the ground normal
    #[error("degenerate camera/ground geometry: {axis} axis has zero length after projection")]
    Degenerate {
        /// Which axis collapsed
        axis: &'static str,
    },

    /// The ground normal is not the world Z axis
    #[error("ground normal {normal:?} is not vertical; placement assumes a Z-up ground plane")]
    TiltedGround {
        /// Normal reported by the host
        normal: [f64; 3],
    },
}

/// Six unit vectors keyed by direction name
///
/// Opposite pairs are exact negations of each other. Serialized as the
/// `directions` block of a scene document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DirectionFrame {
    behind: [f64; 3],
    front: [f64; 3],
    left: [f64; 3],
    right: [f64; 3],
    above: [f64; 3],
    below: [f64; 3],
}

impl DirectionFrame {
    /// Derive the frame from a camera orientation and a ground normal
    ///
    /// The camera looks down its local -Z axis with +Y up, so local
    /// `(0, 0, -1)` is "behind" (away from the viewer), `(-1, 0, 0)` is left
    /// and `(0, 1, 0)` is up. Horizontal axes are flattened onto the ground
    /// plane; the up axis keeps only its component along the normal.
    ///
    /// Placement measures horizontal separation in world x/y, so the ground
    /// normal must be parallel to world Z.
    pub fn from_camera(orientation: &Quat, ground_normal: &Vec3) -> Result<Self, FrameError> {
        let unit_normal =
            utils::try_normalize(ground_normal).ok_or(FrameError::Degenerate { axis: "normal" })?;
        if unit_normal.x.hypot(unit_normal.y) > TILT_TOLERANCE {
            return Err(FrameError::TiltedGround {
                normal: (*ground_normal).into(),
            });
        }

        let cam_behind = orientation * Vec3::new(0.0, 0.0, -1.0);
        let cam_left = orientation * Vec3::new(-1.0, 0.0, 0.0);
        let cam_up = orientation * Vec3::new(0.0, 1.0, 0.0);

        let along_normal = |v: &Vec3| {
            utils::project_onto(v, ground_normal).ok_or(FrameError::Degenerate { axis: "normal" })
        };

        let behind = utils::try_normalize(&(cam_behind - along_normal(&cam_behind)?))
            .ok_or(FrameError::Degenerate { axis: "behind" })?;
        let left = utils::try_normalize(&(cam_left - along_normal(&cam_left)?))
            .ok_or(FrameError::Degenerate { axis: "left" })?;
        let above = utils::try_normalize(&along_normal(&cam_up)?)
            .ok_or(FrameError::Degenerate { axis: "above" })?;

        log::debug!(
            "Direction frame: behind={:?} left={:?} above={:?}",
            behind.as_slice(),
            left.as_slice(),
            above.as_slice()
        );

        Ok(Self::from_axes(behind, left, above))
    }

    /// Build a frame from its three positive axes; opposites are negated
    pub fn from_axes(behind: Vec3, left: Vec3, above: Vec3) -> Self {
        Self {
            behind: behind.into(),
            front: (-behind).into(),
            left: left.into(),
            right: (-left).into(),
            above: above.into(),
            below: (-above).into(),
        }
    }

    /// Unit vector for a direction
    pub fn vector(&self, direction: Direction) -> Vec3 {
        let v = match direction {
            Direction::Behind => self.behind,
            Direction::Front => self.front,
            Direction::Left => self.left,
            Direction::Right => self.right,
            Direction::Above => self.above,
            Direction::Below => self.below,
        };
        Vec3::from(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::utils::quat_from_euler_degrees;
    use approx::assert_relative_eq;

    fn z_up() -> Vec3 {
        Vec3::new(0.0, 0.0, 1.0)
    }

    fn dataset_camera() -> Quat {
        quat_from_euler_degrees(63.6, 0.62, 46.7)
    }

    #[test]
    fn test_frame_is_orthonormal() {
        let frame = DirectionFrame::from_camera(&dataset_camera(), &z_up()).unwrap();

        for d in Direction::ALL {
            assert_relative_eq!(frame.vector(d).magnitude(), 1.0, epsilon = 1e-12);
        }
        for (a, b) in [
            (Direction::Behind, Direction::Front),
            (Direction::Left, Direction::Right),
            (Direction::Above, Direction::Below),
        ] {
            assert_eq!(frame.vector(a), -frame.vector(b));
        }
        // Horizontal axes lie in the ground plane; behind and left need not be
        // perpendicular to each other, but both are perpendicular to above.
        let above = frame.vector(Direction::Above);
        for d in Direction::HORIZONTAL {
            assert_relative_eq!(frame.vector(d).dot(&above), 0.0, epsilon = 1e-12);
            assert_relative_eq!(frame.vector(d).z, 0.0, epsilon = 1e-12);
        }
        assert_relative_eq!(above, z_up(), epsilon = 1e-12);
    }

    #[test]
    fn test_axis_aligned_camera() {
        // Looking horizontally along +Y: rotate the default -Z view by 90deg about X.
        let camera = quat_from_euler_degrees(90.0, 0.0, 0.0);
        let frame = DirectionFrame::from_camera(&camera, &z_up()).unwrap();

        assert_relative_eq!(frame.vector(Direction::Behind), Vec3::new(0.0, 1.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(frame.vector(Direction::Front), Vec3::new(0.0, -1.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(frame.vector(Direction::Left), Vec3::new(-1.0, 0.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(frame.vector(Direction::Right), Vec3::new(1.0, 0.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_looking_straight_down_is_degenerate() {
        // Identity camera looks down -Z: its view axis has no ground-plane component.
        let err = DirectionFrame::from_camera(&Quat::identity(), &z_up()).unwrap_err();
        assert_eq!(err, FrameError::Degenerate { axis: "behind" });
    }

    #[test]
    fn test_zero_normal_is_degenerate() {
        let err = DirectionFrame::from_camera(&dataset_camera(), &Vec3::zeros()).unwrap_err();
        assert_eq!(err, FrameError::Degenerate { axis: "normal" });
    }

    #[test]
    fn test_tilted_ground_is_rejected() {
        let tilted = Vec3::new(0.0, 0.1, 1.0);
        let err = DirectionFrame::from_camera(&dataset_camera(), &tilted).unwrap_err();
        assert!(matches!(err, FrameError::TiltedGround { .. }));

        // A scaled Z normal is still vertical.
        assert!(DirectionFrame::from_camera(&dataset_camera(), &Vec3::new(0.0, 0.0, 2.0)).is_ok());
    }

    #[test]
    fn test_frame_is_reproducible() {
        let a = DirectionFrame::from_camera(&dataset_camera(), &z_up()).unwrap();
        let b = DirectionFrame::from_camera(&dataset_camera(), &z_up()).unwrap();
        for d in Direction::ALL {
            assert_eq!(a.vector(d).as_slice(), b.vector(d).as_slice());
        }
    }
}
