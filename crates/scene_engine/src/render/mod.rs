//! Rendering collaborators
//!
//! The engine never renders itself. It projects through a [`Camera`] and
//! drives a [`SceneHost`], retrying renders under a [`RetryPolicy`].

pub mod camera;
pub mod host;
pub mod retry;

pub use camera::{Camera, CameraProjection};
pub use host::{HostError, ObjectHandle, ObjectSpawn, SceneHost};
pub use retry::{RenderError, RetryPolicy};
