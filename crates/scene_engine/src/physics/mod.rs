//! Collision primitives used by the placement checks

pub mod collision;

pub use collision::BoundingSphere;
