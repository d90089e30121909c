//! # Scene Construction
//!
//! Direction frames, roles, placement, relationship inference, liquid
//! setups and the documents a generated scene is recorded in.

pub mod directions;
pub mod generator;
pub mod liquid;
pub mod object;
pub mod placement;
pub mod record;
pub mod relationships;
pub mod role;

#[cfg(test)]
mod tests;

pub use directions::{Direction, DirectionFrame, FrameError};
pub use generator::{SceneError, SceneGenerator, SceneRequest};
pub use liquid::{LiquidDomain, LiquidParams, LiquidSetup};
pub use object::{ObjectAssets, PixelCoords, PlacedObject};
pub use placement::{Placement, PlacementEngine, PlacementError};
pub use record::{DatasetDocument, DatasetInfo, SceneRecord};
pub use relationships::RelationshipGraph;
pub use role::{FluidRole, HeightPolicy, PlacementPolicy, Role};
