//! # Core Engine Module
//!
//! Shared configuration for every subsystem of the generator.

pub mod config;

// Re-export commonly used config types
pub use config::{
    EngineConfig, GeneratorConfig, InfoConfig, InputConfig, LiquidConfig, OutputConfig,
    PlacementConfig, RelationConfig, RenderSettings,
};
