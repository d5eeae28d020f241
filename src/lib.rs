//! Terrain generation library
//!
//! Re-exports modules for use by binaries and tools.

pub mod ascii;
pub mod config;
pub mod erosion;
pub mod error;
pub mod export;
pub mod graph;
pub mod grid;
pub mod grid3d;
pub mod maps;
pub mod noise_field;
pub mod orchestrator;
pub mod seeds;
pub mod telemetry;
pub mod tilemap;

pub use config::GeneratorConfig;
pub use error::{Result, TerrainError};
pub use graph::TerrainGraph;
pub use grid::{Cell, Grid2D, Material, TerrainGrid, VerticalRange};
pub use grid3d::Grid3D;
pub use orchestrator::{MapOrchestrator, PipelineState};
