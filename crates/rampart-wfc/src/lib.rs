//! Socket-constrained wave function collapse over a 3D block grid.
#![forbid(unsafe_code)]

pub mod adjacency;
pub mod collapse;
pub mod frontier;
pub mod generator;
pub mod grid;
pub mod mask;
pub mod params;
pub mod select;

pub use adjacency::{AdjacencyTable, can_blocks_connect};
pub use collapse::{CollapseMode, Collapser, GenerationReport, Phase};
pub use frontier::{Frontier, shannon_entropy};
pub use generator::{BlockGenerator, GenerateError, SolvedGrid};
pub use grid::{Cell, Grid};
pub use mask::GridMask;
pub use params::{GenerationConfig, GenerationParams, load_params_from_path};
pub use select::choose_weighted;
