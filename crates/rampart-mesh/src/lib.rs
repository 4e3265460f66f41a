//! Turns a collapsed grid into per-asset instance transforms.
#![forbid(unsafe_code)]

pub mod placement;
pub mod synth;

pub use placement::{InstanceTransform, Placement, PlacementSet};
pub use synth::{build_placements, x_slices};
