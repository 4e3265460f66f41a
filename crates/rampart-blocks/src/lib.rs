//! Sockets, block templates, rotation variants, and the asset catalog.
#![forbid(unsafe_code)]

pub mod catalog;
pub mod config;
pub mod registry;
pub mod socket;
pub mod template;
pub mod types;

pub use catalog::{Asset, AssetCatalog};
pub use registry::BlockRegistry;
pub use socket::{Socket, SocketRules, SocketType};
pub use template::{BlockTemplate, rotate_sockets};
pub use types::{BlockId, Candidate, Face, Rotation, RotationSet};
