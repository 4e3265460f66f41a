use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use rampart_blocks::{BlockId, Candidate};
use rampart_geom::{Vec3, rotate_yaw};

/// Where and how an asset instance sits in the world.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct InstanceTransform {
    pub position: Vec3,
    pub yaw_degrees: f32,
}

impl InstanceTransform {
    pub fn new(position: Vec3, yaw_degrees: f32) -> Self {
        Self {
            position,
            yaw_degrees,
        }
    }

    /// Column-major model matrix: yaw about +Y, then translation.
    pub fn to_matrix(&self) -> [f32; 16] {
        let x = rotate_yaw(Vec3::new(1.0, 0.0, 0.0), self.yaw_degrees);
        let z = rotate_yaw(Vec3::new(0.0, 0.0, 1.0), self.yaw_degrees);
        let p = self.position;
        [
            x.x, x.y, x.z, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            z.x, z.y, z.z, 0.0, //
            p.x, p.y, p.z, 1.0,
        ]
    }
}

/// One filled cell on its way into a [`PlacementSet`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Placement {
    pub cell: (usize, usize, usize),
    pub choice: Candidate,
    pub transform: InstanceTransform,
}

/// Instances grouped per asset, plus every texture those assets reference.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlacementSet {
    instances: BTreeMap<BlockId, Vec<InstanceTransform>>,
    paths: BTreeMap<BlockId, PathBuf>,
    textures: BTreeSet<PathBuf>,
    skipped: usize,
}

impl PlacementSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, block: BlockId, asset_path: &Path, transform: InstanceTransform) {
        if !self.paths.contains_key(&block) {
            self.paths.insert(block, asset_path.to_path_buf());
        }
        self.instances.entry(block).or_default().push(transform);
    }

    pub fn add_texture(&mut self, path: &Path) {
        if !self.textures.contains(path) {
            self.textures.insert(path.to_path_buf());
        }
    }

    pub fn skip(&mut self) {
        self.skipped += 1;
    }

    pub fn instances(&self, block: BlockId) -> &[InstanceTransform] {
        self.instances.get(&block).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn asset_path(&self, block: BlockId) -> Option<&Path> {
        self.paths.get(&block).map(PathBuf::as_path)
    }

    /// Assets in id order with their instances.
    pub fn iter(&self) -> impl Iterator<Item = (BlockId, &[InstanceTransform])> {
        self.instances.iter().map(|(id, v)| (*id, v.as_slice()))
    }

    pub fn textures(&self) -> impl Iterator<Item = &Path> {
        self.textures.iter().map(PathBuf::as_path)
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    pub fn asset_count(&self) -> usize {
        self.instances.len()
    }

    /// Total instances across all assets.
    pub fn len(&self) -> usize {
        self.instances.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Placements dropped because their block had no catalog asset.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}
