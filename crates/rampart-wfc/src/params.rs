use std::collections::{BTreeMap, BTreeSet};
use std::error::Error;
use std::fs;
use std::path::Path;

use rampart_blocks::{BlockId, BlockRegistry};
use rampart_geom::{Dims, Vec3};
use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_dims")]
    pub dims: [usize; 3],
    #[serde(default)]
    pub cell_size: Option<f32>,
    #[serde(default)]
    pub origin: [f32; 3],
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default)]
    pub blocks: Vec<BlockRule>,
    #[serde(default)]
    pub mask: MaskConfig,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            dims: default_dims(),
            cell_size: None,
            origin: [0.0; 3],
            seed: default_seed(),
            blocks: Vec::new(),
            mask: MaskConfig::default(),
        }
    }
}

fn default_dims() -> [usize; 3] {
    [8, 1, 8]
}
fn default_seed() -> u64 {
    1337
}

/// Per-block knobs, keyed by catalog name.
#[derive(Clone, Debug, Deserialize)]
pub struct BlockRule {
    pub name: String,
    #[serde(default = "default_weight")]
    pub weight: f64,
    #[serde(default)]
    pub max_count: Option<u32>,
}
fn default_weight() -> f64 {
    1.0
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct MaskConfig {
    #[serde(default)]
    pub enable: bool,
    #[serde(default)]
    pub corner_blocks: Vec<String>,
}

/// Resolved generation parameters, keyed by block id.
#[derive(Clone, Debug)]
pub struct GenerationParams {
    pub dims: Dims,
    pub cell_size: Option<f32>,
    pub origin: Vec3,
    pub seed: u64,
    pub weights: BTreeMap<BlockId, f64>,
    pub max_counts: BTreeMap<BlockId, u32>,
    pub mask_enabled: bool,
    pub corner_blocks: BTreeSet<BlockId>,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self::from_config(&GenerationConfig::default(), &BlockRegistry::new())
    }
}

impl GenerationParams {
    pub fn from_config(cfg: &GenerationConfig, reg: &BlockRegistry) -> Self {
        let mut weights = BTreeMap::new();
        let mut max_counts = BTreeMap::new();
        for rule in &cfg.blocks {
            let Some(id) = reg.id_by_name(&rule.name) else {
                log::warn!("generation config: unknown block '{}', skipped", rule.name);
                continue;
            };
            weights.insert(id, rule.weight);
            if let Some(n) = rule.max_count {
                max_counts.insert(id, n);
            }
        }
        let mut corner_blocks = BTreeSet::new();
        for name in &cfg.mask.corner_blocks {
            match reg.id_by_name(name) {
                Some(id) => {
                    corner_blocks.insert(id);
                }
                None => log::warn!("generation config: unknown corner block '{}', skipped", name),
            }
        }
        let [x, y, z] = cfg.dims;
        Self {
            dims: Dims::new(x, y, z),
            cell_size: cfg.cell_size,
            origin: Vec3::from(cfg.origin),
            seed: cfg.seed,
            weights,
            max_counts,
            mask_enabled: cfg.mask.enable,
            corner_blocks,
        }
    }

    /// Selection weight for a block; 1.0 when unconfigured.
    #[inline]
    pub fn weight(&self, block: BlockId) -> f64 {
        self.weights.get(&block).copied().unwrap_or(1.0)
    }

    #[inline]
    pub fn max_count(&self, block: BlockId) -> Option<u32> {
        self.max_counts.get(&block).copied()
    }

    pub fn with_dims(mut self, dims: Dims) -> Self {
        self.dims = dims;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_weight(mut self, block: BlockId, weight: f64) -> Self {
        self.weights.insert(block, weight);
        self
    }

    pub fn with_max_count(mut self, block: BlockId, n: u32) -> Self {
        self.max_counts.insert(block, n);
        self
    }

    pub fn with_corner_blocks(mut self, blocks: impl IntoIterator<Item = BlockId>) -> Self {
        self.corner_blocks = blocks.into_iter().collect();
        self
    }
}

pub fn load_params_from_path(
    path: &Path,
    reg: &BlockRegistry,
) -> Result<GenerationParams, Box<dyn Error>> {
    let s = fs::read_to_string(path)?;
    let cfg: GenerationConfig = toml::from_str(&s)?;
    Ok(GenerationParams::from_config(&cfg, reg))
}
