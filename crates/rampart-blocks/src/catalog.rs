use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use rampart_geom::{Aabb, Vec3};

use crate::config::CatalogConfig;
use crate::registry::BlockRegistry;
use crate::types::BlockId;

#[derive(Clone, Debug, PartialEq)]
pub struct Asset {
    pub id: BlockId,
    pub name: String,
    pub path: PathBuf,
    pub bounds: Option<Aabb>,
    pub textures: Vec<PathBuf>,
}

/// Ordered list of renderable assets, addressable by block id.
#[derive(Default, Clone, Debug)]
pub struct AssetCatalog {
    pub assets: Vec<Asset>,
    by_id: HashMap<BlockId, usize>,
}

impl AssetCatalog {
    pub fn new() -> Self {
        Self {
            assets: Vec::new(),
            by_id: HashMap::new(),
        }
    }

    /// Adds an asset; an existing entry with the same id is replaced in place.
    pub fn push(&mut self, asset: Asset) {
        if let Some(&i) = self.by_id.get(&asset.id) {
            self.assets[i] = asset;
        } else {
            self.by_id.insert(asset.id, self.assets.len());
            self.assets.push(asset);
        }
    }

    #[inline]
    pub fn get(&self, id: BlockId) -> Option<&Asset> {
        self.by_id.get(&id).map(|&i| &self.assets[i])
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Uniform cell size taken from the first asset's bounding box (its largest side).
    pub fn cell_size_hint(&self) -> Option<f32> {
        let bounds = self.assets.first()?.bounds?;
        let size = bounds.extent().max_element();
        (size.is_finite() && size > 0.0).then_some(size)
    }

    pub fn from_config(cfg: &CatalogConfig) -> Self {
        let mut catalog = AssetCatalog::new();
        for (i, def) in cfg.assets.iter().enumerate() {
            catalog.push(Asset {
                id: def.id.unwrap_or(i as BlockId),
                name: def.name.clone(),
                path: PathBuf::from(&def.path),
                bounds: def
                    .bounds
                    .map(|b| Aabb::new(Vec3::from(b.min), Vec3::from(b.max))),
                textures: def.textures.iter().map(PathBuf::from).collect(),
            });
        }
        catalog
    }
}

pub fn load_from_toml_str(toml_str: &str) -> Result<(AssetCatalog, BlockRegistry), Box<dyn Error>> {
    let cfg: CatalogConfig = toml::from_str(toml_str)?;
    let registry = BlockRegistry::from_config(&cfg)?;
    Ok((AssetCatalog::from_config(&cfg), registry))
}

/// Loads `catalog.toml` into the asset list and a finalized block registry.
pub fn load_from_path(
    path: impl AsRef<Path>,
) -> Result<(AssetCatalog, BlockRegistry), Box<dyn Error>> {
    let s = fs::read_to_string(path)?;
    load_from_toml_str(&s)
}
