use std::error::Error;
use std::fs;
use std::path::Path;

use fastnoise_lite::{FastNoiseLite, NoiseType};
use rampart_blocks::{AssetCatalog, BlockId, BlockRegistry};
use rampart_geom::{Dims, Vec3};
use rampart_mesh::{InstanceTransform, PlacementSet};
use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
pub struct TerrainConfig {
    #[serde(default = "default_surface")]
    pub surface: String,
    #[serde(default = "default_fill")]
    pub fill: String,
    #[serde(default = "default_frequency")]
    pub frequency: f32,
    #[serde(default = "default_min_ratio")]
    pub min_y_ratio: f32,
    #[serde(default = "default_max_ratio")]
    pub max_y_ratio: f32,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            surface: default_surface(),
            fill: default_fill(),
            frequency: default_frequency(),
            min_y_ratio: default_min_ratio(),
            max_y_ratio: default_max_ratio(),
        }
    }
}

fn default_surface() -> String {
    "floor".to_string()
}
fn default_fill() -> String {
    "floor".to_string()
}
fn default_frequency() -> f32 {
    0.02
}
fn default_min_ratio() -> f32 {
    0.15
}
fn default_max_ratio() -> f32 {
    0.7
}

#[derive(Clone, Debug)]
pub struct TerrainParams {
    pub surface: Option<BlockId>,
    pub fill: Option<BlockId>,
    pub frequency: f32,
    pub min_y_ratio: f32,
    pub max_y_ratio: f32,
}

impl TerrainParams {
    pub fn from_config(cfg: &TerrainConfig, reg: &BlockRegistry) -> Self {
        let lookup = |name: &str| {
            let id = reg.id_by_name(name);
            if id.is_none() {
                log::warn!("terrain config: unknown block '{}'", name);
            }
            id
        };
        Self {
            surface: lookup(&cfg.surface),
            fill: lookup(&cfg.fill),
            frequency: cfg.frequency,
            min_y_ratio: cfg.min_y_ratio,
            max_y_ratio: cfg.max_y_ratio,
        }
    }
}

pub fn load_terrain_from_path(
    path: &Path,
    reg: &BlockRegistry,
) -> Result<TerrainParams, Box<dyn Error>> {
    let s = fs::read_to_string(path)?;
    let cfg: TerrainConfig = toml::from_str(&s)?;
    Ok(TerrainParams::from_config(&cfg, reg))
}

/// Noise heightmap of stacked blocks: `fill` below, `surface` on top.
#[derive(Clone, Debug)]
pub struct TerrainGenerator {
    pub catalog: AssetCatalog,
    pub params: TerrainParams,
    pub dims: Dims,
    pub cell_size: f32,
    pub origin: Vec3,
    pub seed: u64,
}

impl TerrainGenerator {
    /// Column height in cells, always within `1..=dims.y`.
    pub fn column_height(&self, noise: &FastNoiseLite, x: usize, z: usize) -> usize {
        let h = noise.get_noise_2d(x as f32, z as f32);
        // map [-1,1] -> [min_h, max_h]
        let sy = self.dims.y as f32;
        let min_h = (sy * self.params.min_y_ratio) as i32;
        let max_h = (sy * self.params.max_y_ratio) as i32;
        let hh = ((h + 1.0) * 0.5 * (max_h - min_h) as f32) as i32 + min_h;
        hh.clamp(1, self.dims.y.max(1) as i32) as usize
    }

    fn noise(&self) -> FastNoiseLite {
        // fold the seed into the i32 the noise expects
        let mut noise = FastNoiseLite::with_seed((self.seed ^ (self.seed >> 32)) as i32);
        noise.set_noise_type(Some(NoiseType::OpenSimplex2));
        noise.set_frequency(Some(self.params.frequency));
        noise
    }

    pub fn generate(&self) -> PlacementSet {
        let mut set = PlacementSet::new();
        if self.dims.is_empty() {
            log::error!(
                "terrain dimensions {}x{}x{} hold no cells",
                self.dims.x,
                self.dims.y,
                self.dims.z
            );
            return set;
        }
        let noise = self.noise();
        for z in 0..self.dims.z {
            for x in 0..self.dims.x {
                let height = self.column_height(&noise, x, z);
                for y in 0..height {
                    let block = if y + 1 == height {
                        self.params.surface
                    } else {
                        self.params.fill
                    };
                    let Some(block) = block else {
                        set.skip();
                        continue;
                    };
                    let Some(asset) = self.catalog.get(block) else {
                        set.skip();
                        continue;
                    };
                    for tex in &asset.textures {
                        set.add_texture(tex);
                    }
                    let pos = self.origin + Vec3::new(x as f32, y as f32, z as f32) * self.cell_size;
                    set.push(block, &asset.path, InstanceTransform::new(pos, 0.0));
                }
            }
        }
        log::info!(
            "terrain {}x{}x{}: {} instances",
            self.dims.x,
            self.dims.y,
            self.dims.z,
            set.len()
        );
        set
    }
}
