//! Command-line front end: load a castle catalog, generate, print what got placed.
#![forbid(unsafe_code)]

mod assets;
mod generator;
mod terrain;

use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use rampart_blocks::catalog::load_from_path;
use rampart_geom::Dims;
use rampart_wfc::{BlockGenerator, GenerationParams, load_params_from_path};

use generator::{Generated, Generator};
use terrain::{TerrainConfig, TerrainGenerator, TerrainParams, load_terrain_from_path};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Open grid, frontier collapse
    Blocks,
    /// Hollow perimeter with corner towers
    Castle,
    /// Noise heightmap
    Terrain,
}

#[derive(Parser, Debug)]
#[command(name = "rampart")]
#[command(about = "Socket-constrained block layout generator")]
struct Args {
    /// Assets root (contains assets/castle/catalog.toml)
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Asset catalog TOML; defaults to the one under the assets root
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Generation parameters TOML
    #[arg(long)]
    params: Option<PathBuf>,

    /// Generation strategy; castle when the params enable the mask, else blocks
    #[arg(long, value_enum)]
    mode: Option<Mode>,

    #[arg(long)]
    seed: Option<u64>,

    /// Synthesis threads (0 = one per core)
    #[arg(long, default_value = "0")]
    workers: usize,

    /// Grid size as WxHxL
    #[arg(long, value_parser = parse_dims)]
    dims: Option<Dims>,
}

fn parse_dims(s: &str) -> Result<Dims, String> {
    let parts: Vec<&str> = s.split(['x', 'X']).collect();
    let [w, h, l] = parts.as_slice() else {
        return Err(format!("expected WxHxL, got '{s}'"));
    };
    let num = |p: &str| {
        p.trim()
            .parse::<usize>()
            .map_err(|e| format!("bad dimension '{p}': {e}"))
    };
    Ok(Dims::new(num(w)?, num(h)?, num(l)?))
}

fn build_generator(args: &Args) -> Result<Generator, Box<dyn Error>> {
    let root = assets::resolve_assets_root(args.assets.clone());
    let catalog_path = args
        .catalog
        .clone()
        .unwrap_or_else(|| assets::catalog_path(&root));
    let (catalog, registry) = load_from_path(&catalog_path)
        .map_err(|e| format!("loading catalog {}: {e}", catalog_path.display()))?;
    log::info!(
        "catalog {}: {} assets, {} templates, {} rotated variants",
        catalog_path.display(),
        catalog.len(),
        registry.len(),
        registry.candidates().len()
    );

    let params_path = args.params.clone().unwrap_or_else(|| assets::params_path(&root));
    let mut params = if params_path.exists() {
        load_params_from_path(&params_path, &registry)
            .map_err(|e| format!("loading params {}: {e}", params_path.display()))?
    } else if args.params.is_some() {
        return Err(format!("params file {} not found", params_path.display()).into());
    } else {
        log::info!("no generation params at {}; using defaults", params_path.display());
        GenerationParams::default()
    };
    if let Some(seed) = args.seed {
        params.seed = seed;
    }
    if let Some(dims) = args.dims {
        params.dims = dims;
    }

    let mode = args.mode.unwrap_or(if params.mask_enabled {
        Mode::Castle
    } else {
        Mode::Blocks
    });
    let generator = match mode {
        Mode::Blocks | Mode::Castle => {
            params.mask_enabled = mode == Mode::Castle;
            Generator::Blocks(BlockGenerator::new(catalog, registry, params))
        }
        Mode::Terrain => {
            let terrain_path = assets::terrain_path(&root);
            let terrain = if terrain_path.exists() {
                load_terrain_from_path(&terrain_path, &registry)?
            } else {
                TerrainParams::from_config(&TerrainConfig::default(), &registry)
            };
            let cell_size = params
                .cell_size
                .or_else(|| catalog.cell_size_hint())
                .unwrap_or(1.0);
            Generator::Terrain(TerrainGenerator {
                catalog,
                params: terrain,
                dims: params.dims,
                cell_size,
                origin: params.origin,
                seed: params.seed,
            })
        }
    };
    Ok(generator)
}

fn print_summary(generator: &Generator, out: &Generated) {
    let catalog = match generator {
        Generator::Blocks(g) => g.catalog(),
        Generator::Terrain(t) => &t.catalog,
    };
    println!("mode: {}", generator.name());
    for (block, instances) in out.placements.iter() {
        let name = catalog.get(block).map(|a| a.name.as_str()).unwrap_or("?");
        println!("  {name:<24} {:>6}", instances.len());
    }
    println!(
        "instances: {}  textures: {}  skipped: {}",
        out.placements.len(),
        out.placements.texture_count(),
        out.placements.skipped()
    );
    let r = &out.report;
    println!(
        "contradictions: {}  corner failures: {}",
        r.contradictions.len(),
        r.corner_failures.len()
    );
    for (x, y, z) in &r.contradictions {
        println!("  contradiction at ({x}, {y}, {z})");
    }
    for (x, y, z) in &r.corner_failures {
        println!("  corner failed at ({x}, {y}, {z})");
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let generator = match build_generator(&args) {
        Ok(g) => g,
        Err(e) => {
            log::error!("{e}");
            return ExitCode::FAILURE;
        }
    };
    let out = generator.generate(args.workers);
    print_summary(&generator, &out);
    ExitCode::SUCCESS
}
