use std::path::PathBuf;

use proptest::prelude::*;
use rampart_blocks::{
    Asset, AssetCatalog, BlockRegistry, BlockTemplate, Face, RotationSet, Socket, SocketType,
};
use rampart_geom::Dims;
use rampart_mesh::build_placements;
use rampart_wfc::{BlockGenerator, GenerationParams};

fn asset(id: u16, name: &str, textures: &[&str]) -> Asset {
    Asset {
        id,
        name: name.to_string(),
        path: PathBuf::from(format!("models/{name}.glb")),
        bounds: None,
        textures: textures.iter().map(PathBuf::from).collect(),
    }
}

fn setup(with_ghost: bool) -> (AssetCatalog, BlockRegistry) {
    let mut catalog = AssetCatalog::new();
    catalog.push(asset(0, "floor", &["stone.png"]));
    catalog.push(asset(1, "arch", &["stone.png", "moss.png"]));
    let mut reg = BlockRegistry::new();
    reg.add_template(BlockTemplate::open(0, "floor").with_rotations(RotationSet::IDENTITY));
    reg.add_template(
        BlockTemplate::open(1, "arch").with_socket(Face::PosX, Socket::new(SocketType::A)),
    );
    if with_ghost {
        reg.add_template(BlockTemplate::open(2, "ghost"));
    }
    reg.generate_rotated_variants();
    (catalog, reg)
}

fn solve(seed: u64, dims: Dims, with_ghost: bool) -> (AssetCatalog, rampart_wfc::SolvedGrid) {
    let (catalog, reg) = setup(with_ghost);
    let params = GenerationParams::default().with_dims(dims).with_seed(seed);
    let g = BlockGenerator::new(catalog.clone(), reg, params);
    (catalog, g.generate())
}

#[test]
fn every_placed_cell_becomes_an_instance() {
    let (catalog, solved) = solve(4, Dims::new(5, 2, 3), false);
    let set = build_placements(&solved.grid, &catalog, 3);
    assert_eq!(set.len(), solved.grid.placements().count());
    assert_eq!(set.skipped(), 0);
    let textures: Vec<_> = set.textures().map(|p| p.to_path_buf()).collect();
    assert!(textures.len() <= 2);
    assert!(textures.iter().all(|t| t == &PathBuf::from("stone.png") || t == &PathBuf::from("moss.png")));
}

#[test]
fn blocks_without_assets_are_skipped() {
    let (catalog, solved) = solve(8, Dims::new(6, 1, 6), true);
    let set = build_placements(&solved.grid, &catalog, 2);
    let ghosts = solved.grid.block_count(2) as usize;
    assert_eq!(set.skipped(), ghosts);
    assert!(set.instances(2).is_empty());
    assert_eq!(set.len() + ghosts, solved.grid.placements().count());
}

#[test]
fn empty_grid_gives_empty_set() {
    let catalog = AssetCatalog::new();
    let g = BlockGenerator::new(catalog.clone(), BlockRegistry::new(), GenerationParams::default());
    let set = build_placements(&g.generate().grid, &catalog, 4);
    assert!(set.is_empty());
    assert_eq!(set.texture_count(), 0);
}

#[test]
fn instance_yaw_follows_rotation() {
    let (catalog, solved) = solve(12, Dims::new(4, 1, 4), false);
    let set = build_placements(&solved.grid, &catalog, 1);
    for t in set.instances(0) {
        assert_eq!(t.yaw_degrees, 0.0);
    }
    for t in set.instances(1) {
        assert!([0.0, 90.0, 180.0, 270.0].contains(&t.yaw_degrees));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    // Slicing across more workers never changes the output
    #[test]
    fn output_is_independent_of_worker_count(seed in any::<u64>(), workers in 0usize..9) {
        let (catalog, solved) = solve(seed, Dims::new(7, 2, 3), false);
        let single = build_placements(&solved.grid, &catalog, 1);
        let many = build_placements(&solved.grid, &catalog, workers);
        prop_assert_eq!(single, many);
    }
}
