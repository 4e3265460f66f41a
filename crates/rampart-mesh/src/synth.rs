use std::ops::Range;

use hashbrown::HashSet;
use rampart_blocks::{AssetCatalog, BlockId};
use rampart_wfc::{Cell, Grid};
use rayon::ThreadPoolBuilder;
use rayon::prelude::*;

use crate::placement::{InstanceTransform, Placement, PlacementSet};

/// Splits `0..width` into at most `workers` contiguous, non-empty slices.
pub fn x_slices(width: usize, workers: usize) -> Vec<Range<usize>> {
    let n = workers.clamp(1, width.max(1));
    let base = width / n;
    let extra = width % n;
    let mut out = Vec::with_capacity(n);
    let mut start = 0;
    for i in 0..n {
        let len = base + usize::from(i < extra);
        if len == 0 {
            continue;
        }
        out.push(start..start + len);
        start += len;
    }
    out
}

fn scan_slice(grid: &Grid, xs: Range<usize>) -> Vec<Placement> {
    let dims = grid.dims();
    let mut buf = Vec::new();
    for x in xs {
        for y in 0..dims.y {
            for z in 0..dims.z {
                if let Cell::Resolved {
                    choice: Some(choice),
                    position,
                } = grid.cell(dims.idx(x, y, z))
                {
                    buf.push(Placement {
                        cell: (x, y, z),
                        choice: *choice,
                        transform: InstanceTransform::new(
                            *position,
                            choice.rotation.degrees() as f32,
                        ),
                    });
                }
            }
        }
    }
    buf
}

/// Collects every placed block into per-asset instance lists.
///
/// Each worker scans its own X slice into a private buffer; buffers are merged
/// in slice order afterwards, so the result does not depend on `workers`
/// (0 means one per available core).
pub fn build_placements(grid: &Grid, catalog: &AssetCatalog, workers: usize) -> PlacementSet {
    let dims = grid.dims();
    let workers = if workers == 0 {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(8)
    } else {
        workers
    };
    let slices = x_slices(dims.x, workers);

    let buffers: Vec<Vec<Placement>> = if slices.len() <= 1 {
        slices.into_iter().map(|xs| scan_slice(grid, xs)).collect()
    } else {
        match ThreadPoolBuilder::new()
            .num_threads(slices.len())
            .thread_name(|i| format!("rampart-synth-{i}"))
            .build()
        {
            Ok(pool) => pool.install(|| {
                slices
                    .into_par_iter()
                    .map(|xs| scan_slice(grid, xs))
                    .collect()
            }),
            Err(e) => {
                log::warn!("synthesis pool unavailable ({e}); scanning on this thread");
                slices.into_iter().map(|xs| scan_slice(grid, xs)).collect()
            }
        }
    };

    let mut set = PlacementSet::new();
    let mut missing: HashSet<BlockId> = HashSet::new();
    for placement in buffers.into_iter().flatten() {
        let block = placement.choice.block;
        let Some(asset) = catalog.get(block) else {
            if missing.insert(block) {
                log::warn!("block {} has no catalog asset; its placements are skipped", block);
            }
            set.skip();
            continue;
        };
        for tex in &asset.textures {
            set.add_texture(tex);
        }
        set.push(block, &asset.path, placement.transform);
    }
    log::debug!(
        "synthesized {} instances of {} assets ({} textures, {} skipped)",
        set.len(),
        set.asset_count(),
        set.texture_count(),
        set.skipped()
    );
    set
}
