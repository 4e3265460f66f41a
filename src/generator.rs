use rampart_mesh::{PlacementSet, build_placements};
use rampart_wfc::{BlockGenerator, GenerationReport};

use crate::terrain::TerrainGenerator;

/// One finished run: what to draw and what went wrong on the way.
#[derive(Clone, Debug, Default)]
pub struct Generated {
    pub placements: PlacementSet,
    pub report: GenerationReport,
}

#[derive(Clone, Debug)]
pub enum Generator {
    Blocks(BlockGenerator),
    Terrain(TerrainGenerator),
}

impl Generator {
    pub fn name(&self) -> &'static str {
        match self {
            Generator::Blocks(g) if g.params().mask_enabled => "castle",
            Generator::Blocks(_) => "blocks",
            Generator::Terrain(_) => "terrain",
        }
    }

    /// Runs the strategy and synthesizes instances with `workers` threads.
    pub fn generate(&self, workers: usize) -> Generated {
        match self {
            Generator::Blocks(g) => {
                let solved = g.generate();
                Generated {
                    placements: build_placements(&solved.grid, g.catalog(), workers),
                    report: solved.report,
                }
            }
            Generator::Terrain(t) => {
                let placements = t.generate();
                let report = GenerationReport {
                    resolved: placements.len(),
                    ..GenerationReport::default()
                };
                Generated { placements, report }
            }
        }
    }
}
