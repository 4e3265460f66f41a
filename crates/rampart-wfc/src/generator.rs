use std::borrow::Cow;

use hashbrown::HashSet;
use rampart_blocks::{AssetCatalog, BlockId, BlockRegistry};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

use crate::adjacency::AdjacencyTable;
use crate::collapse::{CollapseMode, Collapser, GenerationReport};
use crate::grid::Grid;
use crate::mask::GridMask;
use crate::params::GenerationParams;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GenerateError {
    #[error("asset catalog defines no placeable blocks")]
    EmptyCatalog,
    #[error("grid dimensions {0}x{1}x{2} are empty or too large")]
    InvalidDimensions(usize, usize, usize),
}

/// A collapsed grid and what happened while collapsing it.
#[derive(Clone, Debug)]
pub struct SolvedGrid {
    pub grid: Grid,
    pub report: GenerationReport,
}

impl SolvedGrid {
    pub fn empty() -> Self {
        Self {
            grid: Grid::empty(),
            report: GenerationReport::default(),
        }
    }
}

/// Socket-driven block placement. Owns its catalog, registry and parameters;
/// every call builds a fresh adjacency table, grid and rng.
#[derive(Clone, Debug)]
pub struct BlockGenerator {
    catalog: AssetCatalog,
    registry: BlockRegistry,
    params: GenerationParams,
}

impl BlockGenerator {
    pub fn new(catalog: AssetCatalog, registry: BlockRegistry, params: GenerationParams) -> Self {
        Self {
            catalog,
            registry,
            params,
        }
    }

    pub fn catalog(&self) -> &AssetCatalog {
        &self.catalog
    }

    pub fn registry(&self) -> &BlockRegistry {
        &self.registry
    }

    pub fn params(&self) -> &GenerationParams {
        &self.params
    }

    pub fn set_params(&mut self, params: GenerationParams) {
        self.params = params;
    }

    /// Configured cell size, else the first asset's bounding box, else 1.0.
    pub fn cell_size(&self) -> f32 {
        self.params
            .cell_size
            .or_else(|| self.catalog.cell_size_hint())
            .unwrap_or(1.0)
    }

    /// Castle layout when the mask is enabled, open frontier otherwise.
    pub fn try_generate(&self) -> Result<SolvedGrid, GenerateError> {
        if self.params.mask_enabled {
            self.generate_castle()
        } else {
            self.generate_frontier()
        }
    }

    /// Like [`try_generate`](Self::try_generate), but logs failures and
    /// returns an empty grid instead.
    pub fn generate(&self) -> SolvedGrid {
        match self.try_generate() {
            Ok(solved) => solved,
            Err(e) => {
                log::error!("generation aborted: {e}");
                SolvedGrid::empty()
            }
        }
    }

    pub fn generate_frontier(&self) -> Result<SolvedGrid, GenerateError> {
        self.run(CollapseMode::Frontier)
    }

    pub fn generate_castle(&self) -> Result<SolvedGrid, GenerateError> {
        self.run(CollapseMode::Castle)
    }

    fn run(&self, mode: CollapseMode) -> Result<SolvedGrid, GenerateError> {
        if self.registry.is_empty() {
            return Err(GenerateError::EmptyCatalog);
        }
        let dims = self.params.dims;
        if matches!(dims.checked_len(), None | Some(0)) {
            return Err(GenerateError::InvalidDimensions(dims.x, dims.y, dims.z));
        }

        let registry: Cow<'_, BlockRegistry> = if self.registry.variants_ready() {
            Cow::Borrowed(&self.registry)
        } else {
            log::warn!("rotation variants are stale; regenerating for this run");
            let mut reg = self.registry.clone();
            reg.generate_rotated_variants();
            Cow::Owned(reg)
        };
        if registry.candidates().is_empty() {
            log::error!("no template allows any rotation; nothing can be placed");
            return Err(GenerateError::EmptyCatalog);
        }
        let adjacency = AdjacencyTable::build(&registry);

        let (mask, corner_only): (Option<GridMask>, HashSet<BlockId>) = match mode {
            CollapseMode::Frontier => (None, HashSet::new()),
            CollapseMode::Castle => (
                Some(GridMask::hollow_rectangle(dims)),
                self.params.corner_blocks.iter().copied().collect(),
            ),
        };
        let mut grid = Grid::initialize(
            dims,
            self.cell_size(),
            self.params.origin,
            mask,
            &registry,
            &corner_only,
        );

        let rng = ChaCha8Rng::seed_from_u64(self.params.seed);
        let report = Collapser::new(
            &registry,
            &adjacency,
            &self.params,
            &mut grid,
            rng,
            mode,
        )
        .run();

        log::info!(
            "{:?} run {}x{}x{} seed {}: {} blocks placed, {} contradictions, {} corner failures",
            mode,
            dims.x,
            dims.y,
            dims.z,
            self.params.seed,
            report.resolved,
            report.contradictions.len(),
            report.corner_failures.len()
        );
        Ok(SolvedGrid { grid, report })
    }
}
