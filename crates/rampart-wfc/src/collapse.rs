use std::collections::VecDeque;

use hashbrown::HashSet;
use rampart_blocks::{BlockId, BlockRegistry, Candidate, Face, Rotation, RotationSet, SocketType};
use rand::Rng;

use crate::adjacency::AdjacencyTable;
use crate::frontier::{Frontier, shannon_entropy};
use crate::grid::Grid;
use crate::params::GenerationParams;
use crate::select::{choose_weighted, weighted_order};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    Seeding,
    FrontierProcessing,
    Done,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CollapseMode {
    /// Every cell open; seeded from a random cell.
    Frontier,
    /// Hollow perimeter; corners go through the corner placement routine.
    Castle,
}

/// What a run did besides filling the grid.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GenerationReport {
    /// Cells whose candidate set ran dry, finalized empty.
    pub contradictions: Vec<(usize, usize, usize)>,
    /// Corners where no corner block fit in any rotation.
    pub corner_failures: Vec<(usize, usize, usize)>,
    /// Cells holding a block at the end of the run.
    pub resolved: usize,
    pub steps: usize,
}

impl GenerationReport {
    pub fn is_clean(&self) -> bool {
        self.contradictions.is_empty() && self.corner_failures.is_empty()
    }
}

/// Single-threaded, non-backtracking collapse over a borrowed grid.
///
/// Drive it with [`Collapser::run`], or call [`Collapser::step`] to observe
/// the grid between frontier pops.
pub struct Collapser<'a, R: Rng> {
    reg: &'a BlockRegistry,
    adjacency: &'a AdjacencyTable,
    params: &'a GenerationParams,
    grid: &'a mut Grid,
    rng: R,
    mode: CollapseMode,
    phase: Phase,
    frontier: Frontier,
    report: GenerationReport,
    placed_any: bool,
}

impl<'a, R: Rng> Collapser<'a, R> {
    pub fn new(
        reg: &'a BlockRegistry,
        adjacency: &'a AdjacencyTable,
        params: &'a GenerationParams,
        grid: &'a mut Grid,
        rng: R,
        mode: CollapseMode,
    ) -> Self {
        Self {
            reg,
            adjacency,
            params,
            grid,
            rng,
            mode,
            phase: Phase::Seeding,
            frontier: Frontier::new(),
            report: GenerationReport::default(),
            placed_any: false,
        }
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &*self.grid
    }

    #[inline]
    pub fn report(&self) -> &GenerationReport {
        &self.report
    }

    /// Advances by one unit of work. Returns false once the run is done.
    pub fn step(&mut self) -> bool {
        match self.phase {
            Phase::Seeding => {
                match self.mode {
                    CollapseMode::Frontier => self.seed_frontier(),
                    CollapseMode::Castle => self.seed_castle(),
                }
                self.phase = Phase::FrontierProcessing;
                self.report.steps += 1;
                true
            }
            Phase::FrontierProcessing => {
                if let Some((idx, _)) = self.frontier.pop() {
                    self.process(idx);
                    self.report.steps += 1;
                    return true;
                }
                // Corners cut off from the frontier by contradictions still get placed.
                if self.mode == CollapseMode::Castle {
                    if let Some(idx) = self.next_unresolved_corner() {
                        self.place_at_corner(idx);
                        self.report.steps += 1;
                        return true;
                    }
                }
                self.phase = Phase::Done;
                false
            }
            Phase::Done => false,
        }
    }

    pub fn run(mut self) -> GenerationReport {
        while self.step() {}
        self.finish()
    }

    pub fn finish(mut self) -> GenerationReport {
        self.report.resolved = self.grid.placements().count();
        log::debug!(
            "collapse finished: {} steps, {} placed, {} contradictions, {} corner failures",
            self.report.steps,
            self.report.resolved,
            self.report.contradictions.len(),
            self.report.corner_failures.len()
        );
        self.report
    }

    fn seed_frontier(&mut self) {
        let open: Vec<usize> = (0..self.grid.len())
            .filter(|&i| !self.grid.is_masked_idx(i))
            .collect();
        if open.is_empty() {
            log::debug!("no open cells to seed");
            return;
        }
        let idx = open[self.rng.gen_range(0..open.len())];
        let first = self.grid.cell(idx).candidates().first().copied();
        match first {
            Some(c) => self.resolve(idx, Some(c)),
            None => self.contradiction(idx),
        }
    }

    fn seed_castle(&mut self) {
        match self.grid.first_open_corner() {
            Some(idx) => self.place_at_corner(idx),
            None => self.seed_frontier(),
        }
    }

    fn process(&mut self, idx: usize) {
        let cell = self.grid.cell(idx);
        if cell.is_resolved() {
            return;
        }
        if cell.candidates().is_empty() {
            self.contradiction(idx);
            return;
        }
        if self.mode == CollapseMode::Castle && self.grid.is_corner_idx(idx) {
            self.place_at_corner(idx);
        } else {
            self.collapse_cell(idx);
        }
    }

    fn under_cap(&self, block: BlockId) -> bool {
        match self.params.max_count(block) {
            Some(n) => self.grid.block_count(block) < n,
            None => true,
        }
    }

    fn collapse_cell(&mut self, idx: usize) {
        let options: Vec<Candidate> = self
            .grid
            .cell(idx)
            .candidates()
            .iter()
            .copied()
            .filter(|c| self.under_cap(c.block))
            .collect();
        let params = self.params;
        match choose_weighted(&mut self.rng, &options, |c| params.weight(c.block)) {
            Some(&c) => self.resolve(idx, Some(c)),
            None => {
                log::debug!("cell {:?}: every candidate is at its cap", self.grid.pos(idx));
                self.contradiction(idx);
            }
        }
    }

    /// Finalizes `idx`. An empty cell constrains nothing, but the frontier
    /// still has to continue through it.
    fn resolve(&mut self, idx: usize, choice: Option<Candidate>) {
        self.grid.resolve(idx, choice);
        if choice.is_some() {
            self.placed_any = true;
            self.propagate(idx);
        }
        self.enqueue_neighbors(idx);
    }

    fn contradiction(&mut self, idx: usize) {
        let pos = self.grid.pos(idx);
        log::warn!("contradiction at {:?}; leaving the cell empty", pos);
        self.report.contradictions.push(pos);
        self.resolve(idx, None);
    }

    fn entropy(&self, idx: usize) -> f64 {
        shannon_entropy(
            self.grid
                .cell(idx)
                .candidates()
                .iter()
                .map(|c| self.params.weight(c.block)),
        )
    }

    fn is_open_unresolved(&self, idx: usize) -> bool {
        !self.grid.is_masked_idx(idx) && !self.grid.cell(idx).is_resolved()
    }

    fn enqueue_neighbors(&mut self, idx: usize) {
        for face in Face::ALL {
            let Some(n) = self.grid.neighbor(idx, face) else {
                continue;
            };
            if self.is_open_unresolved(n) {
                let e = self.entropy(n);
                self.frontier.push(n, e);
            }
        }
    }

    fn propagate(&mut self, start: usize) {
        let mut work = VecDeque::from([start]);
        let mut in_work: HashSet<usize> = HashSet::new();
        in_work.insert(start);
        while let Some(cur) = work.pop_front() {
            in_work.remove(&cur);
            for face in Face::ALL {
                let Some(n) = self.grid.neighbor(cur, face) else {
                    continue;
                };
                if !self.is_open_unresolved(n) {
                    continue;
                }
                let before = self.grid.cell(n).candidates().len();
                let next = self.allowed_candidates(n);
                if next.len() == before {
                    continue;
                }
                if next.is_empty() {
                    self.contradiction(n);
                    continue;
                }
                self.grid.set_candidates(n, next);
                let e = self.entropy(n);
                self.frontier.update(n, e);
                if in_work.insert(n) {
                    work.push_back(n);
                }
            }
        }
    }

    /// Current candidates of `idx` that every resolved neighbor accepts.
    fn allowed_candidates(&self, idx: usize) -> Vec<Candidate> {
        self.grid
            .cell(idx)
            .candidates()
            .iter()
            .copied()
            .filter(|&c| self.fits_resolved_neighbors(idx, c))
            .collect()
    }

    /// Masked, out-of-bounds and resolved-empty neighbors accept anything.
    fn fits_resolved_neighbors(&self, idx: usize, c: Candidate) -> bool {
        Face::ALL.iter().all(|&face| {
            let Some(n) = self.grid.neighbor(idx, face) else {
                return true;
            };
            if self.grid.is_masked_idx(n) {
                return true;
            }
            match self.grid.cell(n).choice() {
                Some(other) => self.adjacency.allows(c, face, other),
                None => true,
            }
        })
    }

    fn next_unresolved_corner(&self) -> Option<usize> {
        (0..self.grid.len()).find(|&i| {
            self.grid.is_corner_idx(i)
                && self.is_open_unresolved(i)
                && !self.grid.cell(i).candidates().is_empty()
        })
    }

    fn place_at_corner(&mut self, idx: usize) {
        if self.params.corner_blocks.is_empty() {
            self.collapse_cell(idx);
        } else {
            self.place_corner(idx);
        }
    }

    fn place_corner(&mut self, idx: usize) {
        let (x, y, z) = self.grid.pos(idx);
        let preferred = preferred_corner_rotation(x, z);
        let need = if self.placed_any { 1 } else { 2 };
        let current: Vec<Candidate> = self.grid.cell(idx).candidates().to_vec();

        let blocks: Vec<BlockId> = self
            .params
            .corner_blocks
            .iter()
            .copied()
            .filter(|&b| self.under_cap(b) && current.iter().any(|c| c.block == b))
            .collect();
        let params = self.params;
        let order = weighted_order(&mut self.rng, &blocks, |b| params.weight(*b));

        for block in order {
            let Some(allowed) = self.reg.get(block).map(|t| t.allowed_rotations) else {
                continue;
            };
            for rotation in rotation_preference(allowed, preferred) {
                let c = Candidate::new(block, rotation);
                if !current.contains(&c) || !self.fits_resolved_neighbors(idx, c) {
                    continue;
                }
                if self.open_directions(idx, c) < need {
                    continue;
                }
                log::debug!(
                    "corner ({x}, {y}, {z}): block {} at {}°",
                    block,
                    rotation.degrees()
                );
                self.resolve(idx, Some(c));
                return;
            }
        }

        log::warn!("no corner block fits at ({x}, {y}, {z}); leaving it empty");
        self.report.corner_failures.push((x, y, z));
        self.resolve(idx, None);
    }

    /// Horizontal faces leading to an open in-bounds neighbor through a non-wall socket.
    fn open_directions(&self, idx: usize, c: Candidate) -> usize {
        let Some(sockets) = self.reg.variant(c.block, c.rotation) else {
            return 0;
        };
        Face::HORIZONTAL
            .iter()
            .filter(|&&face| {
                sockets[face.index()].kind != SocketType::Wall
                    && self
                        .grid
                        .neighbor(idx, face)
                        .is_some_and(|n| !self.grid.is_masked_idx(n))
            })
            .count()
    }
}

/// Rotation that turns the canonical corner piece (open toward +X and +Z)
/// inward at the given XZ corner.
pub fn preferred_corner_rotation(x: usize, z: usize) -> Rotation {
    match (x == 0, z == 0) {
        (true, true) => Rotation::R0,
        (false, true) => Rotation::R90,
        (false, false) => Rotation::R180,
        (true, false) => Rotation::R270,
    }
}

/// Allowed rotations by angular distance from `preferred`, clockwise first on ties.
pub fn rotation_preference(allowed: RotationSet, preferred: Rotation) -> Vec<Rotation> {
    let mut out: Vec<Rotation> = allowed.iter().collect();
    out.sort_by_key(|&r| {
        let clockwise = r == preferred.then(Rotation::R90);
        (preferred.distance(r), !clockwise)
    });
    out
}
