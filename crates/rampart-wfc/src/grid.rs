use hashbrown::{HashMap, HashSet};
use rampart_blocks::{BlockId, BlockRegistry, Candidate, Face};
use rampart_geom::{Dims, Vec3};

use crate::mask::{GridMask, is_rect_corner};

#[derive(Clone, Debug, PartialEq)]
pub enum Cell {
    // Masked cells stay here with no candidates and are never touched.
    Unresolved { candidates: Vec<Candidate> },
    // `choice: None` is a contradiction or failed corner: the cell holds air.
    Resolved {
        choice: Option<Candidate>,
        position: Vec3,
    },
}

impl Cell {
    #[inline]
    pub fn is_resolved(&self) -> bool {
        matches!(self, Cell::Resolved { .. })
    }

    #[inline]
    pub fn choice(&self) -> Option<Candidate> {
        match self {
            Cell::Resolved { choice, .. } => *choice,
            Cell::Unresolved { .. } => None,
        }
    }

    /// Remaining options; a resolved cell reports its single choice.
    #[inline]
    pub fn candidates(&self) -> &[Candidate] {
        match self {
            Cell::Unresolved { candidates } => candidates,
            Cell::Resolved { choice, .. } => choice.as_slice(),
        }
    }
}

/// Dense 3D cell array plus the per-run bookkeeping the collapse engine needs.
#[derive(Clone, Debug)]
pub struct Grid {
    dims: Dims,
    cell_size: f32,
    origin: Vec3,
    mask: Option<GridMask>,
    cells: Vec<Cell>,
    base_all: Vec<Candidate>,
    // base_all minus corner-only blocks; used off-corner when masked
    base_edge: Vec<Candidate>,
    counts: HashMap<BlockId, u32>,
}

impl Grid {
    /// Every cell starts with every registered (block, rotation) pair, except
    /// that corner-only blocks are withheld from non-corner cells under a mask.
    pub fn initialize(
        dims: Dims,
        cell_size: f32,
        origin: Vec3,
        mask: Option<GridMask>,
        reg: &BlockRegistry,
        corner_only: &HashSet<BlockId>,
    ) -> Self {
        let base_all = reg.candidates();
        let base_edge: Vec<Candidate> = base_all
            .iter()
            .copied()
            .filter(|c| !corner_only.contains(&c.block))
            .collect();
        let mut grid = Self {
            dims,
            cell_size,
            origin,
            mask,
            cells: Vec::with_capacity(dims.len()),
            base_all,
            base_edge,
            counts: HashMap::new(),
        };
        for idx in 0..dims.len() {
            let candidates = if grid.is_masked_idx(idx) {
                Vec::new()
            } else {
                grid.base_candidates(idx).to_vec()
            };
            grid.cells.push(Cell::Unresolved { candidates });
        }
        grid
    }

    pub fn empty() -> Self {
        Self {
            dims: Dims::default(),
            cell_size: 1.0,
            origin: Vec3::ZERO,
            mask: None,
            cells: Vec::new(),
            base_all: Vec::new(),
            base_edge: Vec::new(),
            counts: HashMap::new(),
        }
    }

    #[inline]
    pub fn dims(&self) -> Dims {
        self.dims
    }

    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn has_mask(&self) -> bool {
        self.mask.is_some()
    }

    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[inline]
    pub fn cell(&self, idx: usize) -> &Cell {
        &self.cells[idx]
    }

    pub fn cell_at(&self, x: i32, y: i32, z: i32) -> Option<&Cell> {
        if !self.is_valid_position(x, y, z) {
            return None;
        }
        Some(&self.cells[self.dims.idx(x as usize, y as usize, z as usize)])
    }

    #[inline]
    pub fn is_valid_position(&self, x: i32, y: i32, z: i32) -> bool {
        self.dims.contains(x, y, z)
    }

    /// Out of bounds counts as masked.
    pub fn is_masked(&self, x: i32, y: i32, z: i32) -> bool {
        if !self.is_valid_position(x, y, z) {
            return true;
        }
        self.is_masked_idx(self.dims.idx(x as usize, y as usize, z as usize))
    }

    #[inline]
    pub fn is_masked_idx(&self, idx: usize) -> bool {
        match &self.mask {
            Some(m) => m.is_excluded(idx),
            None => idx >= self.dims.len(),
        }
    }

    /// Only meaningful under a mask; always false otherwise.
    pub fn is_corner_position(&self, x: i32, y: i32, z: i32) -> bool {
        self.has_mask()
            && self.is_valid_position(x, y, z)
            && is_rect_corner(self.dims, x as usize, z as usize)
    }

    #[inline]
    pub fn is_corner_idx(&self, idx: usize) -> bool {
        let (x, _, z) = self.dims.pos(idx);
        self.has_mask() && is_rect_corner(self.dims, x, z)
    }

    /// First open corner in index order (y, then z, then x).
    pub fn first_open_corner(&self) -> Option<usize> {
        (0..self.len()).find(|&i| self.is_corner_idx(i) && !self.is_masked_idx(i))
    }

    #[inline]
    pub fn pos(&self, idx: usize) -> (usize, usize, usize) {
        self.dims.pos(idx)
    }

    pub fn world_position(&self, x: usize, y: usize, z: usize) -> Vec3 {
        self.origin + Vec3::new(x as f32, y as f32, z as f32) * self.cell_size
    }

    /// In-bounds neighbor index across `face`.
    pub fn neighbor(&self, idx: usize, face: Face) -> Option<usize> {
        let (x, y, z) = self.dims.pos(idx);
        let (dx, dy, dz) = face.delta();
        let (nx, ny, nz) = (x as i32 + dx, y as i32 + dy, z as i32 + dz);
        self.is_valid_position(nx, ny, nz)
            .then(|| self.dims.idx(nx as usize, ny as usize, nz as usize))
    }

    /// Full candidate list a cell is allowed before any neighbor is resolved.
    pub fn base_candidates(&self, idx: usize) -> &[Candidate] {
        if self.has_mask() && !self.is_corner_idx(idx) {
            &self.base_edge
        } else {
            &self.base_all
        }
    }

    #[inline]
    pub fn block_count(&self, block: BlockId) -> u32 {
        self.counts.get(&block).copied().unwrap_or(0)
    }

    pub fn resolved_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_resolved()).count()
    }

    /// Resolved cells holding a block: (x, y, z, choice, world position).
    pub fn placements(&self) -> impl Iterator<Item = (usize, usize, usize, Candidate, Vec3)> + '_ {
        self.cells.iter().enumerate().filter_map(|(i, c)| match c {
            Cell::Resolved {
                choice: Some(choice),
                position,
            } => {
                let (x, y, z) = self.dims.pos(i);
                Some((x, y, z, *choice, *position))
            }
            _ => None,
        })
    }

    pub(crate) fn set_candidates(&mut self, idx: usize, candidates: Vec<Candidate>) {
        debug_assert!(!self.cells[idx].is_resolved());
        self.cells[idx] = Cell::Unresolved { candidates };
    }

    pub(crate) fn resolve(&mut self, idx: usize, choice: Option<Candidate>) {
        debug_assert!(!self.cells[idx].is_resolved(), "cell {idx} resolved twice");
        let (x, y, z) = self.dims.pos(idx);
        let position = self.world_position(x, y, z);
        if let Some(c) = choice {
            *self.counts.entry(c.block).or_insert(0) += 1;
        }
        self.cells[idx] = Cell::Resolved { choice, position };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rampart_blocks::{BlockTemplate, Rotation, RotationSet};

    fn registry() -> BlockRegistry {
        let mut reg = BlockRegistry::new();
        reg.add_template(BlockTemplate::open(0, "wall").with_rotations(RotationSet::IDENTITY));
        reg.add_template(BlockTemplate::open(1, "corner"));
        reg.generate_rotated_variants();
        reg
    }

    #[test]
    fn unmasked_cells_get_every_variant() {
        let reg = registry();
        let grid = Grid::initialize(
            Dims::new(2, 2, 2),
            1.0,
            Vec3::ZERO,
            None,
            &reg,
            &HashSet::from([1]),
        );
        for c in grid.cells() {
            assert_eq!(c.candidates().len(), 5);
        }
        assert!(!grid.is_corner_position(0, 0, 0));
    }

    #[test]
    fn corner_only_blocks_stay_on_corners() {
        let reg = registry();
        let dims = Dims::new(3, 1, 3);
        let grid = Grid::initialize(
            dims,
            2.0,
            Vec3::ZERO,
            Some(GridMask::hollow_rectangle(dims)),
            &reg,
            &HashSet::from([1]),
        );
        assert!(grid.is_corner_position(2, 0, 2));
        assert!(!grid.is_corner_position(1, 0, 0));
        assert_eq!(grid.cell_at(0, 0, 0).unwrap().candidates().len(), 5);
        assert_eq!(
            grid.cell_at(1, 0, 0).unwrap().candidates(),
            &[Candidate::new(0, Rotation::R0)]
        );
        assert!(grid.cell_at(1, 0, 1).unwrap().candidates().is_empty());
        assert!(grid.is_masked(1, 0, 1));
        assert!(grid.is_masked(-1, 0, 0));
        assert!(!grid.is_masked(2, 0, 1));
        assert_eq!(grid.first_open_corner(), Some(0));
        assert_eq!(grid.world_position(2, 0, 1), Vec3::new(4.0, 0.0, 2.0));
    }

    #[test]
    fn resolve_counts_blocks() {
        let reg = registry();
        let mut grid = Grid::initialize(
            Dims::new(2, 1, 1),
            1.0,
            Vec3::new(10.0, 0.0, 0.0),
            None,
            &reg,
            &HashSet::new(),
        );
        grid.resolve(1, Some(Candidate::new(1, Rotation::R90)));
        grid.resolve(0, None);
        assert_eq!(grid.block_count(1), 1);
        assert_eq!(grid.block_count(0), 0);
        assert_eq!(grid.resolved_count(), 2);
        let placed: Vec<_> = grid.placements().collect();
        assert_eq!(placed.len(), 1);
        assert_eq!(placed[0].4, Vec3::new(11.0, 0.0, 0.0));
        assert_eq!(grid.neighbor(0, Face::PosX), Some(1));
        assert_eq!(grid.neighbor(0, Face::NegX), None);
    }
}
