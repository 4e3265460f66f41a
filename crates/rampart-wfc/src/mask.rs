use rampart_geom::Dims;

/// Per-cell "excluded from generation" flags, fixed for one run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridMask {
    dims: Dims,
    excluded: Vec<bool>,
}

impl GridMask {
    pub fn from_fn(dims: Dims, mut excluded: impl FnMut(usize, usize, usize) -> bool) -> Self {
        let mut flags = vec![false; dims.len()];
        for y in 0..dims.y {
            for z in 0..dims.z {
                for x in 0..dims.x {
                    flags[dims.idx(x, y, z)] = excluded(x, y, z);
                }
            }
        }
        Self {
            dims,
            excluded: flags,
        }
    }

    /// Only the outer XZ ring stays open, on every Y level.
    pub fn hollow_rectangle(dims: Dims) -> Self {
        Self::from_fn(dims, |x, _, z| !is_ring(dims, x, z))
    }

    #[inline]
    pub fn dims(&self) -> Dims {
        self.dims
    }

    #[inline]
    pub fn is_excluded(&self, idx: usize) -> bool {
        self.excluded.get(idx).copied().unwrap_or(true)
    }

    pub fn open_count(&self) -> usize {
        self.excluded.iter().filter(|e| !**e).count()
    }
}

#[inline]
fn is_ring(dims: Dims, x: usize, z: usize) -> bool {
    x == 0 || z == 0 || x + 1 == dims.x || z + 1 == dims.z
}

/// Where two edges of the XZ rectangle meet.
#[inline]
pub fn is_rect_corner(dims: Dims, x: usize, z: usize) -> bool {
    (x == 0 || x + 1 == dims.x) && (z == 0 || z + 1 == dims.z)
}
