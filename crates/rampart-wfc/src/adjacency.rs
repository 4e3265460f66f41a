use hashbrown::{HashMap, HashSet};
use rampart_blocks::{BlockRegistry, Candidate, Face};

/// Precomputed legal neighbors for every (block, rotation, face).
#[derive(Clone, Debug, Default)]
pub struct AdjacencyTable {
    entries: HashMap<(Candidate, Face), HashSet<Candidate>>,
}

impl AdjacencyTable {
    /// Tests every variant pair across every face. Each variant gets an entry
    /// for all six faces, possibly empty.
    pub fn build(reg: &BlockRegistry) -> Self {
        let variants: Vec<Candidate> = reg.candidates();
        let mut entries = HashMap::with_capacity(variants.len() * 6);
        for &a in &variants {
            for face in Face::ALL {
                let allowed: HashSet<Candidate> = variants
                    .iter()
                    .copied()
                    .filter(|&b| can_blocks_connect(reg, a, face, b, false))
                    .collect();
                entries.insert((a, face), allowed);
            }
        }
        log::debug!(
            "adjacency table: {} variants, {} entries",
            variants.len(),
            entries.len()
        );
        Self { entries }
    }

    /// Neighbors allowed across `face` of `a`; `None` when `a` has no entry.
    #[inline]
    pub fn neighbors(&self, a: Candidate, face: Face) -> Option<&HashSet<Candidate>> {
        self.entries.get(&(a, face))
    }

    /// Whether `b` may sit in the cell across `face` of `a`. Missing entries allow nothing.
    #[inline]
    pub fn allows(&self, a: Candidate, face: Face, b: Candidate) -> bool {
        self.neighbors(a, face).is_some_and(|s| s.contains(&b))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Socket on `face` of `a` against the socket on the opposite face of `b`.
/// An empty or out-of-bounds neighbor always fits; unknown variants never do.
pub fn can_blocks_connect(
    reg: &BlockRegistry,
    a: Candidate,
    face: Face,
    b: Candidate,
    neighbor_is_empty: bool,
) -> bool {
    if neighbor_is_empty {
        return true;
    }
    let (Some(sa), Some(sb)) = (
        reg.variant(a.block, a.rotation),
        reg.variant(b.block, b.rotation),
    ) else {
        return false;
    };
    reg.rules.can_connect(
        sa[face.index()].kind,
        sb[face.opposite().index()].kind,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rampart_blocks::{BlockTemplate, Rotation, RotationSet, Socket, SocketType};

    fn registry() -> BlockRegistry {
        let mut reg = BlockRegistry::new();
        reg.add_template(
            BlockTemplate::open(0, "a")
                .with_socket(Face::PosX, Socket::new(SocketType::A))
                .with_socket(Face::NegX, Socket::new(SocketType::B))
                .with_rotations(RotationSet::ALL),
        );
        reg.add_template(
            BlockTemplate::open(1, "wall")
                .with_socket(Face::PosX, Socket::WALL)
                .with_socket(Face::NegX, Socket::new(SocketType::A))
                .with_rotations(RotationSet::IDENTITY),
        );
        reg.generate_rotated_variants();
        reg
    }

    #[test]
    fn every_variant_has_six_entries() {
        let reg = registry();
        let table = AdjacencyTable::build(&reg);
        assert_eq!(table.len(), reg.candidates().len() * 6);
    }

    #[test]
    fn matching_sockets_are_listed() {
        let reg = registry();
        let table = AdjacencyTable::build(&reg);
        let a0 = Candidate::new(0, Rotation::R0);
        let w = Candidate::new(1, Rotation::R0);
        // a's +X (A) against wall's -X (A)
        assert!(table.allows(a0, Face::PosX, w));
        // wall's +X (Wall) against a's -X (B)
        assert!(!table.allows(w, Face::PosX, a0));
        // a rotated 180 puts its B socket on +X; B-A is not a rule
        let a180 = Candidate::new(0, Rotation::R180);
        assert!(!table.allows(a180, Face::PosX, w));
    }

    #[test]
    fn empty_neighbor_short_circuits() {
        let reg = registry();
        let w = Candidate::new(1, Rotation::R0);
        let ghost = Candidate::new(42, Rotation::R0);
        assert!(can_blocks_connect(&reg, w, Face::PosX, ghost, true));
        assert!(!can_blocks_connect(&reg, w, Face::PosX, ghost, false));
        assert!(!AdjacencyTable::build(&reg).allows(ghost, Face::PosX, w));
    }
}
