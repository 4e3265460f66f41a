use serde::{Deserialize, Serialize};

pub type BlockId = u16;

// Socket arrays are indexed in this order: [+X, -X, +Y, -Y, +Z, -Z].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum Face {
    PosX = 0,
    NegX = 1,
    PosY = 2,
    NegY = 3,
    PosZ = 4,
    NegZ = 5,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::PosX,
        Face::NegX,
        Face::PosY,
        Face::NegY,
        Face::PosZ,
        Face::NegZ,
    ];
    pub const HORIZONTAL: [Face; 4] = [Face::PosX, Face::NegX, Face::PosZ, Face::NegZ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn from_index(i: usize) -> Option<Face> {
        Face::ALL.get(i).copied()
    }

    #[inline]
    pub fn opposite(self) -> Face {
        match self {
            Face::PosX => Face::NegX,
            Face::NegX => Face::PosX,
            Face::PosY => Face::NegY,
            Face::NegY => Face::PosY,
            Face::PosZ => Face::NegZ,
            Face::NegZ => Face::PosZ,
        }
    }

    #[inline]
    pub fn delta(self) -> (i32, i32, i32) {
        match self {
            Face::PosX => (1, 0, 0),
            Face::NegX => (-1, 0, 0),
            Face::PosY => (0, 1, 0),
            Face::NegY => (0, -1, 0),
            Face::PosZ => (0, 0, 1),
            Face::NegZ => (0, 0, -1),
        }
    }

    #[inline]
    pub fn is_horizontal(self) -> bool {
        !matches!(self, Face::PosY | Face::NegY)
    }
}

/// Yaw rotation about +Y in quarter turns.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum Rotation {
    #[default]
    R0,
    R90,
    R180,
    R270,
}

impl Rotation {
    pub const ALL: [Rotation; 4] = [Rotation::R0, Rotation::R90, Rotation::R180, Rotation::R270];

    #[inline]
    pub fn steps(self) -> u8 {
        self as u8
    }

    #[inline]
    pub fn from_steps(steps: u8) -> Rotation {
        Rotation::ALL[(steps % 4) as usize]
    }

    #[inline]
    pub fn degrees(self) -> u16 {
        self.steps() as u16 * 90
    }

    pub fn from_degrees(deg: u16) -> Option<Rotation> {
        match deg {
            0 => Some(Rotation::R0),
            90 => Some(Rotation::R90),
            180 => Some(Rotation::R180),
            270 => Some(Rotation::R270),
            _ => None,
        }
    }

    #[inline]
    pub fn then(self, other: Rotation) -> Rotation {
        Rotation::from_steps(self.steps() + other.steps())
    }

    /// Quarter turns between two rotations along the shorter way round (0..=2).
    #[inline]
    pub fn distance(self, other: Rotation) -> u8 {
        let d = (other.steps() + 4 - self.steps()) % 4;
        d.min(4 - d)
    }
}

/// Set of allowed yaw rotations, one bit per quarter turn.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct RotationSet(u8);

impl RotationSet {
    pub const EMPTY: RotationSet = RotationSet(0);
    pub const ALL: RotationSet = RotationSet(0b1111);
    pub const IDENTITY: RotationSet = RotationSet(0b0001);

    #[inline]
    pub fn contains(self, r: Rotation) -> bool {
        self.0 & (1 << r.steps()) != 0
    }

    #[inline]
    pub fn insert(&mut self, r: Rotation) {
        self.0 |= 1 << r.steps();
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn iter(self) -> impl Iterator<Item = Rotation> {
        Rotation::ALL.into_iter().filter(move |r| self.contains(*r))
    }

    /// Builds a set from degree values, returning the first invalid angle on failure.
    pub fn from_degrees(degrees: &[u16]) -> Result<RotationSet, u16> {
        let mut set = RotationSet::EMPTY;
        for &d in degrees {
            set.insert(Rotation::from_degrees(d).ok_or(d)?);
        }
        Ok(set)
    }
}

impl Default for RotationSet {
    fn default() -> Self {
        RotationSet::ALL
    }
}

impl FromIterator<Rotation> for RotationSet {
    fn from_iter<I: IntoIterator<Item = Rotation>>(iter: I) -> Self {
        let mut set = RotationSet::EMPTY;
        for r in iter {
            set.insert(r);
        }
        set
    }
}

/// A (block, rotation) pair a cell may hold.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Candidate {
    pub block: BlockId,
    #[serde(with = "rotation_degrees")]
    pub rotation: Rotation,
}

impl Candidate {
    #[inline]
    pub const fn new(block: BlockId, rotation: Rotation) -> Self {
        Self { block, rotation }
    }
}

mod rotation_degrees {
    use super::Rotation;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(r: &Rotation, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u16(r.degrees())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Rotation, D::Error> {
        let deg = u16::deserialize(d)?;
        Rotation::from_degrees(deg).ok_or_else(|| D::Error::custom(format!("bad yaw {deg}")))
    }
}
