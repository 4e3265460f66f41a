use crate::socket::Socket;
use crate::types::{BlockId, Face, Rotation, RotationSet};

#[derive(Clone, Debug, PartialEq)]
pub struct BlockTemplate {
    pub id: BlockId,
    pub name: String,
    // Indexed by `Face::index()`.
    pub sockets: [Socket; 6],
    pub allowed_rotations: RotationSet,
}

impl BlockTemplate {
    /// All faces open, all four yaw rotations allowed.
    pub fn open(id: BlockId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            sockets: [Socket::EMPTY; 6],
            allowed_rotations: RotationSet::ALL,
        }
    }

    pub fn with_socket(mut self, face: Face, socket: Socket) -> Self {
        self.sockets[face.index()] = socket;
        self
    }

    pub fn with_rotations(mut self, rotations: RotationSet) -> Self {
        self.allowed_rotations = rotations;
        self
    }

    #[inline]
    pub fn socket(&self, face: Face) -> Socket {
        self.sockets[face.index()]
    }
}

// Quarter-turn cycle of the horizontal faces.
const YAW_CYCLE: [Face; 4] = [Face::PosX, Face::PosZ, Face::NegX, Face::NegZ];

/// Sockets after yawing the block by `rotation`: each quarter turn moves the
/// socket on +X to +Z, +Z to -X, -X to -Z and -Z to +X. ±Y stay put.
pub fn rotate_sockets(sockets: &[Socket; 6], rotation: Rotation) -> [Socket; 6] {
    let mut out = *sockets;
    let k = rotation.steps() as usize;
    for (i, from) in YAW_CYCLE.iter().enumerate() {
        let to = YAW_CYCLE[(i + k) % 4];
        out[to.index()] = sockets[from.index()];
    }
    out
}
