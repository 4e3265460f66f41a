use serde::Deserialize;

use crate::socket::{Socket, SocketType};
use crate::types::Face;

// Top-level asset catalog file
#[derive(Deserialize, Debug, Clone)]
pub struct CatalogConfig {
    #[serde(default)]
    pub assets: Vec<AssetDef>,
    // Extra compatible socket pairs on top of the defaults.
    #[serde(default)]
    pub socket_rules: Vec<SocketRuleDef>,
    // When false, material classes only connect through `socket_rules`.
    #[serde(default = "default_true")]
    pub default_rules: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            assets: Vec::new(),
            socket_rules: Vec::new(),
            default_rules: true,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct AssetDef {
    pub name: String,
    #[serde(default)]
    pub id: Option<u16>,
    pub path: String,
    #[serde(default)]
    pub bounds: Option<BoundsDef>,
    #[serde(default)]
    pub textures: Vec<String>,
    #[serde(default)]
    pub sockets: Option<SocketsDef>,
    // Yaw angles in degrees; all four when absent.
    #[serde(default)]
    pub rotations: Option<Vec<u16>>,
}

#[derive(Deserialize, Debug, Clone, Copy)]
pub struct BoundsDef {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

// Face sockets: `all`, then `side` for the four horizontal faces, then per-face overrides
#[derive(Deserialize, Debug, Clone, Default)]
pub struct SocketsDef {
    #[serde(default)]
    pub all: Option<SocketCfg>,
    #[serde(default)]
    pub side: Option<SocketCfg>,
    #[serde(default)]
    pub pos_x: Option<SocketCfg>,
    #[serde(default)]
    pub neg_x: Option<SocketCfg>,
    #[serde(default)]
    pub top: Option<SocketCfg>,
    #[serde(default)]
    pub bottom: Option<SocketCfg>,
    #[serde(default)]
    pub pos_z: Option<SocketCfg>,
    #[serde(default)]
    pub neg_z: Option<SocketCfg>,
}

// Either `"a"` or `{ kind = "a", symmetric = false }`
#[derive(Deserialize, Debug, Clone, Copy)]
#[serde(untagged)]
pub enum SocketCfg {
    Kind(SocketType),
    Detailed {
        kind: SocketType,
        #[serde(default = "default_true")]
        symmetric: bool,
    },
}

impl SocketCfg {
    pub fn to_socket(self) -> Socket {
        match self {
            SocketCfg::Kind(kind) => Socket::new(kind),
            SocketCfg::Detailed { kind, symmetric } => Socket { kind, symmetric },
        }
    }
}

impl SocketsDef {
    pub fn compile(&self) -> [Socket; 6] {
        let mut out = [Socket::EMPTY; 6];
        if let Some(all) = self.all {
            out = [all.to_socket(); 6];
        }
        if let Some(side) = self.side {
            for f in Face::HORIZONTAL {
                out[f.index()] = side.to_socket();
            }
        }
        let faces = [
            (Face::PosX, self.pos_x),
            (Face::NegX, self.neg_x),
            (Face::PosY, self.top),
            (Face::NegY, self.bottom),
            (Face::PosZ, self.pos_z),
            (Face::NegZ, self.neg_z),
        ];
        for (face, cfg) in faces {
            if let Some(c) = cfg {
                out[face.index()] = c.to_socket();
            }
        }
        out
    }
}

#[derive(Deserialize, Debug, Clone, Copy)]
pub struct SocketRuleDef {
    pub a: SocketType,
    pub b: SocketType,
}

fn default_true() -> bool {
    true
}
