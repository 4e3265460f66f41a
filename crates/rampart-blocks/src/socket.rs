use std::collections::HashSet;

use serde::Deserialize;

/// Connection kind exposed on one face of a block.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SocketType {
    /// Open space; connects to anything.
    #[default]
    Empty,
    A,
    B,
    C,
    D,
    E,
    /// Closed face; connects to nothing but `Empty`.
    Wall,
}

impl SocketType {
    pub const MATERIALS: [SocketType; 5] = [
        SocketType::A,
        SocketType::B,
        SocketType::C,
        SocketType::D,
        SocketType::E,
    ];
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Socket {
    pub kind: SocketType,
    // Informational only; matching looks at `kind`.
    pub symmetric: bool,
}

impl Socket {
    pub const EMPTY: Socket = Socket {
        kind: SocketType::Empty,
        symmetric: true,
    };
    pub const WALL: Socket = Socket {
        kind: SocketType::Wall,
        symmetric: true,
    };

    #[inline]
    pub const fn new(kind: SocketType) -> Self {
        Self {
            kind,
            symmetric: true,
        }
    }
}

/// Symmetric compatibility table between socket kinds.
#[derive(Clone, Debug, Default)]
pub struct SocketRules {
    pairs: HashSet<(SocketType, SocketType)>,
}

impl SocketRules {
    /// No material pairs; only the `Empty` wildcard connects.
    pub fn new() -> Self {
        Self {
            pairs: HashSet::new(),
        }
    }

    /// Every material class connects to itself.
    pub fn with_defaults() -> Self {
        let mut rules = Self::new();
        for kind in SocketType::MATERIALS {
            rules.add_rule(kind, kind);
        }
        rules
    }

    pub fn add_rule(&mut self, a: SocketType, b: SocketType) {
        self.pairs.insert((a, b));
        self.pairs.insert((b, a));
    }

    pub fn can_connect(&self, a: SocketType, b: SocketType) -> bool {
        if a == SocketType::Empty || b == SocketType::Empty {
            return true;
        }
        if a == SocketType::Wall || b == SocketType::Wall {
            return false;
        }
        self.pairs.contains(&(a, b))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [SocketType; 7] = [
        SocketType::Empty,
        SocketType::A,
        SocketType::B,
        SocketType::C,
        SocketType::D,
        SocketType::E,
        SocketType::Wall,
    ];

    #[test]
    fn empty_is_wildcard() {
        let rules = SocketRules::new();
        for k in ALL {
            assert!(rules.can_connect(SocketType::Empty, k));
            assert!(rules.can_connect(k, SocketType::Empty));
        }
    }

    #[test]
    fn wall_connects_to_nothing_solid() {
        let mut rules = SocketRules::with_defaults();
        rules.add_rule(SocketType::Wall, SocketType::Wall);
        for k in ALL.into_iter().filter(|k| *k != SocketType::Empty) {
            assert!(!rules.can_connect(SocketType::Wall, k));
            assert!(!rules.can_connect(k, SocketType::Wall));
        }
    }

    #[test]
    fn add_rule_is_symmetric_and_unlisted_pairs_fail() {
        let mut rules = SocketRules::new();
        assert!(!rules.can_connect(SocketType::A, SocketType::A));
        rules.add_rule(SocketType::A, SocketType::C);
        assert!(rules.can_connect(SocketType::A, SocketType::C));
        assert!(rules.can_connect(SocketType::C, SocketType::A));
        assert!(!rules.can_connect(SocketType::A, SocketType::B));
        assert_eq!(rules.len(), 2);
    }

    #[test]
    fn defaults_match_same_class_only() {
        let rules = SocketRules::with_defaults();
        for a in SocketType::MATERIALS {
            for b in SocketType::MATERIALS {
                assert_eq!(rules.can_connect(a, b), a == b);
            }
        }
    }
}
