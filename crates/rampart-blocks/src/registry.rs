use std::collections::{BTreeMap, HashMap};
use std::error::Error;

use crate::config::CatalogConfig;
use crate::socket::{Socket, SocketRules};
use crate::template::{BlockTemplate, rotate_sockets};
use crate::types::{BlockId, Candidate, Rotation, RotationSet};

#[derive(Clone, Debug)]
pub struct BlockRegistry {
    pub rules: SocketRules,
    templates: BTreeMap<BlockId, BlockTemplate>,
    by_name: HashMap<String, BlockId>,
    // Ordered by (block, rotation) so candidate lists are deterministic.
    variants: BTreeMap<Candidate, [Socket; 6]>,
    variants_stale: bool,
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockRegistry {
    pub fn new() -> Self {
        Self::with_rules(SocketRules::with_defaults())
    }

    pub fn with_rules(rules: SocketRules) -> Self {
        Self {
            rules,
            templates: BTreeMap::new(),
            by_name: HashMap::new(),
            variants: BTreeMap::new(),
            variants_stale: false,
        }
    }

    /// Registers a template; a previous template with the same id is replaced.
    pub fn add_template(&mut self, template: BlockTemplate) {
        if let Some(old) = self.templates.get(&template.id) {
            log::debug!(
                "block {} ({}) replaced by {}",
                template.id,
                old.name,
                template.name
            );
            if self.by_name.get(&old.name) == Some(&old.id) {
                self.by_name.remove(&old.name);
            }
        }
        self.by_name.insert(template.name.clone(), template.id);
        self.templates.insert(template.id, template);
        self.variants_stale = true;
    }

    #[inline]
    pub fn get(&self, id: BlockId) -> Option<&BlockTemplate> {
        self.templates.get(&id)
    }

    pub fn id_by_name(&self, name: &str) -> Option<BlockId> {
        self.by_name.get(name).copied()
    }

    pub fn templates(&self) -> impl Iterator<Item = &BlockTemplate> {
        self.templates.values()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Rebuilds the rotated socket cache from scratch for every template and
    /// every rotation it allows.
    pub fn generate_rotated_variants(&mut self) {
        self.variants.clear();
        for t in self.templates.values() {
            for r in t.allowed_rotations.iter() {
                self.variants
                    .insert(Candidate::new(t.id, r), rotate_sockets(&t.sockets, r));
            }
        }
        self.variants_stale = false;
        log::debug!(
            "generated {} rotated variants for {} blocks",
            self.variants.len(),
            self.templates.len()
        );
    }

    /// True when no template was added since the last regeneration.
    pub fn variants_ready(&self) -> bool {
        !self.variants_stale
    }

    #[inline]
    pub fn variant(&self, block: BlockId, rotation: Rotation) -> Option<&[Socket; 6]> {
        self.variants.get(&Candidate::new(block, rotation))
    }

    /// Rotated sockets, or all-`Empty` sockets (with a warning) for an unknown pair.
    pub fn rotated_sockets(&self, block: BlockId, rotation: Rotation) -> [Socket; 6] {
        match self.variant(block, rotation) {
            Some(s) => *s,
            None => {
                log::warn!(
                    "no rotated variant for block {} at {} degrees",
                    block,
                    rotation.degrees()
                );
                [Socket::EMPTY; 6]
            }
        }
    }

    pub fn variants(&self) -> impl Iterator<Item = (Candidate, &[Socket; 6])> {
        if self.variants_stale {
            log::warn!("rotated variants are stale; call generate_rotated_variants()");
        }
        self.variants.iter().map(|(c, s)| (*c, s))
    }

    pub fn candidates(&self) -> Vec<Candidate> {
        self.variants().map(|(c, _)| c).collect()
    }

    /// Builds templates from a catalog config and generates their variants.
    /// Assets without sockets get all-`Empty` faces; without rotations, all four.
    pub fn from_config(cfg: &CatalogConfig) -> Result<Self, Box<dyn Error>> {
        let mut rules = if cfg.default_rules {
            SocketRules::with_defaults()
        } else {
            SocketRules::new()
        };
        for r in &cfg.socket_rules {
            rules.add_rule(r.a, r.b);
        }
        let mut reg = BlockRegistry::with_rules(rules);
        for (i, def) in cfg.assets.iter().enumerate() {
            let id = def.id.unwrap_or(i as BlockId);
            let sockets = def
                .sockets
                .as_ref()
                .map(|s| s.compile())
                .unwrap_or([Socket::EMPTY; 6]);
            let allowed_rotations = match &def.rotations {
                Some(degs) => RotationSet::from_degrees(degs).map_err(|bad| {
                    format!("asset `{}`: rotation {bad} is not a multiple of 90 in 0..360", def.name)
                })?,
                None => RotationSet::ALL,
            };
            if allowed_rotations.is_empty() {
                log::warn!("asset `{}` allows no rotations and will never be placed", def.name);
            }
            reg.add_template(BlockTemplate {
                id,
                name: def.name.clone(),
                sockets,
                allowed_rotations,
            });
        }
        reg.generate_rotated_variants();
        Ok(reg)
    }
}
