use std::path::{Path, PathBuf};

const CATALOG_REL: &str = "assets/castle/catalog.toml";

pub fn resolve_assets_root(cli: Option<PathBuf>) -> PathBuf {
    // Precedence: CLI flag -> RAMPART_ASSETS env -> search nearby dirs -> CWD
    if let Some(pb) = cli {
        if pb.exists() {
            return pb;
        }
        log::warn!("assets root {} does not exist; searching", pb.display());
    }
    if let Ok(p) = std::env::var("RAMPART_ASSETS") {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return pb;
        }
    }
    let mut candidates: Vec<PathBuf> = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        candidates.push(cwd);
    }
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            candidates.push(dir.to_path_buf());
        }
    }
    candidates.push(PathBuf::from(env!("CARGO_MANIFEST_DIR")));

    for base in candidates {
        if let Some(found) = base
            .ancestors()
            .take(6)
            .find(|dir| dir.join(CATALOG_REL).exists())
        {
            return found.to_path_buf();
        }
    }
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

pub fn catalog_path(root: &Path) -> PathBuf {
    root.join(CATALOG_REL)
}

pub fn params_path(root: &Path) -> PathBuf {
    root.join("assets/castle/generation.toml")
}

pub fn terrain_path(root: &Path) -> PathBuf {
    root.join("assets/castle/terrain.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_root_wins_when_it_exists() {
        let here = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        assert_eq!(resolve_assets_root(Some(here.clone())), here);
    }

    #[test]
    fn manifest_dir_holds_the_shipped_catalog() {
        let root = resolve_assets_root(Some(PathBuf::from("/definitely/not/here")));
        assert!(catalog_path(&root).exists() || root == std::env::current_dir().unwrap());
    }

    #[test]
    fn paths_hang_off_the_root() {
        let root = Path::new("/srv/rampart");
        assert_eq!(catalog_path(root), root.join("assets/castle/catalog.toml"));
        assert_eq!(params_path(root), root.join("assets/castle/generation.toml"));
    }
}
