use crate::core::mod_pack::ModPack;
use crate::models::error::SError;
use crate::utils::validation::validate_pack_name;
use camino::{Utf8Path, Utf8PathBuf};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// All mod packs under one root directory, one subdirectory per pack.
///
/// Built from disk on demand and thrown away after use; nothing here is cached
/// between calls. A pack whose manifest cannot be read is still listed, but only
/// deleting or resetting it succeeds until it is repaired.
pub struct ModPackMap {
    root: Utf8PathBuf,
    packs: BTreeMap<String, ModPack>,
    unreadable: BTreeMap<String, UnreadablePack>,
}

struct UnreadablePack {
    dir: Utf8PathBuf,
    reason: String,
}

impl UnreadablePack {
    fn error(&self, name: &str) -> SError {
        SError::PackUnreadable {
            name: name.to_string(),
            reason: self.reason.clone(),
        }
    }
}

impl ModPackMap {
    pub fn build(root: &Utf8Path) -> Result<Self, SError> {
        std::fs::create_dir_all(root)?;

        let mut packs = BTreeMap::new();
        let mut unreadable = BTreeMap::new();
        for entry in std::fs::read_dir(root)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let path = Utf8PathBuf::try_from(entry.path())?;
            let Some(name) = path.file_name().map(str::to_string) else {
                continue;
            };
            if validate_pack_name(&name).is_err() {
                warn!("skipping directory {path}: not a valid mod pack name");
                continue;
            }
            match ModPack::open(&name, &path) {
                Ok(pack) => {
                    packs.insert(name, pack);
                }
                Err(e) => {
                    warn!("mod pack {name} is unreadable: {e}");
                    unreadable.insert(
                        name,
                        UnreadablePack {
                            dir: path,
                            reason: e.to_string(),
                        },
                    );
                }
            }
        }

        debug!(
            "built mod pack map of {} pack(s) from {root}, {} unreadable",
            packs.len(),
            unreadable.len()
        );
        Ok(Self {
            root: root.to_owned(),
            packs,
            unreadable,
        })
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub fn exists(&self, name: &str) -> bool {
        self.packs.contains_key(name) || self.unreadable.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Result<&ModPack, SError> {
        if let Some(broken) = self.unreadable.get(name) {
            return Err(broken.error(name));
        }
        self.packs
            .get(name)
            .ok_or_else(|| SError::PackNotFound(name.to_string()))
    }

    pub fn get_mut(&mut self, name: &str) -> Result<&mut ModPack, SError> {
        if let Some(broken) = self.unreadable.get(name) {
            return Err(broken.error(name));
        }
        self.packs
            .get_mut(name)
            .ok_or_else(|| SError::PackNotFound(name.to_string()))
    }

    /// Sorted pack names, unreadable packs included.
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .packs
            .keys()
            .chain(self.unreadable.keys())
            .cloned()
            .collect();
        names.sort();
        names
    }

    pub fn create(&mut self, name: &str) -> Result<(), SError> {
        validate_pack_name(name)?;
        let dir = self.root.join(name);
        if self.exists(name) || dir.exists() {
            return Err(SError::PackAlreadyExists(name.to_string()));
        }

        std::fs::create_dir(&dir)?;
        self.packs.insert(name.to_string(), ModPack::create_empty(name, &dir)?);
        info!("created mod pack {name}");
        Ok(())
    }

    pub fn delete(&mut self, name: &str) -> Result<(), SError> {
        let dir = match (self.packs.get(name), self.unreadable.get(name)) {
            (Some(pack), _) => pack.dir.clone(),
            (None, Some(broken)) => broken.dir.clone(),
            (None, None) => return Err(SError::PackNotFound(name.to_string())),
        };
        std::fs::remove_dir_all(&dir)?;
        self.packs.remove(name);
        self.unreadable.remove(name);
        info!("deleted mod pack {name}");
        Ok(())
    }

    /// Creates the pack directory and an empty manifest whether or not it existed.
    pub fn create_empty(&mut self, name: &str) -> Result<(), SError> {
        validate_pack_name(name)?;
        let dir = self.root.join(name);
        self.packs.insert(name.to_string(), ModPack::create_empty(name, &dir)?);
        self.unreadable.remove(name);
        Ok(())
    }

    /// Delete followed by [`ModPackMap::create_empty`]. Not transactional: if the
    /// second step fails the pack stays deleted.
    pub fn reset(&mut self, name: &str) -> Result<(), SError> {
        self.delete(name)?;
        self.create_empty(name).inspect_err(|e| {
            warn!("mod pack {name} was deleted but could not be recreated: {e}");
        })
    }
}
