use crate::core::mod_list::ModList;
use crate::models::error::SError;
use crate::models::mod_dto::ModEntry;
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use tracing::info;

pub struct ModPack {
    pub name: String,
    pub dir: Utf8PathBuf,
    pub mods: ModList,
    pub(crate) loaded: bool,
}

/// Summary sent to callers that only need to know what a pack holds.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ModPackDTO {
    pub name: String,
    pub loaded: bool,
    pub mods: Vec<ModEntry>,
}

impl ModPack {
    pub fn open(name: &str, dir: &Utf8Path) -> Result<Self, SError> {
        Ok(Self {
            name: name.to_string(),
            dir: dir.to_owned(),
            mods: ModList::open(name, dir)?,
            loaded: false,
        })
    }

    pub fn create_empty(name: &str, dir: &Utf8Path) -> Result<Self, SError> {
        std::fs::create_dir_all(dir)?;
        Ok(Self {
            name: name.to_string(),
            dir: dir.to_owned(),
            mods: ModList::create_empty(name, dir)?,
            loaded: false,
        })
    }

    /// Re-reads the manifest, reconciles it with the directory and marks the pack loaded.
    pub fn load(&mut self) -> Result<&ModList, SError> {
        let dropped = self.mods.reconcile()?;
        if !dropped.is_empty() {
            info!("pack {}: removed {} dangling manifest entries", self.name, dropped.len());
        }
        self.loaded = true;
        Ok(&self.mods)
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn installed(&self) -> Vec<ModEntry> {
        self.mods.list_installed()
    }

    pub fn to_dto(&self) -> ModPackDTO {
        ModPackDTO {
            name: self.name.clone(),
            loaded: self.loaded,
            mods: self.installed(),
        }
    }
}
