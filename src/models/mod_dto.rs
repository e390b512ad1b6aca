use crate::core::version::ModVersion;
use serde::{Deserialize, Serialize};

/// One record of the pack manifest (`mod-list.json`).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ModSimpleEntry {
    pub name: String,
    pub enabled: bool,
}

/// The on-disk manifest of a pack.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct ModSimpleList {
    pub mods: Vec<ModSimpleEntry>,
}

impl ModSimpleList {
    pub fn get(&self, name: &str) -> Option<&ModSimpleEntry> {
        self.mods.iter().find(|m| m.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn is_enabled(&self, name: &str) -> Option<bool> {
        self.get(name).map(|m| m.enabled)
    }

    /// Inserts or replaces the entry for `name`, keeping the list sorted.
    pub fn upsert(&mut self, name: &str, enabled: bool) {
        match self.mods.iter_mut().find(|m| m.name == name) {
            Some(entry) => entry.enabled = enabled,
            None => {
                self.mods.push(ModSimpleEntry {
                    name: name.to_owned(),
                    enabled,
                });
                self.sort();
            }
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<ModSimpleEntry> {
        let idx = self.mods.iter().position(|m| m.name == name)?;
        Some(self.mods.remove(idx))
    }

    pub fn sort(&mut self) {
        self.mods.sort_by(|a, b| a.name.cmp(&b.name));
    }
}

/// A mod file physically present in a pack, with its manifest state.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ModEntry {
    pub name: String,
    pub file_name: String,
    pub version: Option<ModVersion>,
    pub enabled: bool,
}
