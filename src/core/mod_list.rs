use crate::core::mod_fs::{ModFS, ModFile};
use crate::core::pack_lock::lock_pack;
use crate::core::transport::{redact, Fetcher};
use crate::models::error::SError;
use crate::models::mod_dto::{ModEntry, ModSimpleList};
use crate::models::paths::PackPathRules;
use crate::utils::file::{FileUtils, StagedFile};
use crate::utils::json::Json;
use crate::utils::validation::validate_file_name;
use camino::{Utf8Path, Utf8PathBuf};
use std::io::Read;
use tracing::{debug, info, warn};

/// The mods of one pack: the files in its directory plus the enable/disable manifest.
///
/// The directory decides which mods exist, the manifest decides which are enabled.
/// Every mutation re-reads the manifest from disk under the pack lock and writes it
/// back atomically, so a stale in-memory copy never overwrites newer state.
#[derive(Debug, Clone)]
pub struct ModList {
    pack: String,
    dir: Utf8PathBuf,
    paths: PackPathRules,
    simple: ModSimpleList,
    files: Vec<ModFile>,
}

impl ModList {
    /// Reads the manifest (missing means empty) and the directory listing.
    pub fn open(pack: &str, dir: &Utf8Path) -> Result<Self, SError> {
        let paths = PackPathRules::new(dir);
        Ok(Self {
            pack: pack.to_string(),
            dir: dir.to_owned(),
            simple: Self::read_manifest(&paths.manifest)?,
            files: ModFS::scan(dir)?,
            paths,
        })
    }

    /// Writes an empty manifest into an existing pack directory.
    pub fn create_empty(pack: &str, dir: &Utf8Path) -> Result<Self, SError> {
        let paths = PackPathRules::new(dir);
        Json::write(&paths.manifest, &ModSimpleList::default())?;
        Self::open(pack, dir)
    }

    fn read_manifest(path: &Utf8Path) -> Result<ModSimpleList, SError> {
        if !path.exists() {
            return Ok(ModSimpleList::default());
        }
        let mut list: ModSimpleList = Json::read(path)?;
        list.sort();
        Ok(list)
    }

    pub fn dir(&self) -> &Utf8Path {
        &self.dir
    }

    pub fn manifest(&self) -> &ModSimpleList {
        &self.simple
    }

    /// Drops manifest entries without files and records untracked files as enabled.
    /// Returns the names of the dropped entries.
    pub fn reconcile(&mut self) -> Result<Vec<String>, SError> {
        let _guard = lock_pack(&self.dir);
        let mut simple = Self::read_manifest(&self.paths.manifest)?;
        let files = ModFS::scan(&self.dir)?;

        let dropped: Vec<String> = simple
            .mods
            .iter()
            .filter(|m| !files.iter().any(|f| f.name == m.name))
            .map(|m| m.name.clone())
            .collect();
        simple.mods.retain(|m| !dropped.contains(&m.name));

        let mut added = false;
        for f in &files {
            if !simple.contains(&f.name) {
                simple.upsert(&f.name, true);
                added = true;
            }
        }

        if !dropped.is_empty() {
            debug!("pack {}: dropping dangling manifest entries {:?}", self.pack, dropped);
        }
        if added || !dropped.is_empty() {
            Json::write(&self.paths.manifest, &simple)?;
        }

        self.simple = simple;
        self.files = files;
        Ok(dropped)
    }

    /// Projection of the files known at the last read; does not touch the disk.
    pub fn list_installed(&self) -> Vec<ModEntry> {
        let mut entries: Vec<ModEntry> = self
            .files
            .iter()
            .map(|f| ModEntry {
                name: f.name.clone(),
                file_name: f.file_name.clone(),
                version: f.version.clone(),
                enabled: self.simple.is_enabled(&f.name).unwrap_or(true),
            })
            .collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.file_name.cmp(&b.file_name)));
        entries
    }

    pub fn find(&self, name: &str) -> Option<ModEntry> {
        self.list_installed().into_iter().find(|m| m.name == name)
    }

    /// Flips the enabled flag of `name` and returns the new state.
    pub fn toggle_mod(&mut self, name: &str) -> Result<bool, SError> {
        let pack = self.pack.clone();
        self.mutate(|simple, files| {
            if !files.iter().any(|f| f.name == name) {
                return Err(SError::ModNotFound {
                    pack,
                    name: name.to_string(),
                });
            }
            let enabled = !simple.is_enabled(name).unwrap_or(true);
            simple.upsert(name, enabled);
            Ok(enabled)
        })
    }

    /// Removes every file of `name` and its manifest entry.
    pub fn delete_mod(&mut self, name: &str) -> Result<(), SError> {
        let pack = self.pack.clone();
        let dir = self.dir.clone();
        self.mutate(|simple, _| {
            let removed = ModFS::remove_files_of(&dir, name)?;
            let entry = simple.remove(name);
            if removed.is_empty() && entry.is_none() {
                return Err(SError::ModNotFound {
                    pack,
                    name: name.to_string(),
                });
            }
            info!("pack {pack}: deleted mod {name} ({} file(s))", removed.len());
            Ok(())
        })
    }

    /// Replaces all files of `name` with the one fetched from `download_url`,
    /// keeping its enabled flag (new mods start enabled).
    pub fn update_mod(
        &mut self,
        name: &str,
        download_url: &str,
        file_name: &str,
        fetcher: &dyn Fetcher,
    ) -> Result<(), SError> {
        Self::check_file_for(name, file_name)?;
        let staged = self.fetch_into_stage(download_url, fetcher)?;

        let dir = self.dir.clone();
        let pack = self.pack.clone();
        self.mutate(|simple, _| {
            let enabled = simple.is_enabled(name).unwrap_or(true);
            let replaced = ModFS::remove_files_of(&dir, name)?;
            FileUtils::commit(staged, &dir.join(file_name))?;
            simple.upsert(name, enabled);
            info!(
                "pack {pack}: updated mod {name} to {file_name}, replaced {:?}",
                replaced.iter().map(|f| &f.file_name).collect::<Vec<_>>()
            );
            Ok(())
        })
    }

    /// Streams `download_url` into the pack as `file_name` and records `name`.
    /// The manifest is only touched after the transfer completed.
    pub fn download_mod(
        &mut self,
        download_url: &str,
        file_name: &str,
        name: &str,
        fetcher: &dyn Fetcher,
    ) -> Result<(), SError> {
        Self::check_file_for(name, file_name)?;
        let staged = self.fetch_into_stage(download_url, fetcher)?;
        info!("pack {}: downloaded {} ({} bytes)", self.pack, file_name, staged.bytes);
        self.install_staged(staged, file_name, name)
    }

    /// Same contract as [`ModList::download_mod`] with a local stream as source.
    pub fn upload_mod(&mut self, content: &mut dyn Read, original_file_name: &str) -> Result<(), SError> {
        validate_file_name(original_file_name)?;
        let name = ModFile::logical_name(original_file_name);
        let staged = FileUtils::stage_stream(&self.dir, content)?;
        info!("pack {}: received upload {} ({} bytes)", self.pack, original_file_name, staged.bytes);
        self.install_staged(staged, original_file_name, &name)
    }

    fn install_staged(&mut self, staged: StagedFile, file_name: &str, name: &str) -> Result<(), SError> {
        let dir = self.dir.clone();
        self.mutate(|simple, _| {
            FileUtils::commit(staged, &dir.join(file_name))?;
            let enabled = simple.is_enabled(name).unwrap_or(true);
            simple.upsert(name, enabled);
            Ok(())
        })
    }

    fn fetch_into_stage(&self, download_url: &str, fetcher: &dyn Fetcher) -> Result<StagedFile, SError> {
        let mut body = fetcher.fetch(download_url)?;
        FileUtils::stage_stream(&self.dir, &mut body).map_err(|e| {
            warn!("pack {}: transfer from {} aborted: {e}", self.pack, redact(download_url));
            e
        })
    }

    fn check_file_for(name: &str, file_name: &str) -> Result<(), SError> {
        validate_file_name(file_name)?;
        if ModFile::logical_name(file_name) != name {
            return Err(SError::FileNameMismatch {
                name: name.to_string(),
                file_name: file_name.to_string(),
            });
        }
        Ok(())
    }

    /// Locked read-modify-write of the manifest; refreshes the in-memory view afterwards.
    fn mutate<R, F>(&mut self, f: F) -> Result<R, SError>
    where
        F: FnOnce(&mut ModSimpleList, &[ModFile]) -> Result<R, SError>,
    {
        let _guard = lock_pack(&self.dir);
        let mut simple = Self::read_manifest(&self.paths.manifest)?;
        let files = ModFS::scan(&self.dir)?;

        let result = f(&mut simple, &files)?;

        Json::write(&self.paths.manifest, &simple)?;
        self.simple = simple;
        self.files = ModFS::scan(&self.dir)?;
        Ok(result)
    }
}
