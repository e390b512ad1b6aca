use crate::config::AppSettings;
use crate::core::catalog::{CatalogResolver, CatalogSource, PortalCatalog};
use crate::core::export::ArchiveExporter;
use crate::core::registry::ModPackMap;
use crate::core::transport::{Fetcher, HttpFetcher};
use crate::models::catalog::ModRequest;
use crate::models::error::SError;
use crate::models::mod_dto::ModEntry;
use camino::{Utf8Path, Utf8PathBuf};
use std::io::{Read, Seek, Write};
use tracing::{info, instrument};

/// Use cases behind the mod pack endpoints.
/// Every call rebuilds the [`ModPackMap`] from disk before acting.
pub struct PackService {
    root: Utf8PathBuf,
    fetcher: Box<dyn Fetcher>,
    catalog: Box<dyn CatalogSource>,
}

impl PackService {
    pub fn new(root: &Utf8Path, fetcher: Box<dyn Fetcher>, catalog: Box<dyn CatalogSource>) -> Self {
        Self {
            root: root.to_owned(),
            fetcher,
            catalog,
        }
    }

    /// Wires the HTTP transport and the mod portal from the settings.
    pub fn from_settings(settings: &AppSettings) -> Result<Self, SError> {
        let fetcher = HttpFetcher::new(settings.download_timeout())?;
        let catalog = PortalCatalog::new(
            &settings.catalog_url,
            settings.credentials(),
            fetcher.client().clone(),
        )?;
        Ok(Self::new(
            &settings.mod_pack_dir,
            Box::new(fetcher),
            Box::new(catalog),
        ))
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    fn registry(&self) -> Result<ModPackMap, SError> {
        ModPackMap::build(&self.root)
    }

    #[instrument(skip(self))]
    pub fn list_packs(&self) -> Result<Vec<String>, SError> {
        Ok(self.registry()?.list())
    }

    #[instrument(skip(self))]
    pub fn create_pack(&self, name: &str) -> Result<Vec<String>, SError> {
        let mut map = self.registry()?;
        map.create(name)?;
        Ok(map.list())
    }

    #[instrument(skip(self))]
    pub fn delete_pack(&self, name: &str) -> Result<String, SError> {
        self.registry()?.delete(name)?;
        Ok(name.to_string())
    }

    /// Streams the pack as a zip into `sink` and returns the download file name.
    #[instrument(skip(self, sink))]
    pub fn export_pack<W: Write + Seek>(&self, name: &str, sink: W) -> Result<String, SError> {
        let map = self.registry()?;
        let pack = map.get(name)?;
        let count = ArchiveExporter::export(pack, sink)?;
        info!("exported pack {name} with {count} entries");
        Ok(ArchiveExporter::file_name(name))
    }

    #[instrument(skip(self))]
    pub fn load_pack(&self, name: &str) -> Result<Vec<ModEntry>, SError> {
        let mut map = self.registry()?;
        let pack = map.get_mut(name)?;
        Ok(pack.load()?.list_installed())
    }

    #[instrument(skip(self))]
    pub fn list_mods(&self, name: &str) -> Result<Vec<ModEntry>, SError> {
        Ok(self.registry()?.get(name)?.installed())
    }

    #[instrument(skip(self))]
    pub fn toggle_mod(&self, pack: &str, mod_name: &str) -> Result<bool, SError> {
        let mut map = self.registry()?;
        map.get_mut(pack)?.mods.toggle_mod(mod_name)
    }

    #[instrument(skip(self))]
    pub fn delete_mod(&self, pack: &str, mod_name: &str) -> Result<bool, SError> {
        let mut map = self.registry()?;
        map.get_mut(pack)?.mods.delete_mod(mod_name)?;
        Ok(true)
    }

    /// Returns the updated record, or `None` when the mod is not present afterwards.
    #[instrument(skip(self, download_url))]
    pub fn update_mod(
        &self,
        pack: &str,
        mod_name: &str,
        download_url: &str,
        file_name: &str,
    ) -> Result<Option<ModEntry>, SError> {
        let mut map = self.registry()?;
        let mods = &mut map.get_mut(pack)?.mods;
        mods.update_mod(mod_name, download_url, file_name, self.fetcher.as_ref())?;
        Ok(mods.find(mod_name))
    }

    /// Removes every mod by deleting and recreating the pack. Not transactional.
    #[instrument(skip(self))]
    pub fn reset_pack(&self, pack: &str) -> Result<bool, SError> {
        self.registry()?.reset(pack)?;
        Ok(true)
    }

    #[instrument(skip(self, content))]
    pub fn upload_mod(
        &self,
        pack: &str,
        content: &mut dyn Read,
        original_file_name: &str,
    ) -> Result<Vec<ModEntry>, SError> {
        let mut map = self.registry()?;
        let mods = &mut map.get_mut(pack)?.mods;
        mods.upload_mod(content, original_file_name)?;
        Ok(mods.list_installed())
    }

    #[instrument(skip(self, download_url))]
    pub fn install_mod(
        &self,
        pack: &str,
        download_url: &str,
        file_name: &str,
        mod_name: &str,
    ) -> Result<Vec<ModEntry>, SError> {
        let mut map = self.registry()?;
        let mods = &mut map.get_mut(pack)?.mods;
        mods.download_mod(download_url, file_name, mod_name, self.fetcher.as_ref())?;
        Ok(mods.list_installed())
    }

    #[instrument(skip(self, requests), fields(count = requests.len()))]
    pub fn install_batch(&self, pack: &str, requests: &[ModRequest]) -> Result<Vec<ModEntry>, SError> {
        let mut map = self.registry()?;
        let mods = &mut map.get_mut(pack)?.mods;
        CatalogResolver::new(self.catalog.as_ref()).install_batch(mods, requests, self.fetcher.as_ref())?;
        Ok(mods.list_installed())
    }
}
