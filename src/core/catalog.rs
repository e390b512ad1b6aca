use crate::core::mod_list::ModList;
use crate::core::transport::{redact, Fetcher};
use crate::core::version::ModVersion;
use crate::models::catalog::{CatalogRelease, ModCatalogEntry, ModRequest};
use crate::models::error::SError;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Remote source of mod metadata.
pub trait CatalogSource: Send + Sync {
    fn query_mod(&self, name: &str) -> Result<ModCatalogEntry, SError>;
}

#[derive(Clone, Debug)]
pub struct PortalCredentials {
    pub username: String,
    pub token: String,
}

/// Mod portal speaking `GET {base}/api/mods/{name}`.
pub struct PortalCatalog {
    base: Url,
    credentials: Option<PortalCredentials>,
    client: reqwest::blocking::Client,
}

impl PortalCatalog {
    pub fn new(
        base_url: &str,
        credentials: Option<PortalCredentials>,
        client: reqwest::blocking::Client,
    ) -> Result<Self, SError> {
        let mut base = Url::parse(base_url)
            .map_err(|e| SError::ParseError(format!("catalog url '{base_url}': {e}")))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self {
            base,
            credentials,
            client,
        })
    }

    pub fn details_url(&self, name: &str) -> Result<Url, SError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| SError::ParseError(format!("catalog url {} cannot be a base", self.base)))?
            .pop_if_empty()
            .extend(["api", "mods", name]);
        Ok(url)
    }

    /// Makes a release link absolute and attaches credentials when configured.
    pub fn download_url(&self, link: &str) -> Result<String, SError> {
        let mut url = self
            .base
            .join(link)
            .map_err(|e| SError::ParseError(format!("download link '{link}': {e}")))?;
        if let Some(c) = &self.credentials {
            url.query_pairs_mut()
                .append_pair("username", &c.username)
                .append_pair("token", &c.token);
        }
        Ok(url.to_string())
    }
}

impl CatalogSource for PortalCatalog {
    fn query_mod(&self, name: &str) -> Result<ModCatalogEntry, SError> {
        let url = self.details_url(name)?;
        debug!("querying catalog: {url}");

        let response = self.client.get(url.clone()).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(SError::Catalog {
                name: name.to_string(),
                status: status.as_u16(),
            });
        }

        let mut entry: ModCatalogEntry = response.json()?;
        for release in &mut entry.releases {
            release.download_url = self.download_url(&release.download_url)?;
        }
        Ok(entry)
    }
}

/// Turns `(name, version)` requests into concrete releases.
pub struct CatalogResolver<'a> {
    catalog: &'a dyn CatalogSource,
}

impl<'a> CatalogResolver<'a> {
    pub fn new(catalog: &'a dyn CatalogSource) -> Self {
        Self { catalog }
    }

    pub fn fetch_details(&self, name: &str) -> Result<ModCatalogEntry, SError> {
        self.catalog.query_mod(name)
    }

    /// First release, in catalog order, whose version equals `requested`.
    /// There is deliberately no fallback to another version.
    pub fn select_release<'e>(
        entry: &'e ModCatalogEntry,
        requested: &ModVersion,
    ) -> Result<&'e CatalogRelease, SError> {
        entry
            .releases
            .iter()
            .find(|r| &r.version == requested)
            .ok_or_else(|| SError::NoMatchingVersion {
                name: entry.name.clone(),
                version: requested.to_string(),
            })
    }

    pub fn resolve(&self, name: &str, requested: &ModVersion) -> Result<(String, CatalogRelease), SError> {
        let entry = self.fetch_details(name)?;
        let release = Self::select_release(&entry, requested)?.clone();
        Ok((entry.name, release))
    }

    /// Resolves and downloads each request in order, stopping at the first failure.
    /// Mods installed before the failure stay installed.
    #[instrument(skip(self, mods, requests, fetcher), fields(count = requests.len()))]
    pub fn install_batch(
        &self,
        mods: &mut ModList,
        requests: &[ModRequest],
        fetcher: &dyn Fetcher,
    ) -> Result<Vec<String>, SError> {
        let mut installed = Vec::with_capacity(requests.len());

        for request in requests {
            let outcome = self.resolve(&request.name, &request.version).and_then(|(name, release)| {
                debug!("{} {} -> {}", name, request.version, redact(&release.download_url));
                mods.download_mod(&release.download_url, &release.file_name, &name, fetcher)
                    .map(|_| name)
            });

            match outcome {
                Ok(name) => {
                    info!("installed {} {}", name, request.version);
                    installed.push(name);
                }
                Err(e) => {
                    warn!("batch install stopped at {} {}: {e}", request.name, request.version);
                    return Err(SError::BatchInstall {
                        name: request.name.clone(),
                        version: request.version.to_string(),
                        installed,
                        source: Box::new(e),
                    });
                }
            }
        }

        Ok(installed)
    }
}
