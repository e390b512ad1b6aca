use crate::core::catalog::PortalCredentials;
use crate::models::error::SError;
use camino::{Utf8Path, Utf8PathBuf};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const APP_NAME: &str = "modpack_keeper";

pub const DEFAULT_CATALOG_URL: &str = "https://mods.factorio.com";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct AppSettings {
    pub version: u8,
    /// Root under which every subdirectory is one mod pack.
    pub mod_pack_dir: Utf8PathBuf,
    pub catalog_url: String,
    pub catalog_username: Option<String>,
    pub catalog_token: Option<String>,
    pub download_timeout_secs: Option<u64>,
    pub log_dir: Option<Utf8PathBuf>,
}

impl Default for AppSettings {
    fn default() -> Self {
        let base_dir = ProjectDirs::from("com", "martes", APP_NAME)
            .and_then(|dirs| Utf8PathBuf::from_path_buf(dirs.data_dir().to_path_buf()).ok())
            .or_else(|| {
                std::env::current_exe()
                    .ok()
                    .and_then(|exe_path| exe_path.parent().map(|p| p.to_path_buf()))
                    .and_then(|p| Utf8PathBuf::from_path_buf(p).ok())
            })
            .unwrap_or_else(|| Utf8PathBuf::from("."));

        Self {
            version: 0,
            mod_pack_dir: base_dir.join("modpacks"),
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            catalog_username: None,
            catalog_token: None,
            download_timeout_secs: None,
            log_dir: None,
        }
    }
}

impl AppSettings {
    pub fn load() -> Result<AppSettings, SError> {
        confy::load(APP_NAME, None).map_err(|e| SError::IOError(format!("settings: {e}")))
    }

    pub fn save(&self) -> Result<(), SError> {
        confy::store(APP_NAME, None, self).map_err(|e| SError::IOError(format!("settings: {e}")))
    }

    pub fn load_path(path: &Utf8Path) -> Result<AppSettings, SError> {
        confy::load_path(path).map_err(|e| SError::IOError(format!("settings {path}: {e}")))
    }

    pub fn store_path(&self, path: &Utf8Path) -> Result<(), SError> {
        confy::store_path(path, self).map_err(|e| SError::IOError(format!("settings {path}: {e}")))
    }

    pub fn with_root(mod_pack_dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            mod_pack_dir: mod_pack_dir.into(),
            ..Self::default()
        }
    }

    /// Both username and token are needed; either alone is ignored.
    pub fn credentials(&self) -> Option<PortalCredentials> {
        match (&self.catalog_username, &self.catalog_token) {
            (Some(username), Some(token)) if !username.is_empty() && !token.is_empty() => {
                Some(PortalCredentials {
                    username: username.clone(),
                    token: token.clone(),
                })
            }
            _ => None,
        }
    }

    pub fn download_timeout(&self) -> Option<Duration> {
        self.download_timeout_secs.map(Duration::from_secs)
    }
}
