use crate::core::version::ModVersion;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct CatalogRelease {
    pub version: ModVersion,
    pub download_url: String,
    pub file_name: String,
}

/// A mod as the catalog describes it: canonical name plus its releases in catalog order.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ModCatalogEntry {
    pub name: String,
    #[serde(default)]
    pub releases: Vec<CatalogRelease>,
}

/// One `{name, version}` pair of a batch install request.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ModRequest {
    pub name: String,
    pub version: ModVersion,
}

impl ModRequest {
    pub fn new(name: impl Into<String>, version: ModVersion) -> Self {
        Self {
            name: name.into(),
            version,
        }
    }
}
