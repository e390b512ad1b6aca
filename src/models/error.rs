use serde::{Serialize, Serializer};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SError {
    #[error("mod pack '{0}' does not exist")]
    PackNotFound(String),
    #[error("mod '{name}' not found in mod pack '{pack}'")]
    ModNotFound { pack: String, name: String },
    #[error("mod pack '{name}' could not be read: {reason}")]
    PackUnreadable { name: String, reason: String },
    #[error("mod pack '{0}' already exists")]
    PackAlreadyExists(String),
    #[error("'{0}' is not a valid name")]
    InvalidName(String),
    #[error("file '{file_name}' does not belong to mod '{name}'")]
    FileNameMismatch { name: String, file_name: String },
    #[error("mod '{name}' has no release with version {version}")]
    NoMatchingVersion { name: String, version: String },
    #[error("transfer from {url} failed: {reason}")]
    Transport { url: String, reason: String },
    #[error("catalog lookup for '{name}' answered with status {status}")]
    Catalog { name: String, status: u16 },
    #[error("unsupported mod pack layout at {0}")]
    UnsupportedLayout(String),
    #[error("I/O error: {0}")]
    IOError(String),
    #[error("parse error: {0}")]
    ParseError(String),
    #[error("installing {name} {version} failed after installing {installed:?}: {source}")]
    BatchInstall {
        name: String,
        version: String,
        installed: Vec<String>,
        #[source]
        source: Box<SError>,
    },
}

impl SError {
    /// True for every "unknown pack or mod" flavour, including a 404 from the catalog.
    pub fn is_not_found(&self) -> bool {
        match self {
            SError::PackNotFound(_) | SError::ModNotFound { .. } => true,
            SError::Catalog { status, .. } => *status == 404,
            SError::BatchInstall { source, .. } => source.is_not_found(),
            _ => false,
        }
    }
}

impl Serialize for SError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl From<std::io::Error> for SError {
    fn from(e: std::io::Error) -> Self {
        SError::IOError(e.to_string())
    }
}

impl From<serde_json::Error> for SError {
    fn from(e: serde_json::Error) -> Self {
        SError::ParseError(e.to_string())
    }
}

impl From<walkdir::Error> for SError {
    fn from(e: walkdir::Error) -> Self {
        SError::IOError(e.to_string())
    }
}

impl From<zip::result::ZipError> for SError {
    fn from(e: zip::result::ZipError) -> Self {
        SError::IOError(format!("archive: {e}"))
    }
}

impl From<tempfile::PersistError> for SError {
    fn from(e: tempfile::PersistError) -> Self {
        SError::IOError(e.error.to_string())
    }
}

impl From<semver::Error> for SError {
    fn from(e: semver::Error) -> Self {
        SError::ParseError(e.to_string())
    }
}

impl From<camino::FromPathBufError> for SError {
    fn from(e: camino::FromPathBufError) -> Self {
        SError::ParseError(format!("Invalid UTF-8 path: {e}"))
    }
}

impl From<reqwest::Error> for SError {
    fn from(e: reqwest::Error) -> Self {
        SError::Transport {
            url: e
                .url()
                .map(|u| crate::core::transport::redact(u.as_str()))
                .unwrap_or_default(),
            reason: e.without_url().to_string(),
        }
    }
}
