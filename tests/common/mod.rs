#![allow(dead_code)]

use camino::{Utf8Path, Utf8PathBuf};
use modpack_keeper_lib::core::catalog::CatalogSource;
use modpack_keeper_lib::core::transport::Fetcher;
use modpack_keeper_lib::core::version::ModVersion;
use modpack_keeper_lib::models::catalog::{CatalogRelease, ModCatalogEntry};
use modpack_keeper_lib::models::error::SError;
use std::collections::BTreeMap;
use std::io::{self, Cursor, Read};
use std::sync::Mutex;
use tempfile::TempDir;

/// Temp directory plus the mod pack root inside it.
pub fn setup_test_env() -> (TempDir, Utf8PathBuf) {
    let tmp = tempfile::tempdir().unwrap();
    let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf())
        .unwrap()
        .join("modpacks");
    std::fs::create_dir_all(&root).unwrap();
    (tmp, root)
}

pub fn file_names(dir: &Utf8Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    names.sort();
    names
}

pub fn portal_url(name: &str, version: &str) -> String {
    format!("https://mods.test/download/{name}/{version}")
}

/// Serves fixed bodies per URL; unknown URLs fail like an unreachable host.
#[derive(Default)]
pub struct StubFetcher {
    bodies: BTreeMap<String, Vec<u8>>,
    truncated: BTreeMap<String, Vec<u8>>,
    pub requests: Mutex<Vec<String>>,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: &str, body: &[u8]) -> Self {
        self.bodies.insert(url.to_string(), body.to_vec());
        self
    }

    /// The body is delivered partially, then the stream errors.
    pub fn with_broken(mut self, url: &str, partial: &[u8]) -> Self {
        self.truncated.insert(url.to_string(), partial.to_vec());
        self
    }

    pub fn requested(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl Fetcher for StubFetcher {
    fn fetch(&self, url: &str) -> Result<Box<dyn Read + Send>, SError> {
        self.requests.lock().unwrap().push(url.to_string());
        if let Some(body) = self.bodies.get(url) {
            return Ok(Box::new(Cursor::new(body.clone())));
        }
        if let Some(partial) = self.truncated.get(url) {
            return Ok(Box::new(BrokenReader {
                data: Cursor::new(partial.clone()),
            }));
        }
        Err(SError::Transport {
            url: url.to_string(),
            reason: "connection refused".into(),
        })
    }
}

struct BrokenReader {
    data: Cursor<Vec<u8>>,
}

impl Read for BrokenReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.data.read(buf)? {
            0 => Err(io::Error::new(io::ErrorKind::ConnectionReset, "peer went away")),
            n => Ok(n),
        }
    }
}

/// In-memory catalog; release links point at [`portal_url`].
#[derive(Default)]
pub struct StubCatalog {
    mods: BTreeMap<String, ModCatalogEntry>,
}

impl StubCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mod(mut self, name: &str, versions: &[&str]) -> Self {
        let releases = versions
            .iter()
            .map(|v| CatalogRelease {
                version: ModVersion::parse(v).unwrap(),
                download_url: portal_url(name, v),
                file_name: format!("{name}_{v}.zip"),
            })
            .collect();
        self.mods.insert(
            name.to_string(),
            ModCatalogEntry {
                name: name.to_string(),
                releases,
            },
        );
        self
    }

    /// A fetcher that can serve every release of this catalog.
    pub fn fetcher(&self) -> StubFetcher {
        self.mods
            .values()
            .flat_map(|m| m.releases.iter())
            .fold(StubFetcher::new(), |f, r| {
                f.with(&r.download_url, r.file_name.as_bytes())
            })
    }
}

impl CatalogSource for StubCatalog {
    fn query_mod(&self, name: &str) -> Result<ModCatalogEntry, SError> {
        self.mods.get(name).cloned().ok_or_else(|| SError::Catalog {
            name: name.to_string(),
            status: 404,
        })
    }
}
