use crate::core::version::ModVersion;
use crate::models::error::SError;
use crate::models::paths::MOD_FILE_EXTENSION;
use crate::utils::file::FileUtils;
use camino::Utf8Path;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// A mod file on disk, with the logical name and version encoded in its file name.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ModFile {
    pub name: String,
    pub file_name: String,
    pub version: Option<ModVersion>,
}

static VERSIONED_STEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<name>.+)_(?P<version>\d+(?:\.\d+){0,2})$").expect("Invalid mod file regex")
});

impl ModFile {
    /// Splits `name_1.2.3.zip` into `name` and `1.2.3`.
    /// A file without a usable version suffix (missing, or out of range) keeps
    /// its whole stem as logical name, so one odd file never breaks a scan.
    pub fn parse(file_name: &str) -> Self {
        let suffix = format!(".{MOD_FILE_EXTENSION}");
        let stem = file_name.strip_suffix(suffix.as_str()).unwrap_or(file_name);

        let versioned = VERSIONED_STEM.captures(stem).and_then(|caps| {
            let version = ModVersion::parse(&caps["version"]).ok()?;
            Some((caps["name"].to_string(), version))
        });

        let (name, version) = match versioned {
            Some((name, version)) => (name, Some(version)),
            None => (stem.to_string(), None),
        };

        ModFile {
            name,
            file_name: file_name.to_string(),
            version,
        }
    }

    /// Logical mod name a file name resolves to.
    pub fn logical_name(file_name: &str) -> String {
        Self::parse(file_name).name
    }
}

pub struct ModFS;

impl ModFS {
    /// Every mod file directly inside `dir`, sorted by file name.
    pub fn scan(dir: &Utf8Path) -> Result<Vec<ModFile>, SError> {
        Ok(FileUtils::list_files(dir)?
            .iter()
            .map(|f| ModFile::parse(f))
            .collect())
    }

    /// Files of `dir` that belong to the logical mod `name`.
    pub fn files_of(dir: &Utf8Path, name: &str) -> Result<Vec<ModFile>, SError> {
        Ok(Self::scan(dir)?
            .into_iter()
            .filter(|f| f.name == name)
            .collect())
    }

    pub fn remove_files_of(dir: &Utf8Path, name: &str) -> Result<Vec<ModFile>, SError> {
        let files = Self::files_of(dir, name)?;
        for f in &files {
            std::fs::remove_file(dir.join(&f.file_name))?;
        }
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_versioned_file() {
        let f = ModFile::parse("bobplates_1.0.0.zip");
        assert_eq!(f.name, "bobplates");
        assert_eq!(f.version, Some(ModVersion::new(1, 0, 0)));
    }

    #[test]
    fn test_parse_keeps_underscores_in_name() {
        let f = ModFile::parse("Squeak_Through_1.8.2.zip");
        assert_eq!(f.name, "Squeak_Through");
        assert_eq!(f.version, Some(ModVersion::new(1, 8, 2)));
    }

    #[test]
    fn test_parse_unversioned_file() {
        let f = ModFile::parse("custom-tweaks.zip");
        assert_eq!(f.name, "custom-tweaks");
        assert_eq!(f.version, None);

        assert_eq!(ModFile::logical_name("notes_v2.txt"), "notes_v2.txt");
    }

    #[test]
    fn test_out_of_range_version_is_unversioned() {
        let f = ModFile::parse("big_99999999999999999999.zip");
        assert_eq!(f.name, "big_99999999999999999999");
        assert_eq!(f.version, None);
    }
}
