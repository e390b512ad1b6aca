use crate::models::error::SError;
use camino::Utf8Path;
use std::io::Write;
use tempfile::NamedTempFile;

pub struct Json;

impl Json {
    /// Writes `data` pretty-printed via a sibling temp file and an atomic rename,
    /// so readers only ever see the old or the new document.
    pub fn write<T: serde::Serialize>(path: &Utf8Path, data: &T) -> Result<(), SError> {
        let dir = path
            .parent()
            .ok_or_else(|| SError::IOError(format!("{path} has no parent directory")))?;

        let mut tmp = tempfile::Builder::new()
            .prefix(".manifest-")
            .tempfile_in(dir)?;
        serde_json::to_writer_pretty(tmp.as_file_mut(), data)?;
        tmp.as_file_mut().write_all(b"\n")?;
        tmp.as_file().sync_all()?;
        Self::persist(tmp, path)
    }

    pub fn read<T: serde::de::DeserializeOwned>(path: &Utf8Path) -> Result<T, SError> {
        let s = std::fs::read_to_string(path).map_err(|e| SError::IOError(format!("{path}: {e}")))?;
        serde_json::from_str::<T>(&s).map_err(|e| SError::ParseError(format!("{path}: {e}")))
    }

    fn persist(tmp: NamedTempFile, path: &Utf8Path) -> Result<(), SError> {
        tmp.persist(path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use std::collections::BTreeMap;

    #[test]
    fn test_write_replaces_and_leaves_no_temp_files() {
        let tmp = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).unwrap();
        let path = root.join("doc.json");

        let mut doc = BTreeMap::new();
        doc.insert("a".to_string(), 1);
        Json::write(&path, &doc).unwrap();
        doc.insert("b".to_string(), 2);
        Json::write(&path, &doc).unwrap();

        let back: BTreeMap<String, i32> = Json::read(&path).unwrap();
        assert_eq!(back, doc);
        assert_eq!(std::fs::read_dir(&root).unwrap().count(), 1);
    }

    #[test]
    fn test_read_reports_path_on_bad_json() {
        let tmp = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).unwrap();
        let path = root.join("broken.json");
        std::fs::write(&path, "{not json").unwrap();

        match Json::read::<BTreeMap<String, i32>>(&path) {
            Err(SError::ParseError(msg)) => assert!(msg.contains("broken.json")),
            other => panic!("expected ParseError, got {other:?}"),
        }
    }
}
