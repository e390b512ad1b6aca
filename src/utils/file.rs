use crate::models::error::SError;
use crate::models::paths::PackPathRules;
use camino::Utf8Path;
use std::io::{self, BufWriter, Read, Write};
use tempfile::NamedTempFile;
use walkdir::WalkDir;

/// Content copied into a hidden temp file next to its final destination.
/// Dropping it without [`FileUtils::commit`] removes the partial data.
#[derive(Debug)]
pub struct StagedFile {
    tmp: NamedTempFile,
    pub bytes: u64,
}

pub struct FileUtils;

impl FileUtils {
    /// Copies `reader` chunk-wise into a temp file inside `dir`.
    pub fn stage_stream<R: Read + ?Sized>(dir: &Utf8Path, reader: &mut R) -> Result<StagedFile, SError> {
        let mut tmp = tempfile::Builder::new()
            .prefix(".download-")
            .tempfile_in(dir)?;

        let bytes = {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            let n = io::copy(reader, &mut writer)?;
            writer.flush()?;
            n
        };
        tmp.as_file().sync_all()?;

        Ok(StagedFile { tmp, bytes })
    }

    /// Atomically moves a staged file to `dest`, replacing any existing file.
    pub fn commit(staged: StagedFile, dest: &Utf8Path) -> Result<(), SError> {
        staged.tmp.persist(dest)?;
        Ok(())
    }

    /// Regular, non-internal files directly inside `dir`, sorted by name.
    /// Nested directories are ignored here; callers that cannot handle them
    /// check with [`FileUtils::find_subdirectory`].
    pub fn list_files(dir: &Utf8Path) -> Result<Vec<String>, SError> {
        let mut files = Vec::new();
        for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str() else {
                return Err(SError::ParseError(format!(
                    "Invalid UTF-8 file name: {:?}",
                    entry.path()
                )));
            };
            if !PackPathRules::is_internal(name) {
                files.push(name.to_string());
            }
        }
        Ok(files)
    }

    pub fn find_subdirectory(dir: &Utf8Path) -> Result<Option<String>, SError> {
        for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
            let entry = entry?;
            if entry.file_type().is_dir() {
                return Ok(Some(entry.path().to_string_lossy().to_string()));
            }
        }
        Ok(None)
    }
}
