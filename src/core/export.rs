use crate::core::mod_pack::ModPack;
use crate::models::error::SError;
use crate::models::paths::PackPathRules;
use crate::utils::file::FileUtils;
use camino::Utf8Path;
use std::cell::Cell;
use std::fs::File;
use std::io::{self, Seek, SeekFrom, Write};
use std::rc::Rc;
use tracing::{debug, instrument, warn};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

pub struct ArchiveExporter;

impl ArchiveExporter {
    /// Name offered to the client for the exported archive.
    pub fn file_name(pack_name: &str) -> String {
        format!("{pack_name}.zip")
    }

    /// Writes every file of the pack (manifest included) flat into a zip on `sink`.
    ///
    /// The central directory is only written once all entries succeeded, so a failed
    /// export never leaves a readable archive behind. Returns the number of entries.
    #[instrument(skip(pack, sink), fields(pack = %pack.name))]
    pub fn export<W: Write + Seek>(pack: &ModPack, sink: W) -> Result<usize, SError> {
        if let Some(nested) = FileUtils::find_subdirectory(&pack.dir)? {
            return Err(SError::UnsupportedLayout(nested));
        }

        let mut entries = FileUtils::list_files(&pack.dir)?;
        let manifest = PackPathRules::new(&pack.dir).manifest;
        if manifest.exists() {
            entries.push(PackPathRules::manifest_file_name());
        }

        Self::write_archive(&pack.dir, &entries, sink)
    }

    fn write_archive<W: Write + Seek>(dir: &Utf8Path, entries: &[String], sink: W) -> Result<usize, SError> {
        let sink = AbortableSink::new(sink);
        let abort = sink.handle();
        let mut zip = ZipWriter::new(sink);

        // ZipWriter finalizes on drop; a poisoned sink keeps that from
        // producing a central directory for a partial archive.
        if let Err(e) = Self::write_entries(&mut zip, dir, entries) {
            warn!("export of {dir} aborted: {e}");
            abort.set(true);
            return Err(e);
        }
        zip.finish()?;

        Ok(entries.len())
    }

    fn write_entries<W: Write + Seek>(
        zip: &mut ZipWriter<W>,
        dir: &Utf8Path,
        entries: &[String],
    ) -> Result<(), SError> {
        // Mod archives are already compressed.
        let options = SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Stored)
            .large_file(true);

        for name in entries {
            let mut file = File::open(dir.join(name))?;
            zip.start_file(name.as_str(), options)?;
            io::copy(&mut file, zip)?;
            debug!("added {name}");
        }
        Ok(())
    }
}

/// Sink that refuses all further I/O once aborted or once the inner sink failed.
struct AbortableSink<W> {
    inner: W,
    aborted: Rc<Cell<bool>>,
}

impl<W> AbortableSink<W> {
    fn new(inner: W) -> Self {
        Self {
            inner,
            aborted: Rc::new(Cell::new(false)),
        }
    }

    fn handle(&self) -> Rc<Cell<bool>> {
        self.aborted.clone()
    }

    fn guard<T>(&mut self, op: impl FnOnce(&mut W) -> io::Result<T>) -> io::Result<T> {
        if self.aborted.get() {
            return Err(io::Error::other("archive export was aborted"));
        }
        op(&mut self.inner).inspect_err(|_| self.aborted.set(true))
    }
}

impl<W: Write> Write for AbortableSink<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.guard(|w| w.write(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.guard(|w| w.flush())
    }
}

impl<W: Seek> Seek for AbortableSink<W> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.guard(|w| w.seek(pos))
    }
}
