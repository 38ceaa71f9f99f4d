//! KMZ codec: converts between KML markup and its zipped KMZ container.

use std::io::{Cursor, Read, Seek, Write};
use std::path::Path;

use tracing::{debug, info};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::{ArchiveError, Result};

/// Entry name used when compressing in-memory markup
pub const DEFAULT_ENTRY_NAME: &str = "doc.kml";

const MAX_PREALLOCATION: u64 = 1 << 20;

/// Conversion between markup and archive bytes, injectable for tests
pub trait ArchiveCodec: Send + Sync {
    /// Pack KML markup into KMZ bytes
    fn compress_markup_to_archive(&self, markup: &str) -> Result<Vec<u8>>;

    /// Unpack the KML markup held in KMZ bytes
    fn uncompress_archive_to_markup(&self, archive: &[u8]) -> Result<String>;
}

/// Default [`ArchiveCodec`] backed by deflated zip archives
#[derive(Clone, Copy, Debug, Default)]
pub struct KmzCodec;

impl ArchiveCodec for KmzCodec {
    fn compress_markup_to_archive(&self, markup: &str) -> Result<Vec<u8>> {
        let cursor = write_archive(
            Cursor::new(Vec::new()),
            DEFAULT_ENTRY_NAME,
            markup.as_bytes(),
        )
        .map_err(|reason| ArchiveError::Write {
            path: DEFAULT_ENTRY_NAME.into(),
            reason,
        })?;
        Ok(cursor.into_inner())
    }

    fn uncompress_archive_to_markup(&self, archive: &[u8]) -> Result<String> {
        let bytes = read_markup_entry(Cursor::new(archive))?;
        let markup = String::from_utf8(bytes).map_err(|_| ArchiveError::InvalidUtf8)?;
        Ok(markup)
    }
}

/// Compress the KML file at `kml_path` into a KMZ at `kmz_path`.
///
/// The archive entry is named after the input file.
pub fn compress_kml_to_kmz(kml_path: &Path, kmz_path: &Path) -> Result<()> {
    debug!(?kml_path, ?kmz_path, "compressing KML");

    let markup = std::fs::read(kml_path).map_err(|e| ArchiveError::Open {
        path: kml_path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let entry_name = kml_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| DEFAULT_ENTRY_NAME.to_string());

    let kmz_file = std::fs::File::create(kmz_path).map_err(|e| ArchiveError::Write {
        path: kmz_path.to_path_buf(),
        reason: format!("failed to create output KMZ: {}", e),
    })?;

    write_archive(kmz_file, &entry_name, &markup).map_err(|reason| ArchiveError::Write {
        path: kmz_path.to_path_buf(),
        reason,
    })?;

    info!(?kmz_path, bytes = markup.len(), "KMZ written");
    Ok(())
}

/// Extract the first `.kml` entry of the KMZ at `kmz_path` into `kml_path`.
pub fn uncompress_kmz_to_kml(kmz_path: &Path, kml_path: &Path) -> Result<()> {
    debug!(?kmz_path, ?kml_path, "uncompressing KMZ");

    let kmz_file = std::fs::File::open(kmz_path).map_err(|e| ArchiveError::Open {
        path: kmz_path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let markup = read_markup_entry(kmz_file)?;

    std::fs::write(kml_path, &markup).map_err(|e| ArchiveError::Write {
        path: kml_path.to_path_buf(),
        reason: e.to_string(),
    })?;

    info!(?kml_path, bytes = markup.len(), "KML extracted");
    Ok(())
}

fn write_archive<W: Write + Seek>(
    writer: W,
    entry_name: &str,
    contents: &[u8],
) -> std::result::Result<W, String> {
    let mut zip = ZipWriter::new(writer);
    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o644);

    zip.start_file(entry_name, options)
        .map_err(|e| format!("failed to create entry in KMZ archive: {}", e))?;
    zip.write_all(contents)
        .map_err(|e| format!("failed to write bytes to KMZ: {}", e))?;
    zip.finish()
        .map_err(|e| format!("failed to finish KMZ archive: {}", e))
}

fn read_markup_entry<R: Read + Seek>(reader: R) -> std::result::Result<Vec<u8>, ArchiveError> {
    let mut archive = ZipArchive::new(reader).map_err(|e| ArchiveError::Read(e.to_string()))?;

    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| ArchiveError::Read(format!("failed to read entry {}: {}", i, e)))?;

        if entry.name().to_ascii_lowercase().ends_with(".kml") {
            // The declared size comes from the archive, so preallocation is capped
            let mut contents = Vec::with_capacity(entry.size().min(MAX_PREALLOCATION) as usize);
            entry
                .read_to_end(&mut contents)
                .map_err(|e| ArchiveError::Read(e.to_string()))?;
            return Ok(contents);
        }
    }

    Err(ArchiveError::NoMarkupEntry)
}
