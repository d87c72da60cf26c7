use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::BatchError;

pub const ARCHIVE_FILE_NAME: &str = "inpaint_results.zip";
pub const ARCHIVE_MEDIA_TYPE: &str = "application/zip";

/// Accumulates named blobs into an in-memory, deflate-compressed ZIP.
///
/// Entries keep insertion order. Nothing is observable until [`finish`]
/// hands back the complete archive.
///
/// [`finish`]: ArchiveBuilder::finish
pub struct ArchiveBuilder {
    writer: ZipWriter<Cursor<Vec<u8>>>,
    options: SimpleFileOptions,
    entries: usize,
}

impl ArchiveBuilder {
    pub fn new() -> Self {
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .unix_permissions(0o644);

        Self {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
            options,
            entries: 0,
        }
    }

    pub fn add_entry(&mut self, name: &str, data: &[u8]) -> Result<(), BatchError> {
        self.writer.start_file(name, self.options)?;
        self.writer.write_all(data)?;
        self.entries += 1;
        log::trace!("Archived {} ({} bytes)", name, data.len());
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }

    pub fn finish(self) -> Result<Vec<u8>, BatchError> {
        let cursor = self.writer.finish()?;
        Ok(cursor.into_inner())
    }
}

impl Default for ArchiveBuilder {
    fn default() -> Self {
        Self::new()
    }
}
