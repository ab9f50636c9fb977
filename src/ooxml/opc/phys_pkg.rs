//! Provides a general interface to a physical OPC package (ZIP file).
//!
//! Reading decompresses every entry up front so that a damaged entry is
//! detected when the package is opened rather than halfway through an edit.
//! Writing raw-copies untouched entries from the source archive: their
//! compressed bytes, CRC, sizes and timestamps are carried over without
//! re-encoding.

use crate::ooxml::opc::error::{PackageError, Result};
use std::io::{Cursor, Read, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Upper bound on the buffer reserved from an entry's declared size.
const MAX_PREALLOCATION: usize = 16 * 1024 * 1024;

/// One decompressed entry of a physical package, in archive order.
#[derive(Debug)]
pub(crate) struct PhysEntry {
    pub name: String,
    pub data: Vec<u8>,
    pub is_dir: bool,
}

/// Physical package reader over an in-memory ZIP archive.
pub(crate) struct PhysPkgReader<'data> {
    archive: ZipArchive<Cursor<&'data [u8]>>,
}

impl<'data> PhysPkgReader<'data> {
    /// Parse the ZIP central directory of `data`.
    ///
    /// # Errors
    /// Returns [`PackageError::NotAContainer`] if the bytes are not a ZIP archive.
    pub fn new(data: &'data [u8]) -> Result<Self> {
        let archive = ZipArchive::new(Cursor::new(data))
            .map_err(|e| PackageError::NotAContainer(e.to_string()))?;
        Ok(Self { archive })
    }

    /// Number of entries in the archive, directories included.
    pub fn len(&self) -> usize {
        self.archive.len()
    }

    /// Decompress every entry in archive order.
    ///
    /// All entries are attempted even after a failure so each damaged entry is
    /// logged; the first failure is then returned.
    pub fn read_all(&mut self) -> Result<Vec<PhysEntry>> {
        let mut entries = Vec::with_capacity(self.archive.len());
        let mut first_failure: Option<PackageError> = None;

        for index in 0..self.archive.len() {
            match self.read_entry(index) {
                Ok(entry) => entries.push(entry),
                Err(err) => {
                    log::warn!("package entry #{} is unreadable: {}", index, err);
                    first_failure.get_or_insert(err);
                },
            }
        }

        match first_failure {
            Some(err) => Err(err),
            None => Ok(entries),
        }
    }

    fn read_entry(&mut self, index: usize) -> Result<PhysEntry> {
        let fallback_name = self
            .archive
            .name_for_index(index)
            .map(str::to_string)
            .unwrap_or_else(|| format!("#{}", index));

        let mut file = self
            .archive
            .by_index(index)
            .map_err(|e| PackageError::CorruptEntry {
                name: fallback_name.clone(),
                reason: e.to_string(),
            })?;

        let name = file.name().to_string();
        let is_dir = file.is_dir();
        let mut data = Vec::with_capacity(initial_capacity(file.size()));
        // The ZIP reader verifies the CRC once the entry has been read to the end
        file.read_to_end(&mut data)
            .map_err(|e| PackageError::CorruptEntry {
                name: name.clone(),
                reason: e.to_string(),
            })?;

        Ok(PhysEntry { name, data, is_dir })
    }

    /// Copy entry `index` into `writer` without decompressing it.
    pub fn raw_copy_into(&mut self, index: usize, writer: &mut PhysPkgWriter) -> Result<()> {
        let file = self
            .archive
            .by_index_raw(index)
            .map_err(|e| PackageError::Emit(e.to_string()))?;
        writer
            .zip
            .raw_copy_file(file)
            .map_err(|e| PackageError::Emit(e.to_string()))
    }
}

/// Physical package writer for creating OPC packages in memory.
pub(crate) struct PhysPkgWriter {
    zip: ZipWriter<Cursor<Vec<u8>>>,
    options: SimpleFileOptions,
}

impl PhysPkgWriter {
    /// Create a writer that deflates new entries at `compression_level`
    /// (`None` selects the codec default).
    pub fn new(compression_level: Option<i64>) -> Self {
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(compression_level);
        Self {
            zip: ZipWriter::new(Cursor::new(Vec::new())),
            options,
        }
    }

    /// Write a part with Deflate compression.
    pub fn write(&mut self, name: &str, blob: &[u8]) -> Result<()> {
        self.zip
            .start_file(name, self.options)
            .map_err(|e| PackageError::Emit(e.to_string()))?;
        self.zip
            .write_all(blob)
            .map_err(|e| PackageError::Emit(e.to_string()))
    }

    /// Write a directory entry.
    pub fn write_dir(&mut self, name: &str) -> Result<()> {
        self.zip
            .add_directory(name, self.options)
            .map_err(|e| PackageError::Emit(e.to_string()))
    }

    /// Finish writing and return the package bytes.
    pub fn finish(self) -> Result<Vec<u8>> {
        let cursor = self
            .zip
            .finish()
            .map_err(|e| PackageError::Emit(e.to_string()))?;
        Ok(cursor.into_inner())
    }
}

/// Buffer to reserve for an entry whose header declares `declared` bytes.
///
/// The header is untrusted; larger entries still read fully, growing the
/// buffer as data actually arrives.
fn initial_capacity(declared: u64) -> usize {
    usize::try_from(declared).map_or(MAX_PREALLOCATION, |size| size.min(MAX_PREALLOCATION))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declared_size_is_capped() {
        assert_eq!(initial_capacity(0), 0);
        assert_eq!(initial_capacity(4096), 4096);
        assert_eq!(initial_capacity(u64::MAX), MAX_PREALLOCATION);
        assert_eq!(initial_capacity(u32::MAX as u64 * 4), MAX_PREALLOCATION);
    }

    #[test]
    fn test_round_trip() {
        let mut writer = PhysPkgWriter::new(None);
        writer.write("test.txt", b"Hello, World!").unwrap();
        let zip_data = writer.finish().unwrap();

        let mut reader = PhysPkgReader::new(&zip_data).unwrap();
        let entries = reader.read_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "test.txt");
        assert_eq!(entries[0].data, b"Hello, World!");
    }

    #[test]
    fn test_entry_order_is_kept() {
        let mut writer = PhysPkgWriter::new(Some(9));
        writer.write("[Content_Types].xml", b"<Types/>").unwrap();
        writer.write_dir("word/").unwrap();
        writer.write("word/document.xml", b"<document/>").unwrap();
        writer.write("_rels/.rels", b"<Relationships/>").unwrap();
        let zip_data = writer.finish().unwrap();

        let mut reader = PhysPkgReader::new(&zip_data).unwrap();
        let names: Vec<_> = reader
            .read_all()
            .unwrap()
            .into_iter()
            .map(|e| (e.name, e.is_dir))
            .collect();
        assert_eq!(
            names,
            vec![
                ("[Content_Types].xml".to_string(), false),
                ("word/".to_string(), true),
                ("word/document.xml".to_string(), false),
                ("_rels/.rels".to_string(), false),
            ]
        );
    }

    #[test]
    fn test_raw_copy_keeps_compressed_bytes() {
        let mut writer = PhysPkgWriter::new(Some(1));
        writer.write("a.xml", &b"<a>text</a>".repeat(64)).unwrap();
        let source = writer.finish().unwrap();

        let mut reader = PhysPkgReader::new(&source).unwrap();
        let mut copy = PhysPkgWriter::new(Some(9));
        reader.raw_copy_into(0, &mut copy).unwrap();
        let copied = copy.finish().unwrap();

        let mut original = ZipArchive::new(Cursor::new(source.as_slice())).unwrap();
        let mut again = ZipArchive::new(Cursor::new(copied.as_slice())).unwrap();
        let original = original.by_index_raw(0).unwrap();
        let again = again.by_index_raw(0).unwrap();
        assert_eq!(original.crc32(), again.crc32());
        assert_eq!(original.compressed_size(), again.compressed_size());
    }

    #[test]
    fn test_not_a_zip() {
        assert!(matches!(
            PhysPkgReader::new(b"definitely not a zip archive"),
            Err(PackageError::NotAContainer(_))
        ));
    }
}
