//! In-memory OPC package.
//!
//! `Package` keeps every entry of the source archive, in archive order, with
//! its decompressed payload. Emitting a package writes replaced parts fresh and
//! raw-copies every other entry from the source bytes, so parts nobody edited
//! leave the codec exactly as they came in.

use crate::ooxml::opc::error::{PackageError, Result};
use crate::ooxml::opc::packuri::PackURI;
use crate::ooxml::opc::phys_pkg::{PhysPkgReader, PhysPkgWriter};
use std::collections::HashMap;
use std::path::Path;

/// A single entry of a package.
#[derive(Debug, Clone)]
pub struct Part {
    partname: PackURI,
    blob: Vec<u8>,
    is_dir: bool,
    /// Position of the entry in the source archive, when there is one
    source_index: Option<usize>,
}

impl Part {
    /// The partname of this part.
    #[inline]
    pub fn partname(&self) -> &PackURI {
        &self.partname
    }

    /// The decompressed content of this part.
    #[inline]
    pub fn blob(&self) -> &[u8] {
        &self.blob
    }

    /// Whether the entry is a directory entry rather than a part.
    #[inline]
    pub fn is_dir(&self) -> bool {
        self.is_dir
    }
}

/// An OPC package held in memory for the duration of one edit.
pub struct Package {
    /// Source archive bytes, used for raw copies on emit
    source: Option<Vec<u8>>,
    parts: Vec<Part>,
    /// Member name -> position in `parts`
    index: HashMap<String, usize>,
}

impl Package {
    /// Open a package from the bytes of a ZIP archive.
    ///
    /// Every entry is decompressed and checked. A single unreadable entry
    /// fails the whole open.
    ///
    /// # Errors
    /// [`PackageError::NotAContainer`] if the bytes are not a ZIP archive,
    /// [`PackageError::CorruptEntry`] if an entry cannot be decompressed.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let entries = {
            let mut reader = PhysPkgReader::new(&data)?;
            log::debug!("opening package with {} entries", reader.len());
            reader.read_all()?
        };

        let mut parts = Vec::with_capacity(entries.len());
        for (source_index, entry) in entries.into_iter().enumerate() {
            parts.push(Part {
                partname: PackURI::from_membername(&entry.name),
                blob: entry.data,
                is_dir: entry.is_dir,
                source_index: Some(source_index),
            });
        }

        Ok(Self::with_parts(Some(data), parts))
    }

    /// Open a package from a file, reading it fully into memory first.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_bytes(data)
    }

    /// Build a package that has no source archive from `(membername, blob)` pairs.
    ///
    /// Emitting such a package writes every part fresh, in the given order.
    pub fn from_parts<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<u8>)>,
        S: AsRef<str>,
    {
        let parts = parts
            .into_iter()
            .map(|(name, blob)| Part {
                partname: PackURI::from_membername(name.as_ref()),
                blob,
                is_dir: false,
                source_index: None,
            })
            .collect();
        Self::with_parts(None, parts)
    }

    fn with_parts(source: Option<Vec<u8>>, parts: Vec<Part>) -> Self {
        let index = parts
            .iter()
            .enumerate()
            .map(|(i, part)| (part.partname.membername().to_string(), i))
            .collect();
        Self {
            source,
            parts,
            index,
        }
    }

    /// Get the content of a part by path; a leading slash is accepted.
    pub fn part(&self, path: &str) -> Result<&[u8]> {
        self.get(path)
            .map(Part::blob)
            .ok_or_else(|| PackageError::PartNotFound(path.to_string()))
    }

    /// Get a part by path, if present.
    pub fn get(&self, path: &str) -> Option<&Part> {
        let name = path.strip_prefix('/').unwrap_or(path);
        self.index.get(name).map(|&i| &self.parts[i])
    }

    /// Check if a part exists in the package.
    #[inline]
    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// Iterate over all parts in archive order.
    pub fn iter_parts(&self) -> impl Iterator<Item = &Part> {
        self.parts.iter()
    }

    /// Member names of all entries, in archive order.
    pub fn part_names(&self) -> Vec<&str> {
        self.parts.iter().map(|p| p.partname.membername()).collect()
    }

    /// Number of entries in the package, directory entries included.
    #[inline]
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Emit the package with `replacements` substituted, using the default
    /// compression level for replaced parts.
    pub fn emit(&self, replacements: &HashMap<String, Vec<u8>>) -> Result<Vec<u8>> {
        self.emit_with(replacements, None)
    }

    /// Emit the package with `replacements` substituted.
    ///
    /// Entries are written in their original order. A replaced entry is
    /// deflated at `compression_level`; every other entry is raw-copied from
    /// the source archive. Replacement keys must name existing parts.
    ///
    /// Nothing is returned unless the whole archive was written.
    pub fn emit_with(
        &self,
        replacements: &HashMap<String, Vec<u8>>,
        compression_level: Option<i64>,
    ) -> Result<Vec<u8>> {
        let mut normalized: HashMap<&str, &[u8]> = HashMap::with_capacity(replacements.len());
        for (path, blob) in replacements {
            let name = path.strip_prefix('/').unwrap_or(path);
            if !self.index.contains_key(name) {
                return Err(PackageError::PartNotFound(path.clone()));
            }
            normalized.insert(name, blob.as_slice());
        }

        let mut source = match &self.source {
            Some(data) => Some(PhysPkgReader::new(data)?),
            None => None,
        };
        let mut writer = PhysPkgWriter::new(compression_level);

        for part in &self.parts {
            let name = part.partname.membername();
            match (normalized.get(name), part.source_index, source.as_mut()) {
                (Some(blob), _, _) => {
                    log::debug!("writing replaced part {}", name);
                    writer.write(name, blob)?;
                },
                (None, Some(index), Some(reader)) => reader.raw_copy_into(index, &mut writer)?,
                (None, _, _) if part.is_dir => writer.write_dir(name)?,
                (None, _, _) => writer.write(name, &part.blob)?,
            }
        }

        writer.finish()
    }
}

impl std::fmt::Debug for Package {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Package")
            .field("part_count", &self.parts.len())
            .field("has_source", &self.source.is_some())
            .finish()
    }
}
