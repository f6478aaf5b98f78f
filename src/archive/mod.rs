//! Reader for Gothic VDFS archives (`.vdf` packs such as `Speech.vdf`).
//!
//! The catalog is flattened: directory entries are skipped and files are
//! listed by bare name in catalog order.

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use indexmap::IndexMap;
use serde::Serialize;

use crate::utils::expand_home;
use crate::VdfError;

mod header;

pub use header::{ArchiveVersion, DosDateTime, SIGNATURE_GOTHIC1, SIGNATURE_GOTHIC2};
use header::{Header, ENTRY_LEN, ENTRY_NAME_LEN, FLAG_DIRECTORY, FLAG_LAST, HEADER_LEN};

/// One file in the archive catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchiveEntry {
    pub name: String,
    pub offset: u32,
    pub size: u32,
    pub attributes: u32,
}

pub struct VdfArchive<R = BufReader<File>> {
    reader: R,
    header: Header,
    len: u64,
    entries: IndexMap<String, ArchiveEntry>,
}

impl VdfArchive {
    /// Open an archive on disk. A leading `~/` is expanded.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, VdfError> {
        let path = expand_home(path.as_ref())?;
        log::debug!("opening VDFS archive {}", path.display());
        Self::from_reader(BufReader::new(File::open(&path)?))
    }
}

impl<R: Read + Seek> VdfArchive<R> {
    pub fn from_reader(mut reader: R) -> Result<Self, VdfError> {
        let len = reader.seek(SeekFrom::End(0))?;
        if len < HEADER_LEN as u64 {
            return Err(VdfError::archive(
                format!("Archive is {} bytes, shorter than its {} byte header", len, HEADER_LEN),
                504,
            ));
        }

        reader.seek(SeekFrom::Start(0))?;
        let mut raw_header = [0u8; HEADER_LEN];
        reader.read_exact(&mut raw_header)?;
        let header = Header::parse(&raw_header)?;

        let catalog_len = header.entry_count as u64 * ENTRY_LEN as u64;
        if header.catalog_offset as u64 + catalog_len > len {
            return Err(VdfError::archive(
                format!(
                    "Catalog of {} entries at offset {} extends past the end of the archive",
                    header.entry_count, header.catalog_offset
                ),
                505,
            ));
        }

        reader.seek(SeekFrom::Start(header.catalog_offset as u64))?;
        let mut catalog = vec![0u8; catalog_len as usize];
        reader.read_exact(&mut catalog)?;
        let entries = load_entries(&catalog);

        if entries.len() != header.file_count as usize {
            log::warn!(
                "archive header declares {} files but the catalog lists {}",
                header.file_count,
                entries.len()
            );
        }
        log::debug!(
            "loaded {:?} archive with {} files ({} data bytes)",
            header.version,
            entries.len(),
            header.data_size
        );

        Ok(Self {
            reader,
            header,
            len,
            entries,
        })
    }

    /// File names in catalog order.
    pub fn files(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Owned list of file names, as the engine-side reader returns them.
    pub fn get_files(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    /// Look up a file: exact name first, then ASCII case-insensitive.
    pub fn entry(&self, name: &str) -> Option<&ArchiveEntry> {
        self.entries.get(name).or_else(|| {
            self.entries
                .values()
                .find(|entry| entry.name.eq_ignore_ascii_case(name))
        })
    }

    pub fn entries(&self) -> impl Iterator<Item = &ArchiveEntry> {
        self.entries.values()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entry(name).is_some()
    }

    /// Read a file's bytes.
    pub fn read(&mut self, name: &str) -> Result<Vec<u8>, VdfError> {
        let entry = self.entry(name).cloned().ok_or_else(|| VdfError::not_found(name))?;

        let end = entry.offset as u64 + entry.size as u64;
        if end > self.len {
            return Err(VdfError::archive(
                format!(
                    "'{}' spans bytes {}..{} but the archive is {} bytes",
                    entry.name, entry.offset, end, self.len
                ),
                506,
            ));
        }

        self.reader.seek(SeekFrom::Start(entry.offset as u64))?;
        let mut data = vec![0u8; entry.size as usize];
        self.reader.read_exact(&mut data)?;
        Ok(data)
    }

    pub fn version(&self) -> ArchiveVersion {
        self.header.version
    }

    pub fn comment(&self) -> &str {
        &self.header.comment
    }

    pub fn timestamp(&self) -> DosDateTime {
        DosDateTime::from_packed(self.header.timestamp)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Release the archive and hand back the underlying reader.
    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Close the archive. Dropping it has the same effect.
    pub fn close(self) {
        log::debug!("closing VDFS archive ({} files)", self.entries.len());
    }
}

fn load_entries(catalog: &[u8]) -> IndexMap<String, ArchiveEntry> {
    let mut entries = IndexMap::new();

    for raw in catalog.chunks_exact(ENTRY_LEN) {
        let fields = ENTRY_NAME_LEN;
        let flags = header::le_u32(raw, fields + 8);
        if flags & FLAG_DIRECTORY != 0 {
            continue;
        }

        let entry = ArchiveEntry {
            name: header::decode_name(&raw[..ENTRY_NAME_LEN]),
            offset: header::le_u32(raw, fields),
            size: header::le_u32(raw, fields + 4),
            attributes: header::le_u32(raw, fields + 12),
        };
        log::trace!(
            "catalog file '{}' ({} bytes at {}){}",
            entry.name,
            entry.size,
            entry.offset,
            if flags & FLAG_LAST != 0 { ", last in directory" } else { "" }
        );

        if let Some(previous) = entries.insert(entry.name.clone(), entry) {
            log::warn!("duplicate archive entry '{}', keeping the later one", previous.name);
        }
    }

    entries
}
