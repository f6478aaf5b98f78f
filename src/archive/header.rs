use serde::Serialize;

use crate::VdfError;

pub const SIGNATURE_GOTHIC1: &[u8; 16] = b"PSVDSC_V2.00\r\n\r\n";
pub const SIGNATURE_GOTHIC2: &[u8; 16] = b"PSVDSC_V2.00\n\r\n\r";

pub(super) const COMMENT_LEN: usize = 256;
pub(super) const HEADER_LEN: usize = COMMENT_LEN + 16 + 6 * 4;
pub(super) const ENTRY_LEN: usize = 80;
pub(super) const ENTRY_NAME_LEN: usize = 64;

pub(super) const FLAG_DIRECTORY: u32 = 0x8000_0000;
pub(super) const FLAG_LAST: u32 = 0x4000_0000;

/// Which game's signature the archive carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ArchiveVersion {
    Gothic1,
    Gothic2,
}

/// Packed MS-DOS date/time, as stored in the archive header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DosDateTime {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl DosDateTime {
    pub fn from_packed(packed: u32) -> Self {
        Self {
            year: 1980 + ((packed >> 25) & 0x7f) as u16,
            month: ((packed >> 21) & 0x0f) as u8,
            day: ((packed >> 16) & 0x1f) as u8,
            hour: ((packed >> 11) & 0x1f) as u8,
            minute: ((packed >> 5) & 0x3f) as u8,
            second: ((packed & 0x1f) * 2) as u8,
        }
    }
}

#[derive(Debug, Clone)]
pub(super) struct Header {
    pub comment: String,
    pub version: ArchiveVersion,
    pub entry_count: u32,
    pub file_count: u32,
    pub timestamp: u32,
    pub data_size: u32,
    pub catalog_offset: u32,
}

impl Header {
    pub fn parse(buf: &[u8; HEADER_LEN]) -> Result<Self, VdfError> {
        let signature = &buf[COMMENT_LEN..COMMENT_LEN + 16];
        let version = if signature == SIGNATURE_GOTHIC1 {
            ArchiveVersion::Gothic1
        } else if signature == SIGNATURE_GOTHIC2 {
            ArchiveVersion::Gothic2
        } else {
            return Err(VdfError::archive("Unknown archive signature", 502)
                .with_hint("Expected a Gothic VDFS archive (PSVDSC_V2.00)"));
        };

        let fields = COMMENT_LEN + 16;
        let entry_len = le_u32(buf, fields + 20);
        if entry_len as usize != ENTRY_LEN {
            return Err(VdfError::archive(format!("Unsupported catalog entry size {}", entry_len), 503));
        }

        Ok(Self {
            comment: decode_comment(&buf[..COMMENT_LEN]),
            version,
            entry_count: le_u32(buf, fields),
            file_count: le_u32(buf, fields + 4),
            timestamp: le_u32(buf, fields + 8),
            data_size: le_u32(buf, fields + 12),
            catalog_offset: le_u32(buf, fields + 16),
        })
    }
}

pub(super) fn le_u32(buf: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([buf[at], buf[at + 1], buf[at + 2], buf[at + 3]])
}

// Comments are padded with 0x1A (DOS EOF) or NUL.
fn decode_comment(raw: &[u8]) -> String {
    let end = raw.iter().position(|&b| b == 0x1a || b == 0).unwrap_or(raw.len());
    String::from_utf8_lossy(&raw[..end]).trim_end().to_string()
}

/// Catalog names are space padded to 64 bytes.
pub(super) fn decode_name(raw: &[u8]) -> String {
    let end = raw
        .iter()
        .rposition(|&b| b != b' ' && b != 0)
        .map_or(0, |i| i + 1);
    match std::str::from_utf8(&raw[..end]) {
        Ok(name) => name.to_string(),
        Err(_) => {
            let lossy = String::from_utf8_lossy(&raw[..end]).into_owned();
            log::warn!("archive entry name is not UTF-8, decoded as '{}'", lossy);
            lossy
        }
    }
}
