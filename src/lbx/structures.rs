use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{Cursor, Read};

use super::error::ArchiveError;

/// LBX header - 8 bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveHeader {
    pub entry_count: u16,
    pub magic: [u8; 4],
    /// Reserved, never validated
    pub info: u16,
}

impl ArchiveHeader {
    pub const MAGIC: [u8; 4] = [0xAD, 0xFE, 0x00, 0x00];
    pub const SIZE: usize = 8;

    /// Parse and validate the header at the start of `data`.
    ///
    /// The entry count is checked before the magic, so an all-zero buffer
    /// reports [`ArchiveError::EmptyArchive`].
    pub fn from_bytes(data: &[u8]) -> Result<Self, ArchiveError> {
        let eof = |_| ArchiveError::truncated(Self::SIZE, data.len());
        let mut cursor = Cursor::new(data);
        let entry_count = cursor.read_u16::<LittleEndian>().map_err(eof)?;
        let mut magic = [0u8; 4];
        cursor.read_exact(&mut magic).map_err(eof)?;
        let info = cursor.read_u16::<LittleEndian>().map_err(eof)?;

        if entry_count == 0 {
            return Err(ArchiveError::EmptyArchive);
        }
        if magic != Self::MAGIC {
            return Err(ArchiveError::InvalidMagic { found: magic });
        }

        Ok(Self {
            entry_count,
            magic,
            info,
        })
    }
}

/// Absolute position of the first name record.
pub const NAME_REGION_OFFSET: u64 = 512;

/// One name record: 8 name bytes, NUL, 22 description bytes, NUL.
pub const NAME_RECORD_SIZE: u64 = 32;
pub const NAME_FIELD_LEN: usize = 8;
pub const DESCRIPTION_FIELD_LEN: usize = 22;

/// Name given to entries past the end of the name region.
pub const UNNAMED: &str = "Unnamed ";

/// Label used when a description cannot be part of a file name.
pub const UNKNOWN_DESCRIPTION: &str = "Unknown";

/// Characters that may not appear in an output file name.
///
/// Control characters are rejected separately.
pub const ILLEGAL_NAME_CHARS: &[char] = &['"', '<', '>', '|', ':', '*', '?', '\\', '/'];

/// Offset table with the final slot replaced by the archive length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffsetTable {
    /// `entry_count` slots, the last one being the sentinel end.
    pub offsets: Vec<u64>,
    /// On-disk value of the last slot before it was replaced.
    pub declared_end: u32,
}

impl OffsetTable {
    pub fn sentinel(&self) -> u64 {
        // entry_count >= 1 is checked before the table is read
        self.offsets[self.offsets.len() - 1]
    }

    /// Number of real entries; the sentinel slot is not one.
    pub fn entry_count(&self) -> usize {
        self.offsets.len() - 1
    }
}

/// Name/description pair read from the name region.
///
/// Both fields hold the full fixed-width text, NUL padding included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameRecord {
    pub name: String,
    pub description: String,
}

/// How output base names are chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NamePolicy {
    /// Always use the entry index, whatever the stored name is.
    ///
    /// Output layouts that existing mod tooling relies on are numbered this way.
    #[default]
    Index,
    /// Read name fields as C strings and use the stored name when it is a
    /// valid file name, else the index.
    ///
    /// Descriptions are cut at their first NUL as well, so padded fields no
    /// longer show as [`UNKNOWN_DESCRIPTION`].
    Preserve,
}

/// A decoded entry, ready to be written out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedEntry<'a> {
    pub index: usize,
    /// Absolute start offset in the archive
    pub offset: u64,
    /// Output base name, before de-duplication
    pub name: String,
    /// Description label, safe to print next to a path
    pub description: String,
    /// Name field as stored, or [`UNNAMED`]
    pub raw_name: String,
    pub raw_description: String,
    /// Whether the name region held a record for this entry
    pub has_record: bool,
    pub data: &'a [u8],
}

impl ExtractedEntry<'_> {
    pub fn len(&self) -> u64 {
        self.data.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
