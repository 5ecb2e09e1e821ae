//! LBX archive decoder.
//!
//! Decoding is a pure transformation of an in-memory buffer: nothing here
//! touches the filesystem or prints. The buffer is parsed in three passes:
//!
//! 1. The 8-byte header (entry count, magic, reserved word)
//! 2. The offset table, whose last slot is replaced by the buffer length
//! 3. The name region at byte 512, which may hold fewer records than entries
//!
//! All byte ranges are validated up front, so the entry iterator handed back
//! to callers cannot fail.

use byteorder::{LittleEndian, ReadBytesExt};
use std::io::Cursor;
use tracing::debug;

use super::error::ArchiveError;
use super::naming::{description_label, output_base_name};
use super::structures::*;

/// Decode `data` with the default [`NamePolicy`].
///
/// # Example
///
/// ```
/// use lbxtract::lbx::{ArchiveError, decode};
///
/// assert_eq!(decode(&[0u8; 16]).unwrap_err(), ArchiveError::EmptyArchive);
/// ```
pub fn decode(data: &[u8]) -> Result<Entries<'_>, ArchiveError> {
    decode_with(data, NamePolicy::default())
}

/// Decode `data`, choosing output names with `policy`.
pub fn decode_with(data: &[u8], policy: NamePolicy) -> Result<Entries<'_>, ArchiveError> {
    Ok(LbxArchive::parse(data)?.into_entries(policy))
}

/// A parsed LBX archive borrowing its bytes.
#[derive(Debug, Clone)]
pub struct LbxArchive<'a> {
    data: &'a [u8],
    header: ArchiveHeader,
    offsets: OffsetTable,
    /// One slot per offset-table slot; `None` once the name region ran out.
    names: Vec<Option<NameRecord>>,
}

impl<'a> LbxArchive<'a> {
    /// Parse and validate the header, offset table and name region.
    ///
    /// # Errors
    ///
    /// Returns an [`ArchiveError`] if the buffer is not a usable LBX archive.
    pub fn parse(data: &'a [u8]) -> Result<Self, ArchiveError> {
        let header = ArchiveHeader::from_bytes(data)?;
        let offsets = read_offsets(data, header.entry_count)?;
        let names = read_names(data, &offsets)?;
        validate_ranges(data, &offsets)?;

        debug!(
            entries = offsets.entry_count(),
            named = names.iter().filter(|n| n.is_some()).count(),
            info = header.info,
            "parsed LBX archive"
        );

        Ok(Self {
            data,
            header,
            offsets,
            names,
        })
    }

    pub fn header(&self) -> &ArchiveHeader {
        &self.header
    }

    pub fn offsets(&self) -> &OffsetTable {
        &self.offsets
    }

    /// Name record for entry `index`, if the name region holds one.
    pub fn name_record(&self, index: usize) -> Option<&NameRecord> {
        self.names.get(index).and_then(Option::as_ref)
    }

    /// Number of extractable entries (one less than the declared count).
    pub fn entry_count(&self) -> usize {
        self.offsets.entry_count()
    }

    /// Build entry `index`, or `None` past the last entry.
    pub fn entry(&self, index: usize, policy: NamePolicy) -> Option<ExtractedEntry<'a>> {
        if index >= self.entry_count() {
            return None;
        }

        // Ranges were checked in parse()
        let start = self.offsets.offsets[index];
        let end = self.offsets.offsets[index + 1];
        let data = &self.data[start as usize..end as usize];

        let record = self.name_record(index);
        let (raw_name, raw_description) = match record {
            Some(r) => (r.name.clone(), r.description.clone()),
            None => (UNNAMED.to_string(), String::new()),
        };

        Some(ExtractedEntry {
            index,
            offset: start,
            name: output_base_name(policy, index, record.map(|r| r.name.as_str())),
            description: description_label(policy, &raw_description),
            raw_name,
            raw_description,
            has_record: record.is_some(),
            data,
        })
    }

    /// Iterate over all entries in index order.
    pub fn entries(&self, policy: NamePolicy) -> Entries<'a> {
        self.clone().into_entries(policy)
    }

    pub fn into_entries(self, policy: NamePolicy) -> Entries<'a> {
        Entries {
            archive: self,
            policy,
            next: 0,
        }
    }
}

/// Lazy iterator over the entries of an [`LbxArchive`].
#[derive(Debug, Clone)]
pub struct Entries<'a> {
    archive: LbxArchive<'a>,
    policy: NamePolicy,
    next: usize,
}

impl<'a> Entries<'a> {
    pub fn archive(&self) -> &LbxArchive<'a> {
        &self.archive
    }
}

impl<'a> Iterator for Entries<'a> {
    type Item = ExtractedEntry<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.archive.entry(self.next, self.policy)?;
        self.next += 1;
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.archive.entry_count().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Entries<'_> {}

/// Read `count` offsets after the header and install the sentinel.
fn read_offsets(data: &[u8], count: u16) -> Result<OffsetTable, ArchiveError> {
    let table_end = ArchiveHeader::SIZE + count as usize * 4;
    let eof = |_| ArchiveError::truncated(table_end, data.len());

    let mut cursor = Cursor::new(data);
    cursor.set_position(ArchiveHeader::SIZE as u64);
    let mut offsets = Vec::with_capacity(count as usize);
    for _ in 0..count {
        offsets.push(cursor.read_u32::<LittleEndian>().map_err(eof)? as u64);
    }

    // The final slot only bounds the last entry; the archive length is
    // authoritative for that.
    let last = offsets.len() - 1;
    let declared_end = offsets[last] as u32;
    offsets[last] = data.len() as u64;

    Ok(OffsetTable {
        offsets,
        declared_end,
    })
}

/// Read name records until one would run into its own entry's data.
fn read_names(data: &[u8], offsets: &OffsetTable) -> Result<Vec<Option<NameRecord>>, ArchiveError> {
    let mut names = Vec::with_capacity(offsets.offsets.len());
    let mut end_of_names = false;

    for (i, &entry_offset) in offsets.offsets.iter().enumerate() {
        let record_start = NAME_REGION_OFFSET + i as u64 * NAME_RECORD_SIZE;
        let record_end = record_start + NAME_RECORD_SIZE;

        if !end_of_names && record_end > entry_offset {
            debug!(index = i, record_end, entry_offset, "name region ends");
            end_of_names = true;
        }
        if end_of_names {
            names.push(None);
            continue;
        }

        if record_end > data.len() as u64 {
            return Err(ArchiveError::TruncatedArchive {
                needed: record_end,
                len: data.len() as u64,
            });
        }

        let record = &data[record_start as usize..record_end as usize];
        let name_end = NAME_FIELD_LEN;
        // skip the name's NUL terminator
        let desc_start = name_end + 1;
        let desc_end = desc_start + DESCRIPTION_FIELD_LEN;

        names.push(Some(NameRecord {
            name: field_text(&record[..name_end]),
            description: field_text(&record[desc_start..desc_end]),
        }));
    }

    Ok(names)
}

/// Check that every entry range is ordered and inside the buffer.
fn validate_ranges(data: &[u8], offsets: &OffsetTable) -> Result<(), ArchiveError> {
    let len = data.len() as u64;
    for (index, pair) in offsets.offsets.windows(2).enumerate() {
        let (start, end) = (pair[0], pair[1]);
        if end < start {
            return Err(ArchiveError::MalformedOffsetTable { index, start, end });
        }
        if end > len {
            return Err(ArchiveError::TruncatedArchive { needed: end, len });
        }
    }
    Ok(())
}

/// Decode a fixed-width ASCII field, padding and all.
///
/// Bytes above 0x7F become `?`.
fn field_text(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| if b.is_ascii() { b as char } else { '?' })
        .collect()
}
