//! LBX archive decoding and extraction.
//!
//! LBX is the container used by SimTex titles such as Master of Orion II to
//! bundle graphics, sound and text resources.
//!
//! ## Architecture
//!
//! - [`structures`]: header layout, constants and decoded entry types
//! - [`parser`]: pure decoding of an in-memory archive
//! - [`naming`]: output file names and collision handling
//! - [`extractor`]: writes decoded entries to disk
//!
//! ## LBX Format Overview
//!
//! An LBX file consists of:
//! 1. An 8-byte header: entry count (u16), magic `AD FE 00 00`, reserved u16
//! 2. An offset table of `entry_count` u32 values; the final slot marks the end
//! 3. Optional 32-byte name/description records starting at byte 512
//! 4. The entry payloads, back to back
//!
//! Only a prefix of the entries usually carries a name record: the records
//! stop as soon as the next one would overlap its entry's data.
//!
//! ## Limitations
//!
//! - Read-only; archives cannot be written
//! - Payloads (images, sound, tables) are extracted as raw bytes

mod error;
mod extractor;
pub mod naming;
mod parser;
mod structures;

pub use error::{ArchiveError, ExtractError};
pub use extractor::{ArchiveReport, BatchReport, ExtractOptions, ExtractedFile, LbxExtractor};
pub use parser::{Entries, LbxArchive, decode, decode_with};
pub use structures::*;
