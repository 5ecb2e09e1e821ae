//! # lbxtract
//!
//! Extracts the sub-files packed inside SimTex LBX archives, the resource
//! container of Master of Orion II and other games of that era.
//!
//! Decoding is a pure function of the archive bytes: [`lbx::decode`] validates
//! the header, rebuilds the entry table and yields each entry's bytes with an
//! output name. Writing files is left to [`LbxExtractor`], which keeps output
//! names unique within each archive's folder.
//!
//! ## Features
//!
//! - Validates the LBX magic and offset table
//! - Reads the optional name/description records
//! - Extracts single archives or every `.lbx` file in a directory
//! - Never overwrites: repeated names get a `-1`, `-2`, ... suffix
//!
//! ## Example
//!
//! ```no_run
//! use lbxtract::lbx::decode;
//!
//! fn main() -> anyhow::Result<()> {
//!     let data = std::fs::read("FONTS.LBX")?;
//!     for entry in decode(&data)? {
//!         println!("{} - {} ({} bytes)", entry.name, entry.description, entry.len());
//!     }
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod io;
pub mod lbx;

pub use cli::Cli;
pub use io::collect_archives;
pub use lbx::{ArchiveError, ExtractError, ExtractOptions, LbxExtractor, NamePolicy};
