use std::path::PathBuf;

use thiserror::Error;

/// Reasons an LBX buffer cannot be decoded.
///
/// Every variant is final for the archive in question; nothing is retried.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ArchiveError {
    #[error("archive contains no files")]
    EmptyArchive,

    #[error("not a SimTex LBX file (magic {found:02X?})")]
    InvalidMagic { found: [u8; 4] },

    #[error("malformed offset table: entry {index} ends at {end} before it starts at {start}")]
    MalformedOffsetTable { index: usize, start: u64, end: u64 },

    #[error("archive truncated: need {needed} bytes, have {len}")]
    TruncatedArchive { needed: u64, len: u64 },
}

impl ArchiveError {
    pub(crate) fn truncated(needed: usize, len: usize) -> Self {
        Self::TruncatedArchive {
            needed: needed as u64,
            len: len as u64,
        }
    }
}

/// Failure to extract one archive, tagged with the archive it concerns.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("cannot find file {}", .0.display())]
    NotFound(PathBuf),

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: {source}", archive.display())]
    Decode {
        archive: PathBuf,
        #[source]
        source: ArchiveError,
    },

    /// Writing stopped partway; `written` lists the files left on disk.
    #[error("{}: stopped after {} file(s): {source}", archive.display(), written.len())]
    Incomplete {
        archive: PathBuf,
        written: Vec<PathBuf>,
        #[source]
        source: Box<ExtractError>,
    },
}

impl ExtractError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
