use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use crate::lbx::ExtractError;

/// File extension of LBX archives, matched case-insensitively.
pub const LBX_EXTENSION: &str = "lbx";

pub fn is_lbx_file(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(LBX_EXTENSION))
}

/// Expand one input into archive paths.
///
/// Directories yield their top-level `*.lbx` files in sorted order. Anything
/// else, including paths that do not exist, is passed through so the
/// extractor can report it.
pub async fn expand_input(input: &Path) -> Result<Vec<PathBuf>, ExtractError> {
    let is_dir = fs::metadata(input)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false);
    if !is_dir {
        return Ok(vec![input.to_path_buf()]);
    }

    let mut dir = fs::read_dir(input)
        .await
        .map_err(|e| ExtractError::io(input, e))?;
    let mut archives = Vec::new();
    while let Some(entry) = dir
        .next_entry()
        .await
        .map_err(|e| ExtractError::io(input, e))?
    {
        let path = entry.path();
        let is_file = entry.file_type().await.is_ok_and(|t| t.is_file());
        if is_file && is_lbx_file(&path) {
            archives.push(path);
        }
    }
    archives.sort();

    debug!(dir = %input.display(), found = archives.len(), "scanned directory");
    Ok(archives)
}

/// Expand every input in order, keeping going past unreadable directories.
pub async fn collect_archives(inputs: &[PathBuf]) -> (Vec<PathBuf>, Vec<ExtractError>) {
    let mut archives = Vec::new();
    let mut errors = Vec::new();
    for input in inputs {
        match expand_input(input).await {
            Ok(found) => archives.extend(found),
            Err(e) => errors.push(e),
        }
    }
    (archives, errors)
}
