//! Output file naming for extracted entries.
//!
//! Stored LBX names are eight-character DOS names and frequently repeat within
//! one archive, so every name is checked against the set of characters a file
//! name may not hold and made unique inside its output directory.

use std::convert::Infallible;
use std::path::{Path, PathBuf};

use super::structures::{ILLEGAL_NAME_CHARS, NamePolicy, UNKNOWN_DESCRIPTION};

/// Whether `c` may not appear in a file name.
pub fn is_illegal_char(c: char) -> bool {
    (c as u32) < 0x20 || ILLEGAL_NAME_CHARS.contains(&c)
}

/// Whether `name` can be used as a file name as-is.
pub fn is_valid_file_name(name: &str) -> bool {
    !name.is_empty() && !name.chars().any(is_illegal_char)
}

/// Text of a NUL-padded field up to its first NUL.
pub fn c_str(field: &str) -> &str {
    field.split('\0').next().unwrap_or_default()
}

/// Base output name for entry `index`.
///
/// `stored` is the entry's name field, `None` past the end of the name region.
pub fn output_base_name(policy: NamePolicy, index: usize, stored: Option<&str>) -> String {
    match (policy, stored.map(|s| c_str(s).trim())) {
        (NamePolicy::Preserve, Some(name)) if is_valid_file_name(name) => name.to_string(),
        _ => index.to_string(),
    }
}

/// Description label that is safe to print next to a path.
///
/// With [`NamePolicy::Index`] the whole field is checked, so NUL padding
/// turns it into [`UNKNOWN_DESCRIPTION`].
pub fn description_label(policy: NamePolicy, raw: &str) -> String {
    let text = match policy {
        NamePolicy::Index => raw,
        NamePolicy::Preserve => c_str(raw),
    };
    if text.chars().any(is_illegal_char) {
        UNKNOWN_DESCRIPTION.to_string()
    } else {
        text.to_string()
    }
}

/// Candidate path for attempt `attempt`: `name`, then `name-1`, `name-2`, ...
pub fn candidate_path(dir: &Path, base: &str, attempt: u32) -> PathBuf {
    if attempt == 0 {
        dir.join(base)
    } else {
        dir.join(format!("{base}-{attempt}"))
    }
}

/// First candidate for `base` in `dir` that `taken` reports as free.
///
/// Stops at the first error from `taken`. Not safe against concurrent
/// writers to the same directory.
pub fn try_unique_path<E>(
    dir: &Path,
    base: &str,
    mut taken: impl FnMut(&Path) -> Result<bool, E>,
) -> Result<PathBuf, E> {
    let mut attempt = 0;
    loop {
        let path = candidate_path(dir, base, attempt);
        if !taken(&path)? {
            return Ok(path);
        }
        attempt += 1;
    }
}

/// [`try_unique_path`] with a check that cannot fail.
pub fn unique_path(dir: &Path, base: &str, mut taken: impl FnMut(&Path) -> bool) -> PathBuf {
    match try_unique_path::<Infallible>(dir, base, |p| Ok(taken(p))) {
        Ok(path) => path,
        Err(never) => match never {},
    }
}
