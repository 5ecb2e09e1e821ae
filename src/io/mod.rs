//! Resolving command-line inputs into archive paths.

mod scan;

pub use scan::{LBX_EXTENSION, collect_archives, expand_input, is_lbx_file};
