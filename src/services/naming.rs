//! Deterministic output naming for variant files.
//!
//! Results are discoverable without any index: given a source path, the
//! full set of derivative paths is computable up front, and re-running a job
//! overwrites the same paths.

use std::path::{Path, PathBuf};

use crate::models::job::Variant;

/// Derive the output path for one variant of a source image.
///
/// Strips the source's extension and appends `_scenario_<tag>.jpg`, keeping
/// the file in the same directory as the source. Pure, no I/O.
pub fn output_path(source: &Path, variant: Variant) -> PathBuf {
    let stem = source
        .file_stem()
        .unwrap_or_else(|| source.as_os_str())
        .to_string_lossy();
    source.with_file_name(format!("{stem}_scenario_{variant}.jpg"))
}
