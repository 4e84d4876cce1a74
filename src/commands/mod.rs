//! Command-line entry points for the two tools

mod erode;
mod extract_slice;

pub use erode::ErodeArgs;
pub use extract_slice::ExtractSliceArgs;

use std::path::Path;

/// Split a path into its file stem and extension (with leading dot).
///
/// Used for deriving default output names next to the input file.
pub(crate) fn stem_and_extension(path: &Path) -> (String, String) {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    (stem, extension)
}
