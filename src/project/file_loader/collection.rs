use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Recursively collect every regular file below `dir`.
///
/// Entries are visited sorted by file name so the result is stable across
/// platforms. Symbolic links are not followed.
pub fn collect_file_paths(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in WalkDir::new(dir)
        .follow_links(false)
        .sort_by_file_name()
    {
        let entry = entry.map_err(io::Error::from)?;
        if entry.file_type().is_file() {
            paths.push(entry.into_path());
        }
    }
    tracing::debug!(dir = %dir.display(), files = paths.len(), "collected source candidates");
    Ok(paths)
}
