use std::fs;
use std::io;
use std::path::Path;

/// Read a source file. Invalid UTF-8 sequences are replaced rather than
/// rejected, since legacy sources are often Latin-1.
pub fn load_file(path: &Path) -> io::Result<String> {
    let bytes = fs::read(path)?;
    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
    })
}

/// Lowercased extension of `path`, if any.
pub fn get_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
}
