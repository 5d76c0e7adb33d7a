use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use tracing::info;

use crate::error::FileIoError;

/// Read `path` as an ordered sequence of lines.
///
/// The exact inverse of [`save`]: contents are split on every `\n`, so a
/// trailing newline becomes a trailing empty line and an empty file is one
/// empty line. A `\r` before the `\n` is dropped.
pub fn load(path: &Path) -> Result<Vec<String>, FileIoError> {
    let contents = fs::read_to_string(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => FileIoError::NotFound(path.to_path_buf()),
        _ => FileIoError::Read {
            path: path.to_path_buf(),
            source,
        },
    })?;
    let lines: Vec<String> = contents
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
        .collect();
    info!("loaded {} lines from {}", lines.len(), path.display());
    Ok(lines)
}

/// Write `lines` joined by newlines, without a trailing newline.
pub fn save(path: &Path, lines: &[String]) -> Result<(), FileIoError> {
    fs::write(path, lines.join("\n")).map_err(|source| FileIoError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    info!("saved {} lines to {}", lines.len(), path.display());
    Ok(())
}
