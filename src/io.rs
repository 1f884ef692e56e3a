//! Line-oriented text file input and output

use crate::domain::{Result, ScrubError};
use std::fs;
use std::path::Path;

/// Read a text file into a list of lines, dropping blank lines
///
/// Line terminators (`\n` or `\r\n`) are removed. Lines made up only of
/// whitespace (including U+3000) are not returned.
pub fn read_text_file_to_list(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .map_err(|e| ScrubError::Io(format!("Failed to read {}: {e}", path.display())))?;

    let lines: Vec<String> = content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect();

    tracing::debug!(path = %path.display(), lines = lines.len(), "Input file read");
    Ok(lines)
}

/// Write lines to a file, one per line, creating parent directories
pub fn write_lines<S: AsRef<str>>(path: impl AsRef<Path>, lines: &[S]) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            ScrubError::Io(format!("Failed to create directory {}: {e}", parent.display()))
        })?;
    }

    let mut content = String::new();
    for line in lines {
        content.push_str(line.as_ref());
        content.push('\n');
    }

    fs::write(path, content)
        .map_err(|e| ScrubError::Io(format!("Failed to write {}: {e}", path.display())))
}
