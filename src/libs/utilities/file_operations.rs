use crate::libs::errors::{GodevError, Result};
use crate::log_debug;
use colored::Colorize;
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// Reads a line-oriented text file (environment file, shell profile) preserving every line verbatim.
///
/// # Arguments
/// * `path` - Path to the file to read
///
/// # Returns
/// * `Ok(Vec<String>)` - The lines without their terminators; empty if the file does not exist yet
/// * `Err(GodevError::Io)` - The file exists but could not be read
pub fn read_lines(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        return Ok(vec![]);
    }

    let file = fs::File::open(path).map_err(|e| GodevError::io(path, e))?;
    BufReader::new(file)
        .lines()
        .collect::<std::io::Result<Vec<String>>>()
        .map_err(|e| GodevError::io(path, e))
}

/// Writes all lines back to the file, each followed by a newline.
///
/// The content goes to a temporary file in the same directory which is then renamed over
/// `path`, so a crash mid-write leaves either the old or the new content on disk. A symlinked
/// `path` stays a symlink: the rename lands on the file it points to.
///
/// # Arguments
/// * `path` - Path to the file to (re)write
/// * `lines` - The complete new content, one entry per line
pub fn write_lines(path: &Path, lines: &[String]) -> Result<()> {
    let target: PathBuf = if path.exists() {
        fs::canonicalize(path).map_err(|e| GodevError::io(path, e))?
    } else {
        path.to_path_buf()
    };
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut content = String::new();
    for line in lines {
        content.push_str(line);
        content.push('\n');
    }

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| GodevError::io(dir, e))?;
    tmp.write_all(content.as_bytes())
        .map_err(|e| GodevError::io(tmp.path(), e))?;
    // Temp files are created 0600; keep whatever mode the original had.
    if let Ok(meta) = fs::metadata(&target) {
        fs::set_permissions(tmp.path(), meta.permissions())
            .map_err(|e| GodevError::io(tmp.path(), e))?;
    }
    tmp.persist(&target)
        .map_err(|e| GodevError::io(&target, e.error))?;

    log_debug!(
        "[Files] Wrote {} line(s) to {}",
        lines.len(),
        path.display().to_string().green()
    );
    Ok(())
}

/// Checks whether any line of the file equals `target` once surrounding whitespace is trimmed.
/// A missing file contains nothing. Invalid UTF-8 elsewhere in the file is tolerated, since
/// shell profiles are not guaranteed to be UTF-8.
pub fn contains_line(path: &Path, target: &str) -> Result<bool> {
    let target = target.trim();
    match fs::read(path) {
        Ok(bytes) => Ok(String::from_utf8_lossy(&bytes)
            .lines()
            .any(|line| line.trim() == target)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(GodevError::io(path, e)),
    }
}

/// Appends `line` on its own line at the end of the file, creating the file if needed.
///
/// An existing file gets a blank separator line first so the addition stands out from
/// whatever the user already had there.
pub fn append_line(path: &Path, line: &str) -> Result<()> {
    let existed = path.exists();
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| GodevError::io(path, e))?;

    let payload = if existed {
        format!("\n{line}\n")
    } else {
        format!("{line}\n")
    };
    file.write_all(payload.as_bytes())
        .map_err(|e| GodevError::io(path, e))
}
