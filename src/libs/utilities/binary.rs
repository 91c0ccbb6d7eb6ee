use std::fs;
use std::io;
use std::path::Path;
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// Mode applied to every extracted file.
pub const EXECUTABLE_MODE: u32 = 0o755;

/// Sets `rwxr-xr-x` on `path`. Release archives do not say which files are binaries, so the
/// installer calls this for every file it writes.
#[cfg(unix)]
pub fn make_executable(path: &Path) -> io::Result<()> {
    let mut perms = fs::metadata(path)?.permissions();
    perms.set_mode(EXECUTABLE_MODE);
    fs::set_permissions(path, perms)
}

// Windows has no mode bits; executability comes from the file extension.
#[cfg(not(unix))]
pub fn make_executable(_path: &Path) -> io::Result<()> {
    Ok(())
}

/// Whether the owner execute bit is set.
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    fs::metadata(path)
        .map(|m| m.permissions().mode() & 0o100 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
pub fn is_executable(path: &Path) -> bool {
    path.is_file()
}
