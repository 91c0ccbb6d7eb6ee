// Unpacks gzip-compressed tar archives into an install directory.

use colored::Colorize;
use flate2::read::GzDecoder;
use std::fs::{self, File};
use std::io;
use std::path::{Component, Path, PathBuf};
use tar::Archive;

use crate::libs::errors::{GodevError, Result};
use crate::libs::utilities::binary::make_executable;
use crate::log_debug;

/// Counters from one extraction run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExtractSummary {
    pub directories: usize,
    pub files: usize,
    /// Entries of other types (symlinks, devices, pax headers) that were not materialized.
    pub skipped: usize,
}

/// Extracts the `.tar.gz` at `src` into `dest`.
///
/// Directory entries are created with their parents. Regular files are written (parents
/// created on demand, existing files overwritten) and then set to mode 0755 unconditionally.
/// Any other entry type is skipped.
///
/// # Returns
/// * `Ok(ExtractSummary)` once the whole archive has been processed.
/// * `Err(GodevError::Decode)` for a corrupt stream or an entry whose path is absolute or
///   climbs out of `dest` with `..`.
/// * `Err(GodevError::Io)` when writing below `dest` fails.
pub fn extract_tar_gz(src: &Path, dest: &Path) -> Result<ExtractSummary> {
    log_debug!(
        "[Extract] Unpacking {} into {}",
        src.to_string_lossy().blue(),
        dest.to_string_lossy().cyan()
    );

    let archive_name = src.display().to_string();
    let corrupt = |e: io::Error| GodevError::decode(archive_name.clone(), e);

    let file = File::open(src).map_err(|e| GodevError::io(src, e))?;
    let mut archive = Archive::new(GzDecoder::new(file));
    fs::create_dir_all(dest).map_err(|e| GodevError::io(dest, e))?;

    let mut summary = ExtractSummary::default();
    for entry in archive.entries().map_err(corrupt)? {
        let mut entry = entry.map_err(corrupt)?;
        let relative = entry.path().map_err(corrupt)?.into_owned();
        let Some(target) = contained_join(dest, &relative) else {
            return Err(GodevError::decode(
                archive_name.clone(),
                format!("entry '{}' points outside the install directory", relative.display()),
            ));
        };

        let entry_type = entry.header().entry_type();
        if entry_type.is_dir() {
            fs::create_dir_all(&target).map_err(|e| GodevError::io(&target, e))?;
            summary.directories += 1;
        } else if entry_type.is_file() {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|e| GodevError::io(parent, e))?;
            }
            let mut out = File::create(&target).map_err(|e| GodevError::io(&target, e))?;
            io::copy(&mut entry, &mut out).map_err(|e| GodevError::io(&target, e))?;
            make_executable(&target).map_err(|e| GodevError::io(&target, e))?;
            summary.files += 1;
        } else {
            log_debug!(
                "[Extract] Skipping {:?} entry {}",
                entry_type,
                relative.display().to_string().dimmed()
            );
            summary.skipped += 1;
        }
    }

    log_debug!(
        "[Extract] {} director(ies), {} file(s), {} skipped",
        summary.directories,
        summary.files,
        summary.skipped
    );
    Ok(summary)
}

/// Joins an archive path onto `dest`, refusing absolute paths and `..` components.
/// `.` components are dropped; an entry that names `dest` itself maps to `dest`.
pub fn contained_join(dest: &Path, relative: &Path) -> Option<PathBuf> {
    let mut target = dest.to_path_buf();
    for component in relative.components() {
        match component {
            Component::Normal(part) => target.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{TarEntry, tar_gz};

    fn write_archive(dir: &Path, entries: &[TarEntry<'_>]) -> PathBuf {
        let path = dir.join("fixture.tar.gz");
        fs::write(&path, tar_gz(entries)).unwrap();
        path
    }

    #[test]
    fn directories_and_files_are_materialized() {
        let tmp = tempfile::tempdir().unwrap();
        let archive = write_archive(
            tmp.path(),
            &[
                TarEntry::dir("go/"),
                TarEntry::dir("go/bin/"),
                TarEntry::file("go/bin/go", b"binary"),
                TarEntry::file("go/VERSION", b"go1.22.1\n"),
            ],
        );
        let dest = tmp.path().join("out");

        let summary = extract_tar_gz(&archive, &dest).unwrap();

        assert_eq!(summary, ExtractSummary { directories: 2, files: 2, skipped: 0 });
        assert_eq!(fs::read(dest.join("go/bin/go")).unwrap(), b"binary");
        assert_eq!(fs::read_to_string(dest.join("go/VERSION")).unwrap(), "go1.22.1\n");
    }

    #[test]
    fn files_without_directory_entries_get_parents() {
        let tmp = tempfile::tempdir().unwrap();
        let archive = write_archive(tmp.path(), &[TarEntry::file("go/src/deep/file.go", b"package deep")]);
        let dest = tmp.path().join("out");

        extract_tar_gz(&archive, &dest).unwrap();

        assert!(dest.join("go/src/deep/file.go").is_file());
    }

    #[cfg(unix)]
    #[test]
    fn every_file_becomes_executable() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::tempdir().unwrap();
        let archive = write_archive(tmp.path(), &[TarEntry::file("go/README.md", b"docs")]);
        let dest = tmp.path().join("out");

        extract_tar_gz(&archive, &dest).unwrap();

        let mode = fs::metadata(dest.join("go/README.md")).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o755);
    }

    #[test]
    fn escaping_entries_are_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let archive = write_archive(tmp.path(), &[TarEntry::unchecked_file("../escape", b"x")]);
        let dest = tmp.path().join("out");

        let err = extract_tar_gz(&archive, &dest).unwrap_err();

        assert!(matches!(err, GodevError::Decode { .. }), "{err:?}");
        assert!(!tmp.path().join("escape").exists());
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("broken.tar.gz");
        fs::write(&path, b"definitely not gzip").unwrap();

        let err = extract_tar_gz(&path, &tmp.path().join("out")).unwrap_err();

        assert!(matches!(err, GodevError::Decode { .. }), "{err:?}");
    }

    #[test]
    fn contained_join_rules() {
        let dest = Path::new("/srv/golang/v1");
        assert_eq!(contained_join(dest, Path::new("./go/bin")), Some(dest.join("go/bin")));
        assert_eq!(contained_join(dest, Path::new("go/../../x")), None);
        assert_eq!(contained_join(dest, Path::new("/etc/passwd")), None);
    }
}
