//! # Environment store
//!
//! Owns the shell-sourced environment file (`~/.go_dev` by default). The file declares three
//! managed variables, one `export` line each:
//!
//! ```text
//! export GOPATH=/home/ada/go_dev/gopath
//! export GOROOT=/home/ada/go_dev/golang/go1.22.1.linux-amd64/go
//! export PATH=$PATH:$GOPATH/bin:$GOROOT/bin
//! ```
//!
//! Any other line is opaque and preserved verbatim. Managed lines are matched by prefix and
//! at most one line per prefix is ever written; updates replace the line where it stands.
//!
//! The store also performs first-run initialization: the managed directories, the env file
//! itself and the hook line in the user's shell profile.

use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::libs::errors::{GodevError, Result};
use crate::libs::paths::WorkspaceLayout;
use crate::libs::utilities::file_operations::{append_line, contains_line, read_lines, write_lines};
use crate::{log_debug, log_info, log_warn};

pub const EXPORT_GOPATH: &str = "export GOPATH=";
pub const EXPORT_GOROOT: &str = "export GOROOT=";
pub const EXPORT_PATH: &str = "export PATH=";
/// Value of the PATH line: the toolchain and installed binaries are appended to the user's PATH.
pub const PATH_APPEND: &str = "$PATH:$GOPATH/bin:$GOROOT/bin";

/// How [`EnvStore::upsert_variable`] treats an existing line with the same prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertMode {
    /// Keep an existing line untouched; only add when missing. Used at initialization.
    AddOnly,
    /// Replace the existing line's value, or add the line when missing. Used on activation.
    UpdateOrAdd,
}

/// What an upsert did to the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Unchanged,
    Added,
    Updated,
}

/// Result of one best-effort initialization pass.
#[derive(Debug, Default)]
pub struct InitReport {
    /// Human-readable description of every change made.
    pub changes: Vec<String>,
    /// Steps that failed, with their error. Later steps still ran.
    pub failures: Vec<(String, GodevError)>,
}

impl InitReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    fn record(&mut self, step: &str, result: Result<Option<String>>) {
        match result {
            Ok(Some(change)) => {
                log_debug!("[EnvStore] {}", change);
                self.changes.push(change);
            }
            Ok(None) => {}
            Err(err) => {
                log_warn!("[EnvStore] Initialization step '{}' failed: {}", step.yellow(), err);
                self.failures.push((step.to_string(), err));
            }
        }
    }
}

/// Handle on the environment file.
#[derive(Debug, Clone)]
pub struct EnvStore {
    path: PathBuf,
}

impl EnvStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        EnvStore { path: path.into() }
    }

    /// Store for the env file of the given layout.
    pub fn for_layout(layout: &WorkspaceLayout) -> Self {
        Self::new(layout.env_file())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the env file empty if it does not exist. Returns `true` when it was created.
    pub fn ensure_exists(&self) -> Result<bool> {
        if self.path.exists() {
            return Ok(false);
        }
        fs::write(&self.path, "").map_err(|e| GodevError::io(&self.path, e))?;
        Ok(true)
    }

    /// Inserts or updates the line starting with `prefix` so that it reads `prefix + value`.
    ///
    /// The file is rewritten only when its content actually changes, so applying the same
    /// `(prefix, value)` twice leaves the file byte-identical.
    pub fn upsert_variable(&self, prefix: &str, value: &str, mode: UpsertMode) -> Result<UpsertOutcome> {
        let mut lines = read_lines(&self.path)?;
        let outcome = upsert_line(&mut lines, prefix, value, mode);
        if outcome != UpsertOutcome::Unchanged {
            write_lines(&self.path, &lines)?;
            log_debug!(
                "[EnvStore] {:?} '{}{}' in {}",
                outcome,
                prefix,
                value,
                self.path.display()
            );
        }
        Ok(outcome)
    }

    /// Value of the first line starting with `prefix`, if any.
    pub fn variable(&self, prefix: &str) -> Result<Option<String>> {
        Ok(read_lines(&self.path)?
            .iter()
            .find_map(|line| line.trim_start().strip_prefix(prefix).map(|v| v.trim().to_string())))
    }

    /// First-run setup, safe to repeat on every start.
    ///
    /// 1. Creates the package-path root, the install root and the staging directory.
    /// 2. Creates the env file if absent.
    /// 3. Adds GOPATH, GOROOT and PATH lines unless already present.
    /// 4. Appends the source hook to the shell profile unless an identical line exists.
    ///
    /// Every step runs even if an earlier one failed; failures are logged and collected.
    pub fn ensure_initialized(&self, layout: &WorkspaceLayout) -> InitReport {
        let mut report = InitReport::default();

        for dir in [layout.gopath_dir(), layout.install_root(), layout.staging_dir()] {
            report.record("create directory", ensure_dir(&dir));
        }

        report.record(
            "create env file",
            self.ensure_exists()
                .map(|created| created.then(|| format!("Created {}", self.path.display()))),
        );

        let defaults = [
            (EXPORT_GOPATH, layout.gopath_dir().display().to_string()),
            (EXPORT_GOROOT, layout.install_root().display().to_string()),
            (EXPORT_PATH, PATH_APPEND.to_string()),
        ];
        for (prefix, value) in defaults {
            let result = self
                .upsert_variable(prefix, &value, UpsertMode::AddOnly)
                .map(|outcome| (outcome == UpsertOutcome::Added).then(|| format!("Added '{prefix}{value}'")));
            report.record("declare variable", result);
        }

        report.record(
            "install profile hook",
            ensure_profile_hook(layout.profile_file(), &layout.profile_hook_line()).map(|added| {
                added.then(|| format!("Hooked {} into {}", layout.env_file_name(), layout.profile_file().display()))
            }),
        );

        if !report.changes.is_empty() {
            log_info!(
                "[EnvStore] Initialized {} ({} change(s))",
                layout.work_root().display().to_string().cyan(),
                report.changes.len()
            );
        }
        report
    }
}

/// Applies an upsert to an in-memory line list. Only the first line carrying `prefix`
/// (ignoring leading whitespace) is considered.
pub fn upsert_line(lines: &mut Vec<String>, prefix: &str, value: &str, mode: UpsertMode) -> UpsertOutcome {
    let wanted = format!("{prefix}{value}");
    match lines.iter().position(|line| line.trim_start().starts_with(prefix)) {
        Some(_) if mode == UpsertMode::AddOnly => UpsertOutcome::Unchanged,
        Some(idx) if lines[idx] == wanted => UpsertOutcome::Unchanged,
        Some(idx) => {
            lines[idx] = wanted;
            UpsertOutcome::Updated
        }
        None => {
            lines.push(wanted);
            UpsertOutcome::Added
        }
    }
}

/// Appends `hook` to the profile at most once. Returns `true` when the line was added.
pub fn ensure_profile_hook(profile: &Path, hook: &str) -> Result<bool> {
    if contains_line(profile, hook)? {
        log_debug!("[EnvStore] {} already sources the env file", profile.display());
        return Ok(false);
    }
    append_line(profile, hook)?;
    Ok(true)
}

fn ensure_dir(dir: &Path) -> Result<Option<String>> {
    if dir.is_dir() {
        return Ok(None);
    }
    fs::create_dir_all(dir).map_err(|e| GodevError::io(dir, e))?;
    Ok(Some(format!("Created directory {}", dir.display())))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    fn layout_in(home: &Path) -> WorkspaceLayout {
        WorkspaceLayout::new(home, "go_dev", home.join(".bash_profile"))
    }

    #[test]
    fn add_only_never_touches_existing_line() {
        let mut content = lines(&["export GOROOT=/old"]);
        assert_eq!(
            upsert_line(&mut content, EXPORT_GOROOT, "/new", UpsertMode::AddOnly),
            UpsertOutcome::Unchanged
        );
        assert_eq!(content, lines(&["export GOROOT=/old"]));
    }

    #[test]
    fn update_replaces_in_place_and_keeps_other_lines_in_order() {
        let mut content = lines(&["# managed by godev", "export GOROOT=/a", "alias gg='go get'"]);
        upsert_line(&mut content, EXPORT_GOROOT, "/b", UpsertMode::UpdateOrAdd);
        assert_eq!(
            content,
            lines(&["# managed by godev", "export GOROOT=/b", "alias gg='go get'"])
        );
    }

    #[test]
    fn update_appends_when_prefix_missing() {
        let mut content = lines(&["alias gg='go get'"]);
        let outcome = upsert_line(&mut content, EXPORT_GOPATH, "/gp", UpsertMode::UpdateOrAdd);
        assert_eq!(outcome, UpsertOutcome::Added);
        assert_eq!(content, lines(&["alias gg='go get'", "export GOPATH=/gp"]));
    }

    #[test]
    fn repeated_update_is_idempotent_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = EnvStore::new(dir.path().join(".go_dev"));
        fs::write(store.path(), "# keep me\nexport PATH=$PATH\n").unwrap();

        store.upsert_variable(EXPORT_GOROOT, "/v1/go", UpsertMode::UpdateOrAdd).unwrap();
        let once = fs::read_to_string(store.path()).unwrap();
        let outcome = store.upsert_variable(EXPORT_GOROOT, "/v1/go", UpsertMode::UpdateOrAdd).unwrap();
        let twice = fs::read_to_string(store.path()).unwrap();

        assert_eq!(outcome, UpsertOutcome::Unchanged);
        assert_eq!(once, twice);
    }

    #[test]
    fn second_value_wins_with_a_single_line() {
        let dir = tempfile::tempdir().unwrap();
        let store = EnvStore::new(dir.path().join(".go_dev"));
        fs::write(store.path(), "first\nexport GOROOT=/v1/go\nlast\n").unwrap();

        store.upsert_variable(EXPORT_GOROOT, "/v2/go", UpsertMode::UpdateOrAdd).unwrap();

        let content = fs::read_to_string(store.path()).unwrap();
        assert_eq!(content, "first\nexport GOROOT=/v2/go\nlast\n");
        assert_eq!(content.matches(EXPORT_GOROOT).count(), 1);
        assert_eq!(store.variable(EXPORT_GOROOT).unwrap().as_deref(), Some("/v2/go"));
    }

    #[test]
    fn initialization_is_idempotent() {
        let home = tempfile::tempdir().unwrap();
        let layout = layout_in(home.path());
        let store = EnvStore::for_layout(&layout);

        let first = store.ensure_initialized(&layout);
        assert!(first.is_clean(), "{:?}", first.failures);
        assert!(!first.changes.is_empty());

        let second = store.ensure_initialized(&layout);
        assert!(second.is_clean());
        assert!(second.changes.is_empty());

        assert!(layout.gopath_dir().is_dir());
        assert!(layout.install_root().is_dir());
        assert!(layout.staging_dir().is_dir());

        let env = fs::read_to_string(layout.env_file()).unwrap();
        assert_eq!(env.lines().count(), 3);
        assert!(env.contains(&format!("{EXPORT_PATH}{PATH_APPEND}")));

        let profile = fs::read_to_string(layout.profile_file()).unwrap();
        assert_eq!(profile.matches(&layout.profile_hook_line()).count(), 1);
    }

    #[test]
    fn existing_profile_keeps_its_content() {
        let home = tempfile::tempdir().unwrap();
        let layout = layout_in(home.path());
        fs::write(layout.profile_file(), "export EDITOR=vim\n").unwrap();

        assert!(ensure_profile_hook(layout.profile_file(), &layout.profile_hook_line()).unwrap());
        assert!(!ensure_profile_hook(layout.profile_file(), &layout.profile_hook_line()).unwrap());

        let profile = fs::read_to_string(layout.profile_file()).unwrap();
        assert!(profile.starts_with("export EDITOR=vim\n"));
        assert!(profile.ends_with("[[ -s ~/.go_dev ]] && source ~/.go_dev\n"));
    }

    #[test]
    fn non_utf8_profile_still_gets_the_hook() {
        let home = tempfile::tempdir().unwrap();
        let layout = layout_in(home.path());
        fs::write(layout.profile_file(), b"# caf\xe9\nexport EDITOR=vim\n").unwrap();

        let report = EnvStore::for_layout(&layout).ensure_initialized(&layout);

        assert!(report.is_clean(), "{:?}", report.failures);
        let profile = fs::read(layout.profile_file()).unwrap();
        assert!(profile.starts_with(b"# caf\xe9\n"));
        assert!(contains_line(layout.profile_file(), &layout.profile_hook_line()).unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_env_file_survives_an_update() {
        let home = tempfile::tempdir().unwrap();
        let real = home.path().join("dotfiles").join("go_dev.env");
        fs::create_dir_all(real.parent().unwrap()).unwrap();
        fs::write(&real, "export GOROOT=/v1/go\n").unwrap();
        let link = home.path().join(".go_dev");
        std::os::unix::fs::symlink(&real, &link).unwrap();

        let store = EnvStore::new(link.clone());
        store.upsert_variable(EXPORT_GOROOT, "/v2/go", UpsertMode::UpdateOrAdd).unwrap();

        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert_eq!(fs::read_to_string(&real).unwrap(), "export GOROOT=/v2/go\n");
    }

    #[test]
    fn failing_step_does_not_stop_the_rest() {
        let home = tempfile::tempdir().unwrap();
        // A regular file where the work root should be makes every directory step fail.
        fs::write(home.path().join("go_dev"), "not a directory").unwrap();
        let layout = layout_in(home.path());
        let store = EnvStore::for_layout(&layout);

        let report = store.ensure_initialized(&layout);

        assert_eq!(report.failures.len(), 3);
        assert!(layout.env_file().is_file());
        assert!(contains_line(layout.profile_file(), &layout.profile_hook_line()).unwrap());
    }
}
