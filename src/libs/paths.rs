// Resolves every location `godev` reads or writes.
//
// Layout under the user's home directory (work directory `go_dev` by default):
//
//   ~/.go_dev                 environment file sourced by the shell profile
//   ~/go_dev/gopath           GOPATH (package-path root)
//   ~/go_dev/golang/<name>    one directory per installed toolchain (install root)
//   ~/go_dev/install          staging area for downloads in progress

use colored::Colorize;
use std::path::{Path, PathBuf};

use crate::libs::errors::{GodevError, Result};
use crate::log_debug;

/// Work directory name used when none is given on the command line.
pub const DEFAULT_WORK_DIR: &str = "go_dev";
/// Package-path root, exported as GOPATH.
pub const GOPATH_DIR_NAME: &str = "gopath";
/// Install root holding one subdirectory per toolchain version.
pub const GOROOT_DIR_NAME: &str = "golang";
/// Staging directory for archives being downloaded.
pub const STAGING_DIR_NAME: &str = "install";
/// Directory inside an unpacked release that is the actual GOROOT.
pub const TOOLCHAIN_SUBDIR: &str = "go";

/// All paths derived from the home directory and the work directory name.
///
/// Build it once at startup with [`WorkspaceLayout::resolve`] and hand references to the
/// components that need it.
#[derive(Debug, Clone)]
pub struct WorkspaceLayout {
    home: PathBuf,
    work_dir_name: String,
    profile_file: PathBuf,
}

impl WorkspaceLayout {
    /// Resolves the layout for the current user.
    ///
    /// # Arguments
    /// * `work_dir`: optional override of the work directory name (`--work-dir` / `GODEV_WORK_DIR`).
    ///
    /// # Returns
    /// * `Err(GodevError::NotConfigured)` when the home directory cannot be determined.
    pub fn resolve(work_dir: Option<&str>) -> Result<Self> {
        let home = dirs::home_dir().ok_or_else(|| {
            GodevError::NotConfigured("could not determine the user's home directory".to_string())
        })?;
        let profile_file = detect_shell_profile(&home, std::env::var("SHELL").ok().as_deref());
        let layout = Self::new(home, work_dir.unwrap_or(DEFAULT_WORK_DIR), profile_file);

        log_debug!(
            "[Paths] Work root: {}, env file: {}, profile: {}",
            layout.work_root().display().to_string().cyan(),
            layout.env_file().display().to_string().cyan(),
            layout.profile_file().display().to_string().cyan()
        );
        Ok(layout)
    }

    /// Explicit constructor. Leading slashes in `work_dir_name` are ignored so `/go_dev`
    /// and `go_dev` name the same directory; an empty name falls back to the default.
    pub fn new(home: impl Into<PathBuf>, work_dir_name: &str, profile_file: impl Into<PathBuf>) -> Self {
        let trimmed = work_dir_name.trim().trim_start_matches('/');
        let work_dir_name = if trimmed.is_empty() {
            DEFAULT_WORK_DIR.to_string()
        } else {
            trimmed.to_string()
        };
        WorkspaceLayout {
            home: home.into(),
            work_dir_name,
            profile_file: profile_file.into(),
        }
    }

    pub fn work_root(&self) -> PathBuf {
        self.home.join(&self.work_dir_name)
    }

    pub fn gopath_dir(&self) -> PathBuf {
        self.work_root().join(GOPATH_DIR_NAME)
    }

    pub fn install_root(&self) -> PathBuf {
        self.work_root().join(GOROOT_DIR_NAME)
    }

    pub fn staging_dir(&self) -> PathBuf {
        self.work_root().join(STAGING_DIR_NAME)
    }

    /// Name of the environment file, relative to the home directory (e.g. `.go_dev`).
    pub fn env_file_name(&self) -> String {
        format!(".{}", self.work_dir_name)
    }

    pub fn env_file(&self) -> PathBuf {
        self.home.join(self.env_file_name())
    }

    pub fn profile_file(&self) -> &Path {
        &self.profile_file
    }

    /// Directory of an installed version: `<install root>/<name>`.
    pub fn version_dir(&self, name: &str) -> PathBuf {
        self.install_root().join(name)
    }

    /// GOROOT of an installed version: `<install root>/<name>/go`.
    pub fn toolchain_root(&self, name: &str) -> PathBuf {
        self.version_dir(name).join(TOOLCHAIN_SUBDIR)
    }

    /// The line the shell profile needs so that every login shell sources the env file.
    pub fn profile_hook_line(&self) -> String {
        let name = self.env_file_name();
        format!("[[ -s ~/{name} ]] && source ~/{name}")
    }
}

/// Picks the login profile for the user's shell: `~/.zshrc` for zsh, `~/.bash_profile` otherwise.
pub fn detect_shell_profile(home: &Path, shell: Option<&str>) -> PathBuf {
    match shell {
        Some(s) if s.trim_end().ends_with("zsh") => home.join(".zshrc"),
        _ => home.join(".bash_profile"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_matches_the_documented_tree() {
        let layout = WorkspaceLayout::new("/home/ada", DEFAULT_WORK_DIR, "/home/ada/.bash_profile");
        assert_eq!(layout.work_root(), PathBuf::from("/home/ada/go_dev"));
        assert_eq!(layout.gopath_dir(), PathBuf::from("/home/ada/go_dev/gopath"));
        assert_eq!(layout.install_root(), PathBuf::from("/home/ada/go_dev/golang"));
        assert_eq!(layout.staging_dir(), PathBuf::from("/home/ada/go_dev/install"));
        assert_eq!(layout.env_file(), PathBuf::from("/home/ada/.go_dev"));
        assert_eq!(
            layout.toolchain_root("go1.22.1.linux-amd64"),
            PathBuf::from("/home/ada/go_dev/golang/go1.22.1.linux-amd64/go")
        );
    }

    #[test]
    fn leading_slash_and_empty_override_are_normalized() {
        let slashed = WorkspaceLayout::new("/h", "/toolchains", "/h/.bash_profile");
        assert_eq!(slashed.work_root(), PathBuf::from("/h/toolchains"));
        assert_eq!(slashed.env_file(), PathBuf::from("/h/.toolchains"));

        let empty = WorkspaceLayout::new("/h", "  ", "/h/.bash_profile");
        assert_eq!(empty.work_root(), PathBuf::from("/h/go_dev"));
    }

    #[test]
    fn hook_line_sources_the_env_file() {
        let layout = WorkspaceLayout::new("/h", DEFAULT_WORK_DIR, "/h/.bash_profile");
        assert_eq!(layout.profile_hook_line(), "[[ -s ~/.go_dev ]] && source ~/.go_dev");
    }

    #[test]
    fn profile_follows_the_login_shell() {
        let home = Path::new("/h");
        assert_eq!(detect_shell_profile(home, Some("/bin/zsh")), PathBuf::from("/h/.zshrc"));
        assert_eq!(detect_shell_profile(home, Some("/bin/bash")), PathBuf::from("/h/.bash_profile"));
        assert_eq!(detect_shell_profile(home, None), PathBuf::from("/h/.bash_profile"));
    }
}
