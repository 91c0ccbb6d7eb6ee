//! # Installed versions
//!
//! Every subdirectory of the install root is one installed toolchain. Nothing else is
//! recorded about it: listing reads the directory, activation rewrites the GOROOT line of
//! the environment file, deletion removes the directory tree.

use colored::Colorize;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::libs::env_store::{EXPORT_GOROOT, EnvStore, UpsertMode};
use crate::libs::errors::{GodevError, Result};
use crate::libs::paths::{TOOLCHAIN_SUBDIR, WorkspaceLayout};
use crate::{log_debug, log_info, log_warn};

pub struct VersionRegistry {
    layout: WorkspaceLayout,
    env: EnvStore,
}

impl VersionRegistry {
    pub fn new(layout: WorkspaceLayout) -> Self {
        let env = EnvStore::for_layout(&layout);
        VersionRegistry { layout, env }
    }

    /// Names of the installed versions, sorted.
    ///
    /// # Errors
    /// * `NotConfigured` when the install root does not exist (initialization never ran).
    /// * `Io` for any other read failure.
    pub fn list_installed(&self) -> Result<Vec<String>> {
        let root = self.layout.install_root();
        let entries = fs::read_dir(&root).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => GodevError::NotConfigured(format!(
                "install root {} does not exist; run `godev init`",
                root.display()
            )),
            _ => GodevError::io(&root, e),
        })?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| GodevError::io(&root, e))?;
            let is_dir = entry
                .file_type()
                .map_err(|e| GodevError::io(entry.path(), e))?
                .is_dir();
            if is_dir {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        log_debug!("[Registry] {} installed version(s) under {}", names.len(), root.display());
        Ok(names)
    }

    /// Points GOROOT at `<install root>/<name>/go` and returns that path.
    ///
    /// Activation only rewrites the pointer; the directory is not checked for a usable
    /// toolchain.
    pub fn activate(&self, name: &str) -> Result<PathBuf> {
        let name = validate_name(name, "activate")?;
        let goroot = self.layout.toolchain_root(name);
        if !goroot.is_dir() {
            log_warn!(
                "[Registry] {} does not exist yet; activating anyway",
                goroot.display().to_string().yellow()
            );
        }

        self.env
            .upsert_variable(EXPORT_GOROOT, &goroot.display().to_string(), UpsertMode::UpdateOrAdd)?;
        log_info!(
            "[Registry] Activated {} (open a new shell or source {})",
            name.green().bold(),
            self.env.path().display()
        );
        Ok(goroot)
    }

    /// Removes `<install root>/<name>` recursively. Returns `false` when it was already gone.
    pub fn delete(&self, name: &str) -> Result<bool> {
        let name = validate_name(name, "delete")?;
        let dir = self.layout.version_dir(name);

        match fs::remove_dir_all(&dir) {
            Ok(()) => {
                log_info!("[Registry] Deleted {}", dir.display().to_string().red());
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log_debug!("[Registry] {} was already absent", dir.display());
                Ok(false)
            }
            Err(e) => Err(GodevError::io(&dir, e)),
        }
    }

    /// The installed version the env file's GOROOT currently points at, if any.
    pub fn active_version(&self) -> Result<Option<String>> {
        let Some(goroot) = self.env.variable(EXPORT_GOROOT)? else {
            return Ok(None);
        };
        Ok(version_from_goroot(&self.layout.install_root(), Path::new(&goroot)))
    }
}

/// Extracts `<name>` from a GOROOT of the form `<install root>/<name>/go`.
fn version_from_goroot(install_root: &Path, goroot: &Path) -> Option<String> {
    let relative = goroot.strip_prefix(install_root).ok()?;
    let mut components = relative.components();
    match (components.next(), components.next(), components.next()) {
        (Some(Component::Normal(name)), Some(Component::Normal(sub)), None) if sub == TOOLCHAIN_SUBDIR => {
            Some(name.to_string_lossy().into_owned())
        }
        _ => None,
    }
}

/// Rejects an empty selection and anything that is not a single directory name.
fn validate_name<'a>(name: &'a str, action: &str) -> Result<&'a str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(GodevError::UserInput(format!("no version selected to {action}")));
    }
    let mut components = Path::new(trimmed).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(trimmed),
        _ => Err(GodevError::UserInput(format!(
            "'{trimmed}' is not an installed version name"
        ))),
    }
}
