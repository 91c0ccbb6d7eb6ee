//! # Installer
//!
//! Turns a [`ReleaseFile`] into an installed toolchain directory:
//!
//! 1. download `https://dl.google.com/go/<filename>` into the staging directory,
//! 2. unpack it into `<install root>/<filename without .tar.gz>`,
//! 3. delete the staged archive.
//!
//! A failure leaves whatever was already written in place; a later install into the same
//! directory overwrites or merges with it.
//!
//! Installs are slow (network plus decompression), so [`Installer::spawn_install`] runs one on
//! a worker thread and hands back an [`InstallHandle`]. Two installs into the same directory
//! are never allowed to overlap.

use colored::Colorize;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;

use crate::libs::catalog::http_agent;
use crate::libs::errors::{GodevError, Result};
use crate::libs::paths::WorkspaceLayout;
use crate::libs::utilities::assets::download_file;
use crate::libs::utilities::compression::extract_tar_gz;
use crate::schemas::releases::ReleaseFile;
use crate::{log_debug, log_info, log_warn};

pub const DOWNLOAD_BASE_URL: &str = "https://dl.google.com/go/";

/// Archive suffixes the installer can unpack; stripping one yields the install directory name.
const ARCHIVE_SUFFIXES: [&str; 2] = [".tar.gz", ".tgz"];

/// Name of the directory a release file is unpacked into: the filename minus its archive
/// suffix, verbatim (`go1.22.1.linux-amd64.tar.gz` -> `go1.22.1.linux-amd64`).
///
/// Files that are not gzip tarballs (`.zip`, `.msi`, `.pkg`) are refused.
pub fn install_dir_name(filename: &str) -> Result<String> {
    if filename.is_empty() {
        return Err(GodevError::UserInput("no release file selected".to_string()));
    }
    if filename.contains(['/', '\\']) || filename.starts_with('.') {
        return Err(GodevError::UserInput(format!(
            "'{filename}' is not a plain release file name"
        )));
    }

    ARCHIVE_SUFFIXES
        .iter()
        .find_map(|suffix| filename.strip_suffix(suffix))
        .filter(|stem| !stem.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            GodevError::UserInput(format!(
                "'{filename}' is not a .tar.gz archive; only gzip tarballs can be installed"
            ))
        })
}

/// Marks a destination directory as busy until dropped.
struct InFlightGuard {
    busy: Arc<Mutex<HashSet<PathBuf>>>,
    dir: PathBuf,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.busy
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.dir);
    }
}

/// Downloads and unpacks release files. Cheap to clone; clones share the in-flight set.
#[derive(Clone)]
pub struct Installer {
    layout: WorkspaceLayout,
    agent: ureq::Agent,
    base_url: String,
    busy: Arc<Mutex<HashSet<PathBuf>>>,
}

impl Installer {
    pub fn new(layout: WorkspaceLayout) -> Self {
        Installer {
            layout,
            agent: http_agent(),
            base_url: DOWNLOAD_BASE_URL.to_string(),
            busy: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Replaces the download mirror. The filename is appended to `base_url` as-is.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn download_url(&self, filename: &str) -> String {
        format!("{}{}", self.base_url, filename)
    }

    /// Installs `file` and returns the directory it was unpacked into.
    ///
    /// Errors: `UserInput` for files that cannot be installed, `InstallInProgress` when the
    /// same directory is already being written, `Network` / `Io` / `Decode` from the pipeline.
    pub fn install_release(&self, file: &ReleaseFile) -> Result<PathBuf> {
        let dir_name = install_dir_name(&file.filename)?;
        let target_dir = self.layout.version_dir(&dir_name);
        let _guard = self.claim(&target_dir)?;

        let staging = self.layout.staging_dir();
        fs::create_dir_all(&staging).map_err(|e| GodevError::io(&staging, e))?;
        let archive_path = staging.join(&file.filename);

        let url = self.download_url(&file.filename);
        log_info!("[Installer] Downloading {}", url.blue());
        let bytes = download_file(&self.agent, &url, &archive_path)?;
        log_debug!("[Installer] Downloaded {} byte(s) to {}", bytes, archive_path.display());

        log_info!(
            "[Installer] Extracting into {}",
            target_dir.display().to_string().cyan()
        );
        let summary = extract_tar_gz(&archive_path, &target_dir)?;
        log_debug!("[Installer] Extraction summary: {:?}", summary);

        if let Err(err) = fs::remove_file(&archive_path) {
            log_warn!(
                "[Installer] Could not remove staged archive {}: {}",
                archive_path.display().to_string().yellow(),
                err
            );
        }

        log_info!(
            "[Installer] {} installed ({} files)",
            dir_name.green().bold(),
            summary.files
        );
        Ok(target_dir)
    }

    /// Runs [`Installer::install_release`] on a worker thread.
    pub fn spawn_install(&self, file: ReleaseFile) -> InstallHandle {
        let installer = self.clone();
        let filename = file.filename.clone();
        let (sender, receiver) = mpsc::channel();

        thread::spawn(move || {
            let outcome = installer.install_release(&file);
            // The receiver may have been dropped; nobody is waiting for the result then.
            let _ = sender.send(outcome);
        });

        InstallHandle { filename, receiver }
    }

    fn claim(&self, dir: &Path) -> Result<InFlightGuard> {
        let mut busy = self.busy.lock().unwrap_or_else(PoisonError::into_inner);
        if !busy.insert(dir.to_path_buf()) {
            return Err(GodevError::InstallInProgress(dir.to_path_buf()));
        }
        Ok(InFlightGuard {
            busy: Arc::clone(&self.busy),
            dir: dir.to_path_buf(),
        })
    }
}

/// Result channel of a background install.
pub struct InstallHandle {
    filename: String,
    receiver: Receiver<Result<PathBuf>>,
}

impl InstallHandle {
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Blocks until the worker reports.
    pub fn wait(self) -> Result<PathBuf> {
        let filename = self.filename;
        self.receiver
            .recv()
            .unwrap_or_else(|_| Err(worker_lost(&filename)))
    }

    /// Non-blocking poll: `None` while the install is still running.
    pub fn try_result(&self) -> Option<Result<PathBuf>> {
        match self.receiver.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(worker_lost(&self.filename))),
        }
    }
}

fn worker_lost(filename: &str) -> GodevError {
    GodevError::io(
        filename,
        io::Error::other("install worker stopped before reporting a result"),
    )
}
