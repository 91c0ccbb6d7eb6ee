//! # Release catalog schema
//!
//! Shapes of the upstream release catalog, shared by the JSON decoder and the HTML scraper.
//! Field names follow the machine-readable endpoint (`https://go.dev/dl/?mode=json`):
//!
//! ```json
//! [
//!   {
//!     "version": "go1.22.1",
//!     "stable": true,
//!     "files": [
//!       { "filename": "go1.22.1.linux-amd64.tar.gz", "os": "linux", "arch": "amd64",
//!         "version": "go1.22.1", "kind": "archive", "sha256": "...", "size": 68965341 }
//!     ]
//!   }
//! ]
//! ```
//!
//! The HTML listing uses display labels instead (`Linux`, `x86-64`, `Archive`); both
//! spellings flow through the same types and are compared case-insensitively where it matters.

use serde::{Deserialize, Serialize};

/// Broad category of a downloadable file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseKind {
    /// A compressed tree that can be unpacked into an install directory.
    Archive,
    /// A platform installer (`.msi`, `.pkg`).
    Installer,
    /// The source tarball.
    Source,
    Other,
}

impl ReleaseKind {
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "archive" => ReleaseKind::Archive,
            "installer" => ReleaseKind::Installer,
            "source" => ReleaseKind::Source,
            _ => ReleaseKind::Other,
        }
    }
}

/// One downloadable artifact of a release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseFile {
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub os: String,
    #[serde(default)]
    pub arch: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub kind: String,
    /// Published digest, shown shortened by `godev available`; downloads are not verified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

impl ReleaseFile {
    pub fn release_kind(&self) -> ReleaseKind {
        ReleaseKind::from_label(&self.kind)
    }

    pub fn is_archive(&self) -> bool {
        self.release_kind() == ReleaseKind::Archive
    }
}

/// One published version and its files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    pub version: String,
    #[serde(default)]
    pub stable: bool,
    #[serde(default)]
    pub files: Vec<ReleaseFile>,
}

impl Release {
    /// Stamps the release's version onto files that did not carry one, so every file
    /// of a release names the release it belongs to.
    pub fn normalize(mut self) -> Self {
        for file in &mut self.files {
            if file.version.is_empty() {
                file.version = self.version.clone();
            }
        }
        self
    }
}
