//! # Error taxonomy
//!
//! Every core component (catalog, installer, environment store, version registry) reports
//! failures through [`GodevError`]. Command handlers wrap these in `anyhow` with extra context
//! before they reach the user.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors produced by the core operations.
#[derive(Debug, Error)]
pub enum GodevError {
    /// The HTTP request or the body transfer failed.
    #[error("network error while fetching {url}: {message}")]
    Network { url: String, message: String },

    /// A payload could not be understood: malformed catalog JSON, unusable HTML,
    /// a corrupt archive stream or an archive entry that escapes its destination.
    #[error("could not decode {what}: {message}")]
    Decode { what: String, message: String },

    /// A filesystem operation failed.
    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The home directory or the work directory has not been resolved or initialized.
    #[error("not configured: {0}")]
    NotConfigured(String),

    /// An action needed a selection the user did not provide, or the selection is unusable.
    #[error("{0}")]
    UserInput(String),

    /// Another install is already writing into the same version directory.
    #[error("an install into {} is already running", .0.display())]
    InstallInProgress(PathBuf),
}

/// Shorthand used across the core modules.
pub type Result<T> = std::result::Result<T, GodevError>;

impl GodevError {
    /// Builds an `Io` variant tagged with the path that was being touched.
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        GodevError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn network(url: impl Into<String>, message: impl ToString) -> Self {
        GodevError::Network {
            url: url.into(),
            message: message.to_string(),
        }
    }

    pub fn decode(what: impl Into<String>, message: impl ToString) -> Self {
        GodevError::Decode {
            what: what.into(),
            message: message.to_string(),
        }
    }
}
