// Register application subcommands.
// Each module corresponds to a specific `godev` command-line action and returns
// `anyhow::Result` so `main` can print the whole error chain.

use anyhow::{Context, Result};
use dialoguer::Select;
use dialoguer::theme::ColorfulTheme;

// Lists downloadable archives for a platform.
pub mod available;
// First-run setup with a per-step report.
pub mod init;
// Downloads and unpacks a toolchain.
pub mod install;
// Lists installed toolchains.
pub mod installed;
// Opens the Go release history.
pub mod notes;
// Deletes an installed toolchain.
pub mod remove;
// Switches GOROOT to an installed toolchain.
pub mod use_version;
// Displays the version of godev.
pub mod version;

/// Shows a single-choice prompt and returns the chosen index.
///
/// # Arguments
/// * `prompt`: question shown above the list.
/// * `items`: entries to choose from; must not be empty.
/// * `default`: index highlighted initially (clamped to the list).
pub(crate) fn select_one(prompt: &str, items: &[String], default: usize) -> Result<usize> {
    Select::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .items(items)
        .default(default.min(items.len().saturating_sub(1)))
        .interact()
        .with_context(|| format!("prompt '{prompt}' was not answered"))
}
