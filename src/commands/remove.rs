//! # Remove Command Implementation
//!
//! Deletes one installed toolchain directory from the install root. The environment file
//! is left alone: if the removed toolchain was active, GOROOT keeps pointing at the now
//! missing directory until another one is activated, and a warning says so.

use anyhow::{Context, Result};
use colored::Colorize;
use dialoguer::Confirm;
use dialoguer::theme::ColorfulTheme;

use crate::commands::use_version::prompt_installed;
use crate::libs::paths::WorkspaceLayout;
use crate::libs::version_registry::VersionRegistry;
use crate::{log_info, log_warn};

/// Entry point for `godev remove`.
///
/// # Arguments
/// * `layout`: resolved workspace paths.
/// * `name`: installed version directory name; prompted for when `None`.
/// * `assume_yes`: skips the confirmation prompt.
pub fn run(layout: &WorkspaceLayout, name: Option<String>, assume_yes: bool) -> Result<()> {
    let registry = VersionRegistry::new(layout.clone());
    let name = match name {
        Some(name) => name,
        None => prompt_installed(&registry, "Toolchain to remove")?,
    };

    if !assume_yes {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Delete {}?", layout.version_dir(name.trim()).display()))
            .default(false)
            .interact()
            .context("confirmation prompt was not answered")?;
        if !confirmed {
            log_info!("[Remove] Cancelled, nothing deleted.");
            return Ok(());
        }
    }

    let was_active = registry.active_version().ok().flatten().as_deref() == Some(name.trim());
    let removed = registry
        .delete(&name)
        .with_context(|| format!("could not remove '{name}'"))?;
    if !removed {
        log_info!("[Remove] {} was not installed", name.bold());
    }
    if was_active {
        log_warn!(
            "[Remove] {} was the active toolchain; run {} to pick another",
            name.yellow(),
            "godev use".bold()
        );
    }
    Ok(())
}
