// `godev installed`: lists the toolchains under the install root.

use anyhow::{Context, Result};
use colored::Colorize;

use crate::libs::paths::WorkspaceLayout;
use crate::libs::utilities::binary::is_executable;
use crate::libs::version_registry::VersionRegistry;
use crate::{log_info, log_warn};

/// Whether `<name>/go/bin/go` exists and is executable. Interrupted installs are left in
/// place and show up here without a usable `go` binary.
fn has_go_binary(layout: &WorkspaceLayout, name: &str) -> bool {
    let binary = format!("go{}", std::env::consts::EXE_SUFFIX);
    is_executable(&layout.toolchain_root(name).join("bin").join(binary))
}

/// Entry point for `godev installed`. The active toolchain is marked with `*`.
pub fn run(layout: &WorkspaceLayout) -> Result<()> {
    let registry = VersionRegistry::new(layout.clone());
    let names = registry
        .list_installed()
        .context("could not list installed toolchains")?;

    if names.is_empty() {
        log_info!(
            "[Installed] Nothing installed yet. Try {}",
            "godev install".bold()
        );
        return Ok(());
    }

    let active = registry.active_version().unwrap_or_else(|err| {
        log_warn!("[Installed] Could not read the active version: {}", err);
        None
    });
    for name in &names {
        let note = if has_go_binary(layout, name) {
            String::new()
        } else {
            "(no go binary)".dimmed().to_string()
        };
        if active.as_deref() == Some(name.as_str()) {
            println!("{} {} {}", "*".green().bold(), name.green().bold(), note);
        } else {
            println!("  {name} {note}");
        }
    }
    Ok(())
}
