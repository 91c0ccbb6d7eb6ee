// `godev use`: repoints GOROOT at an installed toolchain.

use anyhow::{Context, Result};

use crate::commands::select_one;
use crate::libs::errors::GodevError;
use crate::libs::paths::WorkspaceLayout;
use crate::libs::version_registry::VersionRegistry;

/// Asks for one of the installed versions. Shared with `remove`.
pub(crate) fn prompt_installed(registry: &VersionRegistry, prompt: &str) -> Result<String> {
    let names = registry.list_installed()?;
    if names.is_empty() {
        return Err(GodevError::UserInput("no toolchains are installed".to_string()).into());
    }
    let default = registry
        .active_version()
        .ok()
        .flatten()
        .and_then(|active| names.iter().position(|n| *n == active))
        .unwrap_or(0);
    Ok(names[select_one(prompt, &names, default)?].clone())
}

/// Entry point for `godev use`.
pub fn run(layout: &WorkspaceLayout, name: Option<String>) -> Result<()> {
    let registry = VersionRegistry::new(layout.clone());
    let name = match name {
        Some(name) => name,
        None => prompt_installed(&registry, "Toolchain to activate")?,
    };
    registry
        .activate(&name)
        .with_context(|| format!("could not activate '{name}'"))?;
    Ok(())
}
