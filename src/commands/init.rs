// `godev init`: runs first-run setup and reports each step.

use anyhow::{Result, bail};
use colored::Colorize;

use crate::libs::env_store::{EnvStore, InitReport};
use crate::libs::paths::WorkspaceLayout;
use crate::{log_error, log_info};

/// Silent variant run before every other command. Failures are already logged as
/// warnings by the store and never stop the command that follows.
pub(crate) fn ensure(layout: &WorkspaceLayout) -> InitReport {
    EnvStore::for_layout(layout).ensure_initialized(layout)
}

/// Entry point for `godev init`.
pub fn run(layout: &WorkspaceLayout) -> Result<()> {
    let report = ensure(layout);

    if report.changes.is_empty() && report.is_clean() {
        log_info!(
            "[Init] {} is already set up",
            layout.work_root().display().to_string().cyan()
        );
    }
    for change in &report.changes {
        println!("  {} {}", "+".green(), change);
    }
    for (step, err) in &report.failures {
        log_error!("[Init] {} failed: {}", step.red(), err);
    }

    if !report.is_clean() {
        bail!("{} initialization step(s) failed", report.failures.len());
    }
    log_info!(
        "[Init] Open a new shell or run {} to pick up the environment",
        format!("source {}", layout.env_file().display()).bold()
    );
    Ok(())
}
