// `godev install`: picks a release archive (by name or through prompts) and installs it
// on a worker thread while an indicatif spinner runs in the foreground.

use anyhow::{Context, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::thread;
use std::time::Duration;

use crate::commands::available::{load_index, resolve_platform};
use crate::commands::select_one;
use crate::libs::catalog::FetchStrategy;
use crate::libs::errors::GodevError;
use crate::libs::installer::Installer;
use crate::libs::paths::WorkspaceLayout;
use crate::libs::selection::SelectionIndex;
use crate::schemas::releases::ReleaseFile;
use crate::{log_debug, log_info};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Walks the OS -> architecture -> file cascade. Flags given on the command line skip
/// their prompt.
fn prompt_for_file(index: &SelectionIndex, os: Option<&str>, arch: Option<&str>) -> Result<ReleaseFile> {
    if index.is_empty() {
        return Err(GodevError::UserInput("the release catalog lists no installable archives".to_string()).into());
    }
    let os = match os {
        Some(_) => resolve_platform(index, os, None)?.0,
        None => {
            let names = index.os_names();
            names[select_one("Operating system", &names, 0)?].clone()
        }
    };

    let arch = match arch {
        Some(_) => resolve_platform(index, Some(&os), arch)?.1,
        None => {
            let arches = index.arches(&os);
            let default = index
                .default_arch(&os)
                .and_then(|d| arches.iter().position(|a| *a == d))
                .unwrap_or(0);
            arches[select_one("Architecture", &arches, default)?].clone()
        }
    };

    let files = index.files(&os, &arch);
    let labels: Vec<String> = files
        .iter()
        .map(|f| format!("{:<12} {}", f.version, f.filename))
        .collect();
    if labels.is_empty() {
        return Err(GodevError::UserInput(format!("no archives listed for {os} / {arch}")).into());
    }
    Ok(files[select_one("Release archive", &labels, 0)?].clone())
}

/// Spinner on stderr while the worker runs. Hidden automatically when stderr is not a terminal.
fn install_spinner(filename: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_draw_target(ProgressDrawTarget::stderr());
    let style = ProgressStyle::with_template("{spinner:.cyan.bold} {msg} {elapsed}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    spinner.set_style(style.tick_strings(&["-", "\\", "|", "/", "-"]));
    spinner.set_message(format!("Installing {filename}"));
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// Mirrors are given as plain URLs; the filename is appended after a single `/`.
fn mirror_base(mirror: &str) -> String {
    format!("{}/", mirror.trim().trim_end_matches('/'))
}

/// Entry point for `godev install`.
pub fn run(
    layout: &WorkspaceLayout,
    filename: Option<String>,
    os: Option<String>,
    arch: Option<String>,
    strategy: FetchStrategy,
    mirror: Option<String>,
) -> Result<()> {
    let index = load_index(strategy, true)?;

    let file = match filename.as_deref() {
        Some(name) => index.find(name).cloned().ok_or_else(|| {
            GodevError::UserInput(format!(
                "'{name}' is not an installable archive in the release catalog"
            ))
        })?,
        None => prompt_for_file(&index, os.as_deref(), arch.as_deref())?,
    };
    log_debug!("[Install] Selected {:?}", file);

    let mut installer = Installer::new(layout.clone());
    if let Some(mirror) = mirror {
        installer = installer.with_base_url(mirror_base(&mirror));
    }
    let handle = installer.spawn_install(file);
    log_info!("[Install] Installing {}", handle.filename().bold());

    let filename = handle.filename().to_string();
    let spinner = install_spinner(&filename);
    let outcome = loop {
        if let Some(outcome) = handle.try_result() {
            break outcome;
        }
        thread::sleep(POLL_INTERVAL);
    };
    match &outcome {
        Ok(_) => spinner.finish_and_clear(),
        Err(_) => spinner.abandon_with_message(format!("{filename} failed")),
    }

    let dir = outcome.with_context(|| format!("installing {filename} failed"))?;
    let name = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    log_info!(
        "[Install] Done. Activate it with {}",
        format!("godev use {name}").bold()
    );
    Ok(())
}
