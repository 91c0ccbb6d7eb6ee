// Prints the downloadable toolchain archives for one OS/architecture pair,
// grouped by release and in catalog order (newest first).

use anyhow::{Context, Result, bail};
use colored::Colorize;

use crate::libs::catalog::{Catalog, CatalogSources, FetchStrategy};
use crate::libs::selection::SelectionIndex;
use crate::schemas::releases::{Release, ReleaseFile};
use crate::{log_debug, log_info};

/// Fetches the catalog and indexes its archives.
///
/// # Arguments
/// * `strategy`: which upstream source to read.
/// * `include_unstable`: keep release candidates and betas.
pub(crate) fn load_index(strategy: FetchStrategy, include_unstable: bool) -> Result<SelectionIndex> {
    let catalog = Catalog::new(CatalogSources::default());
    let releases = catalog
        .releases(strategy)
        .context("could not load the Go release catalog")?;
    let wanted: Vec<Release> = releases
        .iter()
        .filter(|release| include_unstable || release.stable)
        .cloned()
        .collect();
    let index = SelectionIndex::build(&wanted);
    log_debug!(
        "[Available] {} of {} release(s) kept (unstable included: {}), {} archive(s) indexed",
        wanted.len(),
        releases.len(),
        include_unstable,
        index.len()
    );
    Ok(index)
}

/// Maps optional `--os` / `--arch` values onto catalog labels, defaulting to the host.
pub(crate) fn resolve_platform(
    index: &SelectionIndex,
    os: Option<&str>,
    arch: Option<&str>,
) -> Result<(String, String)> {
    let os = match os {
        Some(wanted) => index.resolve_os(wanted).with_context(|| {
            format!(
                "no archives for OS '{wanted}'; known: {}",
                index.os_names().join(", ")
            )
        })?,
        None => index
            .default_os()
            .context("the release catalog lists no installable archives")?,
    };
    let arch = match arch {
        Some(wanted) => index.resolve_arch(&os, wanted).with_context(|| {
            format!(
                "no {os} archives for architecture '{wanted}'; known: {}",
                index.arches(&os).join(", ")
            )
        })?,
        None => index
            .default_arch(&os)
            .with_context(|| format!("no architectures listed for {os}"))?,
    };
    Ok((os, arch))
}

/// Groups files by version while keeping their order.
fn group_by_version(files: &[ReleaseFile]) -> Vec<(&str, Vec<&ReleaseFile>)> {
    let mut groups: Vec<(&str, Vec<&ReleaseFile>)> = Vec::new();
    for file in files {
        match groups.last_mut() {
            Some((version, members)) if *version == file.version => members.push(file),
            _ => groups.push((file.version.as_str(), vec![file])),
        }
    }
    groups
}

fn describe_size(size: Option<u64>) -> String {
    match size {
        Some(bytes) => format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0)),
        None => String::new(),
    }
}

/// Short digest tag so a download can be checked by hand against `sha256sum`.
fn describe_digest(sha256: Option<&str>) -> String {
    match sha256.map(str::trim).filter(|d| !d.is_empty()) {
        Some(digest) => format!("sha256:{}", digest.get(..12).unwrap_or(digest)),
        None => String::new(),
    }
}

/// Entry point for `godev available`.
pub fn run(
    all: bool,
    strategy: FetchStrategy,
    os: Option<String>,
    arch: Option<String>,
    unstable: bool,
) -> Result<()> {
    let strategy = if all { FetchStrategy::Scraped } else { strategy };
    let index = load_index(strategy, unstable)?;
    if index.is_empty() {
        bail!("the release catalog lists no installable archives");
    }
    let (os, arch) = resolve_platform(&index, os.as_deref(), arch.as_deref())?;

    let files = index.files(&os, &arch);
    log_info!(
        "[Available] {} archive(s) for {} / {}",
        files.len().to_string().bold(),
        os.cyan(),
        arch.cyan()
    );

    for (version, members) in group_by_version(files) {
        println!("{}", version.bold());
        for file in members {
            println!(
                "  {:<44} {:>9}  {}",
                file.filename,
                describe_size(file.size).dimmed(),
                describe_digest(file.sha256.as_deref()).dimmed()
            );
        }
    }
    Ok(())
}
