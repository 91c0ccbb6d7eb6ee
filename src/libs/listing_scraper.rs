//! # Download page scraper
//!
//! Fallback catalog source: parses the human-facing listing at `https://go.dev/dl/`.
//! The page groups files per version inside `div.toggleVisible` (featured releases) and
//! `div.toggle` (archived and unstable releases) blocks whose `id` is the version:
//!
//! ```html
//! <div class="toggle" id="go1.21.7">
//!   <table class="downloadtable">
//!     <tr class="first"><th>File name</th><th>Kind</th><th>OS</th><th>Arch</th>...</tr>
//!     <tr><td class="filename"><a href="...">go1.21.7.linux-amd64.tar.gz</a></td>
//!         <td>Archive</td><td>Linux</td><td>x86-64</td>...</tr>
//!   </table>
//! </div>
//! ```
//!
//! Both block kinds are walked in one pass in document order. Markup drift is tolerated:
//! a block whose rows cannot be read still yields its version with no files.

use colored::Colorize;
use scraper::{ElementRef, Html, Selector};

use crate::libs::catalog::dedupe_releases;
use crate::libs::errors::{GodevError, Result};
use crate::log_debug;
use crate::schemas::releases::{Release, ReleaseFile};

/// Row classes that mark header and "show more ports" rows rather than files.
const SKIPPED_ROW_CLASSES: [&str; 2] = ["first", "js-togglePorts"];

struct ListingSelectors {
    section: Selector,
    row: Selector,
    filename: Selector,
    cell: Selector,
}

impl ListingSelectors {
    fn new() -> Result<Self> {
        let parse = |css: &str| {
            Selector::parse(css).map_err(|e| GodevError::decode("listing selector", format!("{css}: {e:?}")))
        };
        Ok(ListingSelectors {
            section: parse("div.toggleVisible, div.toggle")?,
            row: parse(".downloadtable tr")?,
            filename: parse(".filename a")?,
            cell: parse("td")?,
        })
    }
}

/// Parses the listing page into releases, one per distinct version block.
pub fn parse_listing(html: &str) -> Result<Vec<Release>> {
    let document = Html::parse_document(html);
    let selectors = ListingSelectors::new()?;

    let mut releases = Vec::new();
    for section in document.select(&selectors.section) {
        let Some(version) = section.value().attr("id").map(str::trim) else {
            continue;
        };
        if !is_version_id(version) {
            log_debug!("[Scraper] Skipping non-version block '{}'", version.dimmed());
            continue;
        }

        let files = parse_section(section, version, &selectors);
        log_debug!("[Scraper] {} -> {} file(s)", version.cyan(), files.len());
        releases.push(Release {
            version: version.to_string(),
            stable: is_stable(version),
            files,
        });
    }

    Ok(dedupe_releases(releases))
}

fn parse_section(section: ElementRef<'_>, version: &str, selectors: &ListingSelectors) -> Vec<ReleaseFile> {
    let mut files = Vec::new();
    for row in section.select(&selectors.row) {
        if row
            .value()
            .classes()
            .any(|class| SKIPPED_ROW_CLASSES.contains(&class))
        {
            continue;
        }

        let filename = row
            .select(&selectors.filename)
            .next()
            .map(element_text)
            .unwrap_or_default();
        if filename.is_empty() {
            continue;
        }

        let cells: Vec<String> = row.select(&selectors.cell).map(element_text).collect();
        let cell = |idx: usize| cells.get(idx).cloned().unwrap_or_default();
        let os = cell(2);
        if os.is_empty() {
            continue;
        }

        files.push(ReleaseFile {
            filename,
            kind: cell(1),
            os,
            arch: cell(3),
            version: version.to_string(),
            sha256: None,
            size: None,
        });
    }
    files
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Version block ids look like `go1.22.1`, `go1.23rc2`; container blocks (`archive`,
/// `unstable`) do not.
pub fn is_version_id(id: &str) -> bool {
    id.strip_prefix("go")
        .and_then(|rest| rest.chars().next())
        .is_some_and(|c| c.is_ascii_digit())
}

/// Stable releases carry the `go1` prefix and no pre-release marker.
pub fn is_stable(version: &str) -> bool {
    version.starts_with("go1") && !version.contains("rc") && !version.contains("beta")
}
