//! # Release catalog
//!
//! Answers "which Go versions can be installed?".
//!
//! Two upstream sources are supported:
//!
//! 1. **Structured**: the JSON endpoint `https://go.dev/dl/?mode=json&include=all`.
//! 2. **Scraped**: the HTML download page, parsed by [`crate::libs::listing_scraper`].
//!
//! [`Catalog::releases`] picks a source according to a [`FetchStrategy`], collapses duplicate
//! entries and keeps the result in a [`ReleaseCache`] for the rest of the process.

use colored::Colorize;
use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::sync::{Arc, Mutex, PoisonError};

use crate::libs::errors::{GodevError, Result};
use crate::libs::listing_scraper::parse_listing;
use crate::schemas::releases::Release;
use crate::{log_debug, log_info, log_warn};

pub const CATALOG_JSON_URL: &str = "https://go.dev/dl/?mode=json&include=all";
pub const CATALOG_HTML_URL: &str = "https://go.dev/dl/";

/// Which upstream source(s) to consult.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchStrategy {
    /// JSON first; the HTML page when the JSON fails or lists no archives.
    #[default]
    Auto,
    Structured,
    Scraped,
}

/// Endpoints the catalog talks to.
#[derive(Debug, Clone)]
pub struct CatalogSources {
    pub json_url: String,
    pub html_url: String,
}

impl Default for CatalogSources {
    fn default() -> Self {
        CatalogSources {
            json_url: CATALOG_JSON_URL.to_string(),
            html_url: CATALOG_HTML_URL.to_string(),
        }
    }
}

/// Holds the last successfully fetched catalog for the lifetime of the process.
#[derive(Debug, Default)]
pub struct ReleaseCache {
    slot: Mutex<Option<Arc<Vec<Release>>>>,
}

impl ReleaseCache {
    pub fn get(&self) -> Option<Arc<Vec<Release>>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn store(&self, releases: Vec<Release>) -> Arc<Vec<Release>> {
        let releases = Arc::new(releases);
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&releases));
        releases
    }
}

/// Fetches and caches the upstream release list.
pub struct Catalog {
    agent: ureq::Agent,
    sources: CatalogSources,
    cache: ReleaseCache,
}

impl Catalog {
    pub fn new(sources: CatalogSources) -> Self {
        Catalog {
            agent: http_agent(),
            sources,
            cache: ReleaseCache::default(),
        }
    }

    /// Cached release list, fetching it on first use.
    ///
    /// The cache holds a single catalog regardless of the strategy that produced it.
    pub fn releases(&self, strategy: FetchStrategy) -> Result<Arc<Vec<Release>>> {
        if let Some(cached) = self.cache.get() {
            log_debug!("[Catalog] Using cached catalog ({} releases)", cached.len());
            return Ok(cached);
        }

        let releases = match strategy {
            FetchStrategy::Structured => self.fetch_structured()?,
            FetchStrategy::Scraped => self.fetch_scraped()?,
            FetchStrategy::Auto => match self.fetch_structured() {
                Ok(releases) if has_archives(&releases) => releases,
                Ok(_) => {
                    log_warn!("[Catalog] Structured catalog lists no archives, falling back to the download page");
                    self.fetch_scraped()?
                }
                Err(err) => {
                    log_warn!("[Catalog] Structured catalog unavailable ({}), falling back to the download page", err);
                    self.fetch_scraped()?
                }
            },
        };

        let releases = dedupe_releases(releases);
        log_info!(
            "[Catalog] {} release(s) available upstream",
            releases.len().to_string().bold()
        );
        Ok(self.cache.store(releases))
    }

    /// Downloads and decodes the JSON catalog.
    pub fn fetch_structured(&self) -> Result<Vec<Release>> {
        let body = fetch_text(&self.agent, &self.sources.json_url)?;
        parse_structured(&body)
    }

    /// Downloads and scrapes the HTML download page.
    pub fn fetch_scraped(&self) -> Result<Vec<Release>> {
        let body = fetch_text(&self.agent, &self.sources.html_url)?;
        parse_listing(&body)
    }
}

/// HTTP agent shared by the catalog and the installer.
pub fn http_agent() -> ureq::Agent {
    ureq::AgentBuilder::new()
        .user_agent(concat!("godev/", env!("CARGO_PKG_VERSION")))
        .build()
}

fn fetch_text(agent: &ureq::Agent, url: &str) -> Result<String> {
    log_debug!("[Catalog] GET {}", url.blue());
    let response = agent.get(url).call().map_err(|e| GodevError::network(url, e))?;

    // `into_string` caps bodies at 10 MB; the full JSON history is close to that.
    let mut body = String::new();
    response
        .into_reader()
        .read_to_string(&mut body)
        .map_err(|e| GodevError::network(url, e))?;
    Ok(body)
}

/// Decodes the JSON catalog. One release per array element, files in upstream order.
pub fn parse_structured(body: &str) -> Result<Vec<Release>> {
    let releases: Vec<Release> =
        serde_json::from_str(body).map_err(|e| GodevError::decode("release catalog JSON", e))?;
    Ok(releases.into_iter().map(Release::normalize).collect())
}

/// Collapses releases sharing a version into the first occurrence and drops files whose
/// filename already appeared in that release. Order of first appearance is kept.
pub fn dedupe_releases(releases: Vec<Release>) -> Vec<Release> {
    let mut merged: Vec<Release> = Vec::with_capacity(releases.len());
    let mut index_of: HashMap<String, usize> = HashMap::new();
    let mut seen_files: Vec<HashSet<String>> = Vec::new();

    for release in releases {
        let idx = match index_of.get(&release.version) {
            Some(&idx) => idx,
            None => {
                index_of.insert(release.version.clone(), merged.len());
                merged.push(Release {
                    version: release.version.clone(),
                    stable: release.stable,
                    files: Vec::new(),
                });
                seen_files.push(HashSet::new());
                merged.len() - 1
            }
        };
        for file in release.files {
            if seen_files[idx].insert(file.filename.clone()) {
                merged[idx].files.push(file);
            }
        }
    }
    merged
}

fn has_archives(releases: &[Release]) -> bool {
    releases
        .iter()
        .flat_map(|r| r.files.iter())
        .any(|f| f.is_archive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemas::releases::ReleaseFile;
    use crate::test_support::{Route, serve};

    const CATALOG_JSON: &str = r#"[
  {
    "version": "go1.22.1",
    "stable": true,
    "files": [
      {"filename": "go1.22.1.src.tar.gz", "os": "", "arch": "", "version": "go1.22.1", "sha256": "79c9", "size": 27562476, "kind": "source"},
      {"filename": "go1.22.1.darwin-arm64.tar.gz", "os": "darwin", "arch": "arm64", "version": "go1.22.1", "sha256": "5f10", "size": 65749072, "kind": "archive"},
      {"filename": "go1.22.1.linux-amd64.tar.gz", "os": "linux", "arch": "amd64", "version": "go1.22.1", "sha256": "aab8", "size": 68965341, "kind": "archive"}
    ]
  },
  {
    "version": "go1.21.8",
    "stable": true,
    "files": [
      {"filename": "go1.21.8.windows-amd64.msi", "os": "windows", "arch": "amd64", "version": "go1.21.8", "kind": "installer"}
    ]
  },
  {"version": "go1.23rc1", "stable": false, "files": []}
]"#;

    fn file(version: &str, filename: &str) -> ReleaseFile {
        ReleaseFile {
            filename: filename.to_string(),
            os: "linux".to_string(),
            arch: "amd64".to_string(),
            version: version.to_string(),
            kind: "archive".to_string(),
            sha256: None,
            size: None,
        }
    }

    #[test]
    fn structured_payload_keeps_every_release_and_file_order() {
        let releases = parse_structured(CATALOG_JSON).unwrap();
        assert_eq!(releases.len(), 3);
        assert_eq!(releases[0].version, "go1.22.1");
        let names: Vec<&str> = releases[0].files.iter().map(|f| f.filename.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "go1.22.1.src.tar.gz",
                "go1.22.1.darwin-arm64.tar.gz",
                "go1.22.1.linux-amd64.tar.gz"
            ]
        );
        assert_eq!(releases[0].files[2].size, Some(68965341));
        assert!(!releases[2].stable);
        assert!(releases[2].files.is_empty());
    }

    #[test]
    fn malformed_payload_is_a_decode_error() {
        let err = parse_structured("{\"version\": \"go1\"}").unwrap_err();
        assert!(matches!(err, GodevError::Decode { .. }), "{err:?}");
    }

    #[test]
    fn duplicates_collapse_by_version_and_filename() {
        let releases = vec![
            Release {
                version: "go1.22.1".into(),
                stable: true,
                files: vec![file("go1.22.1", "a.tar.gz")],
            },
            Release {
                version: "go1.21.8".into(),
                stable: true,
                files: vec![],
            },
            Release {
                version: "go1.22.1".into(),
                stable: true,
                files: vec![file("go1.22.1", "a.tar.gz"), file("go1.22.1", "b.tar.gz")],
            },
        ];

        let merged = dedupe_releases(releases);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].version, "go1.22.1");
        let names: Vec<&str> = merged[0].files.iter().map(|f| f.filename.as_str()).collect();
        assert_eq!(names, vec!["a.tar.gz", "b.tar.gz"]);
        assert_eq!(merged[1].version, "go1.21.8");
    }

    #[test]
    fn structured_fetch_over_http() {
        let base = serve(vec![Route::ok("/dl/json", CATALOG_JSON.as_bytes().to_vec())]);
        let catalog = Catalog::new(CatalogSources {
            json_url: format!("{base}/dl/json"),
            html_url: format!("{base}/dl/"),
        });
        let releases = catalog.fetch_structured().unwrap();
        assert_eq!(releases.len(), 3);
    }

    #[test]
    fn auto_falls_back_to_the_listing_and_caches_it() {
        let listing = r#"<html><body><div class="toggleVisible" id="go1.22.1"><table class="downloadtable">
<tr><td class="filename"><a>go1.22.1.linux-amd64.tar.gz</a></td><td>Archive</td><td>Linux</td><td>x86-64</td></tr>
</table></div></body></html>"#;
        let base = serve(vec![
            Route::status("/dl/json", 503, b"unavailable".to_vec()),
            Route::ok("/dl/", listing.as_bytes().to_vec()),
        ]);
        let catalog = Catalog::new(CatalogSources {
            json_url: format!("{base}/dl/json"),
            html_url: format!("{base}/dl/"),
        });

        let first = catalog.releases(FetchStrategy::Auto).unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].files[0].os, "Linux");

        let second = catalog.releases(FetchStrategy::Structured).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn unreachable_source_is_a_network_error() {
        let catalog = Catalog::new(CatalogSources {
            json_url: "http://127.0.0.1:9/dl/json".to_string(),
            html_url: "http://127.0.0.1:9/dl/".to_string(),
        });
        let err = catalog.fetch_structured().unwrap_err();
        assert!(matches!(err, GodevError::Network { .. }), "{err:?}");
    }
}
