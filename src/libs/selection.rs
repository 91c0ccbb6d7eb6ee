// Cascading OS -> architecture -> file index over the release catalog.
//
// Only installable entries are indexed: kind "archive" (any case) with a non-empty OS label.

use std::collections::BTreeMap;

use crate::libs::utilities::platform::{
    arch_aliases, host_arch_labels, host_os_labels, label_matches, os_aliases,
};
use crate::schemas::releases::{Release, ReleaseFile};

#[derive(Debug, Default, Clone)]
pub struct SelectionIndex {
    groups: BTreeMap<String, BTreeMap<String, Vec<ReleaseFile>>>,
}

impl SelectionIndex {
    /// Groups the archive files of `releases`; file order inside a group follows catalog order.
    pub fn build(releases: &[Release]) -> Self {
        let mut groups: BTreeMap<String, BTreeMap<String, Vec<ReleaseFile>>> = BTreeMap::new();
        for file in releases.iter().flat_map(|r| r.files.iter()) {
            if file.os.trim().is_empty() || !file.is_archive() {
                continue;
            }
            groups
                .entry(file.os.clone())
                .or_default()
                .entry(file.arch.clone())
                .or_default()
                .push(file.clone());
        }
        SelectionIndex { groups }
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of indexed files.
    pub fn len(&self) -> usize {
        self.groups
            .values()
            .flat_map(|arches| arches.values())
            .map(Vec::len)
            .sum()
    }

    /// OS labels with the host's OS first, the rest alphabetical.
    pub fn os_names(&self) -> Vec<String> {
        self.os_names_preferring(&host_os_labels())
    }

    pub fn os_names_preferring(&self, preferred: &[&str]) -> Vec<String> {
        let (mut first, rest): (Vec<String>, Vec<String>) = self
            .groups
            .keys()
            .cloned()
            .partition(|os| label_matches(os, preferred));
        first.extend(rest);
        first
    }

    /// Architectures available for `os`, alphabetical.
    pub fn arches(&self, os: &str) -> Vec<String> {
        self.groups
            .get(os)
            .map(|arches| arches.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Archive files for an OS/architecture pair, in catalog order.
    pub fn files(&self, os: &str, arch: &str) -> &[ReleaseFile] {
        self.groups
            .get(os)
            .and_then(|arches| arches.get(arch))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Looks an indexed file up by its exact filename.
    pub fn find(&self, filename: &str) -> Option<&ReleaseFile> {
        self.groups
            .values()
            .flat_map(|arches| arches.values())
            .flatten()
            .find(|file| file.filename == filename)
    }

    /// The host's OS label when the catalog has it, else the first OS available.
    pub fn default_os(&self) -> Option<String> {
        self.default_os_for(&host_os_labels())
    }

    pub fn default_os_for(&self, preferred: &[&str]) -> Option<String> {
        self.os_names_preferring(preferred).into_iter().next()
    }

    /// The host's architecture label under `os` when present, else the first one available.
    pub fn default_arch(&self, os: &str) -> Option<String> {
        self.default_arch_for(os, &host_arch_labels())
    }

    pub fn default_arch_for(&self, os: &str, preferred: &[&str]) -> Option<String> {
        let arches = self.arches(os);
        arches
            .iter()
            .find(|arch| label_matches(arch, preferred))
            .or_else(|| arches.first())
            .cloned()
    }

    /// Resolves a user-typed OS name (`linux`, `darwin`, `macOS`) to the label the catalog uses.
    pub fn resolve_os(&self, wanted: &str) -> Option<String> {
        let wanted = wanted.trim();
        let aliases = os_aliases(wanted);
        self.groups
            .keys()
            .find(|os| os.eq_ignore_ascii_case(wanted))
            .or_else(|| self.groups.keys().find(|os| label_matches(os, &aliases)))
            .cloned()
    }

    /// Same as [`SelectionIndex::resolve_os`] for architectures (`amd64`, `x86_64`, `x86-64`).
    pub fn resolve_arch(&self, os: &str, wanted: &str) -> Option<String> {
        let wanted = wanted.trim();
        let aliases = arch_aliases(wanted);
        let arches = self.arches(os);
        arches
            .iter()
            .find(|arch| arch.eq_ignore_ascii_case(wanted))
            .or_else(|| arches.iter().find(|arch| label_matches(arch, &aliases)))
            .cloned()
    }
}
