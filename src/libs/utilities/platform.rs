// Maps the running host onto the labels the release catalog uses.
//
// The JSON catalog names platforms the way GOOS/GOARCH do (`darwin`, `amd64`), the HTML
// listing uses display names (`macOS`, `x86-64`). Both spellings are accepted everywhere.

use crate::log_debug;
use colored::Colorize;

/// Catalog labels for an operating system, as reported by `std::env::consts::OS`.
pub fn os_aliases(os: &str) -> Vec<&'static str> {
    match os.to_lowercase().as_str() {
        "macos" | "darwin" => vec!["macOS", "darwin"],
        "linux" => vec!["Linux", "linux"],
        "windows" => vec!["Windows", "windows"],
        "freebsd" => vec!["FreeBSD", "freebsd"],
        "openbsd" => vec!["OpenBSD", "openbsd"],
        "netbsd" => vec!["NetBSD", "netbsd"],
        "illumos" => vec!["illumos"],
        "solaris" => vec!["Solaris", "solaris"],
        _ => vec![],
    }
}

/// Catalog labels for a CPU architecture, as reported by `std::env::consts::ARCH`.
pub fn arch_aliases(arch: &str) -> Vec<&'static str> {
    match arch.to_lowercase().as_str() {
        "x86_64" | "amd64" => vec!["x86-64", "amd64"],
        "aarch64" | "arm64" => vec!["ARMv8", "arm64"],
        "x86" | "i386" | "i686" => vec!["x86", "386"],
        "arm" => vec!["ARMv6", "armv6l"],
        "powerpc64" => vec!["ppc64le", "ppc64"],
        "s390x" => vec!["s390x"],
        "riscv64" => vec!["riscv64"],
        "loongarch64" => vec!["loong64"],
        _ => vec![],
    }
}

/// Labels the catalog may use for the host operating system.
pub fn host_os_labels() -> Vec<&'static str> {
    let labels = os_aliases(std::env::consts::OS);
    log_debug!(
        "[Platform] Host OS '{}' matches catalog labels {:?}",
        std::env::consts::OS.cyan(),
        labels
    );
    labels
}

/// Labels the catalog may use for the host architecture.
pub fn host_arch_labels() -> Vec<&'static str> {
    let labels = arch_aliases(std::env::consts::ARCH);
    log_debug!(
        "[Platform] Host arch '{}' matches catalog labels {:?}",
        std::env::consts::ARCH.cyan(),
        labels
    );
    labels
}

/// Case-insensitive membership test of a catalog label in a list of aliases.
pub fn label_matches(label: &str, aliases: &[&str]) -> bool {
    let label = label.trim();
    aliases.iter().any(|alias| alias.eq_ignore_ascii_case(label))
}
