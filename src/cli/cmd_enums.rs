use crate::cli::type_enums::SourceArg;
use clap::{Parser, Subcommand};

/// Defines the command-line interface (CLI) for 'godev'.
/// `#[derive(Parser)]` generates the argument parsing code via `clap`.
#[derive(Parser)]
#[command(name = "godev")]
#[command(version, about = "Install, switch and remove Go toolchains in your home directory", long_about = None)]
pub struct Cli {
    /// Enables detailed debug output for troubleshooting.
    #[arg(short, long, global = true)]
    pub(crate) debug: bool,

    /// Name of the work directory under $HOME (also names the env file, `~/.<work-dir>`).
    #[arg(long, global = true, env = "GODEV_WORK_DIR", value_name = "NAME")]
    pub(crate) work_dir: Option<String>,

    /// Defines available subcommands for 'godev'.
    #[command(subcommand)]
    pub(crate) command: Commands,
}

/// Enumerates all supported subcommands with their specific arguments and options.
#[derive(Subcommand)]
pub enum Commands {
    /// Show the current version of the tool.
    Version,
    /// Create the work directories, the env file and the shell profile hook.
    /// Every other command does this silently first; `init` reports each step.
    Init,
    /// List downloadable toolchain archives for a platform, newest first.
    Available {
        /// Read the full download history from the HTML download page.
        #[arg(long, conflicts_with = "source")]
        all: bool,
        /// Catalog source [possible values: auto, json, html].
        #[arg(long, default_value_t = SourceArg::Auto)]
        source: SourceArg,
        /// Operating system label (defaults to the host, e.g. `linux`, `darwin`).
        #[arg(long)]
        os: Option<String>,
        /// CPU architecture label (defaults to the host, e.g. `amd64`, `arm64`).
        #[arg(long)]
        arch: Option<String>,
        /// Include release candidates and betas.
        #[arg(long)]
        unstable: bool,
    },
    /// Download and unpack a toolchain archive into the install root.
    /// Prompts for OS, architecture and file when no filename is given.
    Install {
        /// Exact archive filename, e.g. `go1.22.1.linux-amd64.tar.gz`.
        filename: Option<String>,
        /// Preselect the operating system in the prompt.
        #[arg(long)]
        os: Option<String>,
        /// Preselect the architecture in the prompt.
        #[arg(long)]
        arch: Option<String>,
        /// Catalog source [possible values: auto, json, html].
        #[arg(long, default_value_t = SourceArg::Auto)]
        source: SourceArg,
        /// Download mirror; the archive filename is appended to it.
        #[arg(long, env = "GODEV_MIRROR", value_name = "URL")]
        mirror: Option<String>,
    },
    /// List installed toolchains and mark the active one.
    Installed,
    /// Point GOROOT at an installed toolchain.
    Use {
        /// Installed version directory name (prompts when omitted).
        name: Option<String>,
    },
    /// Open the Go release history (https://go.dev/doc/devel/release) in the browser.
    Notes {
        /// Only print the URL.
        #[arg(long)]
        print: bool,
    },
    /// Delete an installed toolchain.
    Remove {
        /// Installed version directory name (prompts when omitted).
        name: Option<String>,
        /// Skip the confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },
}
