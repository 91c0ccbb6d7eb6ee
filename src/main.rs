mod cli;
mod commands;
mod libs;
mod logger;
mod schemas;
#[cfg(test)]
mod test_support;

use clap::Parser;
use colored::Colorize;

use cli::cmd_enums::{Cli, Commands};
use commands::{available, init, install, installed, notes, remove, use_version, version};
use libs::paths::WorkspaceLayout;

/// Resolves the workspace, runs the silent initialization and dispatches the subcommand.
fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Version => {
            version::run();
            return Ok(());
        }
        Commands::Notes { print } => return notes::run(print),
        _ => {}
    }

    let layout = WorkspaceLayout::resolve(cli.work_dir.as_deref())?;
    if !matches!(cli.command, Commands::Init) {
        init::ensure(&layout);
    }

    match cli.command {
        Commands::Version | Commands::Notes { .. } => Ok(()),
        Commands::Init => init::run(&layout),
        Commands::Available { all, source, os, arch, unstable } => {
            available::run(all, source.into(), os, arch, unstable)
        }
        Commands::Install { filename, os, arch, source, mirror } => {
            install::run(&layout, filename, os, arch, source.into(), mirror)
        }
        Commands::Installed => installed::run(&layout),
        Commands::Use { name } => use_version::run(&layout, name),
        Commands::Remove { name, yes } => remove::run(&layout, name, yes),
    }
}

fn main() {
    let cli = Cli::parse();
    logger::init(cli.debug);

    if let Err(err) = run(cli) {
        log_error!("{}", format!("{err:#}").red());
        std::process::exit(1);
    }
}
