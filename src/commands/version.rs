// This file prints the version of the `godev` binary, taken from the package
// metadata at compile time.

use colored::Colorize;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Entry point for `godev version`.
pub fn run() {
    println!("{} {}", env!("CARGO_PKG_NAME").bold(), VERSION.green());
}
