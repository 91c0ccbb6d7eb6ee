// `godev notes`: points the user at the upstream release history.

use anyhow::Result;
use colored::Colorize;

use crate::{log_info, log_warn};

pub const RELEASE_NOTES_URL: &str = "https://go.dev/doc/devel/release";

/// Entry point for `godev notes`. The URL is always printed; it is also handed to the
/// default browser unless `print_only` is set. A browser that cannot be launched is only
/// a warning.
pub fn run(print_only: bool) -> Result<()> {
    println!("{}", RELEASE_NOTES_URL.blue().underline());
    if print_only {
        return Ok(());
    }
    match open::that(RELEASE_NOTES_URL) {
        Ok(()) => log_info!("[Notes] Opened the release history in your browser"),
        Err(err) => log_warn!("[Notes] Could not launch a browser: {}", err),
    }
    Ok(())
}
