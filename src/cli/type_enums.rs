use std::fmt;
use std::str::FromStr;

use crate::libs::catalog::FetchStrategy;

/// Where `available` and `install` read the release catalog from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SourceArg {
    #[default]
    Auto, // JSON endpoint, HTML download page when that fails
    Json, // JSON endpoint only
    Html, // HTML download page only (full history)
}

/// Implementation of string parsing for SourceArg enum.
/// Lets clap turn `--source json` into a typed value.
impl FromStr for SourceArg {
    type Err = String;

    /// Parses a string into a SourceArg variant.
    ///
    /// # Arguments
    /// * `s` - The string to parse (case-insensitive)
    ///
    /// # Returns
    /// * `Ok(SourceArg)` if the string names a known source
    /// * `Err(String)` listing the valid values otherwise
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(SourceArg::Auto),
            "json" => Ok(SourceArg::Json),
            "html" => Ok(SourceArg::Html),
            _ => {
                let valid = ["auto", "json", "html"].join(", ");
                Err(format!("Invalid source '{s}'. Must be one of: {valid}"))
            }
        }
    }
}

impl fmt::Display for SourceArg {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SourceArg::Auto => write!(f, "auto"),
            SourceArg::Json => write!(f, "json"),
            SourceArg::Html => write!(f, "html"),
        }
    }
}

impl From<SourceArg> for FetchStrategy {
    fn from(source: SourceArg) -> Self {
        match source {
            SourceArg::Auto => FetchStrategy::Auto,
            SourceArg::Json => FetchStrategy::Structured,
            SourceArg::Html => FetchStrategy::Scraped,
        }
    }
}
