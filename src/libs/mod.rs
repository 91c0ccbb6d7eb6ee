// Core library of `godev`: everything below the command-line layer.
// Modules return `GodevError` and never print listings themselves.

// Typed error enum shared by the library.
pub mod errors;
// Home, work directory, env file and profile locations.
pub mod paths;
// Reads and rewrites the shell-sourced environment file; first-run initialization.
pub mod env_store;
// Upstream release list: JSON endpoint, HTML fallback, process-wide cache.
pub mod catalog;
// HTML download page parser used by the catalog fallback.
pub mod listing_scraper;
// OS -> architecture -> file index for interactive selection.
pub mod selection;
// Download and extraction of release archives.
pub mod installer;
// Installed versions: list, activate, delete.
pub mod version_registry;
// Small filesystem, network and platform helpers.
pub mod utilities;
