// Helpers shared by the library modules.

// Streaming HTTP downloads to disk.
pub mod assets;
// Permission bits on extracted files.
pub mod binary;
// gzip + tar extraction.
pub mod compression;
// Line-oriented text file reads and atomic rewrites.
pub mod file_operations;
// Host OS/arch names vs. catalog labels.
pub mod platform;
