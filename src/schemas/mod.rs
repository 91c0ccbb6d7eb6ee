// Data structures exchanged with the upstream release catalog.
pub mod releases;
