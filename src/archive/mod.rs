//! Bundle packaging.
//!
//! Turns a staged bundle directory into a single ZIP archive and removes the
//! staging directory afterwards.

pub mod zip;

pub use zip::{package_bundle, ArchiveInfo};
