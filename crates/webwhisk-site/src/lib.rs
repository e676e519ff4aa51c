//! Local side of a webwhisk site.
//!
//! This crate finds the publishable files of a flat site directory, reads them
//! into a [`Manifest`], and rewrites marked references inside HTML pages so they
//! point at the deployed web actions.

pub mod discovery;
pub mod loader;
pub mod manifest;
pub mod rewrite;

pub use discovery::{discover, discover_with, DiscoveredFile};
pub use loader::{load, scan};
pub use manifest::{FileKind, FileRecord, Manifest, SiteError};
pub use rewrite::{rewrite_html, rewrite_manifest, Rewrite, MARKER_ATTRIBUTE};
