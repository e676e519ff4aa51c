//! Site file discovery.
//!
//! Sites are flat: only the top level of the directory is scanned, so every
//! file name maps to exactly one deployed action.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::manifest::{FileKind, SiteError};

/// A file found in the site directory, before its content is read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredFile {
    /// File name, e.g. `style.css`
    pub name: String,

    /// Directory joined with the file name
    pub path: PathBuf,

    /// File type derived from the extension
    pub kind: FileKind,
}

/// Discover every supported file directly inside `dir`.
pub fn discover(dir: &Path) -> Result<Vec<DiscoveredFile>, SiteError> {
    discover_with(dir, &FileKind::ALL)
}

/// Discover files directly inside `dir` whose kind is in `kinds`.
pub fn discover_with(dir: &Path, kinds: &[FileKind]) -> Result<Vec<DiscoveredFile>, SiteError> {
    let metadata = fs::metadata(dir).map_err(|source| SiteError::FileSystem {
        path: dir.to_path_buf(),
        source,
    })?;

    if !metadata.is_dir() {
        return Err(SiteError::FileSystem {
            path: dir.to_path_buf(),
            source: io::Error::other("not a directory"),
        });
    }

    let mut files = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                let source = e
                    .into_io_error()
                    .unwrap_or_else(|| io::Error::other("directory loop"));
                return Err(SiteError::FileSystem {
                    path: dir.to_path_buf(),
                    source,
                });
            }
            Err(e) => {
                tracing::warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let Some(kind) = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(FileKind::from_extension)
        else {
            continue;
        };

        if !kinds.contains(&kind) {
            continue;
        }

        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            tracing::warn!("Skipping non UTF-8 file name: {}", path.display());
            continue;
        };

        files.push(DiscoveredFile {
            name: name.to_string(),
            path: dir.join(name),
            kind,
        });
    }

    tracing::debug!("Discovered {} files in {}", files.len(), dir.display());

    Ok(files)
}
