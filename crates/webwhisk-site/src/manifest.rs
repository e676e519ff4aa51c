//! In-memory model of the files that make up a site.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// File types a site may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FileKind {
    Html,
    Css,
    Js,
}

impl FileKind {
    /// Every supported kind.
    pub const ALL: [FileKind; 3] = [FileKind::Html, FileKind::Js, FileKind::Css];

    /// Match a file extension (without the leading dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "html" => Some(FileKind::Html),
            "css" => Some(FileKind::Css),
            "js" => Some(FileKind::Js),
            _ => None,
        }
    }

    /// Extension without the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            FileKind::Html => "html",
            FileKind::Css => "css",
            FileKind::Js => "js",
        }
    }

    /// Content type served for files of this kind.
    pub fn content_type(self) -> &'static str {
        match self {
            FileKind::Js => "application/javascript",
            FileKind::Html => "text/html",
            FileKind::Css => "text/css",
        }
    }
}

/// A site file with its loaded content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// File name, e.g. `index.html`
    pub name: String,

    /// Path the content was read from
    pub path: PathBuf,

    /// File type derived from the extension
    pub kind: FileKind,

    /// UTF-8 content, possibly rewritten
    pub content: String,
}

impl FileRecord {
    pub fn content_type(&self) -> &'static str {
        self.kind.content_type()
    }
}

/// All files of one publish run, keyed by path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    records: BTreeMap<PathBuf, FileRecord>,
}

impl Manifest {
    /// Build a manifest from loaded records.
    pub fn from_records(records: impl IntoIterator<Item = FileRecord>) -> Self {
        Self {
            records: records
                .into_iter()
                .map(|record| (record.path.clone(), record))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up a record by its file name.
    pub fn find_by_name(&self, name: &str) -> Option<&FileRecord> {
        self.records.values().find(|record| record.name == name)
    }

    /// Whether a file with the given name is part of the site.
    pub fn contains_entry(&self, entry: &str) -> bool {
        self.find_by_name(entry).is_some()
    }

    pub fn get(&self, path: &Path) -> Option<&FileRecord> {
        self.records.get(path)
    }

    pub fn records(&self) -> impl Iterator<Item = &FileRecord> {
        self.records.values()
    }

    pub fn records_mut(&mut self) -> impl Iterator<Item = &mut FileRecord> {
        self.records.values_mut()
    }
}

/// Errors raised while reading a site from disk.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    #[error("Failed to read site directory {}: {source}", path.display())]
    FileSystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read {}: {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
