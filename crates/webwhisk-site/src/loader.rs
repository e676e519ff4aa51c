//! Concurrent content loading.

use std::path::Path;

use futures::future::try_join_all;

use crate::discovery::{discover, DiscoveredFile};
use crate::manifest::{FileRecord, Manifest, SiteError};

/// Read every discovered file as UTF-8 text.
///
/// Reads are issued concurrently. The first failure aborts the load and is
/// returned with the offending path; no partial manifest is produced.
pub async fn load(files: Vec<DiscoveredFile>) -> Result<Manifest, SiteError> {
    let reads = files.into_iter().map(|file| async move {
        let content = tokio::fs::read_to_string(&file.path)
            .await
            .map_err(|source| SiteError::FileRead {
                path: file.path.clone(),
                source,
            })?;

        tracing::debug!("Read {} ({} bytes)", file.path.display(), content.len());

        Ok::<_, SiteError>(FileRecord {
            name: file.name,
            path: file.path,
            kind: file.kind,
            content,
        })
    });

    let records = try_join_all(reads).await?;

    Ok(Manifest::from_records(records))
}

/// Discover and load a site directory in one step.
pub async fn scan(dir: &Path) -> Result<Manifest, SiteError> {
    let files = discover(dir)?;
    load(files).await
}
