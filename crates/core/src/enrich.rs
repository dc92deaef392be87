//! Enrichment fan-out
//!
//! Attaches tag sets and presigned URLs to a page of listed objects. Each
//! kind of enrichment runs through a [`TaskGroup`] capped at
//! [`ENRICH_CONCURRENCY`] in-flight requests and stops at the first failure.
//!
//! The page is taken by value and only handed back on success, so a caller
//! can never observe a half-enriched page.

use std::time::Duration;

use crate::backend::{HttpMethod, ObjectBackend, tags_to_map};
use crate::client::CosStorage;
use crate::error::{Error, Result};
use crate::options::GetOptions;
use crate::taskgroup::TaskGroup;
use crate::types::FileInfo;

/// Maximum concurrent remote calls per enrichment pass
pub const ENRICH_CONCURRENCY: usize = 5;

/// Apply whatever enrichment `options` requests
pub(crate) async fn enrich<B: ObjectBackend>(
    storage: &CosStorage<B>,
    mut files: Vec<FileInfo>,
    options: &GetOptions,
) -> Result<Vec<FileInfo>> {
    if options.with_tagging {
        files = attach_tagging(storage.backend(), files).await?;
    }
    if options.with_url {
        files = attach_urls(storage.backend(), files, options.url_ttl()?).await?;
    }
    Ok(files)
}

/// Fetch the tag set of every file
pub async fn attach_tagging<B: ObjectBackend>(
    backend: &B,
    mut files: Vec<FileInfo>,
) -> Result<Vec<FileInfo>> {
    let mut group: TaskGroup<'_, Error> = TaskGroup::new(ENRICH_CONCURRENCY);
    for file in files.iter_mut() {
        group.spawn(async move {
            let tags = backend
                .get_tagging_raw(&file.key)
                .await
                .map_err(|e| Error::remote("get tagging", file.key.as_str(), e))?;
            file.tagging = tags_to_map(tags);
            Ok(())
        });
    }
    group.wait().await?;
    Ok(files)
}

/// Presign a GET URL valid for `ttl` for every file
pub async fn attach_urls<B: ObjectBackend>(
    backend: &B,
    mut files: Vec<FileInfo>,
    ttl: Duration,
) -> Result<Vec<FileInfo>> {
    let mut group: TaskGroup<'_, Error> = TaskGroup::new(ENRICH_CONCURRENCY);
    for file in files.iter_mut() {
        group.spawn(async move {
            let url = backend
                .presign_url(HttpMethod::Get, &file.key, ttl)
                .await
                .map_err(|e| Error::remote("presign url", file.key.as_str(), e))?;
            file.url = Some(url);
            Ok(())
        });
    }
    group.wait().await?;
    Ok(files)
}
