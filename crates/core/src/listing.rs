//! Pagination engine
//!
//! Turns the single-page `list_raw` primitive into a cursor API
//! ([`CosStorage::list_page`]) and a bounded full drain
//! ([`CosStorage::list_all`]).

use crate::backend::ObjectBackend;
use crate::client::CosStorage;
use crate::enrich;
use crate::error::{Error, Result};
use crate::options::GetOptions;
use crate::timestamp::parse_time;
use crate::types::{FileInfo, ListPaginatedInput, ListPaginatedOutput, trim_etag};

/// Page size used by [`CosStorage::list_all`]
pub const DEFAULT_PAGE_SIZE: i32 = 100;

/// Hard cap on the number of objects [`CosStorage::list_all`] returns
pub const MAX_LIST_OBJECTS: usize = 10_000;

impl<B: ObjectBackend> CosStorage<B> {
    /// List one page of objects under `input.prefix` starting after
    /// `input.cursor`.
    ///
    /// Folder placeholders (zero-size keys ending in `/`) are dropped.
    /// Tags and URLs are attached when `options` asks for them; if that
    /// fails, the whole page fails.
    pub async fn list_page(
        &self,
        input: &ListPaginatedInput,
        options: &GetOptions,
    ) -> Result<ListPaginatedOutput> {
        if input.page_size <= 0 {
            return Err(Error::InvalidArgument(format!(
                "page size must be positive, got {}",
                input.page_size
            )));
        }

        let listing = self
            .backend()
            .list_raw(&input.prefix, &input.cursor, input.page_size)
            .await
            .map_err(|e| Error::remote("list objects", input.prefix.as_str(), e))?;

        let mut files = Vec::with_capacity(listing.contents.len());
        for object in listing.contents {
            let info = FileInfo {
                last_modified: parse_time(&object.last_modified),
                etag: trim_etag(&object.etag),
                ..FileInfo::new(object.key, object.size)
            };
            if info.is_dir_marker() {
                tracing::debug!(key = %info.key, "skip directory marker");
                continue;
            }
            files.push(info);
        }

        let files = enrich::enrich(self, files, options).await?;

        Ok(ListPaginatedOutput {
            files,
            cursor: listing.next_marker,
            is_truncated: listing.is_truncated,
        })
    }

    /// List every object under `prefix`, up to [`MAX_LIST_OBJECTS`].
    ///
    /// Hitting the cap is not an error: the objects gathered so far are
    /// returned and a warning is logged.
    pub async fn list_all(&self, prefix: &str, options: &GetOptions) -> Result<Vec<FileInfo>> {
        let mut files = Vec::with_capacity(DEFAULT_PAGE_SIZE as usize);
        let mut cursor = String::new();

        loop {
            let input = ListPaginatedInput::new(prefix, DEFAULT_PAGE_SIZE).cursor(cursor);
            let page = self.list_page(&input, options).await?;
            let has_more = page.has_more();
            files.extend(page.files);

            if files.len() >= MAX_LIST_OBJECTS {
                tracing::warn!(
                    prefix,
                    total = files.len(),
                    cap = MAX_LIST_OBJECTS,
                    "list cap reached, returning partial result"
                );
                files.truncate(MAX_LIST_OBJECTS);
                break;
            }

            if !has_more {
                break;
            }
            cursor = page.cursor;
        }

        Ok(files)
    }
}
