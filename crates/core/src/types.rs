//! Object metadata and list page types

use std::collections::BTreeMap;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Metadata for a stored object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileInfo {
    /// Object key
    pub key: String,

    /// Size in bytes
    pub size: i64,

    /// Last modified timestamp, `None` when the remote sent nothing parsable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<Timestamp>,

    /// ETag with surrounding quotes removed
    pub etag: String,

    /// Tag set, only present when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tagging: Option<BTreeMap<String, String>>,

    /// Presigned URL, only present when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl FileInfo {
    pub fn new(key: impl Into<String>, size: i64) -> Self {
        Self {
            key: key.into(),
            size: size.max(0),
            ..Default::default()
        }
    }

    /// Zero-size keys ending in `/` are folder placeholders, not objects
    pub fn is_dir_marker(&self) -> bool {
        self.size == 0 && self.key.ends_with('/')
    }

    /// Human-readable size
    pub fn size_human(&self) -> String {
        humansize::format_size(self.size as u64, humansize::BINARY)
    }
}

/// Strip the quotes COS wraps around ETags
pub fn trim_etag(raw: &str) -> String {
    raw.trim_matches('"').to_string()
}

/// Input of a single list page request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPaginatedInput {
    /// Key prefix to filter by
    pub prefix: String,

    /// Maximum keys per page; must be positive
    pub page_size: i32,

    /// Resume position from a previous page, empty for the first page
    pub cursor: String,
}

impl ListPaginatedInput {
    pub fn new(prefix: impl Into<String>, page_size: i32) -> Self {
        Self {
            prefix: prefix.into(),
            page_size,
            cursor: String::new(),
        }
    }

    pub fn cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = cursor.into();
        self
    }
}

/// One page of listed objects
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListPaginatedOutput {
    pub files: Vec<FileInfo>,

    /// Cursor for the next page; empty when there are no more pages
    pub cursor: String,

    pub is_truncated: bool,
}

impl ListPaginatedOutput {
    /// Whether another page should be requested.
    ///
    /// Either a false truncation flag or an empty cursor ends pagination.
    pub fn has_more(&self) -> bool {
        self.is_truncated && !self.cursor.is_empty()
    }
}
