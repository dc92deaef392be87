//! Raw object store operations
//!
//! [`ObjectBackend`] is the seam between the SDK-independent facade and the
//! client library that actually talks to the remote store. Implementations
//! only transfer bytes and report failures; option translation, error
//! normalization, pagination and enrichment all live above this trait.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use jiff::Timestamp;
use thiserror::Error;
use tokio::io::AsyncRead;

/// Result of a raw backend call
pub type RawResult<T> = std::result::Result<T, RawError>;

/// Failure reported by the backend
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RawError {
    /// The bucket or object does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// Credentials rejected or permission denied
    #[error("access denied: {0}")]
    AccessDenied(String),

    /// Any other transport or service failure
    #[error("{0}")]
    Transport(String),
}

/// HTTP method a presigned URL is valid for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Put,
    Head,
    Delete,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let method = match self {
            HttpMethod::Get => "GET",
            HttpMethod::Put => "PUT",
            HttpMethod::Head => "HEAD",
            HttpMethod::Delete => "DELETE",
        };
        f.write_str(method)
    }
}

/// Payload of a put request
pub enum PutBody {
    Bytes(Vec<u8>),
    Reader(Box<dyn AsyncRead + Send + Unpin>),
}

impl fmt::Debug for PutBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PutBody::Bytes(data) => f.debug_tuple("Bytes").field(&data.len()).finish(),
            PutBody::Reader(_) => f.write_str("Reader(..)"),
        }
    }
}

/// Headers of a put request, already translated from `PutOptions`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PutHeaders {
    pub content_type: Option<String>,
    pub content_encoding: Option<String>,
    pub content_disposition: Option<String>,
    pub content_language: Option<String>,
    pub expires: Option<Timestamp>,
    pub content_length: Option<i64>,

    /// Pre-encoded `x-cos-tagging` header value
    pub tagging: Option<String>,
}

/// Response headers of a HEAD request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawHead {
    pub content_length: Option<i64>,
    pub last_modified: Option<String>,
    pub etag: Option<String>,
}

/// One entry of a raw listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawObject {
    pub key: String,
    pub size: i64,
    pub last_modified: String,
    pub etag: String,
}

/// One raw listing page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawListing {
    pub contents: Vec<RawObject>,
    pub next_marker: String,
    pub is_truncated: bool,
}

/// A single object tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Raw operations against one bucket.
///
/// Implementations must be safe to call concurrently from many tasks.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectBackend: Send + Sync {
    /// Upload an object in a single request
    async fn put_raw(&self, key: &str, body: PutBody, headers: PutHeaders) -> RawResult<()>;

    /// Download an object's content
    async fn get_raw(&self, key: &str) -> RawResult<Vec<u8>>;

    async fn delete_raw(&self, key: &str) -> RawResult<()>;

    async fn head_raw(&self, key: &str) -> RawResult<RawHead>;

    /// List at most `max_keys` objects under `prefix` after `marker`
    async fn list_raw(&self, prefix: &str, marker: &str, max_keys: i32) -> RawResult<RawListing>;

    async fn get_tagging_raw(&self, key: &str) -> RawResult<Vec<Tag>>;

    /// Sign a URL granting `method` on `key` for `ttl`
    async fn presign_url(&self, method: HttpMethod, key: &str, ttl: Duration) -> RawResult<String>;

    async fn bucket_exists(&self) -> RawResult<bool>;

    /// Create the bucket with a private ACL
    async fn create_bucket(&self) -> RawResult<()>;
}

/// Convert a tag list into a map, `None` when there are no tags
pub fn tags_to_map(tags: Vec<Tag>) -> Option<std::collections::BTreeMap<String, String>> {
    if tags.is_empty() {
        return None;
    }
    Some(tags.into_iter().map(|t| (t.key, t.value)).collect())
}
