//! Per-call options for put and get/list operations
//!
//! Every HTTP metadata field is an `Option` so that "not set" is never
//! confused with "set to an empty string". Only set fields reach the remote.

use std::collections::BTreeMap;
use std::time::Duration;

use jiff::Timestamp;

use crate::error::{Error, Result};

/// Default lifetime of a presigned URL: 7 days
pub const DEFAULT_URL_EXPIRE_SECS: i64 = 7 * 24 * 60 * 60;

/// Longest lifetime a SigV4 presigned URL may carry
pub const MAX_URL_EXPIRE_SECS: i64 = 7 * 24 * 60 * 60;

/// Options for put operations
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PutOptions {
    pub content_type: Option<String>,
    pub content_encoding: Option<String>,
    pub content_disposition: Option<String>,
    pub content_language: Option<String>,
    pub expires: Option<Timestamp>,

    /// Explicit content length; computed from the payload when absent
    pub object_size: Option<i64>,

    /// Object tags, sent as a single `x-cos-tagging` header
    pub tagging: BTreeMap<String, String>,
}

impl PutOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content_type(mut self, value: impl Into<String>) -> Self {
        self.content_type = Some(value.into());
        self
    }

    pub fn content_encoding(mut self, value: impl Into<String>) -> Self {
        self.content_encoding = Some(value.into());
        self
    }

    pub fn content_disposition(mut self, value: impl Into<String>) -> Self {
        self.content_disposition = Some(value.into());
        self
    }

    pub fn content_language(mut self, value: impl Into<String>) -> Self {
        self.content_language = Some(value.into());
        self
    }

    pub fn expires(mut self, at: Timestamp) -> Self {
        self.expires = Some(at);
        self
    }

    pub fn object_size(mut self, size: i64) -> Self {
        self.object_size = Some(size);
        self
    }

    pub fn tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tagging.insert(key.into(), value.into());
        self
    }

    /// Tags encoded as `k1=v1&k2=v2`, or `None` when there are no tags
    pub fn tagging_header(&self) -> Option<String> {
        if self.tagging.is_empty() {
            return None;
        }
        let mut query = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.tagging {
            query.append_pair(key, value);
        }
        Some(query.finish())
    }
}

/// Options for head, presign and list operations
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetOptions {
    /// Fetch the tag set of each object
    pub with_tagging: bool,

    /// Attach a presigned URL to each object
    pub with_url: bool,

    /// Presigned URL lifetime in seconds; non-positive values mean the default
    pub expire: Option<i64>,
}

impl GetOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tagging(mut self) -> Self {
        self.with_tagging = true;
        self
    }

    pub fn with_url(mut self) -> Self {
        self.with_url = true;
        self
    }

    pub fn expire(mut self, secs: i64) -> Self {
        self.expire = Some(secs);
        self
    }

    /// Effective presigned URL lifetime in seconds
    pub fn expire_secs(&self) -> i64 {
        self.expire
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_URL_EXPIRE_SECS)
    }

    /// Presigned URL lifetime, rejecting anything the signer cannot honor
    pub fn url_ttl(&self) -> Result<Duration> {
        let secs = self.expire_secs();
        if secs > MAX_URL_EXPIRE_SECS {
            return Err(Error::InvalidArgument(format!(
                "URL lifetime of {secs}s exceeds the maximum of {MAX_URL_EXPIRE_SECS}s"
            )));
        }
        Ok(Duration::from_secs(secs as u64))
    }
}
