//! cos-core: Object storage abstraction for Tencent COS
//!
//! This crate provides the SDK-independent part of the client, including:
//! - Endpoint resolution and timestamp normalization
//! - The object facade (put, get, delete, head, presigned URLs)
//! - Cursor pagination with a hard cap on full listings
//! - Bounded, fail-fast enrichment of listed objects with tags and URLs
//! - Configuration and profile management
//!
//! The remote store is reached through the [`ObjectBackend`] trait, so the
//! whole facade can be exercised against in-memory or mock backends.

pub mod backend;
pub mod client;
pub mod config;
pub mod endpoint;
pub mod enrich;
pub mod error;
pub mod listing;
pub mod options;
pub mod path;
pub mod profile;
pub mod storage;
pub mod taskgroup;
pub mod timestamp;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use backend::{
    HttpMethod, ObjectBackend, PutBody, PutHeaders, RawError, RawHead, RawListing, RawObject,
    RawResult, Tag,
};
pub use client::CosStorage;
pub use config::{Config, ConfigManager, CosConfig, Credentials};
pub use endpoint::Endpoint;
pub use error::{Error, Result};
pub use listing::{DEFAULT_PAGE_SIZE, MAX_LIST_OBJECTS};
pub use options::{DEFAULT_URL_EXPIRE_SECS, GetOptions, MAX_URL_EXPIRE_SECS, PutOptions};
pub use path::{RemotePath, parse_remote_path};
pub use profile::{Profile, ProfileManager};
pub use storage::{ImageX, ResourceUrl, SecurityToken, Storage, UploadResult};
pub use taskgroup::TaskGroup;
pub use timestamp::{format_http_date, parse_time};
pub use types::{FileInfo, ListPaginatedInput, ListPaginatedOutput};
