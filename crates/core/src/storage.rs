//! Capability interfaces
//!
//! Two surfaces are implemented by the same [`CosStorage`] value:
//!
//! - [`Storage`]: object CRUD, listing and presigned URLs, used by file and
//!   attachment services.
//! - [`ImageX`]: the image-service compatible surface. COS has no upload
//!   token service, so the upload methods report
//!   [`Error::UnsupportedFeature`] instead of pretending to succeed.
//!
//! Callers should depend on `dyn Storage` or `dyn ImageX`, not on the
//! concrete client.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncRead;

use crate::backend::ObjectBackend;
use crate::client::CosStorage;
use crate::error::{Error, Result};
use crate::options::{GetOptions, PutOptions};
use crate::types::{FileInfo, ListPaginatedInput, ListPaginatedOutput};

/// Path of the upload-apply action, appended to the request host
pub const APPLY_UPLOAD_ACTION_URI: &str = "/api/common/upload/apply_upload_action";

/// Object storage capability
#[async_trait]
pub trait Storage: Send + Sync {
    async fn put(&self, key: &str, content: Vec<u8>, options: PutOptions) -> Result<()>;

    async fn put_with_reader(
        &self,
        key: &str,
        reader: Box<dyn AsyncRead + Send + Unpin>,
        options: PutOptions,
    ) -> Result<()>;

    async fn get(&self, key: &str) -> Result<Vec<u8>>;

    async fn delete(&self, key: &str) -> Result<()>;

    /// Presigned download URL
    async fn get_url(&self, key: &str, options: &GetOptions) -> Result<String>;

    async fn list_paginated(
        &self,
        input: &ListPaginatedInput,
        options: &GetOptions,
    ) -> Result<ListPaginatedOutput>;

    async fn list_all(&self, prefix: &str, options: &GetOptions) -> Result<Vec<FileInfo>>;

    /// Object metadata; [`Error::ObjectNotFound`] when the key is absent
    async fn head(&self, key: &str, options: &GetOptions) -> Result<FileInfo>;
}

/// Temporary upload credentials
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecurityToken {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: String,
    pub expired_time: String,
    pub current_time: String,
    pub host_scheme: String,
}

/// Resolved URL of a stored resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceUrl {
    pub url: String,
}

/// Outcome of a direct upload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadResult {
    pub uri: String,
}

/// Image-service compatible capability
#[async_trait]
pub trait ImageX: Send + Sync {
    /// Upload endpoint for browsers, derived from the host that served the
    /// current request; `None` without one
    fn upload_host(&self, request_host: Option<&str>) -> Option<String>;

    fn server_id(&self) -> &str;

    async fn upload_auth(&self) -> Result<SecurityToken>;

    async fn upload_auth_with_expire(&self, expire: Duration) -> Result<SecurityToken>;

    async fn resource_url(&self, uri: &str, options: &GetOptions) -> Result<ResourceUrl>;

    async fn upload(&self, data: Vec<u8>) -> Result<UploadResult>;
}

#[async_trait]
impl<B: ObjectBackend> Storage for CosStorage<B> {
    async fn put(&self, key: &str, content: Vec<u8>, options: PutOptions) -> Result<()> {
        self.put_object(key, content, options).await
    }

    async fn put_with_reader(
        &self,
        key: &str,
        reader: Box<dyn AsyncRead + Send + Unpin>,
        options: PutOptions,
    ) -> Result<()> {
        self.put_object_with_reader(key, reader, options).await
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>> {
        self.get_object(key).await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.delete_object(key).await
    }

    async fn get_url(&self, key: &str, options: &GetOptions) -> Result<String> {
        self.presign_url(key, options).await
    }

    async fn list_paginated(
        &self,
        input: &ListPaginatedInput,
        options: &GetOptions,
    ) -> Result<ListPaginatedOutput> {
        self.list_page(input, options).await
    }

    async fn list_all(&self, prefix: &str, options: &GetOptions) -> Result<Vec<FileInfo>> {
        CosStorage::list_all(self, prefix, options).await
    }

    async fn head(&self, key: &str, options: &GetOptions) -> Result<FileInfo> {
        self.head_object(key, options).await
    }
}

#[async_trait]
impl<B: ObjectBackend> ImageX for CosStorage<B> {
    fn upload_host(&self, request_host: Option<&str>) -> Option<String> {
        request_host
            .filter(|host| !host.is_empty())
            .map(|host| format!("{}{APPLY_UPLOAD_ACTION_URI}", host.trim_end_matches('/')))
    }

    fn server_id(&self) -> &str {
        ""
    }

    async fn upload_auth(&self) -> Result<SecurityToken> {
        Err(Error::UnsupportedFeature(
            "upload auth is not available for COS".into(),
        ))
    }

    async fn upload_auth_with_expire(&self, _expire: Duration) -> Result<SecurityToken> {
        Err(Error::UnsupportedFeature(
            "upload auth is not available for COS".into(),
        ))
    }

    async fn resource_url(&self, uri: &str, options: &GetOptions) -> Result<ResourceUrl> {
        let url = self.presign_url(uri, options).await?;
        Ok(ResourceUrl { url })
    }

    async fn upload(&self, _data: Vec<u8>) -> Result<UploadResult> {
        Err(Error::UnsupportedFeature(
            "direct upload is not available for COS, use Storage::put".into(),
        ))
    }
}
