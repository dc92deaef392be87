//! Object facade
//!
//! [`CosStorage`] wraps an [`ObjectBackend`] and owns everything the raw
//! backend does not: option translation, error normalization, head
//! semantics, presign defaults and bucket bootstrap. Listing lives in
//! [`crate::listing`], enrichment in [`crate::enrich`].

use tokio::io::AsyncRead;

use crate::backend::{HttpMethod, ObjectBackend, PutBody, PutHeaders, RawError, tags_to_map};
use crate::error::{Error, Result};
use crate::options::{GetOptions, PutOptions};
use crate::timestamp::parse_time;
use crate::types::{FileInfo, trim_etag};

/// Object storage client bound to a single bucket
#[derive(Debug, Clone)]
pub struct CosStorage<B> {
    backend: B,
}

impl<B: ObjectBackend> CosStorage<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Get the underlying backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Make sure the bucket exists, creating it (private) if it does not.
    ///
    /// At most one create attempt is made.
    pub async fn bootstrap(&self) -> Result<()> {
        let exists = self
            .backend
            .bucket_exists()
            .await
            .map_err(|e| Error::remote("check bucket", "", e))?;
        if exists {
            tracing::debug!("bucket exists");
            return Ok(());
        }

        tracing::debug!("bucket missing, creating it");
        self.backend
            .create_bucket()
            .await
            .map_err(|e| Error::remote("create bucket", "", e))
    }

    /// Upload an in-memory object
    pub async fn put_object(&self, key: &str, content: Vec<u8>, options: PutOptions) -> Result<()> {
        let mut headers = put_headers(&options);
        if options.object_size.is_none() {
            headers.content_length = Some(content.len() as i64);
        }
        self.backend
            .put_raw(key, PutBody::Bytes(content), headers)
            .await
            .map_err(|e| Error::remote("put object", key, e))
    }

    /// Upload an object from a reader
    pub async fn put_object_with_reader(
        &self,
        key: &str,
        reader: Box<dyn AsyncRead + Send + Unpin>,
        options: PutOptions,
    ) -> Result<()> {
        let headers = put_headers(&options);
        self.backend
            .put_raw(key, PutBody::Reader(reader), headers)
            .await
            .map_err(|e| Error::remote("put object", key, e))
    }

    /// Download an object's content.
    ///
    /// A missing object is reported as a remote error; use
    /// [`Error::is_not_found`] to tell it apart.
    pub async fn get_object(&self, key: &str) -> Result<Vec<u8>> {
        self.backend
            .get_raw(key)
            .await
            .map_err(|e| Error::remote("get object", key, e))
    }

    /// Delete an object; deleting a missing object succeeds
    pub async fn delete_object(&self, key: &str) -> Result<()> {
        match self.backend.delete_raw(key).await {
            Ok(()) => Ok(()),
            Err(RawError::NotFound(_)) => {
                tracing::debug!(key, "delete of missing object");
                Ok(())
            }
            Err(e) => Err(Error::remote("delete object", key, e)),
        }
    }

    /// Fetch an object's metadata
    pub async fn head_object(&self, key: &str, options: &GetOptions) -> Result<FileInfo> {
        let head = self.backend.head_raw(key).await.map_err(|e| match e {
            RawError::NotFound(_) => Error::ObjectNotFound(key.to_string()),
            other => Error::remote("head object", key, other),
        })?;

        let mut info = FileInfo::new(key, head.content_length.unwrap_or(0));
        info.last_modified = head.last_modified.as_deref().and_then(parse_time);
        info.etag = head.etag.as_deref().map(trim_etag).unwrap_or_default();

        if options.with_tagging {
            let tags = self
                .backend
                .get_tagging_raw(key)
                .await
                .map_err(|e| Error::remote("get tagging", key, e))?;
            info.tagging = tags_to_map(tags);
        }

        if options.with_url {
            info.url = Some(self.presign_url(key, options).await?);
        }

        Ok(info)
    }

    /// Presigned GET URL, valid for `options.expire` seconds or 7 days.
    ///
    /// Lifetimes beyond [`MAX_URL_EXPIRE_SECS`](crate::options::MAX_URL_EXPIRE_SECS)
    /// fail with `InvalidArgument` before any backend call.
    pub async fn presign_url(&self, key: &str, options: &GetOptions) -> Result<String> {
        let ttl = options.url_ttl()?;
        self.backend
            .presign_url(HttpMethod::Get, key, ttl)
            .await
            .map_err(|e| Error::remote("presign url", key, e))
    }
}

fn put_headers(options: &PutOptions) -> PutHeaders {
    PutHeaders {
        content_type: options.content_type.clone(),
        content_encoding: options.content_encoding.clone(),
        content_disposition: options.content_disposition.clone(),
        content_language: options.content_language.clone(),
        expires: options.expires,
        content_length: options.object_size.filter(|size| *size > 0),
        tagging: options.tagging_header(),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::backend::{MockObjectBackend, RawHead, Tag};

    #[tokio::test]
    async fn test_put_computes_content_length() {
        let mut backend = MockObjectBackend::new();
        backend
            .expect_put_raw()
            .withf(|key, body, headers| {
                key == "a.txt"
                    && matches!(body, PutBody::Bytes(data) if data.as_slice() == b"hello")
                    && headers.content_length == Some(5)
                    && headers.tagging.is_none()
                    && headers.content_type.is_none()
            })
            .times(1)
            .returning(|_, _, _| Ok(()));

        let storage = CosStorage::new(backend);
        storage
            .put_object("a.txt", b"hello".to_vec(), PutOptions::new())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_put_translates_options() {
        let mut backend = MockObjectBackend::new();
        backend
            .expect_put_raw()
            .withf(|_, _, headers| {
                headers.content_type.as_deref() == Some("text/plain")
                    && headers.content_encoding.as_deref() == Some("")
                    && headers.content_disposition.is_none()
                    && headers.content_length == Some(42)
                    && headers.tagging.as_deref() == Some("env=prod&team=infra")
            })
            .times(1)
            .returning(|_, _, _| Ok(()));

        let options = PutOptions::new()
            .content_type("text/plain")
            .content_encoding("")
            .object_size(42)
            .tag("team", "infra")
            .tag("env", "prod");
        CosStorage::new(backend)
            .put_object("a.txt", b"hello".to_vec(), options)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_put_with_reader_omits_unknown_length() {
        let mut backend = MockObjectBackend::new();
        backend
            .expect_put_raw()
            .withf(|_, body, headers| {
                matches!(body, PutBody::Reader(_)) && headers.content_length.is_none()
            })
            .times(1)
            .returning(|_, _, _| Ok(()));

        let reader: Box<dyn AsyncRead + Send + Unpin> = Box::new(&b"streamed"[..]);
        CosStorage::new(backend)
            .put_object_with_reader("s.bin", reader, PutOptions::new())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_put_failure_is_remote_error() {
        let mut backend = MockObjectBackend::new();
        backend
            .expect_put_raw()
            .returning(|_, _, _| Err(RawError::Transport("connection reset".into())));

        let err = CosStorage::new(backend)
            .put_object("a.txt", Vec::new(), PutOptions::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Remote { op: "put object", .. }));
    }

    #[tokio::test]
    async fn test_get_not_found_is_remote_error() {
        let mut backend = MockObjectBackend::new();
        backend
            .expect_get_raw()
            .returning(|_| Err(RawError::NotFound("NoSuchKey".into())));

        let err = CosStorage::new(backend).get_object("gone").await.unwrap_err();
        assert!(matches!(err, Error::Remote { .. }));
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_delete_missing_object_succeeds() {
        let mut backend = MockObjectBackend::new();
        backend
            .expect_delete_raw()
            .returning(|_| Err(RawError::NotFound("NoSuchKey".into())));
        assert!(CosStorage::new(backend).delete_object("gone").await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_transport_failure() {
        let mut backend = MockObjectBackend::new();
        backend
            .expect_delete_raw()
            .returning(|_| Err(RawError::AccessDenied("403".into())));
        let err = CosStorage::new(backend).delete_object("a").await.unwrap_err();
        assert!(matches!(err, Error::Remote { op: "delete object", .. }));
    }

    #[tokio::test]
    async fn test_head_not_found_is_sentinel() {
        let mut backend = MockObjectBackend::new();
        backend
            .expect_head_raw()
            .returning(|_| Err(RawError::NotFound("404".into())));

        let err = CosStorage::new(backend)
            .head_object("missing.txt", &GetOptions::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ObjectNotFound(ref key) if key == "missing.txt"));
    }

    #[tokio::test]
    async fn test_head_populates_metadata() {
        let mut backend = MockObjectBackend::new();
        backend.expect_head_raw().returning(|_| {
            Ok(RawHead {
                content_length: Some(10),
                last_modified: Some("Wed, 02 Oct 2002 08:00:00 GMT".into()),
                etag: Some("\"abc\"".into()),
            })
        });
        backend.expect_get_tagging_raw().never();
        backend.expect_presign_url().never();

        let info = CosStorage::new(backend)
            .head_object("a.txt", &GetOptions::new())
            .await
            .unwrap();
        assert_eq!(info.key, "a.txt");
        assert_eq!(info.size, 10);
        assert_eq!(info.etag, "abc");
        assert_eq!(info.last_modified.unwrap().as_second(), 1_033_545_600);
        assert!(info.tagging.is_none());
        assert!(info.url.is_none());
    }

    #[tokio::test]
    async fn test_head_with_tagging_and_url() {
        let mut backend = MockObjectBackend::new();
        backend.expect_head_raw().returning(|_| Ok(RawHead::default()));
        backend
            .expect_get_tagging_raw()
            .times(1)
            .returning(|_| Ok(vec![Tag::new("k1", "v1")]));
        backend
            .expect_presign_url()
            .withf(|method, key, ttl| {
                *method == HttpMethod::Get && key == "a.txt" && *ttl == Duration::from_secs(300)
            })
            .times(1)
            .returning(|_, key, _| Ok(format!("https://signed/{key}")));

        let options = GetOptions::new().with_tagging().with_url().expire(300);
        let info = CosStorage::new(backend)
            .head_object("a.txt", &options)
            .await
            .unwrap();
        assert!(info.last_modified.is_none());
        assert_eq!(info.tagging.unwrap()["k1"], "v1");
        assert_eq!(info.url.as_deref(), Some("https://signed/a.txt"));
    }

    #[tokio::test]
    async fn test_presign_default_expiry() {
        let mut backend = MockObjectBackend::new();
        backend
            .expect_presign_url()
            .withf(|_, _, ttl| *ttl == Duration::from_secs(604_800))
            .returning(|_, _, _| Ok("https://signed".into()));

        let url = CosStorage::new(backend)
            .presign_url("a.txt", &GetOptions::new())
            .await
            .unwrap();
        assert_eq!(url, "https://signed");
    }

    #[tokio::test]
    async fn test_presign_rejects_lifetime_over_one_week() {
        let mut backend = MockObjectBackend::new();
        backend.expect_presign_url().never();

        let err = CosStorage::new(backend)
            .presign_url("a.txt", &GetOptions::new().expire(14 * 24 * 60 * 60))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert_eq!(err.exit_code(), 2);
    }

    #[tokio::test]
    async fn test_bootstrap_creates_missing_bucket_once() {
        let mut backend = MockObjectBackend::new();
        backend.expect_bucket_exists().times(1).returning(|| Ok(false));
        backend.expect_create_bucket().times(1).returning(|| Ok(()));
        CosStorage::new(backend).bootstrap().await.unwrap();
    }

    #[tokio::test]
    async fn test_bootstrap_skips_existing_bucket() {
        let mut backend = MockObjectBackend::new();
        backend.expect_bucket_exists().returning(|| Ok(true));
        backend.expect_create_bucket().never();
        CosStorage::new(backend).bootstrap().await.unwrap();
    }

    #[tokio::test]
    async fn test_bootstrap_create_failure() {
        let mut backend = MockObjectBackend::new();
        backend.expect_bucket_exists().returning(|| Ok(false));
        backend
            .expect_create_bucket()
            .times(1)
            .returning(|| Err(RawError::AccessDenied("denied".into())));
        let err = CosStorage::new(backend).bootstrap().await.unwrap_err();
        assert!(matches!(err, Error::Remote { op: "create bucket", .. }));
    }
}
