//! COS backend on top of aws-sdk-s3
//!
//! COS speaks the S3 protocol with virtual-hosted bucket addressing, so the
//! SDK is pointed at the regional service URL and prefixes the bucket
//! itself. Every method maps SDK failures to [`RawError`]; option
//! translation and error normalization happen in `cos-core`.

use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::config::http::HttpResponse;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::BucketCannedAcl;
use aws_smithy_types::DateTime;
use aws_smithy_types::date_time::Format;
use tokio::io::AsyncReadExt;

use cos_core::{
    CosConfig, Endpoint, HttpMethod, ObjectBackend, PutBody, PutHeaders, RawError, RawHead,
    RawListing, RawObject, RawResult, Result, Tag,
};

/// Region used for request signing when none can be determined
pub const DEFAULT_SIGNING_REGION: &str = "ap-guangzhou";

/// S3 SDK backed COS client for one bucket
#[derive(Debug, Clone)]
pub struct CosBackend {
    inner: aws_sdk_s3::Client,
    bucket: String,
    endpoint: Endpoint,
}

impl CosBackend {
    /// Create a backend from a configuration.
    ///
    /// Resolves the endpoint (failing with `InvalidConfig` on bad input) and
    /// builds an SDK client with static credentials. No request is sent.
    pub async fn new(config: &CosConfig) -> Result<Self> {
        let endpoint = Endpoint::resolve(&config.bucket, &config.endpoint, &config.region)?;

        let region = if !config.region.is_empty() {
            config.region.clone()
        } else {
            endpoint
                .region_hint()
                .unwrap_or(DEFAULT_SIGNING_REGION)
                .to_string()
        };

        let credentials = aws_credential_types::Credentials::new(
            config.credentials.secret_id.clone(),
            config.credentials.secret_key.clone(),
            None, // session token
            None, // expiry
            "cos-static-credentials",
        );

        let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .credentials_provider(credentials)
            .region(aws_config::Region::new(region.clone()))
            .endpoint_url(endpoint.regional_url())
            .load()
            .await;

        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(false)
            .build();

        tracing::debug!(
            bucket = %config.bucket,
            bucket_host = %endpoint.bucket_host(),
            %region,
            "built COS client"
        );

        Ok(Self {
            inner: aws_sdk_s3::Client::from_conf(s3_config),
            bucket: config.bucket.clone(),
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }
}

#[async_trait]
impl ObjectBackend for CosBackend {
    async fn put_raw(&self, key: &str, body: PutBody, headers: PutHeaders) -> RawResult<()> {
        let data = match body {
            PutBody::Bytes(data) => data,
            PutBody::Reader(mut reader) => {
                let mut data = Vec::new();
                reader
                    .read_to_end(&mut data)
                    .await
                    .map_err(|e| RawError::Transport(format!("read upload body: {e}")))?;
                data
            }
        };

        self.inner
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(data))
            .set_content_type(headers.content_type)
            .set_content_encoding(headers.content_encoding)
            .set_content_disposition(headers.content_disposition)
            .set_content_language(headers.content_language)
            .set_expires(headers.expires.map(to_smithy_datetime))
            .set_content_length(headers.content_length)
            .set_tagging(headers.tagging)
            .send()
            .await
            .map_err(raw_error)?;

        Ok(())
    }

    async fn get_raw(&self, key: &str) -> RawResult<Vec<u8>> {
        let response = self
            .inner
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(raw_error)?;

        let data = response
            .body
            .collect()
            .await
            .map_err(|e| RawError::Transport(e.to_string()))?
            .into_bytes()
            .to_vec();

        Ok(data)
    }

    async fn delete_raw(&self, key: &str) -> RawResult<()> {
        self.inner
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(raw_error)?;

        Ok(())
    }

    async fn head_raw(&self, key: &str) -> RawResult<RawHead> {
        let response = self
            .inner
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(raw_error)?;

        Ok(RawHead {
            content_length: response.content_length(),
            last_modified: response
                .last_modified()
                .and_then(|dt| dt.fmt(Format::HttpDate).ok()),
            etag: response.e_tag().map(str::to_string),
        })
    }

    async fn list_raw(&self, prefix: &str, marker: &str, max_keys: i32) -> RawResult<RawListing> {
        let mut request = self
            .inner
            .list_objects()
            .bucket(&self.bucket)
            .prefix(prefix)
            .max_keys(max_keys);

        if !marker.is_empty() {
            request = request.marker(marker);
        }

        let response = request.send().await.map_err(raw_error)?;

        let contents: Vec<RawObject> = response
            .contents()
            .iter()
            .map(|object| RawObject {
                key: object.key().unwrap_or_default().to_string(),
                size: object.size().unwrap_or(0),
                last_modified: object
                    .last_modified()
                    .and_then(|dt| dt.fmt(Format::DateTime).ok())
                    .unwrap_or_default(),
                etag: object.e_tag().unwrap_or_default().to_string(),
            })
            .collect();

        let is_truncated = response.is_truncated().unwrap_or(false);

        // Without a delimiter plain S3 omits NextMarker; resume after the last key.
        let next_marker = match response.next_marker() {
            Some(marker) if !marker.is_empty() => marker.to_string(),
            _ if is_truncated => contents.last().map(|o| o.key.clone()).unwrap_or_default(),
            _ => String::new(),
        };

        Ok(RawListing {
            contents,
            next_marker,
            is_truncated,
        })
    }

    async fn get_tagging_raw(&self, key: &str) -> RawResult<Vec<Tag>> {
        let response = self
            .inner
            .get_object_tagging()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(raw_error)?;

        Ok(response
            .tag_set()
            .iter()
            .map(|tag| Tag::new(tag.key(), tag.value()))
            .collect())
    }

    async fn presign_url(&self, method: HttpMethod, key: &str, ttl: Duration) -> RawResult<String> {
        let config = PresigningConfig::expires_in(ttl)
            .map_err(|e| RawError::Transport(format!("presign config: {e}")))?;

        let request = match method {
            HttpMethod::Get => self
                .inner
                .get_object()
                .bucket(&self.bucket)
                .key(key)
                .presigned(config)
                .await
                .map_err(raw_error)?,
            HttpMethod::Put => self
                .inner
                .put_object()
                .bucket(&self.bucket)
                .key(key)
                .presigned(config)
                .await
                .map_err(raw_error)?,
            HttpMethod::Head => self
                .inner
                .head_object()
                .bucket(&self.bucket)
                .key(key)
                .presigned(config)
                .await
                .map_err(raw_error)?,
            HttpMethod::Delete => self
                .inner
                .delete_object()
                .bucket(&self.bucket)
                .key(key)
                .presigned(config)
                .await
                .map_err(raw_error)?,
        };

        Ok(request.uri().to_string())
    }

    async fn bucket_exists(&self) -> RawResult<bool> {
        match self.inner.head_bucket().bucket(&self.bucket).send().await {
            Ok(_) => Ok(true),
            Err(e) => match raw_error(e) {
                RawError::NotFound(_) => Ok(false),
                other => Err(other),
            },
        }
    }

    async fn create_bucket(&self) -> RawResult<()> {
        self.inner
            .create_bucket()
            .bucket(&self.bucket)
            .acl(BucketCannedAcl::Private)
            .send()
            .await
            .map_err(raw_error)?;

        Ok(())
    }
}

/// Classify an SDK failure by HTTP status and service error code
fn raw_error<E>(err: SdkError<E, HttpResponse>) -> RawError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
{
    let status = err.raw_response().map(|r| r.status().as_u16());
    let code = err.as_service_error().and_then(|e| e.code()).map(str::to_string);
    let message = DisplayErrorContext(&err).to_string();
    classify(status, code.as_deref(), message)
}

fn classify(status: Option<u16>, code: Option<&str>, message: String) -> RawError {
    match (status, code) {
        (Some(404), _) | (_, Some("NoSuchKey" | "NotFound" | "NoSuchBucket")) => {
            RawError::NotFound(message)
        }
        (Some(403), _) | (_, Some("AccessDenied" | "InvalidAccessKeyId" | "SignatureDoesNotMatch")) => {
            RawError::AccessDenied(message)
        }
        _ => RawError::Transport(message),
    }
}

fn to_smithy_datetime(ts: jiff::Timestamp) -> DateTime {
    DateTime::from_secs(ts.as_second())
}
