//! Endpoint resolution
//!
//! Derives the service URL and the virtual-hosted bucket URL from a
//! (bucket, endpoint, region) triple. Accepted endpoint shapes:
//!
//! - empty, with a region: `https://cos.<region>.myqcloud.com`
//! - a bare host: `cos.ap-beijing.myqcloud.com`
//! - a full URL, with or without a path: `http://127.0.0.1:9000/ignored`
//! - an already bucket-qualified host: `demo-bucket.cos.ap-beijing.myqcloud.com`

use url::Url;

use crate::error::{Error, Result};

/// Resolved service and bucket URLs for a COS bucket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    bucket: String,
    service_url: Url,
    /// `bucket.host[:port]`, kept as text since `b.127.0.0.1` is not a valid URL host
    bucket_host: String,
}

impl Endpoint {
    /// Resolve the endpoint for `bucket`.
    ///
    /// `endpoint` wins over `region` when both are given.
    pub fn resolve(bucket: &str, endpoint: &str, region: &str) -> Result<Self> {
        if bucket.is_empty() {
            return Err(Error::InvalidConfig("bucket name is empty".into()));
        }

        let endpoint = if endpoint.is_empty() {
            if region.is_empty() {
                return Err(Error::InvalidConfig(
                    "endpoint is empty and region is missing".into(),
                ));
            }
            format!("https://cos.{region}.myqcloud.com")
        } else if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            endpoint.to_string()
        } else {
            format!("https://{endpoint}")
        };

        let mut service_url = Url::parse(&endpoint)
            .map_err(|e| Error::InvalidConfig(format!("parse endpoint '{endpoint}': {e}")))?;
        if service_url.host_str().is_none_or(str::is_empty) {
            return Err(Error::InvalidConfig(format!("endpoint '{endpoint}' has no host")));
        }

        // Only the origin matters; credentials travel as signatures.
        let _ = service_url.set_username("");
        let _ = service_url.set_password(None);
        service_url.set_path("");
        service_url.set_query(None);
        service_url.set_fragment(None);

        let bucket = bucket.to_ascii_lowercase();
        let authority = authority(&service_url);
        let bucket_host = if authority.starts_with(&format!("{bucket}.")) {
            authority
        } else {
            format!("{bucket}.{authority}")
        };

        Ok(Self {
            bucket,
            service_url,
            bucket_host,
        })
    }

    /// Bucket name this endpoint was resolved for, lowercased
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// URL scheme, `https` unless the endpoint said otherwise
    pub fn scheme(&self) -> &str {
        self.service_url.scheme()
    }

    pub fn service_url(&self) -> &Url {
        &self.service_url
    }

    /// `scheme://bucket.host[:port]`
    pub fn bucket_url(&self) -> String {
        format!("{}://{}", self.scheme(), self.bucket_host)
    }

    /// Service host including a non-default port
    pub fn service_host(&self) -> String {
        authority(&self.service_url)
    }

    /// Bucket host including a non-default port; the bucket is always the
    /// leftmost label
    pub fn bucket_host(&self) -> &str {
        &self.bucket_host
    }

    /// Service URL with any leading bucket label removed.
    ///
    /// Virtual-hosted SDK clients prepend the bucket themselves, so they must
    /// be pointed at this URL rather than at a bucket-qualified one.
    pub fn regional_url(&self) -> String {
        let host = self.regional_host();
        match self.service_url.port() {
            Some(port) => format!("{}://{host}:{port}", self.scheme()),
            None => format!("{}://{host}", self.scheme()),
        }
    }

    /// Region embedded in a `cos.<region>.` host, if any
    pub fn region_hint(&self) -> Option<&str> {
        let mut labels = self.regional_host().split('.');
        match (labels.next(), labels.next()) {
            (Some("cos"), Some(region)) if !region.is_empty() => Some(region),
            _ => None,
        }
    }

    fn regional_host(&self) -> &str {
        let host = self.service_url.host_str().unwrap_or_default();
        host.strip_prefix(self.bucket.as_str())
            .and_then(|rest| rest.strip_prefix('.'))
            .unwrap_or(host)
    }
}

fn authority(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    }
}
