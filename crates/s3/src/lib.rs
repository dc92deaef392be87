//! cos-s3: aws-sdk-s3 backend for cos-core
//!
//! This crate implements [`cos_core::ObjectBackend`] on top of the
//! aws-sdk-s3 crate. It is the only crate that directly depends on the
//! AWS SDK.

pub mod client;

pub use client::CosBackend;

use cos_core::{CosConfig, CosStorage, Result};

/// Build a client for the configured bucket and make sure the bucket exists.
///
/// Fails with `InvalidConfig` when the endpoint cannot be resolved, and with
/// a remote error when the bucket can be neither found nor created.
pub async fn connect(config: &CosConfig) -> Result<CosStorage<CosBackend>> {
    let storage = CosStorage::new(CosBackend::new(config).await?);
    storage.bootstrap().await?;
    Ok(storage)
}
