//! In-memory backend for unit tests
//!
//! Behaves like a single bucket with marker-based listing, and records how
//! many tagging calls were in flight at once.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncReadExt;

use crate::backend::{
    HttpMethod, ObjectBackend, PutBody, PutHeaders, RawError, RawHead, RawListing, RawObject,
    RawResult, Tag,
};

#[derive(Default)]
pub(crate) struct MemoryBackend {
    objects: Mutex<BTreeMap<String, Vec<u8>>>,
    tags: Mutex<HashMap<String, Vec<Tag>>>,
    failing_tags: Mutex<HashSet<String>>,
    latency: Option<Duration>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    list_calls: AtomicUsize,
}

impl MemoryBackend {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Delay every tagging call, so concurrent calls overlap
    pub(crate) fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub(crate) fn insert(&self, key: &str, data: Vec<u8>) {
        self.objects.lock().unwrap().insert(key.to_string(), data);
    }

    pub(crate) fn set_tags(&self, key: &str, tags: Vec<Tag>) {
        self.tags.lock().unwrap().insert(key.to_string(), tags);
    }

    pub(crate) fn fail_tagging_for(&self, key: &str) {
        self.failing_tags.lock().unwrap().insert(key.to_string());
    }

    pub(crate) fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    pub(crate) fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn contains(&self, key: &str) -> bool {
        self.objects.lock().unwrap().contains_key(key)
    }
}

#[async_trait]
impl ObjectBackend for MemoryBackend {
    async fn put_raw(&self, key: &str, body: PutBody, _headers: PutHeaders) -> RawResult<()> {
        let data = match body {
            PutBody::Bytes(data) => data,
            PutBody::Reader(mut reader) => {
                let mut data = Vec::new();
                reader
                    .read_to_end(&mut data)
                    .await
                    .map_err(|e| RawError::Transport(e.to_string()))?;
                data
            }
        };
        self.insert(key, data);
        Ok(())
    }

    async fn get_raw(&self, key: &str) -> RawResult<Vec<u8>> {
        self.objects
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or_else(|| RawError::NotFound(key.to_string()))
    }

    async fn delete_raw(&self, key: &str) -> RawResult<()> {
        self.objects.lock().unwrap().remove(key);
        Ok(())
    }

    async fn head_raw(&self, key: &str) -> RawResult<RawHead> {
        let objects = self.objects.lock().unwrap();
        let data = objects
            .get(key)
            .ok_or_else(|| RawError::NotFound(key.to_string()))?;
        Ok(RawHead {
            content_length: Some(data.len() as i64),
            last_modified: Some("Wed, 02 Oct 2002 08:00:00 GMT".to_string()),
            etag: Some(format!("\"{}\"", data.len())),
        })
    }

    async fn list_raw(&self, prefix: &str, marker: &str, max_keys: i32) -> RawResult<RawListing> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let objects = self.objects.lock().unwrap();
        let mut matching = objects
            .iter()
            .filter(|(key, _)| key.starts_with(prefix) && key.as_str() > marker);

        let contents: Vec<RawObject> = matching
            .by_ref()
            .take(max_keys.max(0) as usize)
            .map(|(key, data)| RawObject {
                key: key.clone(),
                size: data.len() as i64,
                last_modified: "2025-01-02T03:04:05.000Z".to_string(),
                etag: "\"etag\"".to_string(),
            })
            .collect();
        let is_truncated = matching.next().is_some();
        let next_marker = if is_truncated {
            contents.last().map(|o| o.key.clone()).unwrap_or_default()
        } else {
            String::new()
        };

        Ok(RawListing {
            contents,
            next_marker,
            is_truncated,
        })
    }

    async fn get_tagging_raw(&self, key: &str) -> RawResult<Vec<Tag>> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing_tags.lock().unwrap().contains(key) {
            return Err(RawError::Transport(format!("tagging failed for {key}")));
        }
        Ok(self.tags.lock().unwrap().get(key).cloned().unwrap_or_default())
    }

    async fn presign_url(&self, method: HttpMethod, key: &str, ttl: Duration) -> RawResult<String> {
        Ok(format!(
            "memory://bucket/{key}?method={method}&expires={}",
            ttl.as_secs()
        ))
    }

    async fn bucket_exists(&self) -> RawResult<bool> {
        Ok(true)
    }

    async fn create_bucket(&self) -> RawResult<()> {
        Ok(())
    }
}
