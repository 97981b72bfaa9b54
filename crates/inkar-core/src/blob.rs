//! Remote blob store abstraction for image assets.
//!
//! Tattoo images live in a vendor-owned blob store and are addressed
//! by URL. The store gives no content-type guarantees, so callers
//! decode fetched bytes defensively.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;
use std::time::Duration;

use crate::error::{Error, Result};

/// Remote blob store contract.
#[async_trait]
pub trait BlobStore: Send + Sync + 'static {
    /// Fetches raw image bytes from a URL.
    ///
    /// No content-type validation is guaranteed; the caller decodes
    /// defensively.
    async fn fetch_image(&self, url: &str) -> Result<Bytes>;

    /// Uploads bytes under a path and returns the public URL.
    async fn put_blob(&self, path: &str, data: Bytes) -> Result<String>;

    /// Deletes a blob by URL. Best-effort: callers must not treat a
    /// failure here as rolling back a prior successful document
    /// delete.
    async fn delete_blob(&self, url: &str) -> Result<()>;
}

/// In-memory blob store for testing.
///
/// URLs take the form `memory://blobs/{path}`. Counts fetches per URL
/// so cache tests can assert that hydration hits the store exactly
/// once, and supports fault injection for outage and best-effort
/// delete-failure paths.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: RwLock<HashMap<String, Bytes>>,
    fetch_count: AtomicUsize,
    offline: AtomicBool,
    fail_deletes: AtomicBool,
}

impl MemoryBlobStore {
    /// Creates a new empty memory blob store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the URL a path will be served under.
    #[must_use]
    pub fn url_for(path: &str) -> String {
        format!("memory://blobs/{path}")
    }

    /// Seeds a blob directly, bypassing fault injection.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned (test-only type).
    pub fn seed(&self, path: &str, data: Bytes) -> String {
        let url = Self::url_for(path);
        self.blobs
            .write()
            .expect("blob lock poisoned")
            .insert(url.clone(), data);
        url
    }

    /// Number of `fetch_image` calls served so far.
    #[must_use]
    pub fn fetch_count(&self) -> usize {
        self.fetch_count.load(Ordering::SeqCst)
    }

    /// Simulates a transport outage: subsequent fetches and puts fail.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Makes subsequent `delete_blob` calls fail (best-effort path).
    pub fn set_fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    /// Returns true if a blob exists at the given URL.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned (test-only type).
    #[must_use]
    pub fn contains(&self, url: &str) -> bool {
        self.blobs
            .read()
            .expect("blob lock poisoned")
            .contains_key(url)
    }

    /// Number of blobs currently stored.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned (test-only type).
    #[must_use]
    pub fn blob_count(&self) -> usize {
        self.blobs.read().expect("blob lock poisoned").len()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn fetch_image(&self, url: &str) -> Result<Bytes> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(Error::image_fetch(url, "blob store unavailable"));
        }
        self.fetch_count.fetch_add(1, Ordering::SeqCst);

        let blobs = self
            .blobs
            .read()
            .map_err(|_| Error::internal("blob lock poisoned"))?;
        blobs
            .get(url)
            .cloned()
            .ok_or_else(|| Error::image_fetch(url, "blob not found"))
    }

    async fn put_blob(&self, path: &str, data: Bytes) -> Result<String> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(Error::write("blob store unavailable"));
        }
        let url = Self::url_for(path);
        self.blobs
            .write()
            .map_err(|_| Error::internal("blob lock poisoned"))?
            .insert(url.clone(), data);
        Ok(url)
    }

    async fn delete_blob(&self, url: &str) -> Result<()> {
        if self.fail_deletes.load(Ordering::SeqCst) || self.offline.load(Ordering::SeqCst) {
            return Err(Error::write(format!("failed to delete blob {url}")));
        }
        self.blobs
            .write()
            .map_err(|_| Error::internal("blob lock poisoned"))?
            .remove(url);
        Ok(())
    }
}

/// HTTP-backed blob store for real image URLs.
///
/// Thin wrapper over `reqwest` with a per-client timeout. The upload
/// side assumes the store accepts plain `PUT`/`DELETE` on the blob
/// URL; vendor stores needing signed requests implement [`BlobStore`]
/// themselves.
#[derive(Debug, Clone)]
pub struct HttpBlobStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBlobStore {
    /// Creates an HTTP blob store rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::internal(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl BlobStore for HttpBlobStore {
    async fn fetch_image(&self, url: &str) -> Result<Bytes> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::image_fetch(url, e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::image_fetch(
                url,
                format!("unexpected status {}", response.status()),
            ));
        }

        response
            .bytes()
            .await
            .map_err(|e| Error::image_fetch(url, e.to_string()))
    }

    async fn put_blob(&self, path: &str, data: Bytes) -> Result<String> {
        let url = format!("{}/{path}", self.base_url);
        let response = self
            .client
            .put(&url)
            .body(data)
            .send()
            .await
            .map_err(|e| Error::write_with_source(format!("blob upload to {url} failed"), e))?;

        if !response.status().is_success() {
            return Err(Error::write(format!(
                "blob upload to {url} failed: status {}",
                response.status()
            )));
        }
        Ok(url)
    }

    async fn delete_blob(&self, url: &str) -> Result<()> {
        let response = self
            .client
            .delete(url)
            .send()
            .await
            .map_err(|e| Error::write_with_source(format!("blob delete of {url} failed"), e))?;

        // 404 on delete is fine: the blob is already gone.
        if !response.status().is_success() && response.status() != reqwest::StatusCode::NOT_FOUND {
            return Err(Error::write(format!(
                "blob delete of {url} failed: status {}",
                response.status()
            )));
        }
        Ok(())
    }
}
