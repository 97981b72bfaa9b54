//! Publishing tattoos into the catalog and removing them.
//!
//! An upload is two writes: the image goes to the blob store first,
//! then the record referencing it. If the record write fails, the
//! freshly uploaded blob is cleaned up best-effort so the store does
//! not accumulate orphans.
//!
//! Deletion is the mirror image: the record goes first (that is what
//! makes the item disappear from every catalog), then the blob. A
//! failed blob delete leaves only an unreferenced file, so it is
//! logged and swallowed.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use chrono::Utc;
use tracing::Instrument;

use inkar_core::observability::catalog_span;
use inkar_core::{BlobStore, DocumentStore, Error, Result, TattooId};

use crate::config::Config;
use crate::item::CatalogItem;
use crate::session::AuthUser;

/// A tattoo submitted for publication.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Title shown in the catalog.
    pub title: String,
    /// Tags for search.
    pub tags: Vec<String>,
    /// Encoded image bytes.
    pub image: Bytes,
}

/// Writes catalog entries and their images.
#[derive(Clone)]
pub struct CatalogPublisher {
    docs: Arc<dyn DocumentStore>,
    blobs: Arc<dyn BlobStore>,
    collection: String,
    timeout: Duration,
}

impl CatalogPublisher {
    /// Creates a publisher over the given stores.
    #[must_use]
    pub fn new(docs: Arc<dyn DocumentStore>, blobs: Arc<dyn BlobStore>, config: &Config) -> Self {
        Self {
            docs,
            blobs,
            collection: config.tattoo_collection.clone(),
            timeout: config.fetch_timeout(),
        }
    }

    /// Publishes a tattoo on behalf of the signed-in artist.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` for an empty title or image,
    /// `Error::Write` when either store write fails, and
    /// `Error::Timeout` when a write stalls past the configured
    /// deadline.
    pub async fn upload(&self, artist: &AuthUser, request: UploadRequest) -> Result<CatalogItem> {
        let span = catalog_span("upload", &self.collection);
        async move {
            let title = request.title.trim();
            if title.is_empty() {
                return Err(Error::InvalidInput("title must not be empty".to_string()));
            }
            if request.image.is_empty() {
                return Err(Error::InvalidInput("image must not be empty".to_string()));
            }

            let id = TattooId::generate();
            let path = format!("tattoos/{id}.png");
            let image_ref = self
                .with_timeout("put_blob", self.blobs.put_blob(&path, request.image))
                .await?;

            let item = CatalogItem {
                id: id.clone(),
                title: title.to_string(),
                image_ref: image_ref.clone(),
                owner_name: artist.display_name.clone(),
                owner_id: artist.id.to_string(),
                tags: request.tags,
            };

            let write = self
                .with_timeout(
                    "put_document",
                    self.docs
                        .put_document(&self.collection, id.as_str(), item.to_fields(Utc::now())),
                )
                .await;

            if let Err(err) = write {
                // Record write failed; the blob is an orphan. Clean up
                // best-effort and surface the original error.
                if let Err(cleanup) = self.blobs.delete_blob(&image_ref).await {
                    tracing::warn!(url = %image_ref, error = %cleanup, "orphaned blob cleanup failed");
                }
                return Err(err);
            }

            tracing::info!(item = %id, artist = %artist.id, "tattoo published");
            Ok(item)
        }
        .instrument(span)
        .await
    }

    /// Removes a tattoo from the catalog.
    ///
    /// Record first, blob second. The record delete is idempotent;
    /// deleting an already-removed item succeeds. A blob delete
    /// failure is logged and never propagated.
    ///
    /// # Errors
    ///
    /// Returns `Error::Write` or `Error::Timeout` only when the record
    /// delete itself fails.
    pub async fn delete(&self, id: &TattooId, image_ref: &str) -> Result<()> {
        let span = catalog_span("delete", &self.collection);
        async {
            self.with_timeout(
                "delete_document",
                self.docs.delete_document(&self.collection, id.as_str()),
            )
            .await?;

            if let Err(err) = self.blobs.delete_blob(image_ref).await {
                tracing::warn!(item = %id, url = %image_ref, error = %err, "blob delete failed");
            }

            tracing::info!(item = %id, "tattoo removed");
            Ok(())
        }
        .instrument(span)
        .await
    }

    async fn with_timeout<T>(
        &self,
        operation: &'static str,
        fut: impl Future<Output = Result<T>>,
    ) -> Result<T> {
        tokio::time::timeout(self.timeout, fut)
            .await
            .map_err(|_| Error::Timeout {
                operation,
                seconds: self.timeout.as_secs(),
            })?
    }
}
