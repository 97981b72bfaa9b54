//! Catalog loading from the remote document store.
//!
//! One malformed record never sinks the batch: decode failures are
//! logged and skipped, and an empty result is a valid load. Only a
//! failure of the underlying collection fetch (transport, auth,
//! timeout) fails the operation, and callers keep whatever catalog
//! they already had.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::Instrument;

use inkar_core::observability::catalog_span;
use inkar_core::{ArtistId, DocumentStore, Error, FieldFilter, Result};

use crate::config::Config;
use crate::item::{ArtistProfile, CatalogItem, FIELD_OWNER_ID, UNKNOWN_ARTIST};

/// Loads catalog items and artist profiles from the document store.
#[derive(Clone)]
pub struct CatalogLoader {
    store: Arc<dyn DocumentStore>,
    tattoo_collection: String,
    user_collection: String,
    timeout: Duration,
}

impl CatalogLoader {
    /// Creates a loader over the given store, using the configured
    /// collection names and fetch timeout.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>, config: &Config) -> Self {
        Self {
            store,
            tattoo_collection: config.tattoo_collection.clone(),
            user_collection: config.user_collection.clone(),
            timeout: config.fetch_timeout(),
        }
    }

    /// Loads every tattoo record in the catalog.
    ///
    /// # Errors
    ///
    /// Returns `Error::Fetch` or `Error::Timeout` when the collection
    /// fetch itself fails. Per-record decode failures are skipped and
    /// logged, never propagated.
    pub async fn load_all(&self) -> Result<Vec<CatalogItem>> {
        self.load(None).await
    }

    /// Loads the tattoo records owned by one artist.
    ///
    /// # Errors
    ///
    /// Same contract as [`load_all`](Self::load_all).
    pub async fn load_by_owner(&self, owner: &ArtistId) -> Result<Vec<CatalogItem>> {
        let filter = FieldFilter::equals_str(FIELD_OWNER_ID, owner.as_str());
        self.load(Some(filter)).await
    }

    async fn load(&self, filter: Option<FieldFilter>) -> Result<Vec<CatalogItem>> {
        // Entering a span guard across an await would leave the span
        // on the worker thread while this future is suspended, so the
        // whole operation is instrumented instead.
        let span = catalog_span("load", &self.tattoo_collection);
        async {
            let docs = self
                .with_timeout(
                    "query_collection",
                    self.store
                        .query_collection(&self.tattoo_collection, filter.as_ref()),
                )
                .await?;

            let mut items = Vec::with_capacity(docs.len());
            for doc in &docs {
                match CatalogItem::decode(doc) {
                    Ok(item) => items.push(item),
                    Err(err) if !err.aborts_batch() => {
                        tracing::warn!(doc = %doc.id, error = %err, "skipping malformed record");
                    }
                    Err(err) => return Err(err),
                }
            }

            tracing::info!(
                fetched = docs.len(),
                decoded = items.len(),
                "catalog loaded"
            );
            Ok(items)
        }
        .instrument(span)
        .await
    }

    /// Loads an artist's profile with the legacy fallback chain: if
    /// the user document is missing, derive the display name from any
    /// one of the artist's tattoo records; failing that, the profile
    /// is [`UNKNOWN_ARTIST`] with no contact email.
    ///
    /// # Errors
    ///
    /// Returns `Error::Fetch` or `Error::Timeout` when the store is
    /// unreachable.
    pub async fn load_artist_profile(&self, artist: &ArtistId) -> Result<ArtistProfile> {
        let span = catalog_span("load_profile", &self.user_collection);
        async {
            let doc = self
                .with_timeout(
                    "get_document",
                    self.store.get_document(&self.user_collection, artist.as_str()),
                )
                .await?;

            if let Some(doc) = doc {
                return ArtistProfile::decode(&doc);
            }

            // Fallback: any tattoo record carries the artist's name.
            let owned = self.load_by_owner(artist).await?;
            let display_name = owned
                .first()
                .map_or_else(|| UNKNOWN_ARTIST.to_string(), |item| item.owner_name.clone());

            tracing::debug!(artist = %artist, "profile derived from tattoo records");
            Ok(ArtistProfile {
                id: artist.clone(),
                display_name,
                contact_email: None,
            })
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
