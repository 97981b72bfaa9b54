//! Remote document store abstraction.
//!
//! The catalog reads artist and tattoo metadata from a vendor-owned
//! document database. This module defines the contract the catalog
//! needs from it, nothing more: collection queries with an optional
//! field-equality filter, point reads, writes, and idempotent deletes.
//!
//! The wire format of records is vendor-defined; records surface here
//! as untyped JSON field maps and are decoded defensively downstream.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;
use std::time::Duration;

use crate::error::{Error, Result};

/// A raw record fetched from the document store.
///
/// The document ID is assigned by the store and travels alongside the
/// field map, matching stores where the ID is not part of the record
/// body.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDocument {
    /// Store-assigned document ID.
    pub id: String,
    /// Untyped record fields.
    pub fields: Map<String, Value>,
}

impl RawDocument {
    /// Creates a raw document from an ID and field map.
    #[must_use]
    pub fn new(id: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Returns a string field, if present and a string.
    #[must_use]
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(Value::as_str)
    }

    /// Returns a bool field, defaulting to `false` when absent or not
    /// a bool.
    #[must_use]
    pub fn get_bool(&self, field: &str) -> bool {
        self.fields
            .get(field)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Returns the string elements of an array field, skipping
    /// non-string entries. Absent field yields an empty vec.
    #[must_use]
    pub fn get_str_array(&self, field: &str) -> Vec<String> {
        self.fields
            .get(field)
            .and_then(Value::as_array)
            .map(|values| {
                values
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Field-equality filter for collection queries.
///
/// This is the only query shape the catalog needs: tattoos filtered
/// by owning artist.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldFilter {
    /// Field name to test.
    pub field: String,
    /// Value the field must equal.
    pub equals: Value,
}

impl FieldFilter {
    /// Creates an equality filter on a string field.
    #[must_use]
    pub fn equals_str(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            equals: Value::String(value.into()),
        }
    }

    /// Returns true when the document satisfies the filter.
    #[must_use]
    pub fn matches(&self, doc: &RawDocument) -> bool {
        doc.fields.get(&self.field) == Some(&self.equals)
    }
}

/// Remote document store contract.
///
/// All operations may fail with a transport/auth error (`Error::Fetch`
/// for reads, `Error::Write` for writes). A successful query may
/// return zero records.
#[async_trait]
pub trait DocumentStore: Send + Sync + 'static {
    /// Fetches all records of a collection, optionally narrowed by a
    /// field-equality filter.
    async fn query_collection(
        &self,
        collection: &str,
        filter: Option<&FieldFilter>,
    ) -> Result<Vec<RawDocument>>;

    /// Fetches a single document. Returns `Ok(None)` when the document
    /// does not exist.
    async fn get_document(&self, collection: &str, id: &str) -> Result<Option<RawDocument>>;

    /// Creates or replaces a document.
    async fn put_document(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> Result<()>;

    /// Deletes a document.
    ///
    /// Succeeds even if the document doesn't exist (idempotent;
    /// callers must tolerate retry-safe re-delete).
    async fn delete_document(&self, collection: &str, id: &str) -> Result<()>;
}

/// In-memory document store for testing.
///
/// Thread-safe via `RwLock`. Not suitable for production. Supports
/// fault injection: `set_offline` makes every call fail with a fetch
/// or write error, and `set_latency` delays every call to exercise
/// timeout handling under `tokio::time::pause`.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<String, HashMap<String, Map<String, Value>>>>,
    offline: AtomicBool,
    latency: RwLock<Option<Duration>>,
}

impl MemoryDocumentStore {
    /// Creates a new empty memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates a transport outage: subsequent calls fail.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Delays every subsequent call by the given duration.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned (test-only type).
    pub fn set_latency(&self, latency: Option<Duration>) {
        *self.latency.write().expect("latency lock poisoned") = latency;
    }

    /// Seeds a document directly, bypassing fault injection.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned (test-only type).
    pub fn seed(&self, collection: &str, id: &str, fields: Map<String, Value>) {
        self.collections
            .write()
            .expect("store lock poisoned")
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), fields);
    }

    async fn checkpoint(&self, write: bool) -> Result<()> {
        let latency = {
            let guard = self
                .latency
                .read()
                .map_err(|_| Error::internal("latency lock poisoned"))?;
            *guard
        };
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        if self.offline.load(Ordering::SeqCst) {
            return Err(if write {
                Error::write("document store unavailable")
            } else {
                Error::fetch("document store unavailable")
            });
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn query_collection(
        &self,
        collection: &str,
        filter: Option<&FieldFilter>,
    ) -> Result<Vec<RawDocument>> {
        self.checkpoint(false).await?;

        let collections = self
            .collections
            .read()
            .map_err(|_| Error::internal("store lock poisoned"))?;

        let Some(docs) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        let mut result: Vec<RawDocument> = docs
            .iter()
            .map(|(id, fields)| RawDocument::new(id.clone(), fields.clone()))
            .filter(|doc| filter.is_none_or(|f| f.matches(doc)))
            .collect();
        // HashMap iteration order is arbitrary; return a stable order
        // so list-level tests are deterministic.
        result.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(result)
    }

    async fn get_document(&self, collection: &str, id: &str) -> Result<Option<RawDocument>> {
        self.checkpoint(false).await?;

        let collections = self
            .collections
            .read()
            .map_err(|_| Error::internal("store lock poisoned"))?;

        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(|fields| RawDocument::new(id, fields.clone())))
    }

    async fn put_document(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> Result<()> {
        self.checkpoint(true).await?;

        self.collections
            .write()
            .map_err(|_| Error::internal("store lock poisoned"))?
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), fields);
        Ok(())
    }

    async fn delete_document(&self, collection: &str, id: &str) -> Result<()> {
        self.checkpoint(true).await?;

        if let Some(docs) = self
            .collections
            .write()
            .map_err(|_| Error::internal("store lock poisoned"))?
            .get_mut(collection)
        {
            docs.remove(id);
        }
        Ok(())
    }
}
