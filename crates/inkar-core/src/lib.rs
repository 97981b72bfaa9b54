//! # inkar-core
//!
//! Core abstractions for the InkAR tattoo catalog.
//!
//! This crate provides the foundational types and traits used across
//! all InkAR components:
//!
//! - **Identifiers**: Strongly-typed IDs for tattoos and artists
//! - **Storage Traits**: Abstract document and blob store interfaces,
//!   with in-memory backends for tests and an HTTP blob store
//! - **UI Dispatch**: The single-threaded re-entry queue background
//!   completions post through
//! - **Error Types**: Shared error definitions and result types
//!
//! ## Crate Boundary
//!
//! `inkar-core` is the only crate allowed to define shared primitives.
//! The catalog domain (loading, search, pagination, hydration) lives in
//! `inkar-catalog` and talks to remote services exclusively through the
//! traits defined here.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![warn(clippy::pedantic)]

pub mod blob;
pub mod dispatch;
pub mod error;
pub mod id;
pub mod observability;
pub mod store;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::blob::{BlobStore, HttpBlobStore, MemoryBlobStore};
    pub use crate::dispatch::{UiQueue, UiSender};
    pub use crate::error::{Error, Result};
    pub use crate::id::{ArtistId, TattooId};
    pub use crate::store::{DocumentStore, FieldFilter, MemoryDocumentStore, RawDocument};
}

// Re-export key types at crate root for ergonomics
pub use blob::{BlobStore, HttpBlobStore, MemoryBlobStore};
pub use dispatch::{UiQueue, UiSender};
pub use error::{Error, Result};
pub use id::{ArtistId, TattooId};
pub use observability::{init_logging, LogFormat};
pub use store::{DocumentStore, FieldFilter, MemoryDocumentStore, RawDocument};
