//! # inkar-catalog
//!
//! The InkAR tattoo catalog domain: loading records from the remote
//! document store, searching and paging them, and hydrating images
//! asynchronously into the browse list.
//!
//! The crate is organized around a strict ownership split:
//!
//! - **Loading** ([`loader`], [`item`]): fetch untyped records and
//!   decode them defensively, skipping malformed entries
//! - **Presentation** ([`search`], [`page`], [`view`]): pure state
//!   over the loaded collection, owned by the UI thread
//! - **Hydration** ([`hydrate`]): background image fetches that post
//!   results back through the UI queue, tagged with the render
//!   generation that asked for them
//! - **Mutation** ([`publish`], [`session`]): authenticated upload
//!   and delete flows against the document and blob stores
//!
//! All I/O goes through the traits in `inkar-core`; nothing in this
//! crate talks to a network directly.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod hydrate;
pub mod item;
pub mod loader;
pub mod page;
pub mod publish;
pub mod search;
pub mod session;
pub mod view;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::hydrate::{HydratedImage, HydrationEvent, ImageHydrator};
    pub use crate::item::{ArtistProfile, CatalogItem};
    pub use crate::loader::CatalogLoader;
    pub use crate::page::{paginate, PageView};
    pub use crate::publish::{CatalogPublisher, UploadRequest};
    pub use crate::session::{ArtistSession, AuthUser, IdentityProvider};
    pub use crate::view::{ItemAction, ListView, SlotImage, ViewState};
}

// Re-export key types at crate root for ergonomics
pub use config::Config;
pub use hydrate::{HydratedImage, HydrationEvent, ImageHydrator};
pub use item::{ArtistProfile, CatalogItem};
pub use loader::CatalogLoader;
pub use page::{paginate, PageView};
pub use publish::{CatalogPublisher, UploadRequest};
pub use session::{ArtistSession, AuthUser, IdentityProvider, MemoryIdentityProvider};
pub use view::{HydrationRequest, ItemAction, ListView, Slot, SlotImage, ViewState};
