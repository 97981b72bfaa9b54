//! The browse-list view model.
//!
//! Rendering is teardown-then-rebuild: every data, query, or page
//! change discards all slots and rebuilds the visible window from
//! scratch, so a slot can never carry bindings or images from a
//! previous render. Each rebuild bumps the render generation; image
//! results arriving with an older generation are discarded on apply.
//!
//! The view owns no I/O. Callers run the loader and the hydrator,
//! then feed results back in through [`ListView::apply_load`] and
//! [`ListView::apply_hydration`].

use inkar_core::{Result, TattooId};

use crate::hydrate::{HydratedImage, HydrationEvent};
use crate::item::CatalogItem;
use crate::page::paginate;
use crate::search;

/// What the list is currently showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    /// No items to show (fresh view, or the catalog is empty).
    Empty,
    /// A refresh is in flight; existing slots stay visible.
    Loading,
    /// Slots are populated from the current page.
    Populated,
}

/// Image state of one slot.
#[derive(Debug, Clone)]
pub enum SlotImage {
    /// Hydration not yet resolved; show the placeholder.
    Placeholder,
    /// Image fetched and decoded.
    Ready(HydratedImage),
    /// Hydration failed; the placeholder stays.
    Failed,
}

/// One rendered row of the visible page.
#[derive(Debug, Clone)]
pub struct Slot {
    item: CatalogItem,
    image: SlotImage,
}

impl Slot {
    /// The item bound to this slot.
    #[must_use]
    pub const fn item(&self) -> &CatalogItem {
        &self.item
    }

    /// Current image state.
    #[must_use]
    pub const fn image(&self) -> &SlotImage {
        &self.image
    }
}

/// A user action emitted by pressing one of a slot's controls.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemAction {
    /// Open the item for preview.
    Select(CatalogItem),
    /// Open the owning artist's profile.
    ViewArtist {
        /// Owner's artist ID; empty when the record predates
        /// attribution.
        artist_id: String,
        /// Owner's display name.
        artist_name: String,
    },
    /// Remove the item from the catalog.
    Delete(TattooId),
}

/// An image fetch the renderer wants for a freshly built slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HydrationRequest {
    /// Item the slot shows.
    pub item_id: TattooId,
    /// Image URL to fetch.
    pub image_ref: String,
    /// Generation the request belongs to.
    pub generation: u64,
}

/// State machine for the paged, searchable catalog list.
#[derive(Debug)]
pub struct ListView {
    all: Vec<CatalogItem>,
    query: String,
    page: usize,
    page_size: usize,
    total_pages: usize,
    generation: u64,
    slots: Vec<Slot>,
    state: ViewState,
}

impl ListView {
    /// Creates an empty view with the given page size.
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        Self {
            all: Vec::new(),
            query: String::new(),
            page: 0,
            page_size,
            total_pages: 1,
            generation: 0,
            slots: Vec::new(),
            state: ViewState::Empty,
        }
    }

    /// Current view state.
    #[must_use]
    pub const fn state(&self) -> ViewState {
        self.state
    }

    /// Current render generation.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Slots of the visible page, in display order.
    #[must_use]
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Zero-indexed page currently shown.
    #[must_use]
    pub const fn page(&self) -> usize {
        self.page
    }

    /// Total pages for the current filter; at least 1.
    #[must_use]
    pub const fn total_pages(&self) -> usize {
        self.total_pages
    }

    /// Whether a previous page exists.
    #[must_use]
    pub const fn can_prev(&self) -> bool {
        self.page > 0
    }

    /// Whether a next page exists.
    #[must_use]
    pub const fn can_next(&self) -> bool {
        self.page + 1 < self.total_pages
    }

    /// Marks a refresh in flight. Existing slots stay visible so the
    /// user keeps a (stale) catalog while the fetch runs.
    pub fn begin_refresh(&mut self) {
        self.state = ViewState::Loading;
    }

    /// Applies the outcome of a catalog load.
    ///
    /// On success the whole collection is replaced, the page index is
    /// re-clamped against the new filtered length, and the visible
    /// window is rebuilt. On failure the previous contents stay and
    /// the error is handed back for the caller to surface.
    ///
    /// # Errors
    ///
    /// Propagates the load error unchanged.
    pub fn apply_load(&mut self, result: Result<Vec<CatalogItem>>) -> Result<()> {
        match result {
            Ok(items) => {
                self.all = items;
                // rebuild() re-clamps the page against the new
                // filtered length.
                self.rebuild();
                Ok(())
            }
            Err(err) => {
                // Stale data beats a blank screen.
                self.state = if self.all.is_empty() {
                    ViewState::Empty
                } else {
                    ViewState::Populated
                };
                Err(err)
            }
        }
    }

    /// Replaces the search query and jumps back to the first page.
    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
        self.page = 0;
        self.rebuild();
    }

    /// Active search query.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Advances one page if possible. Returns whether the page moved.
    pub fn next_page(&mut self) -> bool {
        if !self.can_next() {
            return false;
        }
        self.page += 1;
        self.rebuild();
        true
    }

    /// Goes back one page if possible. Returns whether the page moved.
    pub fn prev_page(&mut self) -> bool {
        if !self.can_prev() {
            return false;
        }
        self.page -= 1;
        self.rebuild();
        true
    }

    /// Image fetches wanted for the current slots, one per slot still
    /// showing a placeholder.
    #[must_use]
    pub fn hydration_requests(&self) -> Vec<HydrationRequest> {
        self.slots
            .iter()
            .filter(|slot| matches!(slot.image, SlotImage::Placeholder))
            .map(|slot| HydrationRequest {
                item_id: slot.item.id.clone(),
                image_ref: slot.item.image_ref.clone(),
                generation: self.generation,
            })
            .collect()
    }

    /// Applies one hydration result. Returns whether a slot took it.
    ///
    /// Discards silently when the generation is stale or no current
    /// slot shows the item; both mean the render that asked for the
    /// image is gone.
    pub fn apply_hydration(&mut self, event: HydrationEvent) -> bool {
        if event.generation != self.generation {
            tracing::debug!(item = %event.item_id, "stale hydration discarded");
            return false;
        }
        let Some(slot) = self
            .slots
            .iter_mut()
            .find(|slot| slot.item.id == event.item_id)
        else {
            return false;
        };
        slot.image = match event.result {
            Ok(image) => SlotImage::Ready(image),
            Err(_) => SlotImage::Failed,
        };
        true
    }

    /// Emits the select action for the slot at `index`.
    #[must_use]
    pub fn press_select(&self, index: usize) -> Option<ItemAction> {
        self.slots
            .get(index)
            .map(|slot| ItemAction::Select(slot.item.clone()))
    }

    /// Emits the view-artist action for the slot at `index`.
    #[must_use]
    pub fn press_view_artist(&self, index: usize) -> Option<ItemAction> {
        self.slots.get(index).map(|slot| ItemAction::ViewArtist {
            artist_id: slot.item.owner_id.clone(),
            artist_name: slot.item.owner_name.clone(),
        })
    }

    /// Emits the delete action for the slot at `index`.
    #[must_use]
    pub fn press_delete(&self, index: usize) -> Option<ItemAction> {
        self.slots
            .get(index)
            .map(|slot| ItemAction::Delete(slot.item.id.clone()))
    }

    /// Discards every slot and rebuilds the visible window. The
    /// generation bump invalidates all in-flight image fetches.
    ///
    /// The filtered sequence is derived here, never stored: it
    /// changes under us whenever the query or the collection does.
    fn rebuild(&mut self) {
        self.generation += 1;
        self.slots.clear();

        let filtered = search::filter(&self.all, &self.query);
        let view = paginate(&filtered, self.page_size, self.page);
        self.page = view.page;
        self.total_pages = view.total_pages;

        for item in view.items {
            self.slots.push(Slot {
                item: item.clone(),
                image: SlotImage::Placeholder,
            });
        }

        self.state = if self.slots.is_empty() {
            ViewState::Empty
        } else {
            ViewState::Populated
        };
    }
}
