//! Fixed-size pagination over the filtered item sequence.
//!
//! Pages are zero-indexed windows. The requested page index is always
//! clamped before slicing; callers are not trusted to pass a valid
//! index, because the filtered length changes under them whenever the
//! query or the underlying collection changes.

/// One page of a larger sequence, with navigation enablement derived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView<'a, T> {
    /// Items visible on this page.
    pub items: &'a [T],
    /// The (clamped) page index actually shown.
    pub page: usize,
    /// Total number of pages; at least 1 even when empty.
    pub total_pages: usize,
    /// Whether a previous page exists.
    pub can_prev: bool,
    /// Whether a next page exists.
    pub can_next: bool,
}

/// Slices `items` into the `page`-th window of `page_size` items.
///
/// `total_pages` is `max(1, ceil(len / page_size))`; the requested
/// page is clamped into `[0, total_pages - 1]`. Never panics: a zero
/// `page_size` (rejected upstream by config validation) degrades to a
/// single page holding everything.
#[must_use]
pub fn paginate<T>(items: &[T], page_size: usize, page: usize) -> PageView<'_, T> {
    if page_size == 0 {
        return PageView {
            items,
            page: 0,
            total_pages: 1,
            can_prev: false,
            can_next: false,
        };
    }

    let total_pages = items.len().div_ceil(page_size).max(1);
    let page = page.min(total_pages - 1);

    let start = page * page_size;
    let end = items.len().min(start + page_size);
    // start <= end always holds: page is clamped, so start < len or
    // the list is empty and start == 0 == end.
    let visible = &items[start.min(items.len())..end];

    PageView {
        items: visible,
        page,
        total_pages,
        can_prev: page > 0,
        can_next: page < total_pages - 1,
    }
}
