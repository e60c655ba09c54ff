//! Fixed-size pagination and the page navigation bar.

/// Records per page.
pub const PAGE_SIZE: usize = 8;

/// Numbered entries shown around the current page.
const WINDOW: usize = 5;

/// One page of a filtered result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    /// 1-based page number after clamping.
    pub number: usize,
    pub total_pages: usize,
}

/// Number of pages needed for `count` records; never less than one.
pub fn total_pages(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size.max(1)).max(1)
}

/// Clamp `page` into `1..=total_pages`.
pub fn clamp_page(page: usize, count: usize, page_size: usize) -> usize {
    page.clamp(1, total_pages(count, page_size))
}

/// Slice page `page` out of `items`, clamping out-of-range requests.
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> Page<'_, T> {
    let page_size = page_size.max(1);
    let total_pages = total_pages(items.len(), page_size);
    let number = page.clamp(1, total_pages);

    let start = ((number - 1) * page_size).min(items.len());
    let end = (start + page_size).min(items.len());

    Page {
        items: &items[start..end],
        number,
        total_pages,
    }
}

/// One control in the page navigation bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavEntry {
    /// Go to `target`; disabled on the first page.
    Previous { target: usize, enabled: bool },
    /// A numbered page, including the first/last shortcuts.
    Page { number: usize, current: bool },
    /// Skipped pages between a shortcut and the window.
    Ellipsis,
    /// Go to `target`; disabled on the last page.
    Next { target: usize, enabled: bool },
}

/// Build the navigation bar for `total_count` records.
///
/// Returns `None` when everything fits on one page.  Otherwise: Previous,
/// a window of up to five pages around the current one (shifted near the
/// edges so it stays five wide), first/last shortcuts with an ellipsis
/// where the window leaves a gap, and Next.
pub fn page_descriptor(total_count: usize, current: usize, page_size: usize) -> Option<Vec<NavEntry>> {
    let total = total_pages(total_count, page_size);
    if total <= 1 {
        return None;
    }
    let current = current.clamp(1, total);

    let mut start = current.saturating_sub(WINDOW / 2).max(1);
    let end = (start + WINDOW - 1).min(total);
    if end + 1 - start < WINDOW {
        start = (end + 1).saturating_sub(WINDOW).max(1);
    }

    let mut entries = vec![NavEntry::Previous {
        target: current - 1,
        enabled: current > 1,
    }];

    if start > 1 {
        entries.push(NavEntry::Page { number: 1, current: false });
        if start > 2 {
            entries.push(NavEntry::Ellipsis);
        }
    }

    entries.extend((start..=end).map(|number| NavEntry::Page {
        number,
        current: number == current,
    }));

    if end < total {
        if end + 1 < total {
            entries.push(NavEntry::Ellipsis);
        }
        entries.push(NavEntry::Page { number: total, current: false });
    }

    entries.push(NavEntry::Next {
        target: current + 1,
        enabled: current < total,
    });

    Some(entries)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
