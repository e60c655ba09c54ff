//! Category and free-text filtering of a collection.

use std::collections::BTreeSet;

use crate::source::Record;

/// The synthetic category that disables category filtering.
pub const ALL_CATEGORIES: &str = "All";

/// Select the records matching `category` and `search`.
///
/// A category other than [`ALL_CATEGORIES`] must match exactly.  A non-empty
/// search must occur, case-insensitively, in the title or the body.  Both
/// conditions must hold; an empty result is fine.
pub fn filter<'a, T: Record>(items: &'a [T], category: &str, search: &str) -> Vec<&'a T> {
    let needle = search.to_lowercase();

    items
        .iter()
        .filter(|item| category == ALL_CATEGORIES || item.category() == Some(category))
        .filter(|item| {
            needle.is_empty()
                || contains_folded(item.title(), &needle)
                || contains_folded(item.body(), &needle)
        })
        .collect()
}

fn contains_folded(haystack: Option<&str>, needle: &str) -> bool {
    haystack.is_some_and(|h| h.to_lowercase().contains(needle))
}

/// The category options for a collection: `"All"` followed by the distinct
/// non-empty categories in ascending order.
pub fn categories<T: Record>(items: &[T]) -> Vec<String> {
    let distinct: BTreeSet<&str> = items.iter().filter_map(|item| item.category()).collect();

    std::iter::once(ALL_CATEGORIES)
        .chain(distinct)
        .map(String::from)
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
