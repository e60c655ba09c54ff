//! In-memory collection cache.
//!
//! Each collection is fetched at most once per session while it holds
//! records: [`CollectionCache::ensure_loaded`] only asks for a fetch when the
//! collection is empty and no fetch is already in flight.  There is no
//! invalidation or refresh; a failed or empty load is retried only when the
//! section is activated again.

use chrono::{DateTime, Local};
use serde_json::Value;

use crate::error::FetchError;
use crate::source::{decode_records, BlogPost, ItemId, ItemKind, Record, SourceCode};

/// Where a collection is in its one-shot lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// Never requested.
    Idle,
    /// A fetch is in flight.
    Loading,
    /// The last fetch succeeded.
    Loaded { at: DateTime<Local> },
    /// The last fetch failed; the collection is empty.
    Failed,
}

/// One cached collection.
#[derive(Debug, Clone)]
pub struct Collection<T> {
    pub items: Vec<T>,
    pub status: LoadStatus,
}

impl<T: Record> Collection<T> {
    fn new() -> Self {
        Self {
            items: Vec::new(),
            status: LoadStatus::Idle,
        }
    }

    fn ensure_loaded(&mut self) -> bool {
        if !self.items.is_empty() || self.status == LoadStatus::Loading {
            return false;
        }
        self.status = LoadStatus::Loading;
        true
    }

    fn complete(&mut self, result: Result<Value, FetchError>) -> Result<usize, FetchError> {
        match result.and_then(decode_records::<T>) {
            Ok(items) => {
                let count = items.len();
                self.items = items;
                self.status = LoadStatus::Loaded { at: Local::now() };
                Ok(count)
            }
            Err(e) => {
                self.items.clear();
                self.status = LoadStatus::Failed;
                Err(e)
            }
        }
    }

    /// Look a record up by id; misses are expected.
    pub fn find(&self, id: ItemId) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }
}

/// Both collections of the session.
#[derive(Debug, Clone)]
pub struct CollectionCache {
    pub source_codes: Collection<SourceCode>,
    pub blog_posts: Collection<BlogPost>,
}

impl Default for CollectionCache {
    fn default() -> Self {
        Self::new()
    }
}

impl CollectionCache {
    pub fn new() -> Self {
        Self {
            source_codes: Collection::new(),
            blog_posts: Collection::new(),
        }
    }

    /// Decide whether `kind` needs fetching, marking it as loading if so.
    ///
    /// Returns `true` when the caller should start a fetch.
    pub fn ensure_loaded(&mut self, kind: ItemKind) -> bool {
        match kind {
            ItemKind::SourceCodes => self.source_codes.ensure_loaded(),
            ItemKind::BlogPosts => self.blog_posts.ensure_loaded(),
        }
    }

    /// Store the outcome of a fetch for `kind`.
    ///
    /// On success returns the number of records kept.  On failure the
    /// collection is left empty and marked failed.
    pub fn complete(
        &mut self,
        kind: ItemKind,
        result: Result<Value, FetchError>,
    ) -> Result<usize, FetchError> {
        match kind {
            ItemKind::SourceCodes => self.source_codes.complete(result),
            ItemKind::BlogPosts => self.blog_posts.complete(result),
        }
    }

    pub fn status(&self, kind: ItemKind) -> &LoadStatus {
        match kind {
            ItemKind::SourceCodes => &self.source_codes.status,
            ItemKind::BlogPosts => &self.blog_posts.status,
        }
    }

    pub fn len(&self, kind: ItemKind) -> usize {
        match kind {
            ItemKind::SourceCodes => self.source_codes.items.len(),
            ItemKind::BlogPosts => self.blog_posts.items.len(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn first_request_starts_a_fetch() {
        let mut cache = CollectionCache::new();
        assert!(cache.ensure_loaded(ItemKind::SourceCodes));
        assert_eq!(cache.status(ItemKind::SourceCodes), &LoadStatus::Loading);
    }

    #[test]
    fn in_flight_fetch_is_not_duplicated() {
        let mut cache = CollectionCache::new();
        assert!(cache.ensure_loaded(ItemKind::BlogPosts));
        assert!(!cache.ensure_loaded(ItemKind::BlogPosts));
    }

    #[test]
    fn loaded_collection_is_never_refetched() {
        let mut cache = CollectionCache::new();
        cache.ensure_loaded(ItemKind::SourceCodes);
        let kept = cache
            .complete(ItemKind::SourceCodes, Ok(json!([{"id": 1}, {"id": "x"}])))
            .unwrap();

        assert_eq!(kept, 1);
        assert!(matches!(cache.status(ItemKind::SourceCodes), LoadStatus::Loaded { .. }));
        assert!(!cache.ensure_loaded(ItemKind::SourceCodes));
    }

    #[test]
    fn empty_load_is_refetched_on_next_request() {
        let mut cache = CollectionCache::new();
        cache.ensure_loaded(ItemKind::BlogPosts);
        cache.complete(ItemKind::BlogPosts, Ok(json!([]))).unwrap();

        assert!(cache.ensure_loaded(ItemKind::BlogPosts));
    }

    #[test]
    fn non_array_payload_leaves_collection_empty_and_failed() {
        let mut cache = CollectionCache::new();
        cache.ensure_loaded(ItemKind::BlogPosts);
        let result = cache.complete(ItemKind::BlogPosts, Ok(json!({"status": "error"})));

        assert!(matches!(result, Err(FetchError::NotAnArray(_))));
        assert_eq!(cache.len(ItemKind::BlogPosts), 0);
        assert_eq!(cache.status(ItemKind::BlogPosts), &LoadStatus::Failed);
    }

    #[test]
    fn fetches_are_independent() {
        let mut cache = CollectionCache::new();
        cache.ensure_loaded(ItemKind::SourceCodes);
        cache.ensure_loaded(ItemKind::BlogPosts);

        cache
            .complete(ItemKind::BlogPosts, Ok(json!([{"id": 4}])))
            .unwrap();

        assert_eq!(cache.status(ItemKind::SourceCodes), &LoadStatus::Loading);
        assert_eq!(cache.len(ItemKind::BlogPosts), 1);
    }

    #[test]
    fn find_tolerates_misses() {
        let mut cache = CollectionCache::new();
        cache
            .complete(ItemKind::BlogPosts, Ok(json!([{"id": 4, "title": "Four"}])))
            .unwrap();

        assert!(cache.blog_posts.find(ItemId(4)).is_some());
        assert!(cache.blog_posts.find(ItemId(5)).is_none());
    }
}
