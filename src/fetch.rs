//! Background collection fetching.
//!
//! Each request spawns a short-lived thread that fetches one collection and
//! sends the outcome to the UI thread over an [`mpsc`] channel.  The two
//! collections can be in flight at once; they share nothing, and each
//! completion only touches its own cache entry.  There is no timeout, abort
//! or retry.

use std::sync::mpsc;
use std::sync::Arc;
use std::thread;

use serde_json::Value;

use crate::error::FetchError;
use crate::source::{DataSource, ItemKind};

/// Outcome of one fetch, sent from a fetch thread to the UI thread.
pub struct FetchMsg {
    pub kind: ItemKind,
    pub result: Result<Value, FetchError>,
}

/// Starts fetches and collects their results.
pub struct Fetcher {
    source_codes: Arc<dyn DataSource>,
    blog_posts: Arc<dyn DataSource>,
    tx: mpsc::Sender<FetchMsg>,
    rx: mpsc::Receiver<FetchMsg>,
}

impl Fetcher {
    pub fn new(source_codes: Box<dyn DataSource>, blog_posts: Box<dyn DataSource>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            source_codes: Arc::from(source_codes),
            blog_posts: Arc::from(blog_posts),
            tx,
            rx,
        }
    }

    /// Spawn a thread fetching `kind`.
    pub fn request(&self, kind: ItemKind) {
        let source = match kind {
            ItemKind::SourceCodes => Arc::clone(&self.source_codes),
            ItemKind::BlogPosts => Arc::clone(&self.blog_posts),
        };
        let tx = self.tx.clone();

        tracing::info!(%kind, source = source.name(), "fetching collection");
        thread::spawn(move || {
            let result = source.fetch();
            // If the receiver is gone the UI has exited; nothing to report to.
            let _ = tx.send(FetchMsg { kind, result });
        });
    }

    /// Next finished fetch, without blocking.
    pub fn try_recv(&self) -> Option<FetchMsg> {
        self.rx.try_recv().ok()
    }

    #[cfg(test)]
    pub fn recv_timeout(&self, timeout: std::time::Duration) -> Option<FetchMsg> {
        self.rx.recv_timeout(timeout).ok()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::time::Duration;

    /// Serves a fixed payload, or a fixed failure when `payload` is `None`.
    pub struct StubSource {
        pub payload: Option<Value>,
    }

    impl DataSource for StubSource {
        fn name(&self) -> &str {
            "stub"
        }

        fn fetch(&self) -> Result<Value, FetchError> {
            match &self.payload {
                Some(v) => Ok(v.clone()),
                None => Err(FetchError::Io(std::io::Error::other("connection refused"))),
            }
        }
    }

    pub fn stub_fetcher(source_codes: Option<Value>, blog_posts: Option<Value>) -> Fetcher {
        Fetcher::new(
            Box::new(StubSource { payload: source_codes }),
            Box::new(StubSource { payload: blog_posts }),
        )
    }

    #[test]
    fn request_reports_on_channel() {
        let fetcher = stub_fetcher(Some(serde_json::json!([{"id": 1}])), None);
        fetcher.request(ItemKind::SourceCodes);

        let msg = fetcher.recv_timeout(Duration::from_secs(5)).expect("fetch result");
        assert_eq!(msg.kind, ItemKind::SourceCodes);
        assert!(msg.result.unwrap().is_array());
    }

    #[test]
    fn both_collections_can_be_in_flight() {
        let fetcher = stub_fetcher(Some(serde_json::json!([])), None);
        fetcher.request(ItemKind::SourceCodes);
        fetcher.request(ItemKind::BlogPosts);

        let mut kinds: Vec<ItemKind> = (0..2)
            .filter_map(|_| fetcher.recv_timeout(Duration::from_secs(5)))
            .map(|msg| msg.kind)
            .collect();
        kinds.sort();
        assert_eq!(kinds, vec![ItemKind::SourceCodes, ItemKind::BlogPosts]);
    }

    #[test]
    fn failures_are_reported_not_raised() {
        let fetcher = stub_fetcher(None, None);
        fetcher.request(ItemKind::BlogPosts);

        let msg = fetcher.recv_timeout(Duration::from_secs(5)).expect("fetch result");
        assert!(matches!(msg.result, Err(FetchError::Io(_))));
    }
}
