// Duplicate Suppression
//
// The feed occasionally delivers the same creation event more than once
// (reconnects, upstream fan-out retries). Repeats inside a short window
// share the composite key entity:message:timestamp and must be dropped
// before they reach the ledger or the notification center.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::event::EntityEvent;

/// Retention window for seen keys.
pub const DEDUP_WINDOW: Duration = Duration::from_secs(10);

/// Best-effort, single-process duplicate suppressor.
///
/// Not a distributed idempotency mechanism: two genuinely distinct events
/// that share entity, message, and timestamp are indistinguishable and one
/// of them is dropped. That is an accepted approximation at this event
/// granularity.
#[derive(Debug, Clone, Default)]
pub struct Deduplicator {
    inner: Arc<DedupInner>,
}

#[derive(Debug)]
struct DedupInner {
    window: Duration,
    // One abortable expiry timer per tracked key.
    seen: Mutex<HashMap<String, JoinHandle<()>>>,
}

impl Default for DedupInner {
    fn default() -> Self {
        Self {
            window: DEDUP_WINDOW,
            seen: Mutex::new(HashMap::new()),
        }
    }
}

impl Deduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom retention window.
    pub fn with_window(window: Duration) -> Self {
        Self {
            inner: Arc::new(DedupInner {
                window,
                seen: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Record the event's key if unseen and return `true`. A repeat inside
    /// the retention window returns `false` with no side effect; repeats do
    /// not re-arm the window.
    pub fn should_accept(&self, event: &EntityEvent) -> bool {
        let key = event.dedup_key();
        let mut seen = self.inner.seen.lock().unwrap();
        if seen.contains_key(&key) {
            return false;
        }

        let handle = tokio::spawn(expire_after(
            Arc::downgrade(&self.inner),
            key.clone(),
            self.inner.window,
        ));
        seen.insert(key, handle);
        true
    }

    /// Number of keys currently tracked.
    pub fn tracked(&self) -> usize {
        self.inner.seen.lock().unwrap().len()
    }

    /// Abort every pending expiry timer and forget all keys.
    pub fn clear(&self) {
        let mut seen = self.inner.seen.lock().unwrap();
        for (_, handle) in seen.drain() {
            handle.abort();
        }
    }
}

async fn expire_after(inner: Weak<DedupInner>, key: String, window: Duration) {
    tokio::time::sleep(window).await;
    // A deduplicator torn down mid-window leaves nothing to clean up.
    if let Some(inner) = inner.upgrade() {
        inner.seen.lock().unwrap().remove(&key);
    }
}
