// Notification Center
//
// A bounded, time-decaying list of user-visible notification cards.
// Lifecycle per entry: Created(visible) -> [5s auto-expiry OR manual
// dismiss] -> Exiting(invisible, exit animation) -> [300ms OR capacity
// eviction] -> Removed. Capacity eviction skips the exit phase.
//
// Every timer is tracked per entry id and aborted on dismissal or
// teardown, so no callback ever fires against a removed entry.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use uuid::Uuid;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use crate::entity::EntityCategory;
use crate::event::EntityEvent;

/// Maximum number of entries kept; inserting one more evicts the oldest.
pub const MAX_VISIBLE: usize = 6;

/// How long an entry stays visible without manual dismissal.
pub const AUTO_DISMISS: Duration = Duration::from_millis(5000);

/// Grace period between becoming invisible and structural removal.
pub const REMOVAL_GRACE: Duration = Duration::from_millis(300);

/// A user-visible notification card.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct NotificationEntry {
    /// Unique entry identifier (UUID v7, monotonically increasing).
    pub id: Uuid,

    /// Category parsed from the originating event.
    pub category: EntityCategory,

    /// Display label for the category (fallback style for unknowns).
    pub display_name: String,

    /// Icon identifier for the category.
    pub icon: String,

    /// Human-readable description from the event.
    pub message: String,

    /// Event time in milliseconds since the Unix epoch.
    pub timestamp_ms: i64,

    /// False once the entry is in its exit transition.
    pub visible: bool,
}

/// Change notifications published to stream consumers.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NotificationUpdate {
    Added { entry: NotificationEntry },
    Hidden { id: Uuid },
    Removed { id: Uuid },
    Cleared,
}

impl NotificationUpdate {
    /// Event name used on the SSE stream.
    pub fn event_type(&self) -> &'static str {
        match self {
            NotificationUpdate::Added { .. } => "notification.added",
            NotificationUpdate::Hidden { .. } => "notification.hidden",
            NotificationUpdate::Removed { .. } => "notification.removed",
            NotificationUpdate::Cleared => "notification.cleared",
        }
    }
}

/// Bounded queue of notification cards with per-entry expiry timers.
#[derive(Debug, Clone)]
pub struct NotificationCenter {
    inner: Arc<CenterInner>,
}

#[derive(Debug)]
struct CenterInner {
    state: Mutex<CenterState>,
    updates: broadcast::Sender<NotificationUpdate>,
}

#[derive(Debug, Default)]
struct CenterState {
    // Newest first.
    entries: Vec<NotificationEntry>,
    // One abortable timer per entry id: auto-dismiss while visible,
    // removal grace once exiting.
    timers: HashMap<Uuid, JoinHandle<()>>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        let (updates, _) = broadcast::channel(64);
        Self {
            inner: Arc::new(CenterInner {
                state: Mutex::new(CenterState::default()),
                updates,
            }),
        }
    }

    /// Build an entry from the event, prepend it, evict past capacity, and
    /// arm its auto-dismiss timer.
    pub fn push(&self, event: &EntityEvent) -> NotificationEntry {
        let category = event.category();
        let entry = NotificationEntry {
            id: Uuid::now_v7(),
            category,
            display_name: category.display_name().to_string(),
            icon: category.icon().to_string(),
            message: event.message.clone(),
            timestamp_ms: event.timestamp_ms(),
            visible: true,
        };

        let mut evicted = Vec::new();
        {
            let mut state = self.inner.state.lock().unwrap();
            state.entries.insert(0, entry.clone());
            while state.entries.len() > MAX_VISIBLE {
                // Oldest out, immediately and without exit animation.
                let old = state.entries.pop().unwrap();
                if let Some(timer) = state.timers.remove(&old.id) {
                    timer.abort();
                }
                evicted.push(old.id);
            }

            let handle = tokio::spawn(auto_dismiss(Arc::downgrade(&self.inner), entry.id));
            state.timers.insert(entry.id, handle);
        }

        for id in evicted {
            let _ = self.inner.updates.send(NotificationUpdate::Removed { id });
        }
        let _ = self.inner.updates.send(NotificationUpdate::Added {
            entry: entry.clone(),
        });
        entry
    }

    /// Cancel any pending auto-dismiss and start the exit transition.
    /// Returns false if the id is unknown or already exiting.
    pub fn dismiss(&self, id: Uuid) -> bool {
        begin_exit(&self.inner, id)
    }

    /// Abort every timer and empty the list immediately. Used on teardown.
    pub fn clear(&self) {
        {
            let mut state = self.inner.state.lock().unwrap();
            for (_, timer) in state.timers.drain() {
                timer.abort();
            }
            state.entries.clear();
        }
        let _ = self.inner.updates.send(NotificationUpdate::Cleared);
    }

    /// Snapshot of current entries, newest first (exiting entries
    /// included, flagged invisible).
    pub fn entries(&self) -> Vec<NotificationEntry> {
        self.inner.state.lock().unwrap().entries.clone()
    }

    /// Number of entries currently held.
    pub fn len(&self) -> usize {
        self.inner.state.lock().unwrap().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Subscribe to change notifications. Lagging receivers drop updates
    /// rather than buffering without bound.
    pub fn subscribe(&self) -> broadcast::Receiver<NotificationUpdate> {
        self.inner.updates.subscribe()
    }
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared by manual dismissal and the auto-dismiss timer: flip the entry
/// invisible and arm structural removal after the grace period.
fn begin_exit(inner: &Arc<CenterInner>, id: Uuid) -> bool {
    {
        let mut state = inner.state.lock().unwrap();
        if let Some(timer) = state.timers.remove(&id) {
            timer.abort();
        }
        let Some(entry) = state.entries.iter_mut().find(|e| e.id == id) else {
            return false;
        };
        if !entry.visible {
            return false;
        }
        entry.visible = false;

        let handle = tokio::spawn(remove_after(Arc::downgrade(inner), id));
        state.timers.insert(id, handle);
    }
    let _ = inner.updates.send(NotificationUpdate::Hidden { id });
    true
}

async fn auto_dismiss(inner: Weak<CenterInner>, id: Uuid) {
    tokio::time::sleep(AUTO_DISMISS).await;
    if let Some(inner) = inner.upgrade() {
        begin_exit(&inner, id);
    }
}

async fn remove_after(inner: Weak<CenterInner>, id: Uuid) {
    tokio::time::sleep(REMOVAL_GRACE).await;
    let Some(inner) = inner.upgrade() else {
        return;
    };
    let removed = {
        let mut state = inner.state.lock().unwrap();
        state.timers.remove(&id);
        let before = state.entries.len();
        state.entries.retain(|e| e.id != id);
        state.entries.len() != before
    };
    if removed {
        let _ = inner.updates.send(NotificationUpdate::Removed { id });
    }
}
