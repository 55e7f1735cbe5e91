// Dashboard Pipeline Abstraction
//
// This crate implements the real-time half of the admin dashboard as an
// I/O-free pipeline: feed events are deduplicated, routed into a
// correction ledger on top of periodically refreshed authoritative
// totals, and surfaced as bounded, time-decaying notification cards.
//
// Key design decisions:
// - No network or disk here; the feed, chart, and store crates plug in
// - Categories are a closed enum with an explicit Unknown fallback
// - Every scheduled callback is a tracked, abortable timer keyed by what
//   it cleans up, torn down with its owner
// - One ledger/notification set per session, dependency-injected
// - Preferences gate only the visible card, never the ledger

pub mod dashboard;
pub mod dedup;
pub mod entity;
pub mod error;
pub mod event;
pub mod ledger;
pub mod notifications;
pub mod pipeline;
pub mod preferences;

// Re-exports for convenience
pub use dashboard::{ChartPoint, CorrectedTotals, DashboardSnapshot, DashboardState};
pub use dedup::{Deduplicator, DEDUP_WINDOW};
pub use entity::{EntityCategory, MetricCategory};
pub use error::{DashboardError, Result};
pub use event::EntityEvent;
pub use ledger::{CorrectionCounters, CorrectionLedger};
pub use notifications::{
    NotificationCenter, NotificationEntry, NotificationUpdate, AUTO_DISMISS, MAX_VISIBLE,
    REMOVAL_GRACE,
};
pub use pipeline::{EventPipeline, IngestOutcome};
pub use preferences::{NotificationPreferences, PreferencesPatch};
