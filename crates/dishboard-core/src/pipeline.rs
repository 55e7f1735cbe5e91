// Event Pipeline
//
// Wiring for one admin session: dedup -> correction ledger (always) ->
// notification center (only when the category's preference is on). The
// ledger deliberately ignores preferences: muting a category hides its
// cards, it does not stop the totals from moving.

use std::sync::{Arc, RwLock};

use chrono::Utc;

use crate::dedup::Deduplicator;
use crate::entity::{EntityCategory, MetricCategory};
use crate::event::EntityEvent;
use crate::ledger::CorrectionLedger;
use crate::notifications::{NotificationCenter, NotificationEntry};
use crate::preferences::NotificationPreferences;

/// Result of pushing one feed event through the pipeline.
#[derive(Debug, Clone)]
pub enum IngestOutcome {
    /// Repeat inside the dedup window; nothing changed.
    Duplicate,
    /// Counted (metric `None` when the category carries none) but muted
    /// by preferences, so no visible card.
    Counted { metric: Option<MetricCategory> },
    /// Counted and surfaced as a visible notification.
    Notified {
        metric: Option<MetricCategory>,
        entry: NotificationEntry,
    },
}

/// One per admin session. Created at session start, torn down at session
/// end via [`EventPipeline::shutdown`].
#[derive(Debug)]
pub struct EventPipeline {
    dedup: Deduplicator,
    ledger: Arc<CorrectionLedger>,
    notifications: NotificationCenter,
    preferences: Arc<RwLock<NotificationPreferences>>,
}

impl EventPipeline {
    pub fn new(preferences: NotificationPreferences) -> Self {
        Self {
            dedup: Deduplicator::new(),
            ledger: Arc::new(CorrectionLedger::new()),
            notifications: NotificationCenter::new(),
            preferences: Arc::new(RwLock::new(preferences)),
        }
    }

    /// Push one feed event through the gate chain, in arrival order.
    pub fn ingest(&self, event: &EntityEvent) -> IngestOutcome {
        if !self.dedup.should_accept(event) {
            tracing::debug!(key = %event.dedup_key(), "duplicate feed event dropped");
            return IngestOutcome::Duplicate;
        }

        let category = event.category();
        let metric = self.ledger.apply(category);

        let enabled = self.preferences.read().unwrap().is_enabled(category);
        if !enabled {
            tracing::debug!(?category, "notification muted by preferences");
            return IngestOutcome::Counted { metric };
        }

        let entry = self.notifications.push(event);
        IngestOutcome::Notified { metric, entry }
    }

    /// Surface a feed connectivity change as a notification card. Obeys
    /// the permissive fallback: visible unless every category is muted.
    pub fn notify_connection(&self, connected: bool) {
        let message = if connected {
            "Live updates connected"
        } else {
            "Live updates connection lost"
        };
        if !self
            .preferences
            .read()
            .unwrap()
            .is_enabled(EntityCategory::Unknown)
        {
            return;
        }
        let event = EntityEvent::new("system", message, Utc::now().timestamp(), "connection_status");
        self.notifications.push(&event);
    }

    /// Handle to the session ledger, shared with the dashboard state.
    pub fn ledger(&self) -> Arc<CorrectionLedger> {
        self.ledger.clone()
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    /// Handle to the live preference record, shared with the HTTP layer.
    pub fn preferences(&self) -> Arc<RwLock<NotificationPreferences>> {
        self.preferences.clone()
    }

    /// Abort every outstanding dedup and notification timer.
    pub fn shutdown(&self) {
        self.dedup.clear();
        self.notifications.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::MAX_VISIBLE;
    use std::time::Duration;

    fn order_event() -> EntityEvent {
        EntityEvent::new("Order", "Order #123 created", 1000, "created")
    }

    #[tokio::test(start_paused = true)]
    async fn duplicate_within_two_seconds_is_counted_once() {
        let pipeline = EventPipeline::new(NotificationPreferences::default());

        let first = pipeline.ingest(&order_event());
        tokio::time::sleep(Duration::from_secs(2)).await;
        let second = pipeline.ingest(&order_event());

        assert!(matches!(first, IngestOutcome::Notified { .. }));
        assert!(matches!(second, IngestOutcome::Duplicate));
        assert_eq!(pipeline.ledger().counters().total_orders, 1);
        assert_eq!(pipeline.notifications().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn eight_drivers_cap_the_queue_but_count_fully() {
        let pipeline = EventPipeline::new(NotificationPreferences::default());

        for n in 0..8 {
            let event = EntityEvent::new("driver", format!("Driver #{n} joined"), 1000 + n, "created");
            pipeline.ingest(&event);
        }

        assert_eq!(pipeline.notifications().len(), MAX_VISIBLE);
        assert_eq!(pipeline.ledger().counters().total_users, 8);
    }

    // Pins the observed production behavior: muting a category hides its
    // cards but its events still move the corrected totals.
    #[tokio::test(start_paused = true)]
    async fn disabled_category_still_counts() {
        let preferences = NotificationPreferences {
            orders: false,
            ..Default::default()
        };
        let pipeline = EventPipeline::new(preferences);

        let outcome = pipeline.ingest(&order_event());

        assert!(matches!(
            outcome,
            IngestOutcome::Counted {
                metric: Some(MetricCategory::TotalOrders)
            }
        ));
        assert_eq!(pipeline.ledger().counters().total_orders, 1);
        assert!(pipeline.notifications().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn unmapped_category_notifies_without_counting() {
        let pipeline = EventPipeline::new(NotificationPreferences::default());
        let event = EntityEvent::new("inquiry", "New inquiry opened", 1000, "created");

        let outcome = pipeline.ingest(&event);

        assert!(matches!(outcome, IngestOutcome::Notified { metric: None, .. }));
        assert_eq!(pipeline.ledger().counters().total_users, 0);
        assert_eq!(pipeline.notifications().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn connection_toast_respects_the_permissive_fallback() {
        let pipeline = EventPipeline::new(NotificationPreferences::default());
        pipeline.notify_connection(false);
        assert_eq!(pipeline.notifications().len(), 1);

        let all_muted = NotificationPreferences {
            orders: false,
            restaurants: false,
            customers: false,
            drivers: false,
            customer_care: false,
            customer_care_inquiries: false,
        };
        let muted_pipeline = EventPipeline::new(all_muted);
        muted_pipeline.notify_connection(false);
        assert!(muted_pipeline.notifications().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_tears_down_timers() {
        let pipeline = EventPipeline::new(NotificationPreferences::default());
        pipeline.ingest(&order_event());

        pipeline.shutdown();

        assert!(pipeline.notifications().is_empty());
        // The dedup window was cleared along with everything else.
        assert!(matches!(
            pipeline.ingest(&order_event()),
            IngestOutcome::Notified { .. }
        ));
    }
}
