// Correction Ledger
//
// Authoritative totals come from the chart API. Between refreshes, every
// accepted creation event bumps a local counter so the dashboard moves in
// real time; a successful refresh installs new base values and zeroes the
// ledger. Counters only grow between resets.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use crate::entity::{EntityCategory, MetricCategory};

/// Snapshot of locally accumulated corrections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CorrectionCounters {
    pub total_users: u64,
    pub total_orders: u64,
    pub sold_promotions: u64,
}

/// Per-session ledger of not-yet-reconciled "+1" adjustments.
///
/// Exactly one instance lives in the session state, shared by reference;
/// there is no module-level ledger surviving anything.
#[derive(Debug, Default)]
pub struct CorrectionLedger {
    counters: Mutex<CorrectionCounters>,
}

impl CorrectionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route one accepted event into its counter. Returns the metric
    /// affected, or `None` for categories the dashboard does not count.
    pub fn apply(&self, category: EntityCategory) -> Option<MetricCategory> {
        let metric = category.metric()?;
        let mut counters = self.counters.lock().unwrap();
        match metric {
            MetricCategory::TotalOrders => counters.total_orders += 1,
            MetricCategory::TotalUsers => counters.total_users += 1,
            MetricCategory::SoldPromotions => counters.sold_promotions += 1,
        }
        Some(metric)
    }

    /// Current value of one counter.
    pub fn counter(&self, metric: MetricCategory) -> u64 {
        let counters = self.counters.lock().unwrap();
        match metric {
            MetricCategory::TotalOrders => counters.total_orders,
            MetricCategory::TotalUsers => counters.total_users,
            MetricCategory::SoldPromotions => counters.sold_promotions,
        }
    }

    /// Authoritative base value plus live corrections for one metric.
    pub fn corrected(&self, base: u64, metric: MetricCategory) -> u64 {
        base + self.counter(metric)
    }

    /// Copy of all counters.
    pub fn counters(&self) -> CorrectionCounters {
        *self.counters.lock().unwrap()
    }

    /// Zero all counters atomically. Call only once fresh base values are
    /// in hand, never before.
    pub fn reset(&self) {
        *self.counters.lock().unwrap() = CorrectionCounters::default();
    }
}
