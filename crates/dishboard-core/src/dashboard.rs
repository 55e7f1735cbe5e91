// Dashboard State
//
// Owns the authoritative base snapshot and the correction ledger. The
// refresh ordering invariant lives here and nowhere else: new base values
// are installed before the ledger is zeroed, so consumers never see a
// double count or a flash of stale corrections.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use crate::entity::MetricCategory;
use crate::ledger::{CorrectionCounters, CorrectionLedger};

/// One point of the order-volume chart series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ChartPoint {
    /// Period label (e.g. "2026-08-01").
    pub period: String,
    pub orders: u64,
    pub revenue: f64,
}

/// Authoritative totals fetched from the chart API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct DashboardSnapshot {
    #[serde(default)]
    pub total_users: u64,
    #[serde(default)]
    pub total_orders: u64,
    #[serde(default)]
    pub sold_promotions: u64,
    #[serde(default)]
    pub series: Vec<ChartPoint>,
}

/// Totals the dashboard renders: authoritative base plus live corrections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CorrectedTotals {
    pub total_users: u64,
    pub total_orders: u64,
    pub sold_promotions: u64,
}

/// Session-scoped dashboard state.
#[derive(Debug)]
pub struct DashboardState {
    ledger: Arc<CorrectionLedger>,
    base: Mutex<BaseState>,
}

#[derive(Debug, Default)]
struct BaseState {
    snapshot: DashboardSnapshot,
    last_refreshed_at: Option<DateTime<Utc>>,
}

impl DashboardState {
    pub fn new(ledger: Arc<CorrectionLedger>) -> Self {
        Self {
            ledger,
            base: Mutex::new(BaseState::default()),
        }
    }

    /// Install fresh authoritative values, then zero the corrections.
    /// Called exactly once per successful chart fetch.
    pub fn apply_refresh(&self, snapshot: DashboardSnapshot) {
        {
            let mut base = self.base.lock().unwrap();
            base.snapshot = snapshot;
            base.last_refreshed_at = Some(Utc::now());
        }
        self.ledger.reset();
    }

    /// Base values plus not-yet-reconciled live increments.
    pub fn corrected_totals(&self) -> CorrectedTotals {
        let base = self.base.lock().unwrap();
        CorrectedTotals {
            total_users: self
                .ledger
                .corrected(base.snapshot.total_users, MetricCategory::TotalUsers),
            total_orders: self
                .ledger
                .corrected(base.snapshot.total_orders, MetricCategory::TotalOrders),
            sold_promotions: self
                .ledger
                .corrected(base.snapshot.sold_promotions, MetricCategory::SoldPromotions),
        }
    }

    /// Live increments not yet reconciled by a refresh.
    pub fn corrections(&self) -> CorrectionCounters {
        self.ledger.counters()
    }

    /// Copy of the last authoritative snapshot.
    pub fn snapshot(&self) -> DashboardSnapshot {
        self.base.lock().unwrap().snapshot.clone()
    }

    pub fn last_refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.base.lock().unwrap().last_refreshed_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityCategory;

    #[test]
    fn corrections_ride_on_top_of_the_base() {
        let ledger = Arc::new(CorrectionLedger::new());
        let state = DashboardState::new(ledger.clone());
        state.apply_refresh(DashboardSnapshot {
            total_users: 100,
            total_orders: 40,
            ..Default::default()
        });

        ledger.apply(EntityCategory::Order);
        ledger.apply(EntityCategory::Driver);
        ledger.apply(EntityCategory::Driver);

        let totals = state.corrected_totals();
        assert_eq!(totals.total_orders, 41);
        assert_eq!(totals.total_users, 102);
    }

    #[test]
    fn refresh_installs_base_before_zeroing_corrections() {
        let ledger = Arc::new(CorrectionLedger::new());
        let state = DashboardState::new(ledger.clone());
        ledger.apply(EntityCategory::Order);

        state.apply_refresh(DashboardSnapshot {
            total_orders: 41,
            ..Default::default()
        });

        // The accepted event is reflected in the new base, not double
        // counted on top of it.
        assert_eq!(state.corrected_totals().total_orders, 41);
        assert_eq!(ledger.counters().total_orders, 0);
    }

    #[test]
    fn refresh_stamps_the_clock() {
        let state = DashboardState::new(Arc::new(CorrectionLedger::new()));
        assert!(state.last_refreshed_at().is_none());

        state.apply_refresh(DashboardSnapshot::default());
        assert!(state.last_refreshed_at().is_some());
    }
}
