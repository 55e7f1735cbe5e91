// Authoritative Refresh Loop
//
// Periodically fetches the chart snapshot and hands it to the dashboard
// state, which installs the new base and zeroes the correction ledger.
// A failed fetch keeps the previous base plus live corrections; the next
// tick tries again.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;

use dishboard_core::DashboardState;

use crate::chart::{ChartClient, ChartQuery};

/// Default interval between authoritative refreshes.
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(60);

/// Run forever; the first fetch happens immediately.
pub async fn run_refresh_loop(
    client: ChartClient,
    state: Arc<DashboardState>,
    interval: Duration,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        match client.fetch_snapshot(&ChartQuery::trailing_month()).await {
            Ok(snapshot) => {
                state.apply_refresh(snapshot);
                tracing::info!("dashboard snapshot refreshed");
            }
            Err(e) => {
                tracing::warn!(error = %e, "snapshot refresh failed; keeping previous totals");
            }
        }
    }
}
