// Dashboard HTTP routes

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;
use utoipa::ToSchema;

use dishboard_core::{ChartPoint, CorrectedTotals, CorrectionCounters, DashboardState};

/// App state for dashboard routes
#[derive(Clone)]
pub struct AppState {
    pub dashboard: Arc<DashboardState>,
    pub connectivity: watch::Receiver<bool>,
}

/// Create dashboard routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/v1/dashboard", get(get_dashboard))
        .with_state(state)
}

/// Live dashboard view: authoritative base plus pending corrections.
#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardResponse {
    /// What the UI renders: base totals plus live increments.
    pub totals: CorrectedTotals,
    /// Live increments not yet reconciled by a refresh.
    pub corrections: CorrectionCounters,
    /// Chart series from the last authoritative snapshot.
    pub series: Vec<ChartPoint>,
    /// Whether the admin feed is currently connected.
    pub feed_connected: bool,
    /// When the last successful authoritative refresh landed.
    pub last_refreshed_at: Option<DateTime<Utc>>,
}

/// GET /v1/dashboard - Current corrected totals and chart series
#[utoipa::path(
    get,
    path = "/v1/dashboard",
    responses(
        (status = 200, description = "Current dashboard state", body = DashboardResponse)
    ),
    tag = "dashboard"
)]
pub async fn get_dashboard(State(state): State<AppState>) -> Json<DashboardResponse> {
    let snapshot = state.dashboard.snapshot();
    Json(DashboardResponse {
        totals: state.dashboard.corrected_totals(),
        corrections: state.dashboard.corrections(),
        series: snapshot.series,
        feed_connected: *state.connectivity.borrow(),
        last_refreshed_at: state.dashboard.last_refreshed_at(),
    })
}
