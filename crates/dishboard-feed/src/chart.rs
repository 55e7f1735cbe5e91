// Chart API Client
//
// Fetches the authoritative dashboard snapshot from GET /admin-chart.
// Failures surface to the caller without retry; the next scheduled
// refresh is the retry.

use chrono::{Duration as ChronoDuration, NaiveDate, Utc};
use serde::Serialize;

use dishboard_core::{DashboardError, DashboardSnapshot, Result};

use crate::envelope::ApiEnvelope;

/// Aggregation period for the chart series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodType {
    Day,
    Week,
    Month,
}

/// Query window for the chart endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ChartQuery {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub period_type: PeriodType,
    pub force_refresh: bool,
}

impl ChartQuery {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate, period_type: PeriodType) -> Self {
        Self {
            start_date,
            end_date,
            period_type,
            force_refresh: false,
        }
    }

    /// The trailing 30 days, by day. What the refresh loop asks for.
    pub fn trailing_month() -> Self {
        let end_date = Utc::now().date_naive();
        let start_date = end_date - ChronoDuration::days(29);
        Self::new(start_date, end_date, PeriodType::Day)
    }

    /// Ask the platform to bypass its own response cache.
    pub fn force_refresh(mut self) -> Self {
        self.force_refresh = true;
        self
    }
}

/// Client for the platform's admin chart API.
#[derive(Debug, Clone)]
pub struct ChartClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl ChartClient {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    /// Fetch the authoritative snapshot for the given window.
    pub async fn fetch_snapshot(&self, query: &ChartQuery) -> Result<DashboardSnapshot> {
        let url = format!("{}/admin-chart", self.base_url);

        let response = self
            .http
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.token))
            .query(query)
            .send()
            .await
            .map_err(|e| DashboardError::chart(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DashboardError::chart(format!(
                "chart API error ({status}): {body}"
            )));
        }

        let envelope: ApiEnvelope<DashboardSnapshot> = response
            .json()
            .await
            .map_err(|e| DashboardError::chart(format!("invalid envelope: {e}")))?;

        envelope.into_result()
    }
}
