// Admin Event Feed Client
//
// Joins the admin room, then consumes the event stream and forwards
// entity events into the pipeline in arrival order. Reconnects are
// bounded and linear; connectivity is published on a watch channel for
// dependent consumers.

use std::sync::Arc;
use std::time::Duration;

use eventsource_stream::Eventsource;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use dishboard_core::{DashboardError, EntityEvent, EventPipeline, Result};

/// Feed event carrying a newly created domain entity.
pub const FEED_EVENT: &str = "newly_created_entity_notification";

/// Room every admin session joins once per connection.
pub const ADMIN_ROOM: &str = "admin_global";

const RECONNECT_ATTEMPTS: u32 = 5;
const RECONNECT_DELAY: Duration = Duration::from_millis(1000);

/// Feed connection settings.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    pub base_url: String,
    pub token: String,
    /// Reconnect attempts after a drop before giving up.
    pub reconnect_attempts: u32,
    /// Fixed delay between attempts.
    pub reconnect_delay: Duration,
}

impl FeedConfig {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            reconnect_attempts: RECONNECT_ATTEMPTS,
            reconnect_delay: RECONNECT_DELAY,
        }
    }
}

#[derive(Debug, Serialize)]
struct JoinRequest<'a> {
    room: &'a str,
}

#[derive(Debug, Deserialize)]
struct JoinAck {
    success: bool,
}

/// Client for the admin notification feed.
pub struct FeedClient {
    http: reqwest::Client,
    config: FeedConfig,
    connected: watch::Sender<bool>,
}

impl FeedClient {
    pub fn new(config: FeedConfig) -> Self {
        let (connected, _) = watch::channel(false);
        Self {
            http: reqwest::Client::new(),
            config,
            connected,
        }
    }

    /// Receiver for the live connectivity flag.
    pub fn connectivity(&self) -> watch::Receiver<bool> {
        self.connected.subscribe()
    }

    /// Consume the feed until the reconnect attempts are exhausted.
    ///
    /// Each successful connection resets the attempt counter. Exhaustion is
    /// non-fatal for the process: the dashboard keeps serving the last
    /// authoritative totals, it just stops moving between refreshes.
    pub async fn run(self, pipeline: Arc<EventPipeline>) {
        let mut attempts = 0u32;
        loop {
            if let Err(e) = self.connect_and_stream(&pipeline).await {
                tracing::warn!(error = %e, "feed connection error");
            }

            if *self.connected.borrow() {
                attempts = 0;
                self.set_connected(false, &pipeline);
            }

            attempts += 1;
            if attempts > self.config.reconnect_attempts {
                tracing::error!(
                    attempts = self.config.reconnect_attempts,
                    "feed reconnect attempts exhausted; live updates disabled"
                );
                return;
            }

            tokio::time::sleep(self.config.reconnect_delay).await;
        }
    }

    /// One connection: join the room, then forward events until the
    /// stream ends or errors.
    async fn connect_and_stream(&self, pipeline: &EventPipeline) -> Result<()> {
        self.join_room().await?;

        let url = format!("{}/admin-feed/stream", self.config.base_url);
        let response = self
            .http
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.config.token))
            .header("Accept", "text/event-stream")
            .send()
            .await
            .map_err(|e| DashboardError::feed(format!("stream connect failed: {e}")))?;

        if !response.status().is_success() {
            return Err(DashboardError::feed(format!(
                "stream rejected ({})",
                response.status()
            )));
        }

        self.set_connected(true, pipeline);

        let mut events = response.bytes_stream().eventsource();
        while let Some(item) = events.next().await {
            match item {
                Ok(event) if event.event == FEED_EVENT => {
                    match serde_json::from_str::<EntityEvent>(&event.data) {
                        Ok(entity_event) => {
                            let outcome = pipeline.ingest(&entity_event);
                            tracing::debug!(
                                entity = %entity_event.entity_name,
                                ?outcome,
                                "feed event processed"
                            );
                        }
                        Err(e) => {
                            tracing::warn!(error = %e, "malformed feed payload skipped");
                        }
                    }
                }
                Ok(other) => {
                    tracing::trace!(event = %other.event, "ignoring unrelated feed event");
                }
                Err(e) => {
                    return Err(DashboardError::feed(format!("stream error: {e}")));
                }
            }
        }

        // Server closed the stream cleanly.
        Ok(())
    }

    async fn join_room(&self) -> Result<()> {
        let url = format!("{}/admin-feed/join", self.config.base_url);
        let response = self
            .http
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.token))
            .json(&JoinRequest { room: ADMIN_ROOM })
            .send()
            .await
            .map_err(|e| DashboardError::feed(format!("join failed: {e}")))?;

        if !response.status().is_success() {
            return Err(DashboardError::feed(format!(
                "join rejected ({})",
                response.status()
            )));
        }

        let ack: JoinAck = response
            .json()
            .await
            .map_err(|e| DashboardError::feed(format!("invalid join ack: {e}")))?;
        if !ack.success {
            return Err(DashboardError::feed("join not acknowledged"));
        }

        tracing::debug!(room = ADMIN_ROOM, "joined admin room");
        Ok(())
    }

    fn set_connected(&self, connected: bool, pipeline: &EventPipeline) {
        let previous = self.connected.send_replace(connected);
        if previous != connected {
            tracing::info!(connected, "feed connectivity changed");
            pipeline.notify_connection(connected);
        }
    }
}
