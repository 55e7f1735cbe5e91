// Entity Event
//
// Wire payload of the `newly_created_entity_notification` feed event.
// Events are transient: consumed once by the pipeline, never persisted
// beyond the dedup window.

use serde::{Deserialize, Serialize};

use crate::entity::EntityCategory;

/// Timestamps at or above this are already milliseconds since the epoch.
/// The feed documents seconds, but not every producer agrees.
const MS_THRESHOLD: i64 = 1_000_000_000_000;

/// An "entity created" event delivered on the admin feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityEvent {
    /// Domain entity name (e.g. "order", "driver", "restaurant_owner").
    pub entity_name: String,

    /// Human-readable description.
    pub message: String,

    /// Seconds since the Unix epoch as sent by the platform.
    pub timestamp: i64,

    /// Free-form classification tag.
    pub event_type: String,
}

impl EntityEvent {
    pub fn new(
        entity_name: impl Into<String>,
        message: impl Into<String>,
        timestamp: i64,
        event_type: impl Into<String>,
    ) -> Self {
        Self {
            entity_name: entity_name.into(),
            message: message.into(),
            timestamp,
            event_type: event_type.into(),
        }
    }

    /// Category parsed from the entity name.
    pub fn category(&self) -> EntityCategory {
        EntityCategory::from_name(&self.entity_name)
    }

    /// Event time in milliseconds since the Unix epoch.
    ///
    /// This is the single point where units are normalized: second-scale
    /// values are scaled once, values that are already plausibly
    /// milliseconds pass through unscaled.
    pub fn timestamp_ms(&self) -> i64 {
        if self.timestamp >= MS_THRESHOLD {
            self.timestamp
        } else {
            self.timestamp * 1000
        }
    }

    /// Composite identity used for duplicate suppression. Uses the raw
    /// timestamp field, whatever unit the producer sent.
    pub fn dedup_key(&self) -> String {
        format!("{}:{}:{}", self.entity_name, self.message, self.timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_feed_payload() {
        let event: EntityEvent = serde_json::from_str(
            r#"{"entity_name":"order","timestamp":1700000000,"message":"Order #123 created","event_type":"created"}"#,
        )
        .unwrap();

        assert_eq!(event.category(), EntityCategory::Order);
        assert_eq!(event.timestamp, 1_700_000_000);
        assert_eq!(event.message, "Order #123 created");
    }

    #[test]
    fn second_timestamps_scale_to_milliseconds() {
        let event = EntityEvent::new("order", "created", 1_700_000_000, "created");
        assert_eq!(event.timestamp_ms(), 1_700_000_000_000);
    }

    #[test]
    fn millisecond_timestamps_pass_through() {
        let event = EntityEvent::new("order", "created", 1_700_000_000_123, "created");
        assert_eq!(event.timestamp_ms(), 1_700_000_000_123);
    }

    #[test]
    fn dedup_key_is_entity_message_timestamp() {
        let event = EntityEvent::new("Order", "Order #123 created", 1000, "created");
        assert_eq!(event.dedup_key(), "Order:Order #123 created:1000");
    }
}
