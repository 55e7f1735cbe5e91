// Notification HTTP routes
// Cards are served as a snapshot for initial render; changes stream over
// SSE so the overlay moves without polling.

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::sse::{Event as SseEvent, KeepAlive, Sse},
    routing::{delete, get},
    Json, Router,
};
use futures::{Stream, StreamExt};
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use uuid::Uuid;

use dishboard_core::{EventPipeline, NotificationEntry};

use crate::common::ListResponse;

/// App state for notification routes
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<EventPipeline>,
}

/// Create notification routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/v1/notifications",
            get(list_notifications).delete(clear_notifications),
        )
        .route("/v1/notifications/sse", get(stream_notifications))
        .route("/v1/notifications/{id}", delete(dismiss_notification))
        .with_state(state)
}

/// GET /v1/notifications - Current cards, newest first
#[utoipa::path(
    get,
    path = "/v1/notifications",
    responses(
        (status = 200, description = "Current notification cards", body = ListResponse<NotificationEntry>)
    ),
    tag = "notifications"
)]
pub async fn list_notifications(
    State(state): State<AppState>,
) -> Json<ListResponse<NotificationEntry>> {
    Json(ListResponse::new(state.pipeline.notifications().entries()))
}

/// DELETE /v1/notifications/{id} - Dismiss one card
#[utoipa::path(
    delete,
    path = "/v1/notifications/{id}",
    params(
        ("id" = Uuid, Path, description = "Notification ID")
    ),
    responses(
        (status = 204, description = "Card dismissed"),
        (status = 404, description = "No such card")
    ),
    tag = "notifications"
)]
pub async fn dismiss_notification(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> StatusCode {
    if state.pipeline.notifications().dismiss(id) {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

/// DELETE /v1/notifications - Drop every card and cancel their timers
#[utoipa::path(
    delete,
    path = "/v1/notifications",
    responses(
        (status = 204, description = "All cards cleared")
    ),
    tag = "notifications"
)]
pub async fn clear_notifications(State(state): State<AppState>) -> StatusCode {
    state.pipeline.notifications().clear();
    StatusCode::NO_CONTENT
}

/// GET /v1/notifications/sse - Stream notification changes
#[utoipa::path(
    get,
    path = "/v1/notifications/sse",
    responses(
        (status = 200, description = "Notification change stream", content_type = "text/event-stream")
    ),
    tag = "notifications"
)]
pub async fn stream_notifications(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<SseEvent, Infallible>>> {
    let receiver = state.pipeline.notifications().subscribe();

    let stream = BroadcastStream::new(receiver).filter_map(|item| async move {
        match item {
            Ok(update) => {
                let json = serde_json::to_string(&update).unwrap_or_else(|_| "{}".to_string());
                Some(Ok::<_, Infallible>(
                    SseEvent::default().event(update.event_type()).data(json),
                ))
            }
            Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "notification stream lagged; dropping missed updates");
                None
            }
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request};
    use dishboard_core::{EntityEvent, NotificationPreferences};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn test_state() -> AppState {
        AppState {
            pipeline: Arc::new(EventPipeline::new(NotificationPreferences::default())),
        }
    }

    #[tokio::test]
    async fn list_starts_empty() {
        let app = routes(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/v1/notifications")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["data"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn list_returns_pushed_cards_newest_first() {
        let state = test_state();
        state
            .pipeline
            .ingest(&EntityEvent::new("order", "Order #1 created", 1000, "created"));
        state
            .pipeline
            .ingest(&EntityEvent::new("driver", "Driver joined", 1001, "created"));

        let app = routes(state);
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/v1/notifications")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        let data = json["data"].as_array().unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data[0]["message"], "Driver joined");
        assert_eq!(data[1]["message"], "Order #1 created");
    }

    #[tokio::test]
    async fn dismiss_returns_204_then_404() {
        let state = test_state();
        let entry = state
            .pipeline
            .notifications()
            .push(&EntityEvent::new("order", "Order #1 created", 1000, "created"));

        let app = routes(state);
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/v1/notifications/{}", entry.id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), 204);

        // A second dismissal of the same card finds nothing to do.
        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/v1/notifications/{}", entry.id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), 404);
    }

    #[tokio::test]
    async fn clear_empties_the_list() {
        let state = test_state();
        state
            .pipeline
            .ingest(&EntityEvent::new("order", "Order #1 created", 1000, "created"));

        let app = routes(state.clone());
        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/v1/notifications")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), 204);
        assert!(state.pipeline.notifications().is_empty());
    }
}
