// Preference HTTP routes
// Updates merge into the live record consulted by the pipeline, then
// persist through the store. Partial patches only; absent fields keep
// their current value.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};

use dishboard_core::{EventPipeline, NotificationPreferences, PreferencesPatch};
use dishboard_store::PreferenceStore;

/// App state for preference routes
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<EventPipeline>,
    pub store: Arc<dyn PreferenceStore>,
}

/// Create preference routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/v1/preferences",
            get(get_preferences).patch(update_preferences),
        )
        .with_state(state)
}

/// GET /v1/preferences - Current notification switches
#[utoipa::path(
    get,
    path = "/v1/preferences",
    responses(
        (status = 200, description = "Current preferences", body = NotificationPreferences)
    ),
    tag = "preferences"
)]
pub async fn get_preferences(State(state): State<AppState>) -> Json<NotificationPreferences> {
    let preferences = *state.pipeline.preferences().read().unwrap();
    Json(preferences)
}

/// PATCH /v1/preferences - Merge a partial update and persist it
#[utoipa::path(
    patch,
    path = "/v1/preferences",
    request_body = PreferencesPatch,
    responses(
        (status = 200, description = "Updated preferences", body = NotificationPreferences),
        (status = 500, description = "Internal server error")
    ),
    tag = "preferences"
)]
pub async fn update_preferences(
    State(state): State<AppState>,
    Json(patch): Json<PreferencesPatch>,
) -> Result<Json<NotificationPreferences>, StatusCode> {
    // Merge under the lock, persist after releasing it.
    let updated = {
        let preferences = state.pipeline.preferences();
        let mut guard = preferences.write().unwrap();
        guard.merge(&patch);
        *guard
    };

    state.store.save(&updated).await.map_err(|e| {
        tracing::error!("Failed to persist preferences: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(updated))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request};
    use dishboard_core::{EntityCategory, EntityEvent, IngestOutcome};
    use dishboard_store::InMemoryPreferenceStore;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn test_state() -> (AppState, Arc<InMemoryPreferenceStore>) {
        let store = Arc::new(InMemoryPreferenceStore::new());
        (
            AppState {
                pipeline: Arc::new(EventPipeline::new(NotificationPreferences::default())),
                store: store.clone(),
            },
            store,
        )
    }

    #[tokio::test]
    async fn get_returns_the_live_record() {
        let (state, _store) = test_state();
        let app = routes(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/v1/preferences")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let preferences: NotificationPreferences = serde_json::from_slice(&body).unwrap();
        assert_eq!(preferences, NotificationPreferences::default());
    }

    #[tokio::test]
    async fn patch_merges_persists_and_takes_effect() {
        let (state, store) = test_state();
        let pipeline = state.pipeline.clone();
        let app = routes(state);

        let response = app
            .oneshot(
                Request::builder()
                    .method("PATCH")
                    .uri("/v1/preferences")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"orders":false}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let updated: NotificationPreferences = serde_json::from_slice(&body).unwrap();
        assert!(!updated.orders);
        assert!(updated.drivers);

        // Persisted through the store.
        assert_eq!(store.load().await.unwrap().unwrap(), updated);

        // And the pipeline consults the merged record: orders are now
        // counted but not surfaced.
        assert!(!pipeline
            .preferences()
            .read()
            .unwrap()
            .is_enabled(EntityCategory::Order));
        let outcome =
            pipeline.ingest(&EntityEvent::new("order", "Order #9 created", 1000, "created"));
        assert!(matches!(outcome, IngestOutcome::Counted { .. }));
    }
}
