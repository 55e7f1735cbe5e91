// Dishboard API server
// Decision: the feed and refresh loops run as background tasks in this
// process; HTTP handlers only read shared state
// Decision: losing the feed or the chart API degrades the dashboard, it
// never takes the process down

mod common;
mod config;
mod dashboard;
mod notifications;
mod preferences;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::http::{header, HeaderValue, Method};
use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use tokio::sync::watch;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use dishboard_core::{DashboardState, EventPipeline, NotificationPreferences};
use dishboard_feed::{run_refresh_loop, ChartClient, FeedClient, FeedConfig};
use dishboard_store::{FilePreferenceStore, PreferenceStore};

use crate::config::ApiConfig;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    feed_connected: bool,
}

/// State for health endpoint
#[derive(Clone)]
struct HealthState {
    connectivity: watch::Receiver<bool>,
}

async fn health(State(state): State<HealthState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        feed_connected: *state.connectivity.borrow(),
    })
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        dashboard::get_dashboard,
        notifications::list_notifications,
        notifications::dismiss_notification,
        notifications::clear_notifications,
        notifications::stream_notifications,
        preferences::get_preferences,
        preferences::update_preferences,
    ),
    components(
        schemas(
            dashboard::DashboardResponse,
            dishboard_core::CorrectedTotals,
            dishboard_core::CorrectionCounters,
            dishboard_core::ChartPoint,
            dishboard_core::NotificationEntry,
            dishboard_core::EntityCategory,
            dishboard_core::NotificationPreferences,
            dishboard_core::PreferencesPatch,
            common::ListResponse<dishboard_core::NotificationEntry>,
        )
    ),
    tags(
        (name = "dashboard", description = "Corrected dashboard totals"),
        (name = "notifications", description = "Notification cards and their SSE stream"),
        (name = "preferences", description = "Notification preference management")
    ),
    info(
        title = "Dishboard API",
        version = "0.2.0",
        description = "Real-time admin dashboard state for the delivery platform",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dishboard_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("dishboard-api starting...");

    let config = ApiConfig::from_env()?;

    // Load the persisted preference record; fall back to defaults on a
    // missing or unreadable record.
    let store: Arc<dyn PreferenceStore> =
        Arc::new(FilePreferenceStore::new(config.preferences_path()));
    let preferences = match store.load().await {
        Ok(Some(preferences)) => {
            tracing::info!("Loaded persisted notification preferences");
            preferences
        }
        Ok(None) => NotificationPreferences::default(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load preferences; using defaults");
            NotificationPreferences::default()
        }
    };

    // One pipeline and one dashboard state per process.
    let pipeline = Arc::new(EventPipeline::new(preferences));
    let dashboard_state = Arc::new(DashboardState::new(pipeline.ledger()));

    // Background tasks: live feed and authoritative refresh.
    let feed_client = FeedClient::new(FeedConfig::new(&config.feed_url, &config.admin_token));
    let connectivity = feed_client.connectivity();
    tokio::spawn({
        let pipeline = pipeline.clone();
        async move { feed_client.run(pipeline).await }
    });

    let chart_client = ChartClient::new(&config.chart_url, &config.admin_token);
    tokio::spawn(run_refresh_loop(
        chart_client,
        dashboard_state.clone(),
        config.refresh_interval(),
    ));

    // Create module-specific states
    let dashboard_api_state = dashboard::AppState {
        dashboard: dashboard_state,
        connectivity: connectivity.clone(),
    };
    let notifications_state = notifications::AppState {
        pipeline: pipeline.clone(),
    };
    let preferences_state = preferences::AppState {
        pipeline,
        store,
    };
    let health_state = HealthState { connectivity };

    let api_routes = Router::new()
        .merge(dashboard::routes(dashboard_api_state))
        .merge(notifications::routes(notifications_state))
        .merge(preferences::routes(preferences_state));

    let app = Router::new()
        .route("/health", get(health).with_state(health_state))
        .merge(api_routes);

    // Add Swagger UI
    let app =
        app.merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()));

    // Add CORS layer only if origins are configured
    let cors_origins: Vec<HeaderValue> = config
        .cors_origins()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    let app = if cors_origins.is_empty() {
        tracing::info!("CORS not configured (same-origin requests only)");
        app
    } else {
        tracing::info!(origins = ?cors_origins, "CORS origins configured");
        app.layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(cors_origins))
                .allow_methods([
                    Method::GET,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([
                    header::CONTENT_TYPE,
                    header::AUTHORIZATION,
                    header::ACCEPT,
                    header::CACHE_CONTROL,
                ])
                .allow_credentials(true),
        )
    };

    // Add tracing
    let app = app.layer(TraceLayer::new_for_http());

    // Start server
    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
