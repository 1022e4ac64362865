//! HTTP server component -- dashboard page plus a JSON polling endpoint.
//!
//! Routes:
//! - `GET /`    -- static dashboard page (chart + table, polls `/api`)
//! - `GET /api` -- the 10 most recent readings, newest first, as JSON
//!
//! [`router`] builds the production middleware stack (permissive CORS,
//! request tracing) so integration tests drive the exact same router via
//! `tower::ServiceExt::oneshot`. The server reads independently from the
//! shared store on each poll; it never coordinates with the simulators.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use domain::{Reading, ReadingStore, StoreError};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Dashboard page, kept as a separate asset (presentation, not logic).
const DASHBOARD_HTML: &str = include_str!("../assets/dashboard.html");

/// Number of readings returned by `GET /api` per poll.
const LATEST_LIMIT: u32 = 10;

/// Shared state for all handlers.
///
/// Cheaply cloneable; the store handle is read-only after construction and
/// injected at startup (no process-wide singleton).
#[derive(Clone)]
pub struct AppState {
    /// Persistence port shared with the simulators.
    pub store: Arc<dyn ReadingStore>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}

/// Errors surfaced by the HTTP handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The store could not serve the readings query.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Store(e) => {
                tracing::error!(error = %e, "api.readings.fetch_failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "failed to fetch readings" })),
                )
                    .into_response()
            }
        }
    }
}

/// Build the application router with the production middleware stack.
///
/// CORS is deliberately open (`Access-Control-Allow-Origin: *`): the demo
/// has no authentication and the dashboard may be served from anywhere.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    Router::new()
        .route("/", get(dashboard))
        .route("/api", get(latest_readings))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// `GET /` -- serve the static dashboard page.
async fn dashboard() -> Html<&'static str> {
    Html(DASHBOARD_HTML)
}

/// `GET /api` -- return the latest readings as a JSON array, newest first.
///
/// Store failures map to a 500 with a fixed JSON error body.
async fn latest_readings(State(state): State<AppState>) -> Result<Json<Vec<Reading>>, ApiError> {
    let readings = state.store.fetch_latest(LATEST_LIMIT).await?;
    tracing::debug!(count = readings.len(), "api.readings.served");
    Ok(Json(readings))
}
