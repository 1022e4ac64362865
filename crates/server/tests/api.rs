//! Integration tests for the HTTP surface.
//!
//! Drives the production router (same middleware stack as the binary)
//! in-process via `tower::ServiceExt::oneshot`, with mock store adapters
//! injected through `AppState`.

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use chrono::{DateTime, Duration, Utc};
use domain::{Reading, ReadingStore, StoreError};
use server::{AppState, router};
use std::sync::Arc;
use tower::ServiceExt as _;

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

/// Store stub that serves a fixed set of readings, or fails on demand.
struct StubStore {
    readings: Vec<Reading>,
    fail: bool,
}

#[async_trait]
impl ReadingStore for StubStore {
    async fn append(&self, _reading: &Reading) -> Result<(), StoreError> {
        Ok(())
    }

    async fn fetch_latest(&self, n: u32) -> Result<Vec<Reading>, StoreError> {
        if self.fail {
            return Err(StoreError::Unavailable { reason: "injected".to_owned() });
        }
        Ok(self.readings.iter().take(n as usize).cloned().collect())
    }
}

fn make_reading(sensor_id: &str, temperature: f64, timestamp: DateTime<Utc>) -> Reading {
    Reading { sensor_id: sensor_id.to_owned(), temperature, timestamp }
}

fn app_with_readings(readings: Vec<Reading>) -> Router {
    let store: Arc<dyn ReadingStore> = Arc::new(StubStore { readings, fail: false });
    router(AppState { store })
}

fn app_with_failing_store() -> Router {
    let store: Arc<dyn ReadingStore> = Arc::new(StubStore { readings: vec![], fail: true });
    router(AppState { store })
}

async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// GET /
// ---------------------------------------------------------------------------

#[tokio::test]
async fn root_serves_dashboard_html() {
    let response = get(app_with_readings(vec![]), "/").await;

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers().get("content-type").unwrap().to_str().unwrap();
    assert!(content_type.starts_with("text/html"), "got content-type {content_type}");

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let html = std::str::from_utf8(&bytes).unwrap();
    assert!(html.contains("<canvas id=\"tempChart\">"));
    assert!(html.contains("fetch('/api')"), "dashboard must poll the data route");
}

// ---------------------------------------------------------------------------
// GET /api
// ---------------------------------------------------------------------------

#[tokio::test]
async fn api_returns_reading_array_with_exact_fields() {
    let now = Utc::now();
    let app = app_with_readings(vec![
        make_reading("sensor-1", 33.0_f64, now),
        make_reading("sensor-2", 21.5_f64, now - Duration::seconds(30)),
    ]);

    let response = get(app, "/api").await;
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers().get("content-type").unwrap().to_str().unwrap();
    assert!(content_type.starts_with("application/json"));

    let json = body_json(response).await;
    let array = json.as_array().expect("body must be a JSON array");
    assert_eq!(array.len(), 2);
    for entry in array {
        let obj = entry.as_object().unwrap();
        assert_eq!(obj.len(), 3, "exactly the three documented fields");
        assert!(obj.contains_key("ID"));
        assert!(obj.contains_key("Temperatura"));
        assert!(obj.contains_key("Timestamp"));
    }
    assert_eq!(array[0]["ID"], "sensor-1");
    assert_eq!(array[0]["Temperatura"], 33.0_f64);
}

#[tokio::test]
async fn api_returns_empty_array_when_store_is_empty() {
    let response = get(app_with_readings(vec![]), "/api").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, serde_json::json!([]));
}

#[tokio::test]
async fn api_has_open_cors() {
    let response = get(app_with_readings(vec![]), "/api").await;
    let allow_origin = response
        .headers()
        .get("access-control-allow-origin")
        .expect("missing Access-Control-Allow-Origin header")
        .to_str()
        .unwrap();
    assert_eq!(allow_origin, "*");
}

#[tokio::test]
async fn api_store_failure_returns_500_with_fixed_body() {
    let response = get(app_with_failing_store(), "/api").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json, serde_json::json!({ "error": "failed to fetch readings" }));
}

// ---------------------------------------------------------------------------
// Unknown routes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_route_returns_404() {
    let response = get(app_with_readings(vec![]), "/nope").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
