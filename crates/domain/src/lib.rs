//! Shared domain types for the telemetry demo.
//!
//! Defines `Reading`, the error enums, and the hexagonal port traits
//! `ReadingStore` and `Notifier`. All other crates depend on this one;
//! no workspace crate is imported here.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One timestamped temperature sample from a virtual sensor.
///
/// Created by the simulator at each iteration, written once to the store,
/// never mutated. JSON field names match the dashboard polling contract
/// (`ID`, `Temperatura`, `Timestamp`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Sensor identifier, `sensor-{n}` naming pattern (not validated
    /// against a registry).
    #[serde(rename = "ID")]
    pub sensor_id: String,
    /// Temperature in degrees Celsius, range `[20.0, 35.0)` when generated.
    #[serde(rename = "Temperatura")]
    pub temperature: f64,
    /// Creation time of the sample.
    #[serde(rename = "Timestamp")]
    pub timestamp: DateTime<Utc>,
}

/// Errors that a store adapter may return.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The store could not serve the request.
    #[error("store unavailable: {reason}")]
    Unavailable {
        /// Human-readable description of the underlying failure.
        reason: String,
    },
}

/// Errors from the Notifier port.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotifyError {
    /// Alert could not be delivered.
    #[error("delivery failed: {reason}")]
    DeliveryFailed {
        /// Human-readable description.
        reason: String,
    },
}

/// Hexagonal port: persistence for readings.
///
/// Implementations live in the binary crate (e.g. the SQLite adapter).
/// Simulator and server depend exclusively on this trait, injected as an
/// `Arc<dyn ReadingStore>` at construction time -- never a process-wide
/// singleton. Retention is delegated entirely to the store; this system
/// never deletes.
#[async_trait]
pub trait ReadingStore: Send + Sync {
    /// Append one reading to the readings collection.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Unavailable` when the write fails.
    async fn append(&self, reading: &Reading) -> Result<(), StoreError>;

    /// Fetch the `n` most recent readings, ordered by timestamp descending.
    ///
    /// Returns at most `n` readings. No pagination, no filtering.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Unavailable` when the query fails.
    async fn fetch_latest(&self, n: u32) -> Result<Vec<Reading>, StoreError>;
}

/// Hexagonal port: threshold-alert delivery.
///
/// Best-effort, at-most-once-attempted: callers log a failed delivery and
/// drop it. No retry, no rate limiting -- repeated threshold breaches
/// trigger repeated send attempts.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send one alert for a threshold-exceeding reading.
    ///
    /// # Errors
    ///
    /// Returns `NotifyError::DeliveryFailed` when the alert cannot be sent.
    async fn send_alert(&self, sensor_id: &str, temperature: f64) -> Result<(), NotifyError>;
}
