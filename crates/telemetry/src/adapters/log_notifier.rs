//! Demo adapter for the `Notifier` port.
//!
//! Logs threshold alerts via `tracing::warn!` and always returns `Ok(())`.
//! Wired in when `ALERT_MODE=log`, so the demo runs without Mailjet
//! credentials.

use async_trait::async_trait;
use domain::{Notifier, NotifyError};

/// `Notifier` adapter that emits a warning log for each alert.
///
/// Always returns `Ok(())`; `NotifyError::DeliveryFailed` is unreachable
/// here.
#[derive(Debug)]
pub struct LogNotifier;

impl LogNotifier {
    /// Create a new log notifier adapter.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn send_alert(&self, sensor_id: &str, temperature: f64) -> Result<(), NotifyError> {
        tracing::warn!(sensor_id, temperature, "log_notifier.temperature_alert");
        Ok(())
    }
}
