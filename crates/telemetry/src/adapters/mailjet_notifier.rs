//! Mailjet adapter for the `Notifier` port.
//!
//! Sends a fixed-template alert email through the Mailjet v3.1 send API
//! (basic auth, JSON body) via `reqwest`. Credentials come from the
//! process environment; a missing variable aborts startup. Delivery is
//! best-effort: the caller logs a failed send and drops it, so there is no
//! retry and no rate limiting here either.

use async_trait::async_trait;
use domain::{Notifier, NotifyError};
use serde_json::json;

/// Mailjet transactional send endpoint.
const SEND_URL: &str = "https://api.mailjet.com/v3.1/send";

/// Credentials and addressing for the Mailjet account, from the process
/// environment.
#[derive(Debug, Clone)]
pub struct MailjetCredentials {
    /// `MAILJET_API_KEY` -- basic auth user.
    pub api_key: String,
    /// `MAILJET_API_SECRET` -- basic auth password.
    pub api_secret: String,
    /// `MAILJET_FROM_EMAIL` -- sender address.
    pub from_email: String,
    /// `MAILJET_FROM_NAME` -- sender display name.
    pub from_name: String,
    /// `MAILJET_TO_EMAIL` -- alert recipient.
    pub to_email: String,
}

impl MailjetCredentials {
    /// Read all five `MAILJET_*` variables from the environment.
    ///
    /// # Errors
    ///
    /// Fails on the first missing variable; the binary treats this as a
    /// fatal initialization error.
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            api_key: require("MAILJET_API_KEY")?,
            api_secret: require("MAILJET_API_SECRET")?,
            from_email: require("MAILJET_FROM_EMAIL")?,
            from_name: require("MAILJET_FROM_NAME")?,
            to_email: require("MAILJET_TO_EMAIL")?,
        })
    }
}

fn require(name: &'static str) -> anyhow::Result<String> {
    use anyhow::Context as _;
    std::env::var(name).with_context(|| format!("missing environment variable {name}"))
}

/// `Notifier` adapter that sends alerts through the Mailjet HTTP API.
#[derive(Debug)]
pub struct MailjetNotifier {
    http: reqwest::Client,
    credentials: MailjetCredentials,
}

impl MailjetNotifier {
    /// Create a notifier with its own HTTP client.
    #[must_use]
    pub fn new(credentials: MailjetCredentials) -> Self {
        Self { http: reqwest::Client::new(), credentials }
    }

    /// Build the fixed plain-text + HTML alert message body.
    fn payload(&self, sensor_id: &str, temperature: f64) -> serde_json::Value {
        json!({
            "Messages": [{
                "From": {
                    "Email": self.credentials.from_email,
                    "Name": self.credentials.from_name,
                },
                "To": [{
                    "Email": self.credentials.to_email,
                    "Name": "Alert recipient",
                }],
                "Subject": "Temperature alert",
                "TextPart": format!(
                    "Sensor {sensor_id} reported {temperature:.2}C, above the allowed threshold."
                ),
                "HTMLPart": format!(
                    "<h3>IoT temperature alert</h3>\
                     <p>Sensor <b>{sensor_id}</b> reported <b>{temperature:.2}&deg;C</b>.</p>"
                ),
            }]
        })
    }
}

#[async_trait]
impl Notifier for MailjetNotifier {
    async fn send_alert(&self, sensor_id: &str, temperature: f64) -> Result<(), NotifyError> {
        let response = self
            .http
            .post(SEND_URL)
            .basic_auth(&self.credentials.api_key, Some(&self.credentials.api_secret))
            .json(&self.payload(sensor_id, temperature))
            .send()
            .await
            .map_err(|e| {
                tracing::error!(sensor_id, error = %e, "mailjet.send.failed");
                NotifyError::DeliveryFailed { reason: e.to_string() }
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!(sensor_id, %status, "mailjet.send.rejected");
            return Err(NotifyError::DeliveryFailed {
                reason: format!("mailjet returned {status}"),
            });
        }

        tracing::info!(sensor_id, temperature, "mailjet.alert.sent");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
