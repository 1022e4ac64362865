//! Environment-backed configuration for the telemetry binary.
//!
//! All values have demo-friendly defaults. The Mailjet credentials are
//! read separately by the notifier adapter and are only required when
//! `ALERT_MODE=mailjet`.

use anyhow::{Context as _, bail};
use std::time::Duration;

/// Which `Notifier` adapter the binary wires in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertMode {
    /// Log alerts locally (default; no credentials needed).
    Log,
    /// Send alerts through the Mailjet transactional email API.
    Mailjet,
}

/// Process configuration, resolved once at startup.
#[derive(Debug)]
pub struct AppConfig {
    /// Bind address for the HTTP server (`HOST`, default `0.0.0.0`).
    pub host: String,
    /// Bind port (`PORT`, default `9090`).
    pub port: u16,
    /// Store location (`DATABASE_URL`, default `sqlite:telemetry.db`).
    pub database_url: String,
    /// Alert delivery mode (`ALERT_MODE`, default `log`).
    pub alert_mode: AlertMode,
    /// Number of virtual sensors (`SENSOR_COUNT`, default `3`).
    pub sensor_count: u32,
    /// Readings per sensor; `None` means run until stopped
    /// (`SENSOR_ITERATIONS`, default `20`, `0` = unbounded).
    pub sensor_iterations: Option<u64>,
    /// Delay between readings (`SENSOR_INTERVAL_SECS`, default `30`).
    pub sensor_interval: Duration,
}

impl AppConfig {
    /// Resolve the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Fails on unparseable values; the binary treats this as fatal.
    pub fn from_env() -> anyhow::Result<Self> {
        let port = var_or("PORT", "9090").parse::<u16>().context("PORT must be a port number")?;
        let sensor_count = var_or("SENSOR_COUNT", "3")
            .parse::<u32>()
            .context("SENSOR_COUNT must be a number")?;
        let interval_secs = var_or("SENSOR_INTERVAL_SECS", "30")
            .parse::<u64>()
            .context("SENSOR_INTERVAL_SECS must be a number of seconds")?;
        Ok(Self {
            host: var_or("HOST", "0.0.0.0"),
            port,
            database_url: var_or("DATABASE_URL", "sqlite:telemetry.db"),
            alert_mode: parse_alert_mode(&var_or("ALERT_MODE", "log"))?,
            sensor_count,
            sensor_iterations: parse_iterations(&var_or("SENSOR_ITERATIONS", "20"))?,
            sensor_interval: Duration::from_secs(interval_secs),
        })
    }
}

fn var_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_owned())
}

fn parse_alert_mode(value: &str) -> anyhow::Result<AlertMode> {
    match value {
        "log" => Ok(AlertMode::Log),
        "mailjet" => Ok(AlertMode::Mailjet),
        other => bail!("ALERT_MODE must be 'log' or 'mailjet', got '{other}'"),
    }
}

/// `0` means unbounded: the simulators run until CTRL+C.
fn parse_iterations(value: &str) -> anyhow::Result<Option<u64>> {
    let n = value.parse::<u64>().context("SENSOR_ITERATIONS must be a number")?;
    Ok((n > 0).then_some(n))
}

#[cfg(test)]
mod tests {
    use super::{AlertMode, parse_alert_mode, parse_iterations};

    #[test]
    fn alert_mode_values() {
        assert_eq!(parse_alert_mode("log").unwrap(), AlertMode::Log);
        assert_eq!(parse_alert_mode("mailjet").unwrap(), AlertMode::Mailjet);
        assert!(parse_alert_mode("smtp").is_err());
    }

    #[test]
    fn iterations_zero_means_unbounded() {
        assert_eq!(parse_iterations("20").unwrap(), Some(20));
        assert_eq!(parse_iterations("0").unwrap(), None);
        assert!(parse_iterations("many").is_err());
    }
}
