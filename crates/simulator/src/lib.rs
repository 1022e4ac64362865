//! Simulator component -- generates randomized temperature readings for one
//! virtual sensor and writes them to a `ReadingStore` hexagonal port.
//!
//! Entry points: [`Simulator::sample_once`], [`Simulator::record`],
//! [`Simulator::run`]. Configuration via [`SimulatorConfig::builder`].
//! One `Simulator` instance drives one sensor; the binary spawns one task
//! per virtual sensor.

use domain::{Notifier, Reading, ReadingStore};
use rand::{Rng as _, SeedableRng as _, rngs::StdRng};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Lower bound (inclusive) of the generated temperature range, degrees Celsius.
pub const TEMP_MIN: f64 = 20.0;
/// Upper bound (exclusive) of the generated temperature range, degrees Celsius.
pub const TEMP_MAX: f64 = 35.0;
/// Readings strictly above this value trigger an alert.
pub const ALERT_THRESHOLD: f64 = 30.0;

// ---------------------------------------------------------------------------
// SimulatorError
// ---------------------------------------------------------------------------

/// Errors that can occur when configuring a simulator.
#[derive(Debug, thiserror::Error)]
pub enum SimulatorError {
    /// The supplied configuration is invalid.
    #[error("invalid simulator configuration: {reason}")]
    InvalidConfig {
        /// Human-readable description of the problem.
        reason: String,
    },
}

// ---------------------------------------------------------------------------
// SimulatorConfig + builder
// ---------------------------------------------------------------------------

/// Runtime configuration for a [`Simulator`].
///
/// Construct via [`SimulatorConfig::builder`].
#[derive(Debug)]
pub struct SimulatorConfig {
    /// Identifier stamped on every generated reading (e.g. `sensor-1`).
    pub sensor_id: String,
    /// Delay between successive readings.
    pub interval: Duration,
    /// Optional upper bound on the number of readings. `None` means the
    /// loop runs until the stop channel fires.
    pub iterations: Option<u64>,
    /// Optional RNG seed for reproducible temperatures. `None` seeds from the OS.
    pub seed: Option<u64>,
}

/// Builder for [`SimulatorConfig`].
///
/// Obtain via [`SimulatorConfig::builder`]; finalize with [`build`](Self::build).
#[derive(Debug)]
pub struct SimulatorConfigBuilder {
    sensor_id: String,
    interval: Duration,
    iterations: Option<u64>,
    seed: Option<u64>,
}

impl SimulatorConfig {
    /// Create a builder. `sensor_id` is the only required parameter.
    ///
    /// Default values: `interval = 30 s`, `iterations = None`, `seed = None`.
    #[must_use]
    pub fn builder(sensor_id: impl Into<String>) -> SimulatorConfigBuilder {
        SimulatorConfigBuilder {
            sensor_id: sensor_id.into(),
            // 30 s matches the demo cadence; lower for tests.
            interval: Duration::from_secs(30),
            iterations: None,
            seed: None,
        }
    }
}

impl SimulatorConfigBuilder {
    /// Override the inter-reading delay.
    #[must_use]
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Set a finite reading count. Without this the simulator runs until
    /// the stop channel signals shutdown.
    #[must_use]
    pub fn iterations(mut self, n: u64) -> Self {
        self.iterations = Some(n);
        self
    }

    /// Fix the RNG seed for deterministic output (useful in tests).
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validate and build the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SimulatorError::InvalidConfig`] when `sensor_id` is empty.
    #[must_use = "the Result must be checked; use ? or unwrap"]
    pub fn build(self) -> Result<SimulatorConfig, SimulatorError> {
        if self.sensor_id.is_empty() {
            return Err(SimulatorError::InvalidConfig {
                reason: "sensor_id must be non-empty".to_owned(),
            });
        }
        Ok(SimulatorConfig {
            sensor_id: self.sensor_id,
            interval: self.interval,
            iterations: self.iterations,
            seed: self.seed,
        })
    }
}

// ---------------------------------------------------------------------------
// Simulator
// ---------------------------------------------------------------------------

/// Generates randomized readings for one virtual sensor and forwards them to
/// a [`ReadingStore`] port, alerting through a [`Notifier`] port on
/// threshold breaches.
///
/// Dependencies are injected per call (hexagonal architecture); the
/// simulator holds no concrete adapter references.
#[derive(Debug)]
pub struct Simulator {
    config: SimulatorConfig,
    rng: StdRng,
}

impl Simulator {
    /// Create a new simulator from `config`.
    ///
    /// Seeds the RNG from `config.seed` if set, otherwise from the OS.
    #[must_use]
    pub fn new(config: SimulatorConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self { config, rng }
    }

    /// Sample one temperature, uniformly distributed in `[TEMP_MIN, TEMP_MAX)`.
    #[must_use]
    pub fn next_temperature(&mut self) -> f64 {
        self.rng.random_range(TEMP_MIN..TEMP_MAX)
    }

    /// Persist one reading with the given `temperature` and dispatch an
    /// alert when it exceeds [`ALERT_THRESHOLD`].
    ///
    /// The reading is stamped with the current time. Store write failures
    /// are logged and dropped; the caller keeps going. Alert dispatch is
    /// independent of the write outcome and runs as a detached task:
    /// at-most-once-attempted, no guarantee of completion, no deduplication
    /// of repeated breaches. The `JoinHandle` is returned so tests can
    /// await delivery; production callers drop it.
    pub async fn record(
        &self,
        store: &dyn ReadingStore,
        notifier: &Arc<dyn Notifier>,
        temperature: f64,
    ) -> Option<JoinHandle<()>> {
        let reading = Reading {
            sensor_id: self.config.sensor_id.clone(),
            temperature,
            timestamp: chrono::Utc::now(),
        };

        let write = store.append(&reading).await;

        let alert = if temperature > ALERT_THRESHOLD {
            tracing::warn!(
                sensor_id = %reading.sensor_id,
                temperature,
                "simulator.alert.dispatched"
            );
            let notifier = Arc::clone(notifier);
            let sensor_id = reading.sensor_id.clone();
            Some(tokio::spawn(async move {
                if let Err(e) = notifier.send_alert(&sensor_id, temperature).await {
                    tracing::warn!(sensor_id = %sensor_id, error = %e, "simulator.alert.failed");
                }
            }))
        } else {
            None
        };

        match write {
            Ok(()) => tracing::debug!(
                sensor_id = %self.config.sensor_id,
                temperature,
                "simulator.reading.persisted"
            ),
            Err(e) => tracing::error!(
                sensor_id = %self.config.sensor_id,
                error = %e,
                "simulator.append.failed"
            ),
        }

        alert
    }

    /// Sample one temperature and record it via [`record`](Self::record).
    pub async fn sample_once(
        &mut self,
        store: &dyn ReadingStore,
        notifier: &Arc<dyn Notifier>,
    ) -> Option<JoinHandle<()>> {
        let temperature = self.next_temperature();
        self.record(store, notifier, temperature).await
    }

    /// Run the sampling loop until stopped.
    ///
    /// Calls [`sample_once`](Self::sample_once) repeatedly, sleeping
    /// `config.interval` between readings. Stops cleanly when:
    /// - `config.iterations` readings have been recorded, or
    /// - `stop` carries `true`.
    ///
    /// A receiver that already carries `true` stops the loop before the
    /// first reading.
    pub async fn run(
        &mut self,
        store: &dyn ReadingStore,
        notifier: &Arc<dyn Notifier>,
        mut stop: watch::Receiver<bool>,
    ) {
        let mut count = 0u64;
        loop {
            if *stop.borrow_and_update() {
                tracing::info!(
                    sensor_id = %self.config.sensor_id,
                    "simulator.run.stopped: stop signal after {count} reading(s)"
                );
                return;
            }

            self.sample_once(store, notifier).await;
            count += 1;
            tracing::info!(
                sensor_id = %self.config.sensor_id,
                "simulator.reading.recorded: iteration={count}"
            );

            if let Some(max) = self.config.iterations
                && count >= max
            {
                tracing::info!(
                    sensor_id = %self.config.sensor_id,
                    "simulator.run.stopped: iteration limit reached"
                );
                return;
            }

            tokio::select! {
                () = tokio::time::sleep(self.config.interval) => {}
                changed = stop.changed() => match changed {
                    Ok(()) => {}
                    // Sender dropped: no stop can arrive anymore, keep the timer.
                    Err(_) => tokio::time::sleep(self.config.interval).await,
                },
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
