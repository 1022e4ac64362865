//! Telemetry demo entry point.
//!
//! Wires the simulators, the SQLite store adapter, the notifier adapter,
//! and the HTTP server together: one task per virtual sensor writes into
//! the shared store, the server reads from it on every dashboard poll.
//!
//! # Usage
//!
//! ```text
//! # .env is required; see config.rs for the variables and defaults.
//! RUST_LOG=info cargo run
//!
//! # Also show per-reading debug output
//! RUST_LOG=debug cargo run
//! ```
//!
//! The database file is created on first run. Open the dashboard at
//! `http://localhost:9090/`; CTRL+C stops the simulators and exits.

mod adapters;
mod config;

use adapters::log_notifier::LogNotifier;
use adapters::mailjet_notifier::{MailjetCredentials, MailjetNotifier};
use adapters::sqlite_store::SqliteStore;
use anyhow::Context as _;
use config::{AlertMode, AppConfig};
use domain::{Notifier, ReadingStore};
use simulator::{Simulator, SimulatorConfig};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::watch;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // The demo is configured entirely through .env; a missing file is fatal.
    dotenvy::dotenv().context("failed to load .env")?;

    // Initialize the tracing subscriber before any async work.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = AppConfig::from_env()?;

    // Store and notifier handles are built once and injected everywhere;
    // both are read-only after this point.
    let store: Arc<dyn ReadingStore> = Arc::new(
        SqliteStore::new(&config.database_url)
            .await
            .context("failed to open readings store")?,
    );
    tracing::info!(url = %config.database_url, "main.store.ready");

    let notifier: Arc<dyn Notifier> = match config.alert_mode {
        AlertMode::Mailjet => Arc::new(MailjetNotifier::new(
            MailjetCredentials::from_env().context("ALERT_MODE=mailjet needs credentials")?,
        )),
        AlertMode::Log => Arc::new(LogNotifier::new()),
    };

    // -- Simulators: one task per virtual sensor, stoppable via the watch
    // channel. They coordinate with nothing except the shared store.
    let (stop_tx, stop_rx) = watch::channel(false);
    let mut simulators = Vec::new();
    for i in 1..=config.sensor_count {
        let sim_config = {
            let builder =
                SimulatorConfig::builder(format!("sensor-{i}")).interval(config.sensor_interval);
            match config.sensor_iterations {
                Some(n) => builder.iterations(n),
                None => builder,
            }
            .build()
            .context("failed to build simulator config")?
        };
        let mut sim = Simulator::new(sim_config);
        let store = Arc::clone(&store);
        let notifier = Arc::clone(&notifier);
        let stop = stop_rx.clone();
        simulators.push(tokio::spawn(async move {
            sim.run(store.as_ref(), &notifier, stop).await;
        }));
    }

    // -- HTTP server: dashboard + polling endpoint over the same store.
    let app = server::router(server::AppState { store: Arc::clone(&store) });
    let addr = SocketAddr::new(config.host.parse().context("invalid HOST")?, config.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("main.server.listening: http://{addr}/");

    // Serve until CTRL+C; the simulators stop via the watch channel and are
    // drained before exit.
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("main.shutdown: ctrl_c received, stopping simulators");
        }
        result = axum::serve(listener, app) => {
            result.context("server failed")?;
        }
    }

    let _ = stop_tx.send(true);
    for handle in simulators {
        let _ = handle.await;
    }

    Ok(())
}
