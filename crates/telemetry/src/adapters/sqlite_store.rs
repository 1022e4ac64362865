//! SQLite adapter for the `ReadingStore` port.
//!
//! Persists readings to a SQLite file via `sqlx`. The original deployment
//! target is a remote document store; at demo scale a local SQLite file
//! provides the same append/fetch-latest contract, and the port keeps the
//! backend swappable without touching the simulator or server crates.
//!
//! Rows get a surrogate `doc_id` primary key (the store's own document id);
//! the payload columns are `id`, `temperatura`, `timestamp`. Readings are
//! append-only: no update, no delete, retention is the store's problem.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{Reading, ReadingStore, StoreError};
use sqlx::Row as _;

/// `ReadingStore` adapter backed by a SQLite database file via `sqlx`.
///
/// Connects to (or creates) a SQLite file and ensures the `readings` table
/// exists.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: sqlx::SqlitePool,
}

impl SqliteStore {
    /// Open or create a SQLite database and initialize the schema.
    ///
    /// Passes `create_if_missing(true)` so the database file is created on
    /// first run without manual setup. The `readings` table is created via
    /// `CREATE TABLE IF NOT EXISTS`, making repeated calls safe.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error` when the connection or schema creation fails.
    /// The caller treats this as fatal at process start.
    pub async fn new(db_url: &str) -> Result<Self, sqlx::Error> {
        // create_if_missing: sqlx 0.8 defaults to false for file databases;
        // enable explicitly so the demo works out of the box on first run.
        let opts = db_url
            .parse::<sqlx::sqlite::SqliteConnectOptions>()?
            .create_if_missing(true);
        let pool = sqlx::SqlitePool::connect_with(opts).await?;
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS readings (
                doc_id      INTEGER PRIMARY KEY AUTOINCREMENT,
                id          TEXT NOT NULL,
                temperatura REAL NOT NULL,
                timestamp   TEXT NOT NULL
            )",
        )
        .execute(&pool)
        .await?;
        Ok(Self { pool })
    }
}

/// Map a `sqlx` error to the port error, logging the underlying cause at
/// error level before the detail is flattened into a reason string.
fn unavailable(op: &'static str) -> impl FnOnce(sqlx::Error) -> StoreError {
    move |e| {
        tracing::error!("sqlite.{op}: {e}");
        StoreError::Unavailable { reason: e.to_string() }
    }
}

#[async_trait]
impl ReadingStore for SqliteStore {
    async fn append(&self, reading: &Reading) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO readings (id, temperatura, timestamp) VALUES (?, ?, ?)")
            .bind(&reading.sensor_id)
            .bind(reading.temperature)
            .bind(reading.timestamp)
            .execute(&self.pool)
            .await
            .map_err(unavailable("append"))?;
        Ok(())
    }

    async fn fetch_latest(&self, n: u32) -> Result<Vec<Reading>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, temperatura, timestamp FROM readings
             ORDER BY timestamp DESC LIMIT ?",
        )
        .bind(i64::from(n))
        .fetch_all(&self.pool)
        .await
        .map_err(unavailable("fetch_latest"))?;

        let mut readings = Vec::with_capacity(rows.len());
        for row in rows {
            readings.push(Reading {
                sensor_id: row.try_get("id").map_err(unavailable("fetch_latest"))?,
                temperature: row.try_get("temperatura").map_err(unavailable("fetch_latest"))?,
                timestamp: row
                    .try_get::<DateTime<Utc>, _>("timestamp")
                    .map_err(unavailable("fetch_latest"))?,
            });
        }
        Ok(readings)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::SqliteStore;
    use chrono::{DateTime, Duration, Utc};
    use domain::{Reading, ReadingStore as _};

    // Each test opens a fresh in-memory SQLite database, so tests are fully
    // isolated with no on-disk side-effects.
    async fn make_store() -> SqliteStore {
        SqliteStore::new("sqlite::memory:")
            .await
            .expect("in-memory SQLite should open")
    }

    fn base_time() -> DateTime<Utc> {
        "2026-08-28T10:00:00Z".parse().unwrap()
    }

    fn make_reading(sensor_id: &str, temperature: f64, timestamp: DateTime<Utc>) -> Reading {
        Reading { sensor_id: sensor_id.to_owned(), temperature, timestamp }
    }

    #[tokio::test]
    async fn append_then_fetch_round_trips_fields() {
        let store = make_store().await;
        let reading = make_reading("sensor-1", 33.0_f64, base_time());

        store.append(&reading).await.unwrap();
        let fetched = store.fetch_latest(10).await.unwrap();

        assert_eq!(fetched, vec![reading]);
    }

    #[tokio::test]
    async fn fetch_orders_newest_first() {
        let store = make_store().await;
        let t = base_time();
        // Insert out of chronological order.
        store.append(&make_reading("sensor-1", 21.0_f64, t)).await.unwrap();
        store
            .append(&make_reading("sensor-2", 22.0_f64, t + Duration::seconds(10)))
            .await
            .unwrap();
        store
            .append(&make_reading("sensor-3", 23.0_f64, t + Duration::seconds(5)))
            .await
            .unwrap();

        let fetched = store.fetch_latest(10).await.unwrap();

        let ids: Vec<&str> = fetched.iter().map(|r| r.sensor_id.as_str()).collect();
        assert_eq!(ids, ["sensor-2", "sensor-3", "sensor-1"]);
        for pair in fetched.windows(2) {
            assert!(
                pair[0].timestamp > pair[1].timestamp,
                "timestamps must be strictly descending"
            );
        }
    }

    #[tokio::test]
    async fn fetch_returns_at_most_n() {
        let store = make_store().await;
        let t = base_time();
        for i in 0..5_i64 {
            store
                .append(&make_reading("sensor-1", 25.0_f64, t + Duration::seconds(i)))
                .await
                .unwrap();
        }

        let fetched = store.fetch_latest(2).await.unwrap();

        assert_eq!(fetched.len(), 2);
        // The two newest survive the cut.
        assert_eq!(fetched[0].timestamp, t + Duration::seconds(4));
        assert_eq!(fetched[1].timestamp, t + Duration::seconds(3));
    }

    #[tokio::test]
    async fn empty_store_fetches_empty() {
        let store = make_store().await;
        let fetched = store.fetch_latest(10).await.unwrap();
        assert!(fetched.is_empty());
    }

    #[tokio::test]
    async fn duplicate_sensor_readings_all_kept() {
        // Append-only: the same sensor reports repeatedly, nothing is replaced.
        let store = make_store().await;
        let t = base_time();
        store.append(&make_reading("sensor-1", 30.5_f64, t)).await.unwrap();
        store
            .append(&make_reading("sensor-1", 30.5_f64, t + Duration::seconds(1)))
            .await
            .unwrap();

        let fetched = store.fetch_latest(10).await.unwrap();
        assert_eq!(fetched.len(), 2);
    }
}
