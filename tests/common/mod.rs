#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use sea_orm::{
    ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, DatabaseTransaction,
    TransactionTrait,
};
use std::path::PathBuf;
use std::time::Duration;

use greenhouse_db::entity::readings;
use greenhouse_db::reading::Reading;
use greenhouse_db::store::ReadingStore;

/// Fresh in-memory database with the schema applied.
pub async fn memory_store() -> ReadingStore {
    let store = ReadingStore::connect("sqlite::memory:", 1, Duration::from_secs(5))
        .await
        .expect("open in-memory sqlite");
    store.init_schema().await.expect("create schema");
    store
}

/// Step a paused clock forward for the rest of the test.
///
/// SQLite work happens on a separate thread. While the runtime waits for it, a paused
/// clock would otherwise jump straight to the next timer, which may be a store
/// timeout. Advancing in small steps keeps the runtime busy so it never jumps.
/// Call this before touching the database.
pub fn drive_paused_clock() {
    tokio::spawn(async {
        loop {
            tokio::time::advance(Duration::from_micros(200)).await;
        }
    });
}

/// In-memory connection for `start_paused` tests, with pool and reaper timers set
/// beyond anything a test advances through.
pub async fn paused_memory_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .connect_timeout(FAR)
        .acquire_timeout(FAR)
        .idle_timeout(FAR)
        .max_lifetime(FAR)
        .sqlx_logging(false);
    Database::connect(options).await.expect("open in-memory sqlite")
}

/// [`paused_memory_db`] wrapped in a store with the schema applied.
pub async fn paused_memory_store() -> ReadingStore {
    let store = ReadingStore::new(paused_memory_db().await, FAR);
    store.init_schema().await.expect("create schema");
    store
}

const FAR: Duration = Duration::from_secs(365 * 24 * 3600);

/// A file database whose write lock is held by an open transaction on a second
/// connection. Writes through the returned store block until the transaction ends.
pub struct LockedDatabase {
    pub store: ReadingStore,
    pub lock: DatabaseTransaction,
    path: PathBuf,
}

impl LockedDatabase {
    pub async fn open(name: &str, timeout: Duration) -> Self {
        let path = std::env::temp_dir().join(format!(
            "greenhouse-{name}-{}.db",
            std::process::id()
        ));
        remove_db_files(&path);
        let url = format!("sqlite://{}?mode=rwc", path.display());

        let store = ReadingStore::connect(&url, 1, timeout)
            .await
            .expect("open file sqlite");
        store.init_schema().await.expect("create schema");

        let other = Database::connect(url.as_str())
            .await
            .expect("open second connection");
        let lock = other.begin().await.expect("begin transaction");
        readings::ActiveModel::from(&reading(Utc::now(), 25.0))
            .insert(&lock)
            .await
            .expect("take write lock");

        Self { store, lock, path }
    }
}

impl Drop for LockedDatabase {
    fn drop(&mut self) {
        remove_db_files(&self.path);
    }
}

fn remove_db_files(path: &PathBuf) {
    for suffix in ["", "-wal", "-shm", "-journal"] {
        let _ = std::fs::remove_file(format!("{}{suffix}", path.display()));
    }
}

pub fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
}

/// A reading whose temperature doubles as a marker.
pub fn reading(timestamp: DateTime<Utc>, temperature: f64) -> Reading {
    Reading {
        timestamp,
        soil_moisture: 80.0,
        temperature,
        humidity: 85.0,
        ph_level: 6.0,
        light_level: 500,
    }
}
