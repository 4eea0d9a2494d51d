//! Append-only time-series store for greenhouse readings.
//!
//! Rows go in through [`ReadingStore::insert`] and leave only through
//! [`ReadingStore::clear`]. Insertion order and timestamp order diverge once backfill
//! is enabled, so every read orders by `timestamp` explicitly (row id breaks ties).
//!
//! Each operation is bounded by the configured timeout. SQLite serializes writers,
//! so the scheduler and request handlers can share one store without extra locking.

use chrono::{DateTime, TimeDelta, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectOptions, Database, DatabaseConnection, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};
use sea_orm_migration::MigratorTrait;
use std::future::Future;
use std::time::Duration;

use crate::entity::readings;
use crate::reading::{Reading, SensorColumn};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Store operation '{op}' timed out after {after:?}")]
    Timeout { op: &'static str, after: Duration },
}

pub type StoreResult<T> = Result<T, StoreError>;

/// How rows are picked for a history series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Every row stamped within the last `hours`, no row cap.
    ByWindow { hours: u32 },
    /// The `limit` most recent rows regardless of age.
    ByTail { limit: u64 },
}

#[derive(Clone)]
pub struct ReadingStore {
    db: DatabaseConnection,
    timeout: Duration,
}

impl ReadingStore {
    pub fn new(db: DatabaseConnection, timeout: Duration) -> Self {
        Self { db, timeout }
    }

    /// Open a pool on `url`. In-memory SQLite needs `max_connections = 1`, otherwise
    /// every pooled connection sees its own empty database.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the database cannot be opened.
    pub async fn connect(url: &str, max_connections: u32, timeout: Duration) -> StoreResult<Self> {
        let mut options = ConnectOptions::new(url);
        options
            .max_connections(max_connections)
            .min_connections(1)
            .connect_timeout(timeout)
            .acquire_timeout(timeout)
            .sqlx_logging(false);

        let db = Database::connect(options).await?;
        Ok(Self::new(db, timeout))
    }

    async fn guarded<T, F>(&self, op: &'static str, fut: F) -> StoreResult<T>
    where
        F: Future<Output = Result<T, DbErr>>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result.map_err(StoreError::from),
            Err(_) => {
                tracing::warn!(op, timeout = ?self.timeout, "store_timeout");
                Err(StoreError::Timeout {
                    op,
                    after: self.timeout,
                })
            }
        }
    }

    /// Ensure the `sensor_data` table exists. Safe to call on every start.
    ///
    /// # Errors
    ///
    /// Returns an error if the schema cannot be created.
    pub async fn init_schema(&self) -> StoreResult<()> {
        self.guarded("init_schema", migration::Migrator::up(&self.db, None))
            .await?;
        tracing::debug!("sensor_data schema ready");
        Ok(())
    }

    /// Append one reading. Never updates or deduplicates.
    ///
    /// # Errors
    ///
    /// Returns an error if the row cannot be written.
    pub async fn insert(&self, reading: &Reading) -> StoreResult<Reading> {
        let row = self
            .guarded("insert", readings::ActiveModel::from(reading).insert(&self.db))
            .await?;
        Ok(row.into())
    }

    /// The reading with the greatest timestamp, or [`Reading::zero`] on an empty table.
    ///
    /// # Errors
    ///
    /// Returns an error if the table cannot be read.
    pub async fn latest(&self) -> StoreResult<Reading> {
        let row = self
            .guarded(
                "latest",
                readings::Entity::find()
                    .order_by_desc(readings::Column::Timestamp)
                    .order_by_desc(readings::Column::Id)
                    .one(&self.db),
            )
            .await?;

        Ok(row.map_or_else(Reading::zero, Reading::from))
    }

    /// `(timestamp, value)` pairs of one column, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the table cannot be read.
    pub async fn windowed(
        &self,
        column: SensorColumn,
        selection: Selection,
        now: DateTime<Utc>,
    ) -> StoreResult<Vec<(DateTime<Utc>, f64)>> {
        let rows = match selection {
            Selection::ByWindow { hours } => {
                let since = now
                    .checked_sub_signed(TimeDelta::hours(i64::from(hours)))
                    .unwrap_or(DateTime::<Utc>::MIN_UTC);

                self.guarded(
                    "windowed",
                    readings::Entity::find()
                        .filter(readings::Column::Timestamp.gte(since))
                        .order_by_asc(readings::Column::Timestamp)
                        .order_by_asc(readings::Column::Id)
                        .all(&self.db),
                )
                .await?
            }
            Selection::ByTail { limit } => {
                let mut rows = self
                    .guarded(
                        "windowed",
                        readings::Entity::find()
                            .order_by_desc(readings::Column::Timestamp)
                            .order_by_desc(readings::Column::Id)
                            .limit(limit)
                            .all(&self.db),
                    )
                    .await?;
                rows.reverse();
                rows
            }
        };

        Ok(rows
            .into_iter()
            .map(|row| {
                let reading = Reading::from(row);
                (reading.timestamp, reading.value(column))
            })
            .collect())
    }

    /// Every stored reading, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the table cannot be read.
    pub async fn all_newest_first(&self) -> StoreResult<Vec<Reading>> {
        let rows = self
            .guarded(
                "all_newest_first",
                readings::Entity::find()
                    .order_by_desc(readings::Column::Timestamp)
                    .order_by_desc(readings::Column::Id)
                    .all(&self.db),
            )
            .await?;

        Ok(rows.into_iter().map(Reading::from).collect())
    }

    /// # Errors
    ///
    /// Returns an error if the table cannot be read.
    pub async fn count(&self) -> StoreResult<u64> {
        self.guarded("count", readings::Entity::find().count(&self.db))
            .await
    }

    /// Delete every reading. Irreversible; returns the number of rows removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the rows cannot be deleted.
    pub async fn clear(&self) -> StoreResult<u64> {
        let result = self
            .guarded("clear", readings::Entity::delete_many().exec(&self.db))
            .await?;
        tracing::warn!(rows = result.rows_affected, "All sensor data cleared");
        Ok(result.rows_affected)
    }
}
