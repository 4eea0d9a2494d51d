use chrono::{Local, TimeDelta, TimeZone};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{MissedTickBehavior, interval};

use crate::config::Config;
use crate::ingest::clock::{Clock, SystemClock};
use crate::ingest::worker::{self, TickError};
use crate::reading::Reading;
use crate::store::ReadingStore;

/// The single long-lived task that records a reading every interval.
///
/// Runs until the shutdown channel flips to `true` (or its sender is dropped).
/// A failed tick is logged and skipped; the loop never ends on its own.
///
/// Hour-of-day generation rules are evaluated in `Tz`, the host's local zone unless
/// [`Scheduler::with_time_zone`] says otherwise.
pub struct Scheduler<Tz = Local> {
    store: ReadingStore,
    clock: Arc<dyn Clock>,
    tz: Tz,
    rng: StdRng,
    interval: Duration,
    backfill: Vec<TimeDelta>,
}

impl Scheduler {
    pub fn new(store: ReadingStore, interval: Duration) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
            tz: Local,
            rng: StdRng::from_os_rng(),
            interval,
            backfill: Vec::new(),
        }
    }

    pub fn from_config(store: ReadingStore, config: &Config) -> Self {
        let scheduler = Self::new(
            store,
            Duration::from_secs(config.measurement_interval_seconds),
        );
        if config.backfill_enabled {
            scheduler.with_backfill(config.backfill_offsets.clone())
        } else {
            scheduler
        }
    }
}

impl<Tz> Scheduler<Tz>
where
    Tz: TimeZone + Send + Sync,
    Tz::Offset: Display,
{
    #[must_use]
    pub fn with_time_zone<Z: TimeZone>(self, tz: Z) -> Scheduler<Z> {
        Scheduler {
            store: self.store,
            clock: self.clock,
            tz,
            rng: self.rng,
            interval: self.interval,
            backfill: self.backfill,
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Also write one backdated reading per offset on every tick.
    #[must_use]
    pub fn with_backfill(mut self, offsets: Vec<TimeDelta>) -> Self {
        self.backfill = offsets;
        self
    }

    /// Run one tick now.
    ///
    /// # Errors
    ///
    /// See [`worker::run_tick`].
    pub async fn tick(&mut self) -> Result<Vec<Reading>, TickError> {
        let now = self.clock.now();
        worker::run_tick(&self.store, &mut self.rng, now, &self.tz, &self.backfill).await
    }

    /// Tick every interval until shutdown. The first tick fires immediately.
    /// Returns the number of ticks attempted.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> u64 {
        tracing::info!(
            interval_secs = self.interval.as_secs_f64(),
            backfill_offsets = self.backfill.len(),
            "Starting measurement scheduler"
        );

        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut ticks: u64 = 0;

        while !*shutdown.borrow() {
            tokio::select! {
                biased;
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    continue;
                }
                _ = ticker.tick() => {}
            }

            ticks += 1;
            match self.tick().await {
                Ok(rows) => {
                    tracing::trace!(tick = ticks, rows = rows.len(), "Measurement tick completed");
                }
                Err(e) => {
                    tracing::error!(
                        tick = ticks,
                        written = e.written,
                        error = %e.source,
                        "Measurement tick failed, skipping"
                    );
                }
            }
        }

        tracing::info!(ticks, "Measurement scheduler stopped");
        ticks
    }
}
