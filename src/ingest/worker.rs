use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use std::fmt::Display;
use rand::Rng;

use crate::generator;
use crate::reading::Reading;
use crate::store::{ReadingStore, StoreError};

/// A tick that stopped part way. Rows written before the failure stay.
#[derive(Debug, thiserror::Error)]
#[error("tick abandoned after {written} row(s): {source}")]
pub struct TickError {
    pub written: usize,
    #[source]
    pub source: StoreError,
}

/// Generate and store the reading for `now`, then one backdated reading per
/// `backfill` offset. Hour-of-day rules are evaluated in `tz`.
///
/// Backdated rows reuse the rules for the *current* hour of day and only move the
/// timestamp to `now - offset`. They keep demo charts populated; they are not meant
/// to look like what that past hour would have produced.
///
/// # Errors
///
/// Stops at the first failed insert and reports how many rows made it.
pub async fn run_tick<R, Tz>(
    store: &ReadingStore,
    rng: &mut R,
    now: DateTime<Utc>,
    tz: &Tz,
    backfill: &[TimeDelta],
) -> Result<Vec<Reading>, TickError>
where
    R: Rng + ?Sized,
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let (batch, local_time) = {
        let local_now = now.with_timezone(tz);
        let current = generator::generate(rng, &local_now);

        let mut batch = Vec::with_capacity(1 + backfill.len());
        batch.push(current);
        for offset in backfill {
            let mut backdated = generator::generate(rng, &local_now);
            backdated.timestamp = current
                .timestamp
                .checked_sub_signed(*offset)
                .unwrap_or(DateTime::<Utc>::MIN_UTC);
            batch.push(backdated);
        }
        (batch, local_now.format("%H:%M:%S").to_string())
    };

    let mut written = Vec::with_capacity(batch.len());
    for reading in &batch {
        match store.insert(reading).await {
            Ok(stored) => written.push(stored),
            Err(source) => {
                return Err(TickError {
                    written: written.len(),
                    source,
                });
            }
        }
    }

    tracing::debug!(
        at = %local_time,
        rows = written.len(),
        "Measurement stored"
    );

    Ok(written)
}
