//! Synthetic greenhouse readings driven by time of day.
//!
//! Each field is drawn independently; there is no modelled correlation between
//! temperature, humidity, light and the rest. Callers supply the random source so
//! tests can fix the seed.

use chrono::{DateTime, SubsecRound, TimeZone, Timelike, Utc};
use rand::Rng;
use std::ops::RangeInclusive;

use crate::reading::Reading;

/// Base temperature inside the greenhouse.
pub const TEMPERATURE_BASE: f64 = 25.0;
/// Added to the base during the warm band.
pub const TEMPERATURE_DAY_BONUS: f64 = 5.0;
/// Half-width of the uniform band around the base.
pub const TEMPERATURE_SPREAD: f64 = 1.5;
/// Hours (inclusive) with the raised temperature base.
pub const WARM_HOURS: RangeInclusive<u32> = 10..=18;

/// Hours (inclusive) sampled from [`LIGHT_DAY`].
pub const DAYLIGHT_HOURS: RangeInclusive<u32> = 6..=20;
pub const LIGHT_DAY: RangeInclusive<i32> = 450..=750;
pub const LIGHT_NIGHT: RangeInclusive<i32> = 10..=50;

pub const SOIL_MOISTURE: RangeInclusive<f64> = 70.0..=95.0;
pub const HUMIDITY: RangeInclusive<f64> = 75.0..=95.0;
pub const PH_LEVEL: RangeInclusive<f64> = 5.5..=6.5;

/// Temperature band for a given hour of day.
#[must_use]
pub fn temperature_band(hour: u32) -> RangeInclusive<f64> {
    let base = if WARM_HOURS.contains(&hour) {
        TEMPERATURE_BASE + TEMPERATURE_DAY_BONUS
    } else {
        TEMPERATURE_BASE
    };
    (base - TEMPERATURE_SPREAD)..=(base + TEMPERATURE_SPREAD)
}

/// Light band for a given hour of day.
#[must_use]
pub fn light_band(hour: u32) -> RangeInclusive<i32> {
    if DAYLIGHT_HOURS.contains(&hour) {
        LIGHT_DAY
    } else {
        LIGHT_NIGHT
    }
}

/// Produce one reading for `now`.
///
/// The hour-of-day rules use `now`'s own time zone; the stored timestamp is the same
/// instant in UTC, truncated to microseconds.
pub fn generate<R, Tz>(rng: &mut R, now: &DateTime<Tz>) -> Reading
where
    R: Rng + ?Sized,
    Tz: TimeZone,
{
    let hour = now.hour();

    Reading {
        timestamp: now.with_timezone(&Utc).trunc_subsecs(6),
        soil_moisture: round2(rng.random_range(SOIL_MOISTURE)),
        temperature: round2(rng.random_range(temperature_band(hour))),
        humidity: round2(rng.random_range(HUMIDITY)),
        ph_level: round2(rng.random_range(PH_LEVEL)),
        light_level: rng.random_range(light_band(hour)),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
