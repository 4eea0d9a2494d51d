//! Chart series over the readings table.
//!
//! A [`HistoryQuery`] names one column, the span of time the chart covers and how
//! rows are picked ([`Selection`]). The result is a [`SensorSeries`]: parallel label
//! and value vectors, oldest first, empty together when nothing matches.

use chrono::{DateTime, Local, TimeZone, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::reading::SensorColumn;
use crate::store::{ReadingStore, StoreResult};

pub use crate::store::Selection;

/// Windows longer than this get day-level labels.
pub const GRANULARITY_THRESHOLD_HOURS: u32 = 24;

/// Label resolution for chart points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    /// `14:05`
    HourMinute,
    /// `19-10`
    DayMonth,
}

impl Granularity {
    #[must_use]
    pub const fn for_hours(hours: u32) -> Self {
        if hours <= GRANULARITY_THRESHOLD_HOURS {
            Self::HourMinute
        } else {
            Self::DayMonth
        }
    }

    #[must_use]
    pub const fn pattern(self) -> &'static str {
        match self {
            Self::HourMinute => "%H:%M",
            Self::DayMonth => "%d-%m",
        }
    }

    /// Format `timestamp` in the time zone `tz`.
    pub fn label<Tz>(self, timestamp: DateTime<Utc>, tz: &Tz) -> String
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        timestamp
            .with_timezone(tz)
            .format(self.pattern())
            .to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryQuery {
    pub column: SensorColumn,
    /// Span the chart represents; drives label granularity.
    pub hours: u32,
    pub selection: Selection,
}

impl HistoryQuery {
    /// All rows within the last `hours`.
    #[must_use]
    pub const fn window(column: SensorColumn, hours: u32) -> Self {
        Self {
            column,
            hours,
            selection: Selection::ByWindow { hours },
        }
    }

    /// The `limit` newest rows, labelled as a chart spanning `hours`.
    #[must_use]
    pub const fn tail(column: SensorColumn, hours: u32, limit: u64) -> Self {
        Self {
            column,
            hours,
            selection: Selection::ByTail { limit },
        }
    }

    /// Tail mode when `limit` is given, window mode otherwise.
    #[must_use]
    pub const fn new(column: SensorColumn, hours: u32, limit: Option<u64>) -> Self {
        match limit {
            Some(limit) => Self::tail(column, hours, limit),
            None => Self::window(column, hours),
        }
    }

    #[must_use]
    pub const fn granularity(&self) -> Granularity {
        Granularity::for_hours(self.hours)
    }
}

/// Chart-ready series. `labels.len() == values.len()` always.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct SensorSeries {
    pub labels: Vec<String>,
    #[serde(rename = "data")]
    pub values: Vec<f64>,
}

impl SensorSeries {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Label already-ordered points.
    pub fn from_points<Tz>(points: &[(DateTime<Utc>, f64)], granularity: Granularity, tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let (labels, values) = points
            .iter()
            .map(|(timestamp, value)| (granularity.label(*timestamp, tz), *value))
            .unzip();
        Self { labels, values }
    }
}

/// Run `query` against `store`, labelling in the host's local time zone.
///
/// # Errors
///
/// Store failures propagate; they are never reported as an empty series.
pub async fn history_for(
    store: &ReadingStore,
    query: &HistoryQuery,
    now: DateTime<Utc>,
) -> StoreResult<SensorSeries> {
    history_in(store, query, now, &Local).await
}

/// [`history_for`] with an explicit label time zone.
///
/// # Errors
///
/// Store failures propagate.
pub async fn history_in<Tz>(
    store: &ReadingStore,
    query: &HistoryQuery,
    now: DateTime<Utc>,
    tz: &Tz,
) -> StoreResult<SensorSeries>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let points = store.windowed(query.column, query.selection, now).await?;

    tracing::debug!(
        column = %query.column,
        hours = query.hours,
        selection = ?query.selection,
        points = points.len(),
        "history query"
    );

    Ok(SensorSeries::from_points(&points, query.granularity(), tz))
}
