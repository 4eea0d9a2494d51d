//! Readings and the closed set of measured columns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

use crate::entity::readings;

/// One timestamped set of the five measured values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Reading {
    pub timestamp: DateTime<Utc>,
    pub soil_moisture: f64,
    pub temperature: f64,
    pub humidity: f64,
    pub ph_level: f64,
    pub light_level: i32,
}

impl Reading {
    /// The reading reported when nothing has been recorded yet.
    ///
    /// Every latest-value consumer gets this instead of an empty result, so the
    /// presentation layer never has to special-case an empty table.
    #[must_use]
    pub const fn zero() -> Self {
        Self {
            timestamp: DateTime::<Utc>::UNIX_EPOCH,
            soil_moisture: 0.0,
            temperature: 0.0,
            humidity: 0.0,
            ph_level: 0.0,
            light_level: 0,
        }
    }

    #[must_use]
    pub fn value(&self, column: SensorColumn) -> f64 {
        match column {
            SensorColumn::Temperature => self.temperature,
            SensorColumn::Humidity => self.humidity,
            SensorColumn::SoilMoisture => self.soil_moisture,
            SensorColumn::LightLevel => f64::from(self.light_level),
            SensorColumn::PhLevel => self.ph_level,
        }
    }
}

impl From<readings::Model> for Reading {
    fn from(row: readings::Model) -> Self {
        Self {
            timestamp: row.timestamp,
            soil_moisture: row.soil_moisture,
            temperature: row.temperature,
            humidity: row.humidity,
            ph_level: row.ph_level,
            light_level: row.light_level,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sensor column: {0}")]
pub struct InvalidColumn(pub String);

/// A measured column of the `sensor_data` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SensorColumn {
    Temperature,
    Humidity,
    SoilMoisture,
    LightLevel,
    PhLevel,
}

impl SensorColumn {
    pub const ALL: [Self; 5] = [
        Self::Temperature,
        Self::Humidity,
        Self::SoilMoisture,
        Self::LightLevel,
        Self::PhLevel,
    ];

    /// Column name in the `sensor_data` table.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Temperature => "temperature",
            Self::Humidity => "humidity",
            Self::SoilMoisture => "soil_moisture",
            Self::LightLevel => "light_level",
            Self::PhLevel => "ph_level",
        }
    }

    #[must_use]
    pub const fn details(self) -> SensorDetails {
        match self {
            Self::Temperature => SensorDetails {
                column: self,
                name: "Temperature",
                unit: "°C",
                icon: "fa-temperature-three-quarters",
                color: "#dc3545",
                description: "Air temperature drives photosynthesis and transpiration. \
                              Too hot slows growth, too cold damages cells.",
                min_alert: 22.0,
                max_alert: 34.0,
            },
            Self::Humidity => SensorDetails {
                column: self,
                name: "Humidity",
                unit: "%",
                icon: "fa-droplet",
                color: "#00bcd4",
                description: "Relative air humidity. Too low dries the leaves, \
                              too high invites mould.",
                min_alert: 65.0,
                max_alert: 90.0,
            },
            Self::SoilMoisture => SensorDetails {
                column: self,
                name: "Soil Moisture",
                unit: "%",
                icon: "fa-water",
                color: "#0d6efd",
                description: "Water available to the roots. Too low dehydrates the plant, \
                              too high causes root rot.",
                min_alert: 60.0,
                max_alert: 95.0,
            },
            Self::LightLevel => SensorDetails {
                column: self,
                name: "Light Level",
                unit: " lux",
                icon: "fa-sun",
                color: "#ffc107",
                description: "Light intensity powers photosynthesis. Too little gives weak \
                              growth, too much burns the leaves.",
                min_alert: 400.0,
                max_alert: 700.0,
            },
            Self::PhLevel => SensorDetails {
                column: self,
                name: "pH Level",
                unit: "",
                icon: "fa-square-check",
                color: "#4caf50",
                description: "Water acidity controls nutrient uptake. An off-range pH \
                              blocks the nutrient flow.",
                min_alert: 5.5,
                max_alert: 6.5,
            },
        }
    }
}

impl fmt::Display for SensorColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Accepts the column key (`soil_moisture`) or the display name (`Soil Moisture`),
/// case-insensitively.
impl FromStr for SensorColumn {
    type Err = InvalidColumn;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| {
                c.key().eq_ignore_ascii_case(wanted) || c.details().name.eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| InvalidColumn(s.to_string()))
    }
}

/// Display metadata and comfort band for one sensor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct SensorDetails {
    pub column: SensorColumn,
    pub name: &'static str,
    pub unit: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
    pub description: &'static str,
    pub min_alert: f64,
    pub max_alert: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Low,
    Ok,
    High,
}

impl SensorDetails {
    #[must_use]
    pub fn alert_level(&self, value: f64) -> AlertLevel {
        if value < self.min_alert {
            AlertLevel::Low
        } else if value > self.max_alert {
            AlertLevel::High
        } else {
            AlertLevel::Ok
        }
    }
}
