use sea_orm::entity::prelude::*;
use chrono::SubsecRound;
use sea_orm::{NotSet, Set};
use serde::{Deserialize, Serialize};

use crate::reading::Reading;

/// One row of `sensor_data`. `id` only breaks ties between equal timestamps;
/// physical order never stands in for time order.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sensor_data")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub timestamp: DateTimeUtc,
    pub soil_moisture: f64,
    pub temperature: f64,
    pub humidity: f64,
    pub ph_level: f64,
    pub light_level: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Reading> for ActiveModel {
    fn from(reading: &Reading) -> Self {
        Self {
            id: NotSet,
            timestamp: Set(reading.timestamp.trunc_subsecs(6)),
            soil_moisture: Set(reading.soil_moisture),
            temperature: Set(reading.temperature),
            humidity: Set(reading.humidity),
            ph_level: Set(reading.ph_level),
            light_level: Set(reading.light_level),
        }
    }
}
