use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ========== SENSOR DATA ==========
        // Append-only; rows are never updated, only bulk-deleted.
        manager
            .create_table(
                Table::create()
                    .table(SensorData::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SensorData::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SensorData::Timestamp)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SensorData::SoilMoisture).double().not_null())
                    .col(ColumnDef::new(SensorData::Temperature).double().not_null())
                    .col(ColumnDef::new(SensorData::Humidity).double().not_null())
                    .col(ColumnDef::new(SensorData::PhLevel).double().not_null())
                    .col(ColumnDef::new(SensorData::LightLevel).integer().not_null())
                    .to_owned(),
            )
            .await?;

        // Window and tail scans both order by timestamp
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_sensor_data_timestamp")
                    .table(SensorData::Table)
                    .col(SensorData::Timestamp)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SensorData::Table).if_exists().to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum SensorData {
    Table,
    Id,
    Timestamp,
    SoilMoisture,
    Temperature,
    Humidity,
    PhLevel,
    LightLevel,
}
