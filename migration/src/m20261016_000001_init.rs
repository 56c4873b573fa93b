use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ========== BATCHES ==========
        manager
            .create_table(
                Table::create()
                    .table(Batches::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Batches::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Batches::BatchNumber)
                            .string_len(50)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Batches::StartTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Batches::EndTime).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Batches::IsActive)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Batches::DefectCount)
                            .integer()
                            .not_null()
                            .default(0)
                            .check(Expr::col(Batches::DefectCount).gte(0)),
                    )
                    .col(
                        ColumnDef::new(Batches::TotalCount)
                            .integer()
                            .not_null()
                            .default(0)
                            .check(Expr::col(Batches::TotalCount).gte(0)),
                    )
                    .to_owned(),
            )
            .await?;

        // At most one active batch. Partial indexes work on both PostgreSQL and SQLite.
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX batches_single_active_idx ON batches (is_active) WHERE is_active",
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_batches_start_time")
                    .table(Batches::Table)
                    .col(Batches::StartTime)
                    .to_owned(),
            )
            .await?;

        // ========== BATCH PARAMETERS ==========
        manager
            .create_table(
                Table::create()
                    .table(BatchParameters::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BatchParameters::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BatchParameters::BatchId).uuid().not_null())
                    .col(ColumnDef::new(BatchParameters::Temperature).double().not_null())
                    .col(ColumnDef::new(BatchParameters::Pressure).double().not_null())
                    .col(ColumnDef::new(BatchParameters::MixingSpeed).double().not_null())
                    .col(
                        ColumnDef::new(BatchParameters::GlazingThickness)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BatchParameters::Timestamp)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BatchParameters::IsDefect)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_batch_parameters_batch")
                            .from(BatchParameters::Table, BatchParameters::BatchId)
                            .to(Batches::Table, Batches::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_batch_parameters_batch_time")
                    .table(BatchParameters::Table)
                    .col(BatchParameters::BatchId)
                    .col(BatchParameters::Timestamp)
                    .to_owned(),
            )
            .await?;

        // ========== PRODUCTION SETTINGS ==========
        manager
            .create_table(
                Table::create()
                    .table(ProductionSettings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProductionSettings::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ProductionSettings::Name)
                            .string_len(50)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(ProductionSettings::Temperature)
                            .double()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ProductionSettings::Pressure).double().not_null())
                    .col(
                        ColumnDef::new(ProductionSettings::MixingSpeed)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProductionSettings::GlazingThickness)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProductionSettings::IsActive)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(ProductionSettings::Timestamp)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX production_settings_single_active_idx \
                 ON production_settings (is_active) WHERE is_active",
            )
            .await?;

        // ========== NOTIFICATIONS ==========
        manager
            .create_table(
                Table::create()
                    .table(Notifications::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Notifications::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Notifications::BatchId).uuid())
                    .col(ColumnDef::new(Notifications::Message).text().not_null())
                    .col(
                        ColumnDef::new(Notifications::NotificationType)
                            .string_len(20)
                            .not_null()
                            .default("info"),
                    )
                    .col(
                        ColumnDef::new(Notifications::Timestamp)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Notifications::IsRead)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_notifications_batch")
                            .from(Notifications::Table, Notifications::BatchId)
                            .to(Batches::Table, Batches::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_notifications_batch_time")
                    .table(Notifications::Table)
                    .col(Notifications::BatchId)
                    .col(Notifications::Timestamp)
                    .to_owned(),
            )
            .await?;

        // ========== COMPUTER VISION DATA ==========
        manager
            .create_table(
                Table::create()
                    .table(ComputerVisionData::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ComputerVisionData::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ComputerVisionData::BatchId).uuid().not_null())
                    .col(
                        ColumnDef::new(ComputerVisionData::DetectedObjects)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ComputerVisionData::ConfidenceScore)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ComputerVisionData::IsDefect)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(ComputerVisionData::Timestamp)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_computer_vision_data_batch")
                            .from(ComputerVisionData::Table, ComputerVisionData::BatchId)
                            .to(Batches::Table, Batches::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_computer_vision_data_batch_time")
                    .table(ComputerVisionData::Table)
                    .col(ComputerVisionData::BatchId)
                    .col(ComputerVisionData::Timestamp)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ComputerVisionData::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Notifications::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ProductionSettings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BatchParameters::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Batches::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Batches {
    Table,
    Id,
    BatchNumber,
    StartTime,
    EndTime,
    IsActive,
    DefectCount,
    TotalCount,
}

#[derive(DeriveIden)]
enum BatchParameters {
    Table,
    Id,
    BatchId,
    Temperature,
    Pressure,
    MixingSpeed,
    GlazingThickness,
    Timestamp,
    IsDefect,
}

#[derive(DeriveIden)]
enum ProductionSettings {
    Table,
    Id,
    Name,
    Temperature,
    Pressure,
    MixingSpeed,
    GlazingThickness,
    IsActive,
    Timestamp,
}

#[derive(DeriveIden)]
enum Notifications {
    Table,
    Id,
    BatchId,
    Message,
    NotificationType,
    Timestamp,
    IsRead,
}

#[derive(DeriveIden)]
enum ComputerVisionData {
    Table,
    Id,
    BatchId,
    DetectedObjects,
    ConfidenceScore,
    IsDefect,
    Timestamp,
}
