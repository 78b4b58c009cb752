//! Create pool_tables table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PoolTables::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PoolTables::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PoolTables::Name).string().not_null())
                    .col(ColumnDef::new(PoolTables::Price).big_integer().not_null())
                    .col(
                        ColumnDef::new(PoolTables::DeviceId)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(PoolTables::Status)
                            .string_len(20)
                            .not_null()
                            .default("available"),
                    )
                    .col(
                        ColumnDef::new(PoolTables::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(PoolTables::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PoolTables::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PoolTables::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum PoolTables {
    Table,
    Id,
    Name,
    Price,
    DeviceId,
    Status,
    Active,
    CreatedAt,
    UpdatedAt,
}
