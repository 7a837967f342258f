//! 周报表迁移
//!
//! 各维度计数以 JSON 文本存储，结构为 `{"key": count}`。

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SharingReports::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SharingReports::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SharingReports::WeekOf)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SharingReports::TotalShares)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(SharingReports::Platforms).text().not_null())
                    .col(
                        ColumnDef::new(SharingReports::ContentTypes)
                            .text()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SharingReports::TopSharers).text().not_null())
                    .col(
                        ColumnDef::new(SharingReports::GeneratedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SharingReports::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum SharingReports {
    #[sea_orm(iden = "sharing_reports")]
    Table,
    Id,
    WeekOf,
    TotalShares,
    Platforms,
    ContentTypes,
    TopSharers,
    GeneratedAt,
}
