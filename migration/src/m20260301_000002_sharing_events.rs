//! 分享事件表迁移
//!
//! 每次点击、安装、注册都会写入一条事件，由清理任务在保留期后删除。
//! platform / content_type / sharer_id 供周报聚合使用。
//! action 等字段来自客户端，不限制长度（未知动作也要完整记录）。

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SharingEvents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SharingEvents::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SharingEvents::SharingId)
                            .string_len(512)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SharingEvents::ClickerId)
                            .text()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(SharingEvents::Action)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SharingEvents::Platform)
                            .text()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(SharingEvents::ContentType)
                            .text()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(SharingEvents::SharerId)
                            .text()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(SharingEvents::Timestamp)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 时间范围查询（清理、周报）
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_sharing_events_timestamp")
                    .table(SharingEvents::Table)
                    .col(SharingEvents::Timestamp)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_sharing_events_sharing_id")
                    .table(SharingEvents::Table)
                    .col(SharingEvents::SharingId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_sharing_events_sharing_id")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_sharing_events_timestamp")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(SharingEvents::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum SharingEvents {
    #[sea_orm(iden = "sharing_events")]
    Table,
    Id,
    SharingId,
    ClickerId,
    Action,
    Platform,
    ContentType,
    SharerId,
    Timestamp,
}
