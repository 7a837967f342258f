use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建 users 表（用户资料由外部创建，这里只维护奖励计数）
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .string_len(128)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::DisplayName).string().null())
                    .col(ColumnDef::new(Users::FirstName).string().null())
                    .col(
                        ColumnDef::new(Users::ReferralRewards)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Users::TotalReferrals)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建 sharing_links 表
        manager
            .create_table(
                Table::create()
                    .table(SharingLinks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SharingLinks::SharingId)
                            .string_len(512)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SharingLinks::UserId)
                            .string_len(128)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SharingLinks::ContentType)
                            .text()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SharingLinks::ContentId).text().not_null())
                    .col(ColumnDef::new(SharingLinks::Metadata).text().null())
                    .col(
                        ColumnDef::new(SharingLinks::Clicks)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(SharingLinks::Conversions)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(SharingLinks::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SharingLinks::LastClickAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(SharingLinks::LastConversionAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 按用户查询链接
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_sharing_links_user_id")
                    .table(SharingLinks::Table)
                    .col(SharingLinks::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_sharing_links_user_id").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(SharingLinks::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Users {
    #[sea_orm(iden = "users")]
    Table,
    Id,
    DisplayName,
    FirstName,
    ReferralRewards,
    TotalReferrals,
    CreatedAt,
}

#[derive(DeriveIden)]
enum SharingLinks {
    #[sea_orm(iden = "sharing_links")]
    Table,
    SharingId,
    UserId,
    ContentType,
    ContentId,
    Metadata,
    Clicks,
    Conversions,
    CreatedAt,
    LastClickAt,
    LastConversionAt,
}
