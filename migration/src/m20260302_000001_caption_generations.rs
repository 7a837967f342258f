use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 文案生成记录（只追加，不回读）
        manager
            .create_table(
                Table::create()
                    .table(CaptionGenerations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CaptionGenerations::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CaptionGenerations::UserId)
                            .string_len(128)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CaptionGenerations::CaptionType)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CaptionGenerations::Caption)
                            .text()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CaptionGenerations::Metadata).text().null())
                    .col(
                        ColumnDef::new(CaptionGenerations::Timestamp)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_caption_generations_timestamp")
                    .table(CaptionGenerations::Table)
                    .col(CaptionGenerations::Timestamp)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_caption_generations_timestamp")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(CaptionGenerations::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum CaptionGenerations {
    #[sea_orm(iden = "caption_generations")]
    Table,
    Id,
    UserId,
    CaptionType,
    Caption,
    Metadata,
    Timestamp,
}
