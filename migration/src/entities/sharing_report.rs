//! 周报实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "sharing_reports")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub week_of: DateTimeUtc,
    pub total_shares: i64,
    #[sea_orm(column_type = "Text")]
    pub platforms: String,
    #[sea_orm(column_type = "Text")]
    pub content_types: String,
    #[sea_orm(column_type = "Text")]
    pub top_sharers: String,
    pub generated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
