use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "sharing_links")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub sharing_id: String,
    pub user_id: String,
    #[sea_orm(column_type = "Text")]
    pub content_type: String,
    #[sea_orm(column_type = "Text")]
    pub content_id: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub metadata: Option<String>,
    pub clicks: i64,
    pub conversions: i64,
    pub created_at: DateTimeUtc,
    pub last_click_at: Option<DateTimeUtc>,
    pub last_conversion_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
