//! 分享事件实体（每次点击 / 安装 / 注册一行）

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "sharing_events")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub sharing_id: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub clicker_id: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub action: String,
    /// 客户端上报的分享平台（whatsapp、instagram 等）
    #[sea_orm(column_type = "Text", nullable)]
    pub platform: Option<String>,
    /// 追踪时从分享链接复制
    #[sea_orm(column_type = "Text", nullable)]
    pub content_type: Option<String>,
    /// 追踪时分享链接的所有者
    #[sea_orm(column_type = "Text", nullable)]
    pub sharer_id: Option<String>,
    pub timestamp: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
