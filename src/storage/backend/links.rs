//! 分享链接：创建、查询、点击与转化计数

use chrono::{DateTime, Utc};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, ExprTrait, PaginatorTrait, QueryFilter,
    TransactionTrait,
    sea_query::{Expr, OnConflict},
};
use tracing::{debug, info};

use super::SeaOrmStorage;
use super::converters::{model_to_sharing_link, sharing_link_to_active_model};
use super::retry;
use crate::errors::{Result, SharelinkerError};
use crate::storage::SharingLink;

use migration::entities::{sharing_link, user};

/// 一次转化记账的结果
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionCredit {
    /// 记账后的链接，链接不存在时为 None
    pub link: Option<SharingLink>,
    /// 获得奖励的用户，资料不存在时为 None
    pub rewarded_user: Option<String>,
}

impl SeaOrmStorage {
    /// 写入分享链接，sharing_id 冲突时整条覆盖（包括计数器）
    pub async fn create_sharing_link(&self, link: &SharingLink) -> Result<()> {
        let db = &self.db;

        retry::with_retry(
            &format!("create_sharing_link({})", link.sharing_id),
            self.retry_config,
            || async {
                sharing_link::Entity::insert(sharing_link_to_active_model(link))
                    .on_conflict(
                        OnConflict::column(sharing_link::Column::SharingId)
                            .update_columns([
                                sharing_link::Column::UserId,
                                sharing_link::Column::ContentType,
                                sharing_link::Column::ContentId,
                                sharing_link::Column::Metadata,
                                sharing_link::Column::Clicks,
                                sharing_link::Column::Conversions,
                                sharing_link::Column::CreatedAt,
                                sharing_link::Column::LastClickAt,
                                sharing_link::Column::LastConversionAt,
                            ])
                            .to_owned(),
                    )
                    .exec(db)
                    .await
                    .map(|_| ())
            },
        )
        .await
        .map_err(|e| SharelinkerError::database_operation(format!("写入分享链接失败: {}", e)))?;

        info!("Sharing link stored: {}", link.sharing_id);
        Ok(())
    }

    pub async fn get_sharing_link(&self, sharing_id: &str) -> Result<Option<SharingLink>> {
        let db = &self.db;

        let model = retry::with_retry(
            &format!("get_sharing_link({})", sharing_id),
            self.retry_config,
            || async {
                sharing_link::Entity::find_by_id(sharing_id.to_string())
                    .one(db)
                    .await
            },
        )
        .await
        .map_err(|e| SharelinkerError::database_operation(format!("查询分享链接失败: {}", e)))?;

        Ok(model.map(model_to_sharing_link))
    }

    /// 点击计数 +1，返回更新后的链接；链接不存在时不做任何修改
    pub async fn record_click(
        &self,
        sharing_id: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<SharingLink>> {
        let db = &self.db;

        let result = retry::with_retry(
            &format!("record_click({})", sharing_id),
            self.retry_config,
            || async {
                sharing_link::Entity::update_many()
                    .col_expr(
                        sharing_link::Column::Clicks,
                        Expr::col(sharing_link::Column::Clicks).add(1),
                    )
                    .col_expr(sharing_link::Column::LastClickAt, Expr::value(at))
                    .filter(sharing_link::Column::SharingId.eq(sharing_id))
                    .exec(db)
                    .await
            },
        )
        .await
        .map_err(|e| SharelinkerError::database_operation(format!("点击计数失败: {}", e)))?;

        if result.rows_affected == 0 {
            debug!("Click on unknown sharing link ignored: {}", sharing_id);
            return Ok(None);
        }

        self.get_sharing_link(sharing_id).await
    }

    /// 转化记账：链接转化数 +1，并给链接所有者加奖励，全部在同一事务内完成
    pub async fn record_conversion(
        &self,
        sharing_id: &str,
        at: DateTime<Utc>,
        reward_points: i64,
    ) -> Result<ConversionCredit> {
        let db = &self.db;

        let credit = retry::with_retry(
            &format!("record_conversion({})", sharing_id),
            self.retry_config,
            || credit_conversion(db, sharing_id, at, reward_points),
        )
        .await
        .map_err(|e| SharelinkerError::database_operation(format!("转化记账失败: {}", e)))?;

        if let Some(uid) = &credit.rewarded_user {
            info!(
                "Referral reward credited: {} (+{}) via {}",
                uid, reward_points, sharing_id
            );
        }
        Ok(credit)
    }

    pub async fn count_sharing_links(&self) -> Result<u64> {
        sharing_link::Entity::find()
            .count(&self.db)
            .await
            .map_err(|e| SharelinkerError::database_operation(format!("统计分享链接失败: {}", e)))
    }
}

async fn credit_conversion(
    db: &DatabaseConnection,
    sharing_id: &str,
    at: DateTime<Utc>,
    reward_points: i64,
) -> std::result::Result<ConversionCredit, DbErr> {
    let txn = db.begin().await?;

    let updated = sharing_link::Entity::update_many()
        .col_expr(
            sharing_link::Column::Conversions,
            Expr::col(sharing_link::Column::Conversions).add(1),
        )
        .col_expr(sharing_link::Column::LastConversionAt, Expr::value(at))
        .filter(sharing_link::Column::SharingId.eq(sharing_id))
        .exec(&txn)
        .await?;

    if updated.rows_affected == 0 {
        txn.rollback().await?;
        return Ok(ConversionCredit {
            link: None,
            rewarded_user: None,
        });
    }

    let Some(link) = sharing_link::Entity::find_by_id(sharing_id.to_string())
        .one(&txn)
        .await?
    else {
        txn.rollback().await?;
        return Ok(ConversionCredit {
            link: None,
            rewarded_user: None,
        });
    };

    let rewarded = user::Entity::update_many()
        .col_expr(
            user::Column::ReferralRewards,
            Expr::col(user::Column::ReferralRewards).add(reward_points),
        )
        .col_expr(
            user::Column::TotalReferrals,
            Expr::col(user::Column::TotalReferrals).add(1),
        )
        .filter(user::Column::Id.eq(link.user_id.as_str()))
        .exec(&txn)
        .await?;

    txn.commit().await?;

    let rewarded_user = (rewarded.rows_affected > 0).then(|| link.user_id.clone());
    Ok(ConversionCredit {
        link: Some(model_to_sharing_link(link)),
        rewarded_user,
    })
}
