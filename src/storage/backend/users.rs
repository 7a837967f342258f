//! 用户资料读写

use sea_orm::{EntityTrait, PaginatorTrait, sea_query::OnConflict};
use tracing::debug;

use super::SeaOrmStorage;
use super::converters::{model_to_user, user_to_active_model};
use super::retry;
use crate::errors::{Result, SharelinkerError};
use crate::storage::UserProfile;

use migration::entities::user;

impl SeaOrmStorage {
    /// 读取用户资料，不存在时返回 None
    pub async fn get_user(&self, user_id: &str) -> Result<Option<UserProfile>> {
        let db = &self.db;

        let model = retry::with_retry(
            &format!("get_user({})", user_id),
            self.retry_config,
            || async { user::Entity::find_by_id(user_id.to_string()).one(db).await },
        )
        .await
        .map_err(|e| SharelinkerError::database_operation(format!("查询用户失败: {}", e)))?;

        Ok(model.map(model_to_user))
    }

    /// 写入或覆盖用户资料（种子数据和测试使用）
    pub async fn upsert_user(&self, profile: &UserProfile) -> Result<()> {
        let db = &self.db;

        retry::with_retry(
            &format!("upsert_user({})", profile.id),
            self.retry_config,
            || async {
                user::Entity::insert(user_to_active_model(profile))
                    .on_conflict(
                        OnConflict::column(user::Column::Id)
                            .update_columns([
                                user::Column::DisplayName,
                                user::Column::FirstName,
                                user::Column::ReferralRewards,
                                user::Column::TotalReferrals,
                            ])
                            .to_owned(),
                    )
                    .exec(db)
                    .await
                    .map(|_| ())
            },
        )
        .await
        .map_err(|e| SharelinkerError::database_operation(format!("写入用户失败: {}", e)))?;

        debug!("User profile upserted: {}", profile.id);
        Ok(())
    }

    pub async fn count_users(&self) -> Result<u64> {
        user::Entity::find()
            .count(&self.db)
            .await
            .map_err(|e| SharelinkerError::database_operation(format!("统计用户失败: {}", e)))
    }
}
