//! 文案生成记录和周报记录（只追加）

use sea_orm::{EntityTrait, PaginatorTrait, QueryOrder, QuerySelect};
use tracing::{debug, info};

use super::SeaOrmStorage;
use super::converters::{
    caption_to_active_model, model_to_caption, model_to_report, report_to_active_model,
};
use super::retry;
use crate::errors::{Result, SharelinkerError};
use crate::storage::{CaptionGeneration, WeeklyReport};

use migration::entities::{caption_generation, sharing_report};

impl SeaOrmStorage {
    pub async fn append_caption_generation(&self, record: &CaptionGeneration) -> Result<()> {
        let db = &self.db;

        retry::with_retry(
            &format!("append_caption_generation({})", record.user_id),
            self.retry_config,
            || async {
                caption_generation::Entity::insert(caption_to_active_model(record))
                    .exec(db)
                    .await
                    .map(|_| ())
            },
        )
        .await
        .map_err(|e| SharelinkerError::database_operation(format!("写入文案记录失败: {}", e)))?;

        debug!(
            "Caption generation recorded: {} ({})",
            record.user_id, record.caption_type
        );
        Ok(())
    }

    /// 最近的文案生成记录（按时间倒序）
    pub async fn recent_caption_generations(&self, limit: u64) -> Result<Vec<CaptionGeneration>> {
        let models = caption_generation::Entity::find()
            .order_by_desc(caption_generation::Column::Timestamp)
            .order_by_desc(caption_generation::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| SharelinkerError::database_operation(format!("查询文案记录失败: {}", e)))?;

        Ok(models.into_iter().map(model_to_caption).collect())
    }

    pub async fn count_caption_generations(&self) -> Result<u64> {
        caption_generation::Entity::find()
            .count(&self.db)
            .await
            .map_err(|e| SharelinkerError::database_operation(format!("统计文案记录失败: {}", e)))
    }

    /// 写入周报，返回自增 id
    pub async fn insert_weekly_report(&self, report: &WeeklyReport) -> Result<i64> {
        let active_model = report_to_active_model(report)?;
        let db = &self.db;

        let result = retry::with_retry("insert_weekly_report", self.retry_config, || {
            let active_model = active_model.clone();
            async move { sharing_report::Entity::insert(active_model).exec(db).await }
        })
        .await
        .map_err(|e| SharelinkerError::database_operation(format!("写入周报失败: {}", e)))?;

        info!(
            "Weekly report stored: id={}, week_of={}",
            result.last_insert_id, report.week_of
        );
        Ok(result.last_insert_id)
    }

    /// 最近的周报（按生成时间倒序）
    pub async fn latest_reports(&self, limit: u64) -> Result<Vec<WeeklyReport>> {
        let models = sharing_report::Entity::find()
            .order_by_desc(sharing_report::Column::GeneratedAt)
            .order_by_desc(sharing_report::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| SharelinkerError::database_operation(format!("查询周报失败: {}", e)))?;

        models
            .into_iter()
            .map(|m| model_to_report(m).map_err(SharelinkerError::from))
            .collect()
    }
}
