//! 分享事件：追加、按时间窗口查询、过期清理

use chrono::{DateTime, Utc};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};
use tracing::{debug, trace};

use super::SeaOrmStorage;
use super::converters::{event_to_active_model, model_to_sharing_event};
use super::retry;
use crate::errors::{Result, SharelinkerError};
use crate::storage::{NewSharingEvent, SharingEvent};

use migration::entities::sharing_event;

/// 过期事件清理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventPurge {
    /// 已删除的事件数
    Deleted(u64),
    /// 待删除数量超过上限，未删除任何事件
    OverLimit(u64),
}

impl SeaOrmStorage {
    /// 追加一条分享事件，返回自增 id
    pub async fn append_sharing_event(&self, event: &NewSharingEvent) -> Result<i64> {
        let db = &self.db;

        let result = retry::with_retry(
            &format!("append_sharing_event({})", event.sharing_id),
            self.retry_config,
            || async {
                sharing_event::Entity::insert(event_to_active_model(event))
                    .exec(db)
                    .await
            },
        )
        .await
        .map_err(|e| SharelinkerError::database_operation(format!("写入分享事件失败: {}", e)))?;

        trace!(
            "Sharing event appended: {} {} (id={})",
            event.sharing_id, event.action, result.last_insert_id
        );
        Ok(result.last_insert_id)
    }

    /// 查询 `[start, end]` 时间窗口内的事件（闭区间，按时间升序）
    pub async fn events_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<SharingEvent>> {
        let db = &self.db;

        let models = retry::with_retry("events_between", self.retry_config, || async {
            sharing_event::Entity::find()
                .filter(sharing_event::Column::Timestamp.gte(start))
                .filter(sharing_event::Column::Timestamp.lte(end))
                .order_by_asc(sharing_event::Column::Timestamp)
                .all(db)
                .await
        })
        .await
        .map_err(|e| SharelinkerError::database_operation(format!("查询分享事件失败: {}", e)))?;

        Ok(models.into_iter().map(model_to_sharing_event).collect())
    }

    /// 删除 `timestamp < cutoff` 的全部事件
    ///
    /// 计数和删除在同一事务内；匹配数超过 `limit` 时回滚，不删除任何事件。
    pub async fn delete_events_before(
        &self,
        cutoff: DateTime<Utc>,
        limit: u64,
    ) -> Result<EventPurge> {
        let db = &self.db;

        let outcome = retry::with_retry("delete_events_before", self.retry_config, || {
            purge_events(db, cutoff, limit)
        })
        .await
        .map_err(|e| SharelinkerError::database_operation(format!("清理分享事件失败: {}", e)))?;

        debug!("Event purge before {}: {:?}", cutoff, outcome);
        Ok(outcome)
    }

    pub async fn count_sharing_events(&self) -> Result<u64> {
        sharing_event::Entity::find()
            .count(&self.db)
            .await
            .map_err(|e| SharelinkerError::database_operation(format!("统计分享事件失败: {}", e)))
    }
}

async fn purge_events(
    db: &DatabaseConnection,
    cutoff: DateTime<Utc>,
    limit: u64,
) -> std::result::Result<EventPurge, DbErr> {
    let txn = db.begin().await?;

    let matched = sharing_event::Entity::find()
        .filter(sharing_event::Column::Timestamp.lt(cutoff))
        .count(&txn)
        .await?;

    if matched > limit {
        txn.rollback().await?;
        return Ok(EventPurge::OverLimit(matched));
    }

    if matched == 0 {
        txn.rollback().await?;
        return Ok(EventPurge::Deleted(0));
    }

    let deleted = sharing_event::Entity::delete_many()
        .filter(sharing_event::Column::Timestamp.lt(cutoff))
        .exec(&txn)
        .await?;

    txn.commit().await?;
    Ok(EventPurge::Deleted(deleted.rows_affected))
}
