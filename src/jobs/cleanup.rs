//! 过期分享事件清理任务

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};

use super::scheduler::ScheduledJob;
use crate::config::JobsConfig;
use crate::errors::{Result, SharelinkerError};
use crate::storage::{EventPurge, SeaOrmStorage};

/// 清理报告
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupReport {
    /// 早于该时间的事件被删除
    pub cutoff: DateTime<Utc>,
    pub deleted: u64,
}

pub struct CleanupJob {
    storage: Arc<SeaOrmStorage>,
    retention_days: u32,
    batch_limit: usize,
}

impl CleanupJob {
    pub fn new(storage: Arc<SeaOrmStorage>, retention_days: u32, batch_limit: usize) -> Self {
        Self {
            storage,
            retention_days,
            batch_limit,
        }
    }

    pub fn from_config(storage: Arc<SeaOrmStorage>, config: &JobsConfig) -> Self {
        Self::new(storage, config.retention_days, config.cleanup_batch_limit)
    }

    pub fn cutoff_for(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - Duration::days(self.retention_days as i64)
    }

    pub async fn run(&self) -> Result<CleanupReport> {
        self.run_at(Utc::now()).await
    }

    /// 删除 `timestamp < now - retention_days` 的全部事件
    ///
    /// 匹配数超过批量上限时返回 `BatchLimitExceeded`，不删除任何事件。
    pub async fn run_at(&self, now: DateTime<Utc>) -> Result<CleanupReport> {
        let cutoff = self.cutoff_for(now);

        match self
            .storage
            .delete_events_before(cutoff, self.batch_limit as u64)
            .await?
        {
            EventPurge::Deleted(deleted) => {
                info!("Cleaned up {} old sharing events", deleted);
                Ok(CleanupReport { cutoff, deleted })
            }
            EventPurge::OverLimit(matched) => {
                warn!(
                    "Cleanup aborted: {} events older than {} exceed batch limit {}",
                    matched, cutoff, self.batch_limit
                );
                Err(SharelinkerError::batch_limit_exceeded(format!(
                    "{} expired sharing events exceed the batch limit of {}",
                    matched, self.batch_limit
                )))
            }
        }
    }
}

#[async_trait]
impl ScheduledJob for CleanupJob {
    fn name(&self) -> &'static str {
        "cleanup_sharing_data"
    }

    async fn run_once(&self) -> anyhow::Result<()> {
        self.run()
            .await
            .context("Failed to clean up sharing events")?;
        Ok(())
    }
}
