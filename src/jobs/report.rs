//! 每周分享统计报告

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tracing::info;

use super::scheduler::ScheduledJob;
use crate::config::JobsConfig;
use crate::errors::Result;
use crate::storage::{SeaOrmStorage, SharingEvent, SharingStats, WeeklyReport};

/// 缺少平台 / 内容类型 / 分享者时使用的分组名
pub const UNKNOWN_BUCKET: &str = "unknown";

fn bucket(value: Option<&str>) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or(UNKNOWN_BUCKET)
        .to_string()
}

/// 按平台、内容类型、分享者汇总事件
pub fn fold_events(events: &[SharingEvent]) -> SharingStats {
    let mut stats = SharingStats {
        total_shares: events.len() as u64,
        ..SharingStats::default()
    };

    for event in events {
        *stats
            .platforms
            .entry(bucket(event.platform.as_deref()))
            .or_insert(0) += 1;
        *stats
            .content_types
            .entry(bucket(event.content_type.as_deref()))
            .or_insert(0) += 1;
        *stats
            .top_sharers
            .entry(bucket(event.sharer_id.as_deref()))
            .or_insert(0) += 1;
    }

    stats
}

pub struct ReportJob {
    storage: Arc<SeaOrmStorage>,
    window_days: u32,
}

impl ReportJob {
    pub fn new(storage: Arc<SeaOrmStorage>, window_days: u32) -> Self {
        Self {
            storage,
            window_days,
        }
    }

    pub fn from_config(storage: Arc<SeaOrmStorage>, config: &JobsConfig) -> Self {
        Self::new(storage, config.report_window_days)
    }

    pub async fn run(&self) -> Result<WeeklyReport> {
        self.run_at(Utc::now()).await
    }

    /// 汇总 `[now - window_days, now]` 内的事件并写入一条周报
    pub async fn run_at(&self, now: DateTime<Utc>) -> Result<WeeklyReport> {
        let week_of = now - Duration::days(self.window_days as i64);
        let events = self.storage.events_between(week_of, now).await?;

        let mut report = WeeklyReport {
            id: None,
            week_of,
            stats: fold_events(&events),
            generated_at: now,
        };
        report.id = Some(self.storage.insert_weekly_report(&report).await?);

        info!(
            "Generated weekly sharing report: {}",
            serde_json::to_string(&report.stats)?
        );
        Ok(report)
    }
}

#[async_trait]
impl ScheduledJob for ReportJob {
    fn name(&self) -> &'static str {
        "generate_sharing_report"
    }

    async fn run_once(&self) -> anyhow::Result<()> {
        self.run()
            .await
            .context("Failed to generate weekly sharing report")?;
        Ok(())
    }
}
