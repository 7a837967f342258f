//! 定时任务调度
//!
//! 单进程内的简易调度器：计算下一次触发时间，睡眠到点后执行任务，循环往复。
//! 所有时间均为 UTC。

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Datelike, Days, Utc, Weekday};
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::config::JobsConfig;

/// 触发规则
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobSchedule {
    /// 每天 `hour`:00
    Daily { hour: u32 },
    /// 每周 `weekday` 的 `hour`:00
    Weekly { weekday: Weekday, hour: u32 },
}

impl JobSchedule {
    /// 清理任务的触发规则
    pub fn cleanup(config: &JobsConfig) -> anyhow::Result<Self> {
        Self::daily(config.cleanup_hour)
    }

    /// 周报任务的触发规则
    pub fn report(config: &JobsConfig) -> anyhow::Result<Self> {
        let weekday = Weekday::from_str(&config.report_weekday).map_err(|_| {
            anyhow::anyhow!("Invalid report weekday: '{}'", config.report_weekday)
        })?;
        Self::weekly(weekday, config.report_hour)
    }

    pub fn daily(hour: u32) -> anyhow::Result<Self> {
        check_hour(hour)?;
        Ok(JobSchedule::Daily { hour })
    }

    pub fn weekly(weekday: Weekday, hour: u32) -> anyhow::Result<Self> {
        check_hour(hour)?;
        Ok(JobSchedule::Weekly { weekday, hour })
    }

    /// 严格晚于 `now` 的下一次触发时间
    pub fn next_after(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let today = now.date_naive();
        match *self {
            JobSchedule::Daily { hour } => {
                let candidate = today.and_hms_opt(hour, 0, 0)?.and_utc();
                if candidate > now {
                    Some(candidate)
                } else {
                    Some(candidate.checked_add_days(Days::new(1))?)
                }
            }
            JobSchedule::Weekly { weekday, hour } => {
                let days_ahead = (weekday.num_days_from_monday() + 7
                    - today.weekday().num_days_from_monday())
                    % 7;
                let candidate = today
                    .checked_add_days(Days::new(days_ahead as u64))?
                    .and_hms_opt(hour, 0, 0)?
                    .and_utc();
                if candidate > now {
                    Some(candidate)
                } else {
                    Some(candidate.checked_add_days(Days::new(7))?)
                }
            }
        }
    }
}

fn check_hour(hour: u32) -> anyhow::Result<()> {
    if hour > 23 {
        anyhow::bail!("Invalid schedule hour: {} (expected 0-23)", hour);
    }
    Ok(())
}

/// 可被调度器执行的任务
#[async_trait]
pub trait ScheduledJob: Send + Sync + 'static {
    fn name(&self) -> &'static str;

    async fn run_once(&self) -> anyhow::Result<()>;
}

/// 启动后台调度循环，返回的句柄可用于关闭时取消
///
/// 没有重叠保护：上一次执行结束后才计算下一次触发时间。
pub fn spawn_scheduled(job: Arc<dyn ScheduledJob>, schedule: JobSchedule) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let now = Utc::now();
            let Some(next) = schedule.next_after(now) else {
                error!(
                    "Job '{}' has no next fire time for {:?}, stopping",
                    job.name(),
                    schedule
                );
                return;
            };

            let wait = (next - now).to_std().unwrap_or_default();
            info!("Job '{}' scheduled at {}", job.name(), next);
            tokio::time::sleep(wait).await;

            if let Err(e) = job.run_once().await {
                error!("Job '{}' failed: {:#}", job.name(), e);
            }
        }
    })
}
