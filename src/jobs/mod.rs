//! 定时任务：过期事件清理和每周统计报告

pub mod cleanup;
pub mod report;
pub mod scheduler;

pub use cleanup::{CleanupJob, CleanupReport};
pub use report::{ReportJob, fold_events};
pub use scheduler::{JobSchedule, ScheduledJob, spawn_scheduled};
