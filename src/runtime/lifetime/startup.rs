use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::api::IdentityVerifier;
use crate::config::{JobsConfig, StaticConfig};
use crate::jobs::{CleanupJob, JobSchedule, ReportJob, spawn_scheduled};
use crate::services::{CaptionService, LinkService, ThreadRngPicker, TrackingService};
use crate::storage::{SeaOrmStorage, StorageFactory};

pub struct StartupContext {
    pub storage: Arc<SeaOrmStorage>,
    pub caption_service: Arc<CaptionService>,
    pub link_service: Arc<LinkService>,
    pub tracking_service: Arc<TrackingService>,
    pub verifier: Arc<IdentityVerifier>,
    pub route_config: RouteConfig,
}

#[derive(Clone, Debug)]
pub struct RouteConfig {
    pub callable_prefix: String,
    pub health_prefix: String,
}

impl StartupContext {
    /// 基于已有存储组装服务（测试中直接使用）
    pub fn from_storage(storage: Arc<SeaOrmStorage>, config: &StaticConfig) -> Self {
        let caption_service = Arc::new(CaptionService::new(
            storage.clone(),
            Arc::new(ThreadRngPicker),
        ));
        let link_service = Arc::new(LinkService::new(
            storage.clone(),
            config.links.base_url.clone(),
        ));
        let tracking_service = Arc::new(TrackingService::new(storage.clone()));
        let verifier = Arc::new(IdentityVerifier::from_config(&config.auth));

        Self {
            storage,
            caption_service,
            link_service,
            tracking_service,
            verifier,
            route_config: RouteConfig {
                callable_prefix: config.routes.callable_prefix.clone(),
                health_prefix: config.routes.health_prefix.clone(),
            },
        }
    }
}

/// 准备服务器启动的上下文：存储、业务服务和路由配置
pub async fn prepare_server_startup(config: &StaticConfig) -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let storage = StorageFactory::create(&config.database)
        .await
        .context("Failed to create storage backend")?;
    info!(
        "Using storage backend: {}",
        storage.get_backend_config().storage_type
    );

    check_component_config(config);

    let context = StartupContext::from_storage(storage, config);

    debug!(
        "Pre-startup processing completed in {} ms",
        start_time.elapsed().as_millis()
    );
    Ok(context)
}

/// 启动清理和周报两个定时任务，返回任务句柄
pub fn start_scheduled_jobs(
    storage: Arc<SeaOrmStorage>,
    config: &JobsConfig,
) -> Result<Vec<JoinHandle<()>>> {
    if !config.enabled {
        info!("Scheduled jobs are disabled by configuration");
        return Ok(Vec::new());
    }

    let cleanup_schedule = JobSchedule::cleanup(config).context("Invalid cleanup schedule")?;
    let report_schedule = JobSchedule::report(config).context("Invalid report schedule")?;

    let handles = vec![
        spawn_scheduled(
            Arc::new(CleanupJob::from_config(storage.clone(), config)),
            cleanup_schedule,
        ),
        spawn_scheduled(
            Arc::new(ReportJob::from_config(storage, config)),
            report_schedule,
        ),
    ];

    info!(
        "Scheduled jobs started: cleanup {:?}, report {:?}",
        cleanup_schedule, report_schedule
    );
    Ok(handles)
}

fn check_component_config(config: &StaticConfig) {
    if config.auth.jwt_secret.is_empty() {
        warn!(
            "auth.jwt_secret is not set. A random secret is used, tokens signed elsewhere \
            will not be accepted."
        );
    } else if config.auth.jwt_secret.len() < 32 {
        warn!(
            "WARNING: JWT secret is too short ({} bytes). Recommended minimum is 32 bytes.",
            config.auth.jwt_secret.len()
        );
    }

    info!("Callable endpoints available at: {}", config.routes.callable_prefix);
    info!("Health API available at: {}", config.routes.health_prefix);
}
