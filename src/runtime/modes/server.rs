//! 服务器模式
//!
//! 启动 HTTP 服务（callable 路由和健康检查），
//! 同时启动清理和周报定时任务。

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware::DefaultHeaders, web};
use anyhow::{Context, Result};
use tracing::warn;

use crate::api::middleware::RequestContext;
use crate::api::services::{AppStartTime, callable_routes, health_routes};
use crate::config::StaticConfig;
use crate::runtime::lifetime;
use crate::runtime::lifetime::startup::StartupContext;

/// 根据 `server.cors_allowed_origins` 构建 CORS 中间件
///
/// 列表为空时保持浏览器同源策略。
pub fn build_cors_middleware(allowed_origins: &[String]) -> Cors {
    if allowed_origins.is_empty() {
        return Cors::default();
    }

    let mut cors = if allowed_origins.iter().any(|o| o == "*") {
        Cors::default().allow_any_origin()
    } else {
        allowed_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
    };

    cors = cors
        .allowed_methods(vec!["GET", "HEAD", "POST", "OPTIONS"])
        .allowed_header("Content-Type")
        .allowed_header("Authorization")
        .max_age(3600);

    cors
}

/// 注册共享状态和路由
///
/// RequestContext 中间件由调用方包裹，测试中可以构建相同的应用。
pub fn configure_app(cfg: &mut web::ServiceConfig, ctx: &StartupContext, start: AppStartTime) {
    cfg.app_data(web::Data::new(ctx.storage.clone()))
        .app_data(web::Data::new(ctx.caption_service.clone()))
        .app_data(web::Data::new(ctx.link_service.clone()))
        .app_data(web::Data::new(ctx.tracking_service.clone()))
        .app_data(web::Data::new(start))
        .app_data(web::PayloadConfig::new(256 * 1024))
        .service(web::scope(&ctx.route_config.callable_prefix).service(callable_routes()))
        .service(web::scope(&ctx.route_config.health_prefix).service(health_routes()));
}

/// 运行 HTTP 服务
///
/// **注意**：调用前必须先初始化日志系统
pub async fn run_server(config: &StaticConfig) -> Result<()> {
    let app_start_time = AppStartTime {
        start_datetime: chrono::Utc::now(),
    };

    let startup = lifetime::startup::prepare_server_startup(config)
        .await
        .inspect_err(|e| tracing::error!("Server startup failed: {:#}", e))?;

    let jobs = lifetime::startup::start_scheduled_jobs(startup.storage.clone(), &config.jobs)?;
    let db_for_shutdown = startup.storage.get_db().clone();

    let cpu_count = config.server.cpu_count.clamp(1, 32);
    warn!("Using {} CPU cores for the server", cpu_count);

    let cors_origins = config.server.cors_allowed_origins.clone();
    let startup = std::sync::Arc::new(startup);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(RequestContext::new(startup.verifier.clone()))
            .wrap(build_cors_middleware(&cors_origins))
            .wrap(
                DefaultHeaders::new()
                    .add(("Cache-Control", "no-cache, no-store, must-revalidate")),
            )
            .configure(|cfg| configure_app(cfg, &startup, app_start_time.clone()))
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .client_request_timeout(std::time::Duration::from_millis(5000))
    .workers(cpu_count);

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    warn!("Starting server at http://{}", bind_address);
    let server = server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run();

    tokio::select! {
        res = server => {
            res?;
        }
        _ = lifetime::shutdown::listen_for_shutdown(db_for_shutdown, jobs) => {
            warn!("Graceful shutdown: all tasks completed");
        }
    }

    Ok(())
}
