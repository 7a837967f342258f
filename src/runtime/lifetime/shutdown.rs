use sea_orm::DatabaseConnection;
use std::time::Duration;
use tokio::signal;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{error, info, warn};

/// 关闭超时时间（秒）
const SHUTDOWN_TIMEOUT_SECS: u64 = 10;

/// 等待 Ctrl+C，然后停止定时任务并关闭数据库连接
pub async fn listen_for_shutdown(db: DatabaseConnection, jobs: Vec<JoinHandle<()>>) {
    match signal::ctrl_c().await {
        Ok(()) => {
            info!("Shutdown signal received, stopping scheduled jobs...");
        }
        Err(e) => {
            warn!(
                "Failed to listen for Ctrl+C: {}. Proceeding with shutdown anyway.",
                e
            );
        }
    }

    for handle in &jobs {
        handle.abort();
    }

    match timeout(Duration::from_secs(SHUTDOWN_TIMEOUT_SECS), db.close()).await {
        Ok(Ok(())) => info!("Database connection closed"),
        Ok(Err(e)) => error!("Failed to close database connection: {}", e),
        Err(_) => error!(
            "Closing database connection timed out after {} seconds",
            SHUTDOWN_TIMEOUT_SECS
        ),
    }
}
