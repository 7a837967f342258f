//! SeaORM 存储后端
//!
//! 基于 SeaORM，支持 SQLite、MySQL/MariaDB 和 PostgreSQL。
//!
//! 分享系统的全部数据都在这里：用户资料、分享链接、分享事件、
//! 文案生成记录和周报。

mod connection;
mod converters;
mod events;
mod links;
mod records;
pub mod retry;
mod users;

use sea_orm::DatabaseConnection;
use tracing::warn;

use crate::config::DatabaseConfig;
use crate::errors::{Result, SharelinkerError};
use crate::storage::models::StorageConfig;

pub use connection::{connect_generic, connect_sqlite, run_migrations};
pub use events::EventPurge;
pub use links::ConversionCredit;

/// 从数据库 URL 推断数据库类型
pub fn infer_backend_from_url(database_url: &str) -> Result<String> {
    if database_url.starts_with("sqlite:")
        || database_url.ends_with(".db")
        || database_url.ends_with(".sqlite")
        || database_url == ":memory:"
    {
        Ok("sqlite".to_string())
    } else if database_url.starts_with("mysql://") || database_url.starts_with("mariadb://") {
        Ok("mysql".to_string())
    } else if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        Ok("postgres".to_string())
    } else {
        Err(SharelinkerError::database_config(format!(
            "无法从 URL 推断数据库类型: {}. 支持的 URL 格式: sqlite://, mysql://, mariadb://, postgres://",
            database_url
        )))
    }
}

/// 基于 SeaORM 的存储后端
#[derive(Clone)]
pub struct SeaOrmStorage {
    db: DatabaseConnection,
    backend_name: String,
    /// 重试配置
    retry_config: retry::RetryConfig,
}

impl SeaOrmStorage {
    pub async fn new(
        database_url: &str,
        backend_name: &str,
        options: &DatabaseConfig,
    ) -> Result<Self> {
        if database_url.is_empty() {
            return Err(SharelinkerError::database_config(
                "DATABASE_URL 未设置".to_string(),
            ));
        }

        let retry_config = retry::RetryConfig {
            max_retries: options.retry_count,
            base_delay_ms: options.retry_base_delay_ms,
            max_delay_ms: options.retry_max_delay_ms,
        };

        // 根据不同数据库类型配置连接选项
        let db = if backend_name == "sqlite" {
            connect_sqlite(database_url).await?
        } else {
            connect_generic(
                database_url,
                backend_name,
                options.pool_size,
                options.timeout,
            )
            .await?
        };

        let storage = SeaOrmStorage {
            db,
            backend_name: backend_name.to_string(),
            retry_config,
        };

        // 运行迁移
        run_migrations(&storage.db).await?;

        warn!(
            "{} Storage initialized.",
            storage.backend_name.to_uppercase()
        );
        Ok(storage)
    }

    pub fn get_backend_config(&self) -> StorageConfig {
        StorageConfig {
            storage_type: self.backend_name.clone(),
        }
    }

    /// 获取数据库连接
    pub fn get_db(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_backend_from_url() {
        assert_eq!(infer_backend_from_url("sharelinker.db").unwrap(), "sqlite");
        assert_eq!(
            infer_backend_from_url("sqlite://data/app.db?mode=rwc").unwrap(),
            "sqlite"
        );
        assert_eq!(
            infer_backend_from_url("mariadb://root@localhost/share").unwrap(),
            "mysql"
        );
        assert_eq!(
            infer_backend_from_url("postgresql://localhost/share").unwrap(),
            "postgres"
        );
        assert!(infer_backend_from_url("mongodb://localhost").is_err());
    }
}
