use serde::{Deserialize, Serialize};

/// 静态配置（从 TOML 加载，启动时使用）
///
/// 包含：
/// - server: 服务器地址、端口、CPU 数量、CORS
/// - database: 数据库连接配置
/// - logging: 日志配置
/// - links: 分享链接生成配置
/// - jobs: 定时任务（清理、周报）配置
/// - auth: 调用方身份校验
/// - routes: 路由前缀
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub links: LinksConfig,
    #[serde(default)]
    pub jobs: JobsConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub routes: RoutesConfig,
}

impl StaticConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：ENV > config.toml > 默认值
    /// ENV 前缀：SL，分隔符：__
    /// 示例：SL__SERVER__PORT=9999
    pub fn load(path: Option<&str>) -> Self {
        use config::{Config, Environment, File};

        let path = path.unwrap_or("config.toml");

        let builder = Config::builder()
            // 1. 从 TOML 文件加载（可选）
            .add_source(File::with_name(path).required(false))
            // 2. 从环境变量覆盖，前缀 SL，分隔符 __
            .add_source(
                Environment::with_prefix("SL")
                    .separator("__")
                    .try_parsing(true),
            );

        match builder.build() {
            Ok(settings) => match settings.try_deserialize::<StaticConfig>() {
                Ok(config) => {
                    if std::path::Path::new(path).exists() {
                        eprintln!("[INFO] Configuration loaded from: {}", path);
                    }
                    config
                }
                Err(e) => {
                    eprintln!("[ERROR] Failed to deserialize config: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("[ERROR] Failed to build config: {}", e);
                Self::default()
            }
        }
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config)
            .unwrap_or_else(|e| format!("Error generating sample config: {}", e))
    }

    /// 保存配置到 TOML 文件
    pub fn save_to_file<P: AsRef<std::path::Path>>(
        &self,
        path: P,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;

        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    #[serde(default = "default_cpu_count")]
    pub cpu_count: usize,
    /// 允许跨域的来源，空列表表示关闭 CORS
    #[serde(default)]
    pub cors_allowed_origins: Vec<String>,
}

/// 数据库连接配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_database_pool_size")]
    pub pool_size: u32,
    #[serde(default = "default_database_timeout")]
    pub timeout: u64,
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,
    #[serde(default = "default_retry_max_delay_ms")]
    pub retry_max_delay_ms: u64,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default = "default_log_file")]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
}

/// 分享链接配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinksConfig {
    /// 分享链接的固定前缀，生成 `{base_url}?share=..&ref=..`
    #[serde(default = "default_links_base_url")]
    pub base_url: String,
}

/// 定时任务配置（时间均为 UTC）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobsConfig {
    /// server 模式下是否启动定时任务
    #[serde(default = "default_jobs_enabled")]
    pub enabled: bool,
    #[serde(default = "default_cleanup_hour")]
    pub cleanup_hour: u32,
    /// 分享事件保留天数
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,
    /// 单次清理允许删除的最大事件数，超过则本次清理失败
    #[serde(default = "default_cleanup_batch_limit")]
    pub cleanup_batch_limit: usize,
    /// 周报触发的星期（Mon, Tue, ...）
    #[serde(default = "default_report_weekday")]
    pub report_weekday: String,
    #[serde(default = "default_report_hour")]
    pub report_hour: u32,
    #[serde(default = "default_report_window_days")]
    pub report_window_days: u32,
}

/// 调用方身份校验配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HS256 签名密钥，为空时生成随机密钥（所有 token 均无法通过校验）
    #[serde(default)]
    pub jwt_secret: String,
    /// 签发测试 token 的有效期（分钟）
    #[serde(default = "default_token_minutes")]
    pub token_minutes: u64,
}

/// 路由前缀配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutesConfig {
    #[serde(default = "default_callable_prefix")]
    pub callable_prefix: String,
    #[serde(default = "default_health_prefix")]
    pub health_prefix: String,
}

// ============================================================
// 静态配置默认值函数
// ============================================================

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_cpu_count() -> usize {
    num_cpus::get()
}

fn default_database_url() -> String {
    "sharelinker.db".to_string()
}

fn default_database_pool_size() -> u32 {
    10
}

fn default_database_timeout() -> u64 {
    30
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_base_delay_ms() -> u64 {
    100
}

fn default_retry_max_delay_ms() -> u64 {
    2000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_log_file() -> Option<String> {
    None
}

fn default_max_backups() -> u32 {
    5
}

fn default_enable_rotation() -> bool {
    true
}

fn default_links_base_url() -> String {
    "https://futurebaby.app".to_string()
}

fn default_jobs_enabled() -> bool {
    true
}

fn default_cleanup_hour() -> u32 {
    2
}

fn default_retention_days() -> u32 {
    30
}

fn default_cleanup_batch_limit() -> usize {
    500
}

fn default_report_weekday() -> String {
    "Mon".to_string()
}

fn default_report_hour() -> u32 {
    9
}

fn default_report_window_days() -> u32 {
    7
}

fn default_token_minutes() -> u64 {
    60
}

fn default_callable_prefix() -> String {
    "/v1".to_string()
}

fn default_health_prefix() -> String {
    "/health".to_string()
}

// ============================================================
// Default 实现
// ============================================================

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            cpu_count: default_cpu_count(),
            cors_allowed_origins: Vec::new(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            pool_size: default_database_pool_size(),
            timeout: default_database_timeout(),
            retry_count: default_retry_count(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
            retry_max_delay_ms: default_retry_max_delay_ms(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: default_log_file(),
            max_backups: default_max_backups(),
            enable_rotation: default_enable_rotation(),
        }
    }
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            base_url: default_links_base_url(),
        }
    }
}

impl Default for JobsConfig {
    fn default() -> Self {
        Self {
            enabled: default_jobs_enabled(),
            cleanup_hour: default_cleanup_hour(),
            retention_days: default_retention_days(),
            cleanup_batch_limit: default_cleanup_batch_limit(),
            report_weekday: default_report_weekday(),
            report_hour: default_report_hour(),
            report_window_days: default_report_window_days(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            token_minutes: default_token_minutes(),
        }
    }
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            callable_prefix: default_callable_prefix(),
            health_prefix: default_health_prefix(),
        }
    }
}
