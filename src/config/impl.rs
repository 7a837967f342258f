use std::sync::{Arc, OnceLock};

use arc_swap::ArcSwap;

use super::StaticConfig;

static CONFIG: OnceLock<ArcSwap<StaticConfig>> = OnceLock::new();

/// 获取全局配置
///
/// 返回 `Arc<StaticConfig>`，读取时不加锁。
/// 尚未调用 `init_config` 时返回默认配置。
pub fn get_config() -> Arc<StaticConfig> {
    CONFIG
        .get_or_init(|| ArcSwap::from_pointee(StaticConfig::default()))
        .load_full()
}

/// 初始化全局配置
///
/// 从 `path`（默认 "config.toml"）和 `SL__*` 环境变量加载，
/// 文件不存在时使用默认值。重复调用会替换之前的配置。
///
/// # 示例
/// ```no_run
/// use sharelinker::config::init_config;
/// init_config(None);
/// ```
pub fn init_config(path: Option<&str>) {
    let loaded = StaticConfig::load(path);
    match CONFIG.get() {
        Some(current) => current.store(Arc::new(loaded)),
        None => {
            let _ = CONFIG.set(ArcSwap::from_pointee(loaded));
        }
    }
}

/// 替换全局配置（测试使用）
pub fn set_config(config: StaticConfig) {
    CONFIG
        .get_or_init(|| ArcSwap::from_pointee(StaticConfig::default()))
        .store(Arc::new(config));
}
