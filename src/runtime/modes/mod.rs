//! 运行模式分发
//!
//! - `serve`：HTTP 服务和定时任务
//! - `job` / `config`：一次性命令行操作

pub mod cli;
pub mod server;

pub use cli::{config_generate, run_job};
pub use server::{configure_app, run_server};
