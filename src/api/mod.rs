//! HTTP 层：callable 端点、健康检查和请求上下文中间件

pub mod identity;
pub mod middleware;
pub mod services;

pub use identity::{CallerIdentity, IdentityVerifier};
