pub mod callable;
pub mod health;

pub use callable::{CallableService, callable_routes};
pub use health::{AppStartTime, HealthService, health_routes};
