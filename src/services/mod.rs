//! callable 端点背后的业务服务
//!
//! 各服务在构造时接收依赖，不使用全局单例。

pub mod caption_service;
pub mod link_service;
pub mod picker;
pub mod tracking_service;

pub use caption_service::{CaptionKind, CaptionRequest, CaptionResponse, CaptionService};
pub use link_service::{LinkRequest, LinkResponse, LinkService};
pub use picker::{FixedPicker, TemplatePicker, ThreadRngPicker};
pub use tracking_service::{SharingAction, TrackRequest, TrackResponse, TrackingService};
