//! 点击 / 转化追踪服务
//!
//! 统计分享链接的点击和转化，给链接所有者发放推荐奖励，
//! 每次调用都追加一条 `sharing_events` 记录。

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::errors::{Result, SharelinkerError};
use crate::storage::{NewSharingEvent, SeaOrmStorage, SharingLink};

pub const TRACK_FAILED_MESSAGE: &str = "Failed to track sharing click";

/// 每次转化给链接所有者的奖励积分
pub const REFERRAL_REWARD_POINTS: i64 = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackRequest {
    pub sharing_id: String,
    #[serde(default)]
    pub clicker_id: Option<String>,
    pub action: String,
    #[serde(default)]
    pub platform: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackResponse {
    pub success: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SharingAction {
    Click,
    Install,
    Signup,
    /// 未知动作只记录事件，不修改计数
    Other(String),
}

impl SharingAction {
    pub fn as_str(&self) -> &str {
        match self {
            SharingAction::Click => "click",
            SharingAction::Install => "install",
            SharingAction::Signup => "signup",
            SharingAction::Other(raw) => raw,
        }
    }

    pub fn is_conversion(&self) -> bool {
        matches!(self, SharingAction::Install | SharingAction::Signup)
    }
}

impl From<&str> for SharingAction {
    fn from(raw: &str) -> Self {
        match raw {
            "click" => SharingAction::Click,
            "install" => SharingAction::Install,
            "signup" => SharingAction::Signup,
            other => SharingAction::Other(other.to_string()),
        }
    }
}

impl fmt::Display for SharingAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct TrackingService {
    storage: Arc<SeaOrmStorage>,
}

impl TrackingService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    /// 记录一次点击或转化（不校验调用方身份）
    pub async fn track_click(&self, req: TrackRequest) -> Result<TrackResponse> {
        self.track_click_at(req, Utc::now()).await
    }

    pub async fn track_click_at(
        &self,
        req: TrackRequest,
        now: DateTime<Utc>,
    ) -> Result<TrackResponse> {
        self.apply(req, now).await.map_err(|e| {
            error!("Error tracking sharing click: {}", e);
            e.into_caller_error(TRACK_FAILED_MESSAGE)
        })
    }

    async fn apply(&self, req: TrackRequest, now: DateTime<Utc>) -> Result<TrackResponse> {
        if req.sharing_id.is_empty() {
            return Err(SharelinkerError::invalid_argument("sharingId is required"));
        }

        let action = SharingAction::from(req.action.as_str());
        let link = self.update_counters(&req.sharing_id, &action, now).await?;

        let mut event = NewSharingEvent::new(&req.sharing_id, action.as_str()).at(now);
        event.clicker_id = req.clicker_id;
        event.platform = req.platform;
        if let Some(link) = &link {
            event = event.with_link(link);
        }

        self.storage.append_sharing_event(&event).await?;

        debug!("Tracked '{}' on {}", action, req.sharing_id);
        Ok(TrackResponse { success: true })
    }

    /// 按动作更新链接计数，返回链接记录（不存在时为 None）
    async fn update_counters(
        &self,
        sharing_id: &str,
        action: &SharingAction,
        now: DateTime<Utc>,
    ) -> Result<Option<SharingLink>> {
        match action {
            SharingAction::Click => self.storage.record_click(sharing_id, now).await,
            SharingAction::Install | SharingAction::Signup => {
                let credit = self
                    .storage
                    .record_conversion(sharing_id, now, REFERRAL_REWARD_POINTS)
                    .await?;
                if credit.link.is_some() && credit.rewarded_user.is_none() {
                    debug!("Link owner profile missing, no reward for {}", sharing_id);
                }
                Ok(credit.link)
            }
            SharingAction::Other(_) => self.storage.get_sharing_link(sharing_id).await,
        }
    }
}
