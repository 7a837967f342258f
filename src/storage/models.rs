use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 用户资料（由外部系统创建，这里只读取名字、累加奖励）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProfile {
    pub id: String,
    pub display_name: Option<String>,
    pub first_name: Option<String>,
    #[serde(default)]
    pub referral_rewards: i64,
    #[serde(default)]
    pub total_referrals: i64,
    pub created_at: DateTime<Utc>,
}

impl UserProfile {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: None,
            first_name: None,
            referral_rewards: 0,
            total_referrals: 0,
            created_at: Utc::now(),
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn with_first_name(mut self, name: impl Into<String>) -> Self {
        self.first_name = Some(name.into());
        self
    }

    /// 个性化文案使用的名字：display_name 优先，其次 first_name，空串视为没有
    pub fn preferred_name(&self) -> Option<&str> {
        self.display_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .or_else(|| self.first_name.as_deref().filter(|n| !n.is_empty()))
    }
}

/// 分享链接记录
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SharingLink {
    pub sharing_id: String,
    pub user_id: String,
    pub content_type: String,
    pub content_id: String,
    pub metadata: Option<serde_json::Value>,
    #[serde(default)]
    pub clicks: i64,
    #[serde(default)]
    pub conversions: i64,
    pub created_at: DateTime<Utc>,
    pub last_click_at: Option<DateTime<Utc>>,
    pub last_conversion_at: Option<DateTime<Utc>>,
}

/// 已持久化的分享事件
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SharingEvent {
    pub id: i64,
    pub sharing_id: String,
    pub clicker_id: Option<String>,
    pub action: String,
    pub platform: Option<String>,
    pub content_type: Option<String>,
    pub sharer_id: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// 待写入的分享事件
#[derive(Debug, Clone, PartialEq)]
pub struct NewSharingEvent {
    pub sharing_id: String,
    pub clicker_id: Option<String>,
    pub action: String,
    pub platform: Option<String>,
    pub content_type: Option<String>,
    pub sharer_id: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl NewSharingEvent {
    pub fn new(sharing_id: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            sharing_id: sharing_id.into(),
            clicker_id: None,
            action: action.into(),
            platform: None,
            content_type: None,
            sharer_id: None,
            timestamp: Utc::now(),
        }
    }

    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// 用链接记录补全内容类型和分享者
    pub fn with_link(mut self, link: &SharingLink) -> Self {
        self.content_type = Some(link.content_type.clone());
        self.sharer_id = Some(link.user_id.clone());
        self
    }
}

/// 文案生成记录
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CaptionGeneration {
    pub user_id: String,
    pub caption_type: String,
    pub caption: String,
    pub metadata: Option<serde_json::Value>,
    pub timestamp: DateTime<Utc>,
}

/// 周报统计数据
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SharingStats {
    pub total_shares: u64,
    pub platforms: BTreeMap<String, u64>,
    pub content_types: BTreeMap<String, u64>,
    pub top_sharers: BTreeMap<String, u64>,
}

/// 周报记录
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyReport {
    pub id: Option<i64>,
    pub week_of: DateTime<Utc>,
    pub stats: SharingStats,
    pub generated_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct StorageConfig {
    pub storage_type: String,
}
