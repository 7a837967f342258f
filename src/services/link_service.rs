//! 分享链接服务
//!
//! 签发 `{base_url}?share={sharing_id}&ref={user_id}` 形式的推荐链接，
//! 并为每个链接保存一条追踪记录。

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info};

use crate::api::identity::{CallerIdentity, UNAUTHENTICATED_MESSAGE};
use crate::errors::{Result, SharelinkerError};
use crate::storage::{SeaOrmStorage, SharingLink};

pub const LINK_FAILED_MESSAGE: &str = "Failed to generate sharing link";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkRequest {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub content_type: String,
    #[serde(default)]
    pub content_id: String,
    #[serde(default)]
    pub metadata: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkResponse {
    pub link: String,
    pub sharing_id: String,
}

/// 分享 ID：`{user_id}_{content_type}_{unix_millis}`
pub fn build_sharing_id(user_id: &str, content_type: &str, now: DateTime<Utc>) -> String {
    format!("{}_{}_{}", user_id, content_type, now.timestamp_millis())
}

/// 拼接分享链接，查询参数做百分号编码
pub fn build_share_url(base_url: &str, sharing_id: &str, user_id: &str) -> String {
    format!(
        "{}?share={}&ref={}",
        base_url.trim_end_matches('?'),
        urlencoding::encode(sharing_id),
        urlencoding::encode(user_id)
    )
}

pub struct LinkService {
    storage: Arc<SeaOrmStorage>,
    base_url: String,
}

impl LinkService {
    pub fn new(storage: Arc<SeaOrmStorage>, base_url: impl Into<String>) -> Self {
        Self {
            storage,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn generate_link(
        &self,
        identity: Option<&CallerIdentity>,
        req: LinkRequest,
    ) -> Result<LinkResponse> {
        self.generate_link_at(identity, req, Utc::now()).await
    }

    /// 以指定时间生成链接（sharing_id 中的毫秒时间戳来自 `now`）
    pub async fn generate_link_at(
        &self,
        identity: Option<&CallerIdentity>,
        req: LinkRequest,
        now: DateTime<Utc>,
    ) -> Result<LinkResponse> {
        if identity.is_none() {
            return Err(SharelinkerError::unauthenticated(UNAUTHENTICATED_MESSAGE));
        }

        self.store_link(req, now).await.map_err(|e| {
            error!("Error generating sharing link: {}", e);
            e.into_caller_error(LINK_FAILED_MESSAGE)
        })
    }

    async fn store_link(&self, req: LinkRequest, now: DateTime<Utc>) -> Result<LinkResponse> {
        if req.user_id.is_empty() {
            return Err(SharelinkerError::invalid_argument("userId is required"));
        }

        let sharing_id = build_sharing_id(&req.user_id, &req.content_type, now);
        let link = SharingLink {
            sharing_id: sharing_id.clone(),
            user_id: req.user_id.clone(),
            content_type: req.content_type,
            content_id: req.content_id,
            metadata: req.metadata,
            clicks: 0,
            conversions: 0,
            created_at: now,
            last_click_at: None,
            last_conversion_at: None,
        };

        self.storage.create_sharing_link(&link).await?;

        info!("Sharing link issued: {} for {}", sharing_id, req.user_id);
        Ok(LinkResponse {
            link: build_share_url(&self.base_url, &sharing_id, &req.user_id),
            sharing_id,
        })
    }
}
