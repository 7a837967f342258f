use sea_orm::ActiveValue::{NotSet, Set};
use tracing::warn;

use crate::storage::models::{
    CaptionGeneration, NewSharingEvent, SharingEvent, SharingLink, SharingStats, UserProfile,
    WeeklyReport,
};
use migration::entities::{caption_generation, sharing_event, sharing_link, sharing_report, user};

/// JSON 文本列 → serde_json::Value（解析失败时丢弃并告警）
fn parse_json_column(column: &str, raw: Option<String>) -> Option<serde_json::Value> {
    let raw = raw?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Ignoring malformed JSON in column '{}': {}", column, e);
            None
        }
    }
}

fn encode_json_column(value: &Option<serde_json::Value>) -> Option<String> {
    value
        .as_ref()
        .filter(|v| !v.is_null())
        .map(|v| v.to_string())
}

pub fn model_to_user(model: user::Model) -> UserProfile {
    UserProfile {
        id: model.id,
        display_name: model.display_name,
        first_name: model.first_name,
        referral_rewards: model.referral_rewards,
        total_referrals: model.total_referrals,
        created_at: model.created_at,
    }
}

pub fn user_to_active_model(profile: &UserProfile) -> user::ActiveModel {
    user::ActiveModel {
        id: Set(profile.id.clone()),
        display_name: Set(profile.display_name.clone()),
        first_name: Set(profile.first_name.clone()),
        referral_rewards: Set(profile.referral_rewards),
        total_referrals: Set(profile.total_referrals),
        created_at: Set(profile.created_at),
    }
}

/// 将 Sea-ORM Model 转换为 SharingLink
pub fn model_to_sharing_link(model: sharing_link::Model) -> SharingLink {
    SharingLink {
        sharing_id: model.sharing_id,
        user_id: model.user_id,
        content_type: model.content_type,
        content_id: model.content_id,
        metadata: parse_json_column("sharing_links.metadata", model.metadata),
        clicks: model.clicks,
        conversions: model.conversions,
        created_at: model.created_at,
        last_click_at: model.last_click_at,
        last_conversion_at: model.last_conversion_at,
    }
}

/// 新建链接的 ActiveModel，计数器写入记录中的值（新链接为 0）
pub fn sharing_link_to_active_model(link: &SharingLink) -> sharing_link::ActiveModel {
    sharing_link::ActiveModel {
        sharing_id: Set(link.sharing_id.clone()),
        user_id: Set(link.user_id.clone()),
        content_type: Set(link.content_type.clone()),
        content_id: Set(link.content_id.clone()),
        metadata: Set(encode_json_column(&link.metadata)),
        clicks: Set(link.clicks),
        conversions: Set(link.conversions),
        created_at: Set(link.created_at),
        last_click_at: Set(link.last_click_at),
        last_conversion_at: Set(link.last_conversion_at),
    }
}

pub fn model_to_sharing_event(model: sharing_event::Model) -> SharingEvent {
    SharingEvent {
        id: model.id,
        sharing_id: model.sharing_id,
        clicker_id: model.clicker_id,
        action: model.action,
        platform: model.platform,
        content_type: model.content_type,
        sharer_id: model.sharer_id,
        timestamp: model.timestamp,
    }
}

pub fn event_to_active_model(event: &NewSharingEvent) -> sharing_event::ActiveModel {
    sharing_event::ActiveModel {
        id: NotSet,
        sharing_id: Set(event.sharing_id.clone()),
        clicker_id: Set(event.clicker_id.clone()),
        action: Set(event.action.clone()),
        platform: Set(event.platform.clone()),
        content_type: Set(event.content_type.clone()),
        sharer_id: Set(event.sharer_id.clone()),
        timestamp: Set(event.timestamp),
    }
}

pub fn caption_to_active_model(record: &CaptionGeneration) -> caption_generation::ActiveModel {
    caption_generation::ActiveModel {
        id: NotSet,
        user_id: Set(record.user_id.clone()),
        caption_type: Set(record.caption_type.clone()),
        caption: Set(record.caption.clone()),
        metadata: Set(encode_json_column(&record.metadata)),
        timestamp: Set(record.timestamp),
    }
}

pub fn model_to_caption(model: caption_generation::Model) -> CaptionGeneration {
    CaptionGeneration {
        user_id: model.user_id,
        caption_type: model.caption_type,
        caption: model.caption,
        metadata: parse_json_column("caption_generations.metadata", model.metadata),
        timestamp: model.timestamp,
    }
}

pub fn report_to_active_model(
    report: &WeeklyReport,
) -> Result<sharing_report::ActiveModel, serde_json::Error> {
    Ok(sharing_report::ActiveModel {
        id: NotSet,
        week_of: Set(report.week_of),
        total_shares: Set(report.stats.total_shares as i64),
        platforms: Set(serde_json::to_string(&report.stats.platforms)?),
        content_types: Set(serde_json::to_string(&report.stats.content_types)?),
        top_sharers: Set(serde_json::to_string(&report.stats.top_sharers)?),
        generated_at: Set(report.generated_at),
    })
}

pub fn model_to_report(model: sharing_report::Model) -> Result<WeeklyReport, serde_json::Error> {
    Ok(WeeklyReport {
        id: Some(model.id),
        week_of: model.week_of,
        stats: SharingStats {
            total_shares: model.total_shares.max(0) as u64,
            platforms: serde_json::from_str(&model.platforms)?,
            content_types: serde_json::from_str(&model.content_types)?,
            top_sharers: serde_json::from_str(&model.top_sharers)?,
        },
        generated_at: model.generated_at,
    })
}
