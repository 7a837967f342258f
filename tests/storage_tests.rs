//! SeaORM 存储层集成测试
//!
//! 使用临时 SQLite 文件覆盖用户、分享链接、事件、文案记录和周报。

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use serde_json::json;
use tempfile::TempDir;

use sharelinker::config::DatabaseConfig;
use sharelinker::storage::backend::{connect_sqlite, infer_backend_from_url, run_migrations};
use sharelinker::storage::{
    CaptionGeneration, EventPurge, NewSharingEvent, SeaOrmStorage, SharingLink, SharingStats,
    UserProfile, WeeklyReport,
};

// =============================================================================
// 测试辅助
// =============================================================================

async fn create_temp_storage() -> (Arc<SeaOrmStorage>, TempDir) {
    let temp_dir = TempDir::new().expect("创建临时目录失败");
    let db_path = temp_dir.path().join("storage_test.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    let storage = SeaOrmStorage::new(&db_url, "sqlite", &DatabaseConfig::default())
        .await
        .expect("创建存储失败");

    (Arc::new(storage), temp_dir)
}

fn create_test_link(sharing_id: &str, owner: &str) -> SharingLink {
    SharingLink {
        sharing_id: sharing_id.to_string(),
        user_id: owner.to_string(),
        content_type: "baby_result".to_string(),
        content_id: "content_1".to_string(),
        metadata: Some(json!({"style": "watercolor"})),
        clicks: 0,
        conversions: 0,
        created_at: Utc::now(),
        last_click_at: None,
        last_conversion_at: None,
    }
}

// =============================================================================
// 连接测试
// =============================================================================

#[cfg(test)]
mod connection_tests {
    use super::*;

    #[test]
    fn test_infer_sqlite_from_path() {
        assert_eq!(infer_backend_from_url("data/share.db").unwrap(), "sqlite");
        assert_eq!(infer_backend_from_url(":memory:").unwrap(), "sqlite");
    }

    #[tokio::test]
    async fn test_run_migrations_on_fresh_db() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("migration_test.db");
        let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

        let conn = connect_sqlite(&db_url).await.unwrap();
        let result = run_migrations(&conn).await;
        assert!(result.is_ok(), "Migrations should run: {:?}", result);
    }

    #[tokio::test]
    async fn test_storage_new_empty_url_fails() {
        let result = SeaOrmStorage::new("", "sqlite", &DatabaseConfig::default()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_backend_config_reports_sqlite() {
        let (storage, _temp) = create_temp_storage().await;
        assert_eq!(storage.get_backend_config().storage_type, "sqlite");
    }
}

// =============================================================================
// 用户资料
// =============================================================================

#[cfg(test)]
mod user_tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_user_is_none() {
        let (storage, _temp) = create_temp_storage().await;
        assert!(storage.get_user("ghost").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_upsert_and_get_user() {
        let (storage, _temp) = create_temp_storage().await;

        let profile = UserProfile::new("u1").with_display_name("Alice");
        storage.upsert_user(&profile).await.unwrap();

        let loaded = storage.get_user("u1").await.unwrap().unwrap();
        assert_eq!(loaded.display_name.as_deref(), Some("Alice"));
        assert_eq!(loaded.referral_rewards, 0);
        assert_eq!(loaded.total_referrals, 0);

        let updated = UserProfile::new("u1").with_first_name("Al");
        storage.upsert_user(&updated).await.unwrap();
        let loaded = storage.get_user("u1").await.unwrap().unwrap();
        assert_eq!(loaded.display_name, None);
        assert_eq!(loaded.first_name.as_deref(), Some("Al"));
        assert_eq!(storage.count_users().await.unwrap(), 1);
    }
}

// =============================================================================
// 分享链接
// =============================================================================

#[cfg(test)]
mod link_tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_get_link() {
        let (storage, _temp) = create_temp_storage().await;

        let link = create_test_link("u1_baby_result_1", "u1");
        storage.create_sharing_link(&link).await.unwrap();

        let loaded = storage
            .get_sharing_link("u1_baby_result_1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded.user_id, "u1");
        assert_eq!(loaded.metadata, Some(json!({"style": "watercolor"})));
        assert_eq!(loaded.clicks, 0);
        assert_eq!(loaded.conversions, 0);
        assert_eq!(storage.count_sharing_links().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_create_link_overwrites_on_collision() {
        let (storage, _temp) = create_temp_storage().await;

        storage
            .create_sharing_link(&create_test_link("dup", "u1"))
            .await
            .unwrap();
        storage.record_click("dup", Utc::now()).await.unwrap();

        let mut second = create_test_link("dup", "u2");
        second.content_type = "quiz_result".to_string();
        second.metadata = None;
        storage.create_sharing_link(&second).await.unwrap();

        let loaded = storage.get_sharing_link("dup").await.unwrap().unwrap();
        assert_eq!(loaded.user_id, "u2");
        assert_eq!(loaded.content_type, "quiz_result");
        assert_eq!(loaded.metadata, None);
        assert_eq!(loaded.clicks, 0);
        assert_eq!(loaded.last_click_at, None);
        assert_eq!(storage.count_sharing_links().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_record_click_increments() {
        let (storage, _temp) = create_temp_storage().await;
        storage
            .create_sharing_link(&create_test_link("s1", "u1"))
            .await
            .unwrap();

        let at = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        storage.record_click("s1", at).await.unwrap();
        let link = storage.record_click("s1", at).await.unwrap().unwrap();

        assert_eq!(link.clicks, 2);
        assert_eq!(link.last_click_at, Some(at));
        assert_eq!(link.conversions, 0);
    }

    #[tokio::test]
    async fn test_record_click_missing_link() {
        let (storage, _temp) = create_temp_storage().await;
        let result = storage.record_click("nope", Utc::now()).await.unwrap();
        assert!(result.is_none());
        assert_eq!(storage.count_sharing_links().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_record_conversion_rewards_owner() {
        let (storage, _temp) = create_temp_storage().await;
        storage
            .upsert_user(&UserProfile::new("owner"))
            .await
            .unwrap();
        storage
            .create_sharing_link(&create_test_link("s1", "owner"))
            .await
            .unwrap();

        let credit = storage
            .record_conversion("s1", Utc::now(), 10)
            .await
            .unwrap();
        assert_eq!(credit.rewarded_user.as_deref(), Some("owner"));
        let link = credit.link.unwrap();
        assert_eq!(link.conversions, 1);
        assert!(link.last_conversion_at.is_some());

        let owner = storage.get_user("owner").await.unwrap().unwrap();
        assert_eq!(owner.referral_rewards, 10);
        assert_eq!(owner.total_referrals, 1);
    }

    #[tokio::test]
    async fn test_record_conversion_without_owner_profile() {
        let (storage, _temp) = create_temp_storage().await;
        storage
            .create_sharing_link(&create_test_link("s1", "ghost"))
            .await
            .unwrap();

        let credit = storage
            .record_conversion("s1", Utc::now(), 10)
            .await
            .unwrap();
        assert!(credit.rewarded_user.is_none());
        assert_eq!(credit.link.unwrap().conversions, 1);
        assert!(storage.get_user("ghost").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_record_conversion_missing_link() {
        let (storage, _temp) = create_temp_storage().await;
        let credit = storage
            .record_conversion("missing", Utc::now(), 10)
            .await
            .unwrap();
        assert!(credit.link.is_none());
        assert!(credit.rewarded_user.is_none());
    }

    #[tokio::test]
    async fn test_concurrent_conversions_all_counted() {
        let (storage, _temp) = create_temp_storage().await;
        storage
            .upsert_user(&UserProfile::new("owner"))
            .await
            .unwrap();
        storage
            .create_sharing_link(&create_test_link("hot", "owner"))
            .await
            .unwrap();

        let tasks: Vec<_> = (0..5)
            .map(|_| {
                let storage = storage.clone();
                tokio::spawn(async move { storage.record_conversion("hot", Utc::now(), 10).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let link = storage.get_sharing_link("hot").await.unwrap().unwrap();
        assert_eq!(link.conversions, 5);
        let owner = storage.get_user("owner").await.unwrap().unwrap();
        assert_eq!(owner.referral_rewards, 50);
        assert_eq!(owner.total_referrals, 5);
    }
}

// =============================================================================
// 分享事件
// =============================================================================

#[cfg(test)]
mod event_tests {
    use super::*;

    #[tokio::test]
    async fn test_append_and_query_window() {
        let (storage, _temp) = create_temp_storage().await;
        let base = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();

        for day in 0..5 {
            let event = NewSharingEvent::new("s1", "click").at(base + Duration::days(day));
            storage.append_sharing_event(&event).await.unwrap();
        }

        // 闭区间
        let events = storage
            .events_between(base + Duration::days(1), base + Duration::days(3))
            .await
            .unwrap();
        assert_eq!(events.len(), 3);
        assert!(events.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
        assert_eq!(storage.count_sharing_events().await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_event_keeps_enrichment_fields() {
        let (storage, _temp) = create_temp_storage().await;
        let link = create_test_link("s1", "owner");

        let mut event = NewSharingEvent::new("s1", "install").with_link(&link);
        event.clicker_id = Some("friend".to_string());
        event.platform = Some("whatsapp".to_string());
        let id = storage.append_sharing_event(&event).await.unwrap();
        assert!(id > 0);

        let events = storage
            .events_between(event.timestamp, event.timestamp)
            .await
            .unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].sharer_id.as_deref(), Some("owner"));
        assert_eq!(events[0].content_type.as_deref(), Some("baby_result"));
        assert_eq!(events[0].platform.as_deref(), Some("whatsapp"));
        assert_eq!(events[0].clicker_id.as_deref(), Some("friend"));
    }

    #[test]
    fn test_client_supplied_event_columns_are_unbounded() {
        use migration::entities::sharing_event::Column;
        use sea_orm::{ColumnTrait, ColumnType};

        for column in [
            Column::Action,
            Column::Platform,
            Column::ClickerId,
            Column::ContentType,
            Column::SharerId,
        ] {
            assert_eq!(column.def().get_column_type(), &ColumnType::Text);
        }
    }

    #[tokio::test]
    async fn test_long_action_and_platform_are_kept() {
        let (storage, _temp) = create_temp_storage().await;
        let action = "custom_share_action_".repeat(10);
        let platform = "a_very_long_platform_name_".repeat(5);

        let mut event = NewSharingEvent::new("s1", action.as_str());
        event.platform = Some(platform.clone());
        storage.append_sharing_event(&event).await.unwrap();

        let events = storage
            .events_between(event.timestamp, event.timestamp)
            .await
            .unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].action, action);
        assert_eq!(events[0].platform.as_deref(), Some(platform.as_str()));
    }

    #[tokio::test]
    async fn test_delete_before_is_strict() {
        let (storage, _temp) = create_temp_storage().await;
        let cutoff = Utc.with_ymd_and_hms(2026, 3, 1, 2, 0, 0).unwrap();

        for ts in [
            cutoff - Duration::days(2),
            cutoff - Duration::seconds(1),
            cutoff,
            cutoff + Duration::hours(1),
        ] {
            storage
                .append_sharing_event(&NewSharingEvent::new("s1", "click").at(ts))
                .await
                .unwrap();
        }

        let outcome = storage.delete_events_before(cutoff, 100).await.unwrap();
        assert_eq!(outcome, EventPurge::Deleted(2));
        assert_eq!(storage.count_sharing_events().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_delete_over_limit_deletes_nothing() {
        let (storage, _temp) = create_temp_storage().await;
        let cutoff = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();

        for i in 0..4 {
            storage
                .append_sharing_event(
                    &NewSharingEvent::new("s1", "click").at(cutoff - Duration::days(i + 1)),
                )
                .await
                .unwrap();
        }

        let outcome = storage.delete_events_before(cutoff, 3).await.unwrap();
        assert_eq!(outcome, EventPurge::OverLimit(4));
        assert_eq!(storage.count_sharing_events().await.unwrap(), 4);

        let outcome = storage.delete_events_before(cutoff, 4).await.unwrap();
        assert_eq!(outcome, EventPurge::Deleted(4));
        assert_eq!(storage.count_sharing_events().await.unwrap(), 0);
    }
}

// =============================================================================
// 文案记录和周报
// =============================================================================

#[cfg(test)]
mod record_tests {
    use super::*;

    #[tokio::test]
    async fn test_caption_generations_append_only() {
        let (storage, _temp) = create_temp_storage().await;

        for i in 0..3 {
            storage
                .append_caption_generation(&CaptionGeneration {
                    user_id: "u1".to_string(),
                    caption_type: "quiz_result".to_string(),
                    caption: format!("caption {}", i),
                    metadata: Some(json!({"score": i})),
                    timestamp: Utc::now(),
                })
                .await
                .unwrap();
        }

        assert_eq!(storage.count_caption_generations().await.unwrap(), 3);
        let recent = storage.recent_caption_generations(2).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].caption, "caption 2");
        assert_eq!(recent[0].metadata, Some(json!({"score": 2})));
    }

    #[tokio::test]
    async fn test_weekly_report_roundtrip() {
        let (storage, _temp) = create_temp_storage().await;

        let mut stats = SharingStats {
            total_shares: 3,
            ..SharingStats::default()
        };
        stats.platforms.insert("instagram".to_string(), 2);
        stats.platforms.insert("unknown".to_string(), 1);
        stats.content_types.insert("baby_result".to_string(), 3);
        stats.top_sharers.insert("u1".to_string(), 3);

        let now = Utc.with_ymd_and_hms(2026, 3, 9, 9, 0, 0).unwrap();
        let report = WeeklyReport {
            id: None,
            week_of: now - Duration::days(7),
            stats: stats.clone(),
            generated_at: now,
        };

        let id = storage.insert_weekly_report(&report).await.unwrap();
        let latest = storage.latest_reports(5).await.unwrap();

        assert_eq!(latest.len(), 1);
        assert_eq!(latest[0].id, Some(id));
        assert_eq!(latest[0].stats, stats);
        assert_eq!(latest[0].week_of, report.week_of);
    }
}
