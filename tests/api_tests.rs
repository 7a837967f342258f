//! Callable 端点和健康检查的 HTTP 集成测试

use std::sync::Arc;

use actix_web::{App, http::StatusCode, test};
use chrono::Utc;
use serde_json::{Value, json};
use tempfile::TempDir;

use sharelinker::api::middleware::RequestContext;
use sharelinker::api::services::AppStartTime;
use sharelinker::config::{DatabaseConfig, StaticConfig};
use sharelinker::runtime::lifetime::startup::StartupContext;
use sharelinker::runtime::modes::configure_app;
use sharelinker::storage::{SeaOrmStorage, UserProfile};

const TEST_SECRET: &str = "api_test_secret_with_enough_length_0123456789";

async fn create_context() -> (StartupContext, TempDir) {
    let temp_dir = TempDir::new().expect("创建临时目录失败");
    let db_path = temp_dir.path().join("api_test.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    let storage = SeaOrmStorage::new(&db_url, "sqlite", &DatabaseConfig::default())
        .await
        .expect("创建存储失败");

    let mut config = StaticConfig::default();
    config.auth.jwt_secret = TEST_SECRET.to_string();

    (
        StartupContext::from_storage(Arc::new(storage), &config),
        temp_dir,
    )
}

macro_rules! init_app {
    ($ctx:expr) => {
        test::init_service(
            App::new()
                .wrap(RequestContext::new($ctx.verifier.clone()))
                .configure(|cfg| {
                    configure_app(
                        cfg,
                        &$ctx,
                        AppStartTime {
                            start_datetime: Utc::now(),
                        },
                    )
                }),
        )
        .await
    };
}

fn bearer(ctx: &StartupContext, uid: &str) -> (&'static str, String) {
    let token = ctx.verifier.issue_token(uid).expect("签发 token 失败");
    ("Authorization", format!("Bearer {}", token))
}

#[cfg(test)]
mod caption_endpoint_tests {
    use super::*;

    #[actix_web::test]
    async fn test_caption_without_token_is_unauthenticated() {
        let (ctx, _temp) = create_context().await;
        let app = init_app!(ctx);

        let req = test::TestRequest::post()
            .uri("/v1/generateSharingCaption")
            .set_json(json!({"data": {"type": "baby_result", "userId": "u1"}}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["status"], "UNAUTHENTICATED");
        assert_eq!(body["error"]["message"], "User must be authenticated");
        assert_eq!(ctx.storage.count_caption_generations().await.unwrap(), 0);
    }

    #[actix_web::test]
    async fn test_caption_with_invalid_token_is_unauthenticated() {
        let (ctx, _temp) = create_context().await;
        let app = init_app!(ctx);

        let req = test::TestRequest::post()
            .uri("/v1/generateSharingCaption")
            .insert_header(("Authorization", "Bearer not-a-token"))
            .set_json(json!({"data": {"type": "baby_result", "userId": "u1"}}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_caption_with_token() {
        let (ctx, _temp) = create_context().await;
        ctx.storage
            .upsert_user(&UserProfile::new("u1").with_display_name("Alice"))
            .await
            .unwrap();
        let app = init_app!(ctx);

        let req = test::TestRequest::post()
            .uri("/v1/generateSharingCaption")
            .insert_header(bearer(&ctx, "u1"))
            .set_json(json!({"data": {"type": "instagram_post", "userId": "u1"}}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers().contains_key("x-request-id"));
        let body: Value = test::read_body_json(resp).await;
        let caption = body["result"]["caption"].as_str().unwrap();
        assert!(caption.starts_with("Our future little one!"));
        assert!(caption.contains("#FutureBaby"));
        assert_eq!(ctx.storage.count_caption_generations().await.unwrap(), 1);
    }

    #[actix_web::test]
    async fn test_partial_body_without_token_is_unauthenticated() {
        let (ctx, _temp) = create_context().await;
        let app = init_app!(ctx);

        for payload in [json!({"data": {"type": "baby_result"}}), json!({})] {
            let req = test::TestRequest::post()
                .uri("/v1/generateSharingCaption")
                .set_json(payload)
                .to_request();
            let resp = test::call_service(&app, req).await;

            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["error"]["status"], "UNAUTHENTICATED");
            assert_eq!(body["error"]["message"], "User must be authenticated");
        }
        assert_eq!(ctx.storage.count_caption_generations().await.unwrap(), 0);
    }

    #[actix_web::test]
    async fn test_missing_user_id_with_token_is_internal() {
        let (ctx, _temp) = create_context().await;
        let app = init_app!(ctx);

        let req = test::TestRequest::post()
            .uri("/v1/generateSharingCaption")
            .insert_header(bearer(&ctx, "u1"))
            .set_json(json!({"data": {"type": "baby_result"}}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["status"], "INTERNAL");
        assert_eq!(body["error"]["message"], "Failed to generate caption");
        assert_eq!(ctx.storage.count_caption_generations().await.unwrap(), 0);
    }

    #[actix_web::test]
    async fn test_malformed_body_is_invalid_argument() {
        let (ctx, _temp) = create_context().await;
        let app = init_app!(ctx);

        let req = test::TestRequest::post()
            .uri("/v1/generateSharingCaption")
            .insert_header(bearer(&ctx, "u1"))
            .set_json(json!({"type": "baby_result"}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["status"], "INVALID_ARGUMENT");
    }
}

#[cfg(test)]
mod link_endpoint_tests {
    use super::*;

    #[actix_web::test]
    async fn test_link_without_token_is_unauthenticated() {
        let (ctx, _temp) = create_context().await;
        let app = init_app!(ctx);

        let req = test::TestRequest::post()
            .uri("/v1/generateSharingLink")
            .set_json(json!({"data": {
                "userId": "u1",
                "contentType": "baby_result",
                "contentId": "c1"
            }}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ctx.storage.count_sharing_links().await.unwrap(), 0);
    }

    #[actix_web::test]
    async fn test_link_missing_fields_without_token_is_unauthenticated() {
        let (ctx, _temp) = create_context().await;
        let app = init_app!(ctx);

        let req = test::TestRequest::post()
            .uri("/v1/generateSharingLink")
            .set_json(json!({"data": {"contentType": "baby_result"}}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["status"], "UNAUTHENTICATED");
    }

    #[actix_web::test]
    async fn test_link_missing_user_id_with_token_is_internal() {
        let (ctx, _temp) = create_context().await;
        let app = init_app!(ctx);

        let req = test::TestRequest::post()
            .uri("/v1/generateSharingLink")
            .insert_header(bearer(&ctx, "u1"))
            .set_json(json!({"data": {"contentType": "baby_result", "contentId": "c1"}}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["message"], "Failed to generate sharing link");
        assert_eq!(ctx.storage.count_sharing_links().await.unwrap(), 0);
    }

    #[actix_web::test]
    async fn test_link_then_track_flow() {
        let (ctx, _temp) = create_context().await;
        ctx.storage
            .upsert_user(&UserProfile::new("u1"))
            .await
            .unwrap();
        let app = init_app!(ctx);

        let req = test::TestRequest::post()
            .uri("/v1/generateSharingLink")
            .insert_header(bearer(&ctx, "u1"))
            .set_json(json!({"data": {
                "userId": "u1",
                "contentType": "baby_result",
                "contentId": "c1",
                "metadata": {"style": "cartoon"}
            }}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        let sharing_id = body["result"]["sharingId"].as_str().unwrap().to_string();
        let link = body["result"]["link"].as_str().unwrap();
        assert!(sharing_id.starts_with("u1_baby_result_"));
        assert_eq!(
            link,
            format!("https://futurebaby.app?share={}&ref=u1", sharing_id)
        );

        // 追踪端点不需要身份
        let req = test::TestRequest::post()
            .uri("/v1/trackSharingClick")
            .set_json(json!({"data": {
                "sharingId": sharing_id,
                "clickerId": "friend",
                "action": "install",
                "platform": "whatsapp"
            }}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["result"]["success"], true);

        let owner = ctx.storage.get_user("u1").await.unwrap().unwrap();
        assert_eq!(owner.referral_rewards, 10);
        assert_eq!(owner.total_referrals, 1);
    }
}

#[cfg(test)]
mod track_endpoint_tests {
    use super::*;

    #[actix_web::test]
    async fn test_track_unknown_link_succeeds() {
        let (ctx, _temp) = create_context().await;
        let app = init_app!(ctx);

        let req = test::TestRequest::post()
            .uri("/v1/trackSharingClick")
            .set_json(json!({"data": {"sharingId": "missing", "action": "click"}}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(ctx.storage.count_sharing_events().await.unwrap(), 1);
    }

    #[actix_web::test]
    async fn test_track_empty_sharing_id_is_internal() {
        let (ctx, _temp) = create_context().await;
        let app = init_app!(ctx);

        let req = test::TestRequest::post()
            .uri("/v1/trackSharingClick")
            .set_json(json!({"data": {"sharingId": "", "action": "click"}}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["status"], "INTERNAL");
        assert_eq!(body["error"]["message"], "Failed to track sharing click");
        assert_eq!(ctx.storage.count_sharing_events().await.unwrap(), 0);
    }

    #[actix_web::test]
    async fn test_get_is_not_routed() {
        let (ctx, _temp) = create_context().await;
        let app = init_app!(ctx);

        let req = test::TestRequest::get()
            .uri("/v1/trackSharingClick")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert!(resp.status().is_client_error());
    }
}

#[cfg(test)]
mod health_endpoint_tests {
    use super::*;

    #[actix_web::test]
    async fn test_health_reports_counts() {
        let (ctx, _temp) = create_context().await;
        let app = init_app!(ctx);

        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["storage"]["storage_type"], "sqlite");
        assert_eq!(body["storage"]["links_count"], 0);
        assert_eq!(body["storage"]["events_count"], 0);
    }

    #[actix_web::test]
    async fn test_liveness() {
        let (ctx, _temp) = create_context().await;
        let app = init_app!(ctx);

        let req = test::TestRequest::get().uri("/health/live").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    }
}
