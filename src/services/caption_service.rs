//! 分享文案生成服务
//!
//! 为移动端生成分享文案，每次生成都写入一条 `caption_generations` 记录。

use std::str::FromStr;
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{AsRefStr, EnumString};
use tracing::{debug, error};

use super::picker::{TemplatePicker, choose};
use crate::api::identity::{CallerIdentity, UNAUTHENTICATED_MESSAGE};
use crate::errors::{Result, SharelinkerError};
use crate::storage::{CaptionGeneration, SeaOrmStorage, UserProfile};

pub const CAPTION_FAILED_MESSAGE: &str = "Failed to generate caption";
pub const DEFAULT_CAPTION: &str = "Check out this amazing app! ✨";

const BABY_RESULT_TEMPLATES: [&str; 5] = [
    "Look at our adorable future baby! 👶✨ Can't wait to meet this little angel!",
    "Our future bundle of joy looks amazing! 🌟 This is what love creates! 💕",
    "Future family goals right here! 👨‍👩‍👧‍👦 So excited for this journey!",
    "This is what our baby might look like! 😍 Already so much love for this little one!",
    "Our hearts are melting! 💕 This future baby is going to be so loved! 👶",
];

const APP_INVITATION_TEMPLATES: [&str; 4] = [
    "Found this amazing app that shows what your future baby might look like! 👶 You have to try it!",
    "This baby face generator is incredible - so much fun with your partner! ✨ Check it out!",
    "Just discovered the cutest app for couples planning their future! 💕 You'll love it!",
    "This app predicted our future baby and it's adorable! 🌟 Perfect for couples!",
];

pub const INSTAGRAM_CAPTION: &str = "Our future little one! 👶✨ Can't wait to meet this angel 💕\n\n#FutureBaby #BabyFace #CoupleGoals #Love #Family #BabyPrediction #AI #Technology #Cute #Adorable";

pub const WHATSAPP_CAPTION: &str = "👶 Look what our future baby might look like! Isn't this amazing? 💕\n\nThis app is so cool - it uses AI to predict how your baby will look! You should try it with your partner! 🌟";

// ============ 请求 / 响应 ============

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionRequest {
    /// 文案类型（`baby_result`、`quiz_result` 等），未知类型使用自定义消息
    #[serde(rename = "type", default)]
    pub caption_type: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub custom_message: Option<String>,
    #[serde(default)]
    pub metadata: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptionResponse {
    pub caption: String,
}

/// 已知的文案类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum CaptionKind {
    BabyResult,
    QuizResult,
    AppInvitation,
    InstagramPost,
    WhatsappMessage,
}

impl CaptionKind {
    pub fn parse(raw: &str) -> Option<Self> {
        Self::from_str(raw).ok()
    }
}

/// 测验文案的分数档位
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizTier {
    Master,
    Good,
    Practice,
}

impl QuizTier {
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 90.0 {
            QuizTier::Master
        } else if percentage >= 70.0 {
            QuizTier::Good
        } else {
            QuizTier::Practice
        }
    }
}

// ============ 文案组装 ============

/// 组装文案，不访问存储
pub fn compose_caption(
    caption_type: &str,
    profile: Option<&UserProfile>,
    custom_message: Option<&str>,
    metadata: Option<&Value>,
    picker: &dyn TemplatePicker,
) -> String {
    match CaptionKind::parse(caption_type) {
        Some(CaptionKind::BabyResult) => baby_result_caption(profile, picker),
        Some(CaptionKind::QuizResult) => quiz_result_caption(metadata),
        Some(CaptionKind::AppInvitation) => choose(picker, &APP_INVITATION_TEMPLATES).to_string(),
        Some(CaptionKind::InstagramPost) => INSTAGRAM_CAPTION.to_string(),
        Some(CaptionKind::WhatsappMessage) => WHATSAPP_CAPTION.to_string(),
        None => custom_message
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_CAPTION)
            .to_string(),
    }
}

fn baby_result_caption(profile: Option<&UserProfile>, picker: &dyn TemplatePicker) -> String {
    match profile.and_then(UserProfile::preferred_name) {
        Some(name) => format!(
            "{} and partner's future baby is absolutely adorable! 👶✨ Can't wait to meet this little miracle! 💕",
            name
        ),
        None => choose(picker, &BABY_RESULT_TEMPLATES).to_string(),
    }
}

fn quiz_result_caption(metadata: Option<&Value>) -> String {
    let field = |key: &str| metadata.and_then(|m| m.get(key));

    let title = field("quizTitle").map(render_text).unwrap_or_default();
    let score = field("score")
        .map(render_number)
        .unwrap_or_else(|| "0".to_string());
    let total = field("totalQuestions")
        .map(render_number)
        .unwrap_or_else(|| "0".to_string());
    let percentage = field("percentage").and_then(as_percentage).unwrap_or(0.0);

    match QuizTier::from_percentage(percentage) {
        QuizTier::Master => format!(
            "Nailed it! 🎯 Got {}/{} on \"{}\" quiz! I'm a quiz master! 🏆",
            score, total, title
        ),
        QuizTier::Good => format!(
            "Pretty good! 😊 Scored {}/{} on \"{}\" quiz! Getting better every time! 📈",
            score, total, title
        ),
        QuizTier::Practice => format!(
            "Had so much fun with the \"{}\" quiz! 🎮 Got {}/{} - time to practice more! 💪",
            title, score, total
        ),
    }
}

fn render_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// 整数值的浮点数（如 8.0）按整数输出
fn render_number(value: &Value) -> String {
    match value {
        Value::Null => "0".to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if !n.is_i64() && !n.is_u64() && f.fract() == 0.0 && f.abs() < 1e15 => {
                format!("{}", f as i64)
            }
            _ => n.to_string(),
        },
        other => render_text(other),
    }
}

fn as_percentage(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

// ============ 服务 ============

pub struct CaptionService {
    storage: Arc<SeaOrmStorage>,
    picker: Arc<dyn TemplatePicker>,
}

impl CaptionService {
    pub fn new(storage: Arc<SeaOrmStorage>, picker: Arc<dyn TemplatePicker>) -> Self {
        Self { storage, picker }
    }

    /// 为已认证的调用方生成文案并记录
    pub async fn generate_caption(
        &self,
        identity: Option<&CallerIdentity>,
        req: CaptionRequest,
    ) -> Result<CaptionResponse> {
        let Some(caller) = identity else {
            return Err(SharelinkerError::unauthenticated(UNAUTHENTICATED_MESSAGE));
        };

        self.generate_and_record(caller, req).await.map_err(|e| {
            error!("Error generating caption: {}", e);
            e.into_caller_error(CAPTION_FAILED_MESSAGE)
        })
    }

    async fn generate_and_record(
        &self,
        caller: &CallerIdentity,
        req: CaptionRequest,
    ) -> Result<CaptionResponse> {
        if req.user_id.is_empty() {
            return Err(SharelinkerError::invalid_argument("userId is required"));
        }

        let profile = self.storage.get_user(&req.user_id).await?;

        let caption = compose_caption(
            &req.caption_type,
            profile.as_ref(),
            req.custom_message.as_deref(),
            req.metadata.as_ref(),
            self.picker.as_ref(),
        );

        self.storage
            .append_caption_generation(&CaptionGeneration {
                user_id: req.user_id,
                caption_type: req.caption_type,
                caption: caption.clone(),
                metadata: req.metadata,
                timestamp: Utc::now(),
            })
            .await?;

        debug!("Caption generated for caller {}", caller.uid);
        Ok(CaptionResponse { caption })
    }
}
