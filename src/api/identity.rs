//! 调用方身份
//!
//! 客户端在 `Authorization: Bearer <jwt>` 中携带 HS256 token，`sub` 即用户 uid。
//! 缺失或无效的 token 不会直接拒绝请求，由各个 handler 决定是否需要身份。

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::AuthConfig;

/// 缺少身份时返回给调用方的消息
pub const UNAUTHENTICATED_MESSAGE: &str = "User must be authenticated";

/// 已验证的调用方
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    pub uid: String,
}

impl CallerIdentity {
    pub fn new(uid: impl Into<String>) -> Self {
        Self { uid: uid.into() }
    }
}

/// Token 声明
#[derive(Debug, Serialize, Deserialize)]
pub struct IdentityClaims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

/// HS256 token 校验器
pub struct IdentityVerifier {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_minutes: u64,
}

impl IdentityVerifier {
    pub fn new(secret: &str, token_minutes: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            token_minutes,
        }
    }

    /// 从配置创建；密钥为空时生成随机密钥，外部签发的 token 全部失效
    pub fn from_config(auth: &AuthConfig) -> Self {
        let secret = if auth.jwt_secret.is_empty() {
            warn!("JWT secret not configured or empty, generating random secret");
            format!("{}{}", uuid::Uuid::new_v4(), uuid::Uuid::new_v4())
        } else {
            auth.jwt_secret.clone()
        };

        Self::new(&secret, auth.token_minutes)
    }

    /// 为指定 uid 签发 token（测试和本地调试使用）
    pub fn issue_token(&self, uid: &str) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = IdentityClaims {
            sub: uid.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::minutes(self.token_minutes as i64)).timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
    }

    /// 校验 token，返回调用方身份
    pub fn verify(&self, token: &str) -> Option<CallerIdentity> {
        match decode::<IdentityClaims>(token, &self.decoding_key, &Validation::default()) {
            Ok(data) if !data.claims.sub.is_empty() => Some(CallerIdentity::new(data.claims.sub)),
            Ok(_) => {
                debug!("Token rejected: empty subject");
                None
            }
            Err(e) => {
                debug!("Token rejected: {}", e);
                None
            }
        }
    }

    /// 解析 Authorization 头（`Bearer <token>`）
    pub fn verify_header(&self, header: Option<&str>) -> Option<CallerIdentity> {
        let token = header?.strip_prefix("Bearer ")?.trim();
        if token.is_empty() {
            return None;
        }
        self.verify(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verifier() -> IdentityVerifier {
        IdentityVerifier::new("test_secret_key_for_identity_tests", 15)
    }

    #[test]
    fn test_issue_and_verify() {
        let v = verifier();
        let token = v.issue_token("user_42").unwrap();
        assert_eq!(v.verify(&token), Some(CallerIdentity::new("user_42")));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = verifier().issue_token("user_42").unwrap();
        let other = IdentityVerifier::new("another_secret", 15);
        assert_eq!(other.verify(&token), None);
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert_eq!(verifier().verify("not.a.jwt"), None);
    }

    #[test]
    fn test_verify_header() {
        let v = verifier();
        let token = v.issue_token("u1").unwrap();

        assert_eq!(
            v.verify_header(Some(&format!("Bearer {}", token))),
            Some(CallerIdentity::new("u1"))
        );
        assert_eq!(v.verify_header(Some(&token)), None);
        assert_eq!(v.verify_header(Some("Bearer ")), None);
        assert_eq!(v.verify_header(None), None);
    }

    #[test]
    fn test_empty_secret_generates_random() {
        let auth = AuthConfig::default();
        let a = IdentityVerifier::from_config(&auth);
        let b = IdentityVerifier::from_config(&auth);
        let token = a.issue_token("u1").unwrap();
        assert!(a.verify(&token).is_some());
        assert!(b.verify(&token).is_none());
    }
}
