//! 认证会话模型
//!
//! 会话由外部身份服务签发，客户端只负责保存、刷新和广播状态变化。

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::value_objects::AccountId;

/// 会话在本地存储中的键名
pub const SESSION_STORAGE_KEY: &str = "odie-supabase-auth-token";

/// 已登录账户
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: AccountId,
    #[serde(default)]
    pub email: Option<String>,
}

/// 身份服务签发的会话
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: String,
    /// Unix 秒
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub user: AuthUser,
}

impl AuthSession {
    /// 没有过期时间的会话视为未过期
    pub fn is_expired(&self) -> bool {
        self.expires_at
            .is_some_and(|expires_at| expires_at <= Utc::now().timestamp())
    }

    pub fn account_id(&self) -> AccountId {
        self.user.id
    }
}

/// 会话状态变化事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn(AuthSession),
    SignedOut,
    TokenRefreshed(AuthSession),
}

impl AuthEvent {
    /// 事件之后的当前会话
    pub fn session(&self) -> Option<&AuthSession> {
        match self {
            Self::SignedIn(session) | Self::TokenRefreshed(session) => Some(session),
            Self::SignedOut => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::SignedIn(_) => "SIGNED_IN",
            Self::SignedOut => "SIGNED_OUT",
            Self::TokenRefreshed(_) => "TOKEN_REFRESHED",
        }
    }
}

/// 读取会话失败时，错误信息指向无效的刷新令牌则需要清除本地会话。
pub fn requires_local_sign_out(message: &str) -> bool {
    message.contains("refresh_token") || message.contains("Invalid")
}
