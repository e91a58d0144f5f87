//! 身份服务与本地会话存储接口

use async_trait::async_trait;
use domain::{AuthEvent, AuthSession};
use tokio::sync::broadcast;

use crate::error::{IdentityError, StorageError};

/// 邮箱 + 密码凭据
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// 外部身份服务
///
/// 会话变化通过 [`IdentityProvider::subscribe`] 广播。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// 需要邮箱确认时不返回会话
    async fn sign_up(&self, credentials: &Credentials)
        -> Result<Option<AuthSession>, IdentityError>;
    async fn sign_in(&self, credentials: &Credentials) -> Result<AuthSession, IdentityError>;
    async fn sign_out(&self) -> Result<(), IdentityError>;
    /// 当前会话，过期时先尝试刷新
    async fn get_session(&self) -> Result<Option<AuthSession>, IdentityError>;
    async fn refresh_session(&self) -> Result<AuthSession, IdentityError>;
    fn subscribe(&self) -> broadcast::Receiver<AuthEvent>;
}

/// 按键存取序列化后的会话
pub trait SessionStorage: Send + Sync {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn save(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}
