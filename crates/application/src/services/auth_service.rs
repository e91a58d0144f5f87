use std::sync::Arc;

use domain::AuthSession;

use crate::{
    error::IdentityError,
    session::{Credentials, IdentityProvider},
};

/// 身份服务操作的薄封装
pub struct AuthService {
    provider: Arc<dyn IdentityProvider>,
}

impl AuthService {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self { provider }
    }

    pub async fn sign_up(
        &self,
        credentials: &Credentials,
    ) -> Result<Option<AuthSession>, IdentityError> {
        let session = self.provider.sign_up(credentials).await?;
        if session.is_none() {
            tracing::info!(email = %credentials.email, "注册成功，等待邮箱确认");
        }
        Ok(session)
    }

    pub async fn sign_in(&self, credentials: &Credentials) -> Result<AuthSession, IdentityError> {
        let session = self.provider.sign_in(credentials).await?;
        tracing::info!(account = %session.user.id, "登录成功");
        Ok(session)
    }

    pub async fn sign_out(&self) -> Result<(), IdentityError> {
        self.provider.sign_out().await
    }

    pub async fn get_session(&self) -> Result<Option<AuthSession>, IdentityError> {
        self.provider.get_session().await
    }

    /// 刷新失败时先登出，再返回原错误
    pub async fn refresh_session(&self) -> Result<AuthSession, IdentityError> {
        match self.provider.refresh_session().await {
            Ok(session) => Ok(session),
            Err(err) => {
                tracing::warn!(error = %err, "刷新会话失败，执行登出");
                if let Err(sign_out_err) = self.provider.sign_out().await {
                    tracing::warn!(error = %sign_out_err, "登出失败");
                }
                Err(err)
            }
        }
    }
}
