use std::sync::Arc;

use domain::{
    AccountId, DirectoryUser, DomainId, UserDraft, UserKey, UserStatus, UserUpdate, Username,
};
use serde_json::Value;

use crate::{
    aggregate::{roll_up, DomainRollup},
    error::ApplicationError,
    gateway::{DomainGateway, UserGateway},
    response::{ensure_accepted, extract_list},
};

pub struct UserServiceDependencies {
    pub domain_gateway: Arc<dyn DomainGateway>,
    pub user_gateway: Arc<dyn UserGateway>,
}

/// 目录用户管理。用户由 (域, 用户名) 寻址。
pub struct UserService {
    deps: UserServiceDependencies,
}

impl UserService {
    pub fn new(deps: UserServiceDependencies) -> Self {
        Self { deps }
    }

    pub async fn list(
        &self,
        domain_id: DomainId,
        status: Option<UserStatus>,
    ) -> Result<Vec<DirectoryUser>, ApplicationError> {
        let body = self
            .deps
            .user_gateway
            .list_users_by_domain(domain_id, status)
            .await?;
        let body = ensure_accepted(body)?;
        extract_list(&body, "users")
    }

    pub async fn add(&self, account: AccountId, draft: UserDraft) -> Result<Value, ApplicationError> {
        let user = draft.into_new_user(account)?;

        tracing::info!(domain_id = %user.domain_id, username = %user.username, "添加用户");
        ensure_accepted(self.deps.user_gateway.add_user(&user).await?)
    }

    pub async fn update(
        &self,
        account: AccountId,
        domain_id: DomainId,
        username: &Username,
        update: &UserUpdate,
    ) -> Result<Value, ApplicationError> {
        tracing::info!(domain_id = %domain_id, username = %username, "更新用户");
        let body = self
            .deps
            .user_gateway
            .update_user(domain_id, username, update, account)
            .await?;
        ensure_accepted(body)
    }

    pub async fn delete(
        &self,
        account: AccountId,
        domain_id: DomainId,
        username: Username,
    ) -> Result<Value, ApplicationError> {
        let key = Self::key(account, domain_id, username);
        tracing::info!(domain_id = %domain_id, username = %key.username, "删除用户");
        ensure_accepted(self.deps.user_gateway.delete_user(&key).await?)
    }

    pub async fn enable(
        &self,
        account: AccountId,
        domain_id: DomainId,
        username: Username,
    ) -> Result<Value, ApplicationError> {
        let key = Self::key(account, domain_id, username);
        tracing::info!(domain_id = %domain_id, username = %key.username, "启用用户");
        ensure_accepted(self.deps.user_gateway.enable_user(&key).await?)
    }

    pub async fn disable(
        &self,
        account: AccountId,
        domain_id: DomainId,
        username: Username,
    ) -> Result<Value, ApplicationError> {
        let key = Self::key(account, domain_id, username);
        tracing::info!(domain_id = %domain_id, username = %key.username, "停用用户");
        ensure_accepted(self.deps.user_gateway.disable_user(&key).await?)
    }

    /// 账户下所有域的用户
    pub async fn overview(
        &self,
        account: AccountId,
    ) -> Result<Vec<DomainRollup<DirectoryUser>>, ApplicationError> {
        let domains = ensure_accepted(self.deps.domain_gateway.list_domains(account).await?)?;
        let domains = extract_list(&domains, "domains")?;

        Ok(roll_up(domains, "users", |domain_id| self.list(domain_id, None)).await)
    }

    fn key(account: AccountId, domain_id: DomainId, username: Username) -> UserKey {
        UserKey {
            username,
            domain_id,
            user_id: account,
        }
    }
}
