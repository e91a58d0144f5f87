//! 后端资源访问接口
//!
//! 每个方法对应后端的一个接口，成功时原样返回响应体。
//! HTTP 客户端和内存数据源都实现这些接口，在组装时选择。

use async_trait::async_trait;
use domain::{
    AccountId, AuditLogQuery, DepartmentId, DepartmentUpdate, DomainId, DomainPayload,
    NewDepartment, NewUser, UserKey, UserStatus, UserUpdate, Username,
};
use serde_json::Value;

use crate::error::TransportError;

pub type GatewayResult = Result<Value, TransportError>;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DomainGateway: Send + Sync {
    async fn list_domains(&self, account: AccountId) -> GatewayResult;
    async fn add_domain(&self, payload: &DomainPayload) -> GatewayResult;
    async fn update_domain(
        &self,
        id: DomainId,
        payload: &DomainPayload,
        account: AccountId,
    ) -> GatewayResult;
    async fn delete_domain(&self, id: DomainId, account: AccountId) -> GatewayResult;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DepartmentGateway: Send + Sync {
    /// 不区分域和账户的全局列表
    async fn list_departments(&self) -> GatewayResult;
    async fn list_departments_by_domain(
        &self,
        domain_id: DomainId,
        account: AccountId,
    ) -> GatewayResult;
    async fn add_department(&self, department: &NewDepartment) -> GatewayResult;
    async fn update_department(
        &self,
        domain_id: DomainId,
        department_id: DepartmentId,
        update: &DepartmentUpdate,
        account: AccountId,
    ) -> GatewayResult;
    async fn delete_department(
        &self,
        domain_id: DomainId,
        department_id: DepartmentId,
        account: AccountId,
    ) -> GatewayResult;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserGateway: Send + Sync {
    async fn list_users_by_domain(
        &self,
        domain_id: DomainId,
        status: Option<UserStatus>,
    ) -> GatewayResult;
    async fn add_user(&self, user: &NewUser) -> GatewayResult;
    async fn update_user(
        &self,
        domain_id: DomainId,
        username: &Username,
        update: &UserUpdate,
        account: AccountId,
    ) -> GatewayResult;
    async fn delete_user(&self, key: &UserKey) -> GatewayResult;
    async fn enable_user(&self, key: &UserKey) -> GatewayResult;
    async fn disable_user(&self, key: &UserKey) -> GatewayResult;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuditLogGateway: Send + Sync {
    async fn list_logs(&self, account: AccountId, query: &AuditLogQuery) -> GatewayResult;
}
