use std::sync::Arc;

use domain::{AccountId, DirectoryDomain, DomainDraft, DomainId};
use serde_json::Value;

use crate::{
    error::ApplicationError,
    gateway::DomainGateway,
    response::{ensure_accepted, extract_list},
};

pub struct DomainService {
    gateway: Arc<dyn DomainGateway>,
}

impl DomainService {
    pub fn new(gateway: Arc<dyn DomainGateway>) -> Self {
        Self { gateway }
    }

    /// 当前账户注册的全部域
    pub async fn list(&self, account: AccountId) -> Result<Vec<DirectoryDomain>, ApplicationError> {
        let body = ensure_accepted(self.gateway.list_domains(account).await?)?;
        extract_list(&body, "domains")
    }

    /// 后端没有单个域的查询接口，从列表中查找
    pub async fn find(
        &self,
        account: AccountId,
        id: DomainId,
    ) -> Result<DirectoryDomain, ApplicationError> {
        self.list(account)
            .await?
            .into_iter()
            .find(|domain| domain.id == id)
            .ok_or_else(|| ApplicationError::not_found("Domain not found"))
    }

    /// 编辑表单的初始值
    pub async fn load_draft(
        &self,
        account: AccountId,
        id: DomainId,
    ) -> Result<DomainDraft, ApplicationError> {
        let domain = self.find(account, id).await?;
        Ok(DomainDraft::from_domain(&domain))
    }

    pub async fn add(
        &self,
        account: AccountId,
        draft: &DomainDraft,
    ) -> Result<Value, ApplicationError> {
        draft.validate()?;
        let payload = draft.to_payload().created_by(account);

        tracing::info!(domain_name = %payload.domain_name, domain_ip = %payload.domain_ip, "添加域");
        let body = ensure_accepted(self.gateway.add_domain(&payload).await?)?;
        Ok(body)
    }

    pub async fn update(
        &self,
        account: AccountId,
        id: DomainId,
        draft: &DomainDraft,
    ) -> Result<Value, ApplicationError> {
        draft.validate()?;
        let payload = draft.to_payload().with_status(draft.status);

        tracing::info!(domain_id = %id, "更新域");
        let body = ensure_accepted(self.gateway.update_domain(id, &payload, account).await?)?;
        Ok(body)
    }

    pub async fn delete(&self, account: AccountId, id: DomainId) -> Result<Value, ApplicationError> {
        tracing::info!(domain_id = %id, "删除域");
        let body = ensure_accepted(self.gateway.delete_domain(id, account).await?)?;
        Ok(body)
    }
}
