use std::sync::Arc;

use domain::{AccountId, AuditLogEntry, AuditLogQuery};
use serde::Serialize;
use serde_json::Value;

use crate::{
    error::ApplicationError,
    gateway::AuditLogGateway,
    response::{ensure_accepted, extract_list},
};

/// 一页审计日志
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditLogPage {
    pub entries: Vec<AuditLogEntry>,
    pub total_count: u64,
    pub limit: u32,
    pub offset: u32,
}

pub struct AuditLogService {
    gateway: Arc<dyn AuditLogGateway>,
}

impl AuditLogService {
    pub fn new(gateway: Arc<dyn AuditLogGateway>) -> Self {
        Self { gateway }
    }

    pub async fn list(
        &self,
        account: AccountId,
        query: &AuditLogQuery,
    ) -> Result<AuditLogPage, ApplicationError> {
        let body = ensure_accepted(self.gateway.list_logs(account, query).await?)?;
        let entries: Vec<AuditLogEntry> = extract_list(&body, "logs")?;

        let total_count = body
            .get("total_count")
            .and_then(Value::as_u64)
            .unwrap_or(entries.len() as u64);

        Ok(AuditLogPage {
            entries,
            total_count,
            limit: query.limit,
            offset: query.offset,
        })
    }
}
