//! 后端审计日志条目
//!
//! 后端为每个变更类接口记录一条日志，GET 请求不记录。

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 日志所属的操作类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationType {
    Domain,
    User,
    Department,
    Login,
    #[serde(other)]
    Other,
}

impl OperationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Domain => "domain",
            Self::User => "user",
            Self::Department => "department",
            Self::Login => "login",
            Self::Other => "other",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditLogEntry {
    pub id: i64,
    pub endpoint: String,
    pub method: String,
    pub operation_type: OperationType,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub domain_id: Option<i64>,
    #[serde(default)]
    pub request_data: Option<Value>,
    #[serde(default)]
    pub response_data: Option<Value>,
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error_message: Option<String>,
    /// ISO-8601 文本，后端不保证带时区
    #[serde(default)]
    pub created_at: Option<String>,
}

/// 日志查询条件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditLogQuery {
    pub endpoint: Option<String>,
    pub operation_type: Option<OperationType>,
    pub limit: u32,
    pub offset: u32,
}

impl Default for AuditLogQuery {
    fn default() -> Self {
        Self {
            endpoint: None,
            operation_type: None,
            limit: 50,
            offset: 0,
        }
    }
}
