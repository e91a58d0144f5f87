//! 部门实体定义
//!
//! 部门只属于一个域。删除域时由后端负责级联删除。

use serde::{Deserialize, Serialize};

use crate::errors::{DomainError, DomainResult};
use crate::value_objects::{AccountId, DepartmentId, DomainId};

/// 部门实体
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    /// 部门ID
    pub id: DepartmentId,
    /// 部门名称
    #[serde(alias = "department_name")]
    pub name: String,
    /// 所属域
    #[serde(default)]
    pub domain_id: Option<DomainId>,
    /// 创建者
    #[serde(default)]
    pub created_by: Option<AccountId>,
}

/// 经过验证的部门名称（已去除前后空白）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentName(String);

impl DepartmentName {
    pub fn parse(value: &str) -> DomainResult<Self> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation_error("department_name", "部门名称不能为空"));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// 新建部门请求体
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewDepartment {
    pub department_name: String,
    pub domain_id: DomainId,
    pub created_by: AccountId,
}

impl NewDepartment {
    pub fn new(name: DepartmentName, domain_id: DomainId, created_by: AccountId) -> Self {
        Self {
            department_name: name.into_inner(),
            domain_id,
            created_by,
        }
    }
}

/// 更新部门请求体（只允许改名）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepartmentUpdate {
    pub department_name: String,
}

impl From<DepartmentName> for DepartmentUpdate {
    fn from(name: DepartmentName) -> Self {
        Self {
            department_name: name.into_inner(),
        }
    }
}
