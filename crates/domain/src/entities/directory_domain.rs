//! 域（目录服务器）实体定义

use serde::{Deserialize, Serialize};

use crate::errors::{DomainError, DomainResult};
use crate::identity::{
    extract_bind_username, format_domain_component, format_ldap_user, resolve_port,
    unformat_domain_component, DirectoryFlavor, DEFAULT_LDAP_PORT,
};
use crate::value_objects::{AccountId, DomainId};

/// 域的可达状态，后端使用土耳其语标记。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DomainStatus {
    #[default]
    #[serde(rename = "devrede")]
    Online,
    #[serde(rename = "devre dışı")]
    Offline,
}

impl DomainStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Online => "devrede",
            Self::Offline => "devre dışı",
        }
    }
}

fn default_port() -> u16 {
    DEFAULT_LDAP_PORT
}

/// 已注册的目录服务器
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryDomain {
    pub id: DomainId,
    pub domain_name: String,
    pub domain_ip: String,
    /// 列表接口不返回端口时按默认值处理
    #[serde(default = "default_port")]
    pub domain_port: u16,
    /// `DC=a,DC=b` 形式
    #[serde(default)]
    pub domain_component: Option<String>,
    /// 已按目录类型拼接好的绑定身份
    #[serde(default)]
    pub ldap_user: String,
    #[serde(default)]
    pub ldap_password: String,
    #[serde(default)]
    pub domain_type: DirectoryFlavor,
    #[serde(default)]
    pub status: DomainStatus,
    #[serde(default)]
    pub created_by: Option<AccountId>,
}

impl DirectoryDomain {
    pub fn is_online(&self) -> bool {
        self.status == DomainStatus::Online
    }

    pub fn is_owned_by(&self, account: &AccountId) -> bool {
        self.created_by.as_ref() == Some(account)
    }
}

/// 添加/编辑域表单的原始输入。
///
/// `domain_component` 是点分域名，`ldap_username` 是未拼接的用户名；
/// 两者在 [`DomainDraft::to_payload`] 中格式化。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct DomainDraft {
    pub domain_name: String,
    pub domain_ip: String,
    /// `None` 表示使用默认端口 389
    pub custom_port: Option<u16>,
    pub domain_component: String,
    pub ldap_username: String,
    pub ldap_password: String,
    pub flavor: DirectoryFlavor,
    pub status: DomainStatus,
}

impl DomainDraft {
    /// 从已存储的域重建编辑表单（有损逆转换）。
    pub fn from_domain(domain: &DirectoryDomain) -> Self {
        let domain_component = domain
            .domain_component
            .as_deref()
            .map(unformat_domain_component)
            .unwrap_or_default();

        Self {
            domain_name: domain.domain_name.clone(),
            domain_ip: domain.domain_ip.clone(),
            custom_port: (domain.domain_port != DEFAULT_LDAP_PORT).then_some(domain.domain_port),
            domain_component,
            ldap_username: extract_bind_username(&domain.ldap_user, domain.domain_type),
            ldap_password: domain.ldap_password.clone(),
            flavor: domain.domain_type,
            status: domain.status,
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.domain_name.trim().is_empty() {
            return Err(DomainError::validation_error("domain_name", "域名称不能为空"));
        }
        if self.domain_ip.trim().is_empty() {
            return Err(DomainError::validation_error("domain_ip", "域地址不能为空"));
        }
        if self.custom_port == Some(0) {
            return Err(DomainError::validation_error("domain_port", "端口不能为0"));
        }
        Ok(())
    }

    /// 生成提交给后端的请求体，派生字段在这里格式化。
    pub fn to_payload(&self) -> DomainPayload {
        DomainPayload {
            domain_name: self.domain_name.clone(),
            domain_ip: self.domain_ip.clone(),
            domain_port: resolve_port(self.custom_port),
            domain_component: format_domain_component(&self.domain_component),
            ldap_user: format_ldap_user(&self.ldap_username, &self.domain_component, self.flavor),
            ldap_password: self.ldap_password.clone(),
            domain_type: self.flavor,
            status: None,
            created_by: None,
        }
    }
}

/// 添加/更新域的请求体
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainPayload {
    pub domain_name: String,
    pub domain_ip: String,
    pub domain_port: u16,
    pub domain_component: String,
    pub ldap_user: String,
    pub ldap_password: String,
    pub domain_type: DirectoryFlavor,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<DomainStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<AccountId>,
}

impl DomainPayload {
    pub fn created_by(mut self, account: AccountId) -> Self {
        self.created_by = Some(account);
        self
    }

    pub fn with_status(mut self, status: DomainStatus) -> Self {
        self.status = Some(status);
        self
    }
}
