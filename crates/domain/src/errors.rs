//! 领域模型错误定义
//!
//! 目录身份格式化本身不会失败；这里的错误只来自表单校验和严格的域名语法。

use thiserror::Error;

/// 领域模型错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// 验证错误
    #[error("验证失败: {field}: {message}")]
    ValidationError { field: String, message: String },

    /// 域名不符合严格语法
    #[error("无效的域名 {name:?}: {reason}")]
    InvalidDomainName { name: String, reason: String },

    /// 未知的角色编号
    #[error("未知的角色编号: {0}")]
    UnknownRole(u8),
}

impl DomainError {
    /// 创建验证错误
    pub fn validation_error(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// 创建域名语法错误
    pub fn invalid_domain_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidDomainName {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// 领域模型结果类型
pub type DomainResult<T> = Result<T, DomainError>;
