use domain::{requires_local_sign_out, DomainError};
use thiserror::Error;

/// 请求没有得到成功响应。`status` 为空表示请求没有到达服务器。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TransportError {
    pub message: String,
    pub status: Option<u16>,
}

impl TransportError {
    /// 网络层失败
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
        }
    }

    /// 服务器返回了非成功状态码
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: Some(status),
        }
    }

    /// 响应体中没有可用信息时的默认描述
    pub fn from_status(status: u16) -> Self {
        Self::status(status, format!("HTTP error! status: {status}"))
    }
}

/// 身份服务错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    /// 身份服务明确拒绝了请求
    #[error("{message}")]
    Rejected { message: String, status: Option<u16> },
    #[error("{0}")]
    Transport(String),
}

impl IdentityError {
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
            status: None,
        }
    }

    /// 刷新令牌失效时需要清除本地会话并登出
    pub fn requires_sign_out(&self) -> bool {
        match self {
            Self::Rejected { message, .. } => requires_local_sign_out(message),
            Self::Transport(_) => false,
        }
    }
}

/// 本地会话存储错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("session storage error: {0}")]
pub struct StorageError(pub String);

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),
    #[error("{0}")]
    Transport(#[from] TransportError),
    /// 后端以 `success: false` 拒绝了操作
    #[error("{0}")]
    Rejected(String),
    #[error("{0}")]
    NotFound(String),
    #[error("unexpected response: {0}")]
    Decode(String),
    #[error("{0}")]
    Identity(#[from] IdentityError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("not signed in")]
    Unauthenticated,
}

impl ApplicationError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected(message.into())
    }
}

impl From<serde_json::Error> for ApplicationError {
    fn from(value: serde_json::Error) -> Self {
        Self::Decode(value.to_string())
    }
}
