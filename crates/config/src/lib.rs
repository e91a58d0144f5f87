//! 统一配置中心
//!
//! 提供客户端的全局配置管理，包括：
//! - 后端接口地址
//! - 身份服务
//! - 本地会话存储
//! - 日志过滤
//!
//! 加载顺序：默认值 -> 可选的 YAML 文件 -> `ODIE_` 前缀的环境变量（嵌套键用 `__` 分隔）。

use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// 环境变量前缀
pub const ENV_PREFIX: &str = "ODIE_";
/// 指定配置文件路径的环境变量
pub const CONFIG_FILE_ENV: &str = "ODIE_CONFIG_FILE";

/// 后端接口配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ApiConfig {
    /// 接口根路径，例如 `http://127.0.0.1:8000/api`
    #[validate(url)]
    pub base_url: String,
}

/// 身份服务配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct IdentityConfig {
    #[validate(url)]
    pub url: String,
    #[serde(default)]
    pub anon_key: String,
    #[validate(length(min = 1))]
    pub storage_key: String,
}

/// 本地存储配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    pub session_dir: PathBuf,
}

/// 日志配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct LoggingConfig {
    /// `EnvFilter` 语法，`RUST_LOG` 优先
    #[validate(length(min = 1))]
    pub filter: String,
}

/// 资源数据来源
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSourceKind {
    #[default]
    Live,
    Memory,
}

/// 全局应用配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct AppConfig {
    #[validate(nested)]
    pub api: ApiConfig,
    #[validate(nested)]
    pub identity: IdentityConfig,
    pub storage: StorageConfig,
    #[validate(nested)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub data_source: DataSourceKind,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: "http://127.0.0.1:8000/api".into(),
            },
            identity: IdentityConfig {
                url: "http://127.0.0.1:54321".into(),
                anon_key: String::new(),
                storage_key: "odie-supabase-auth-token".into(),
            },
            storage: StorageConfig {
                session_dir: PathBuf::from(".odie"),
            },
            logging: LoggingConfig {
                filter: "info".into(),
            },
            data_source: DataSourceKind::Live,
        }
    }
}

impl AppConfig {
    /// 按默认顺序加载：`file` 为空时读取 `ODIE_CONFIG_FILE`
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        let env_file = std::env::var_os(CONFIG_FILE_ENV).map(PathBuf::from);
        let file = file.map(Path::to_path_buf).or(env_file);
        Self::extract(Self::figment(file.as_deref(), ENV_PREFIX))
    }

    /// 组装配置来源，不做提取
    pub fn figment(file: Option<&Path>, env_prefix: &str) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));
        if let Some(path) = file {
            figment = figment.merge(Yaml::file(path));
        }
        figment.merge(Env::prefixed(env_prefix).split("__"))
    }

    pub fn extract(figment: Figment) -> Result<Self, ConfigError> {
        let config: AppConfig = figment.extract().map_err(Box::new)?;
        config.validate()?;
        Ok(config)
    }

    /// 用于日志输出，隐藏密钥
    pub fn sanitize(&self) -> String {
        let mut sanitized = self.clone();
        if !sanitized.identity.anon_key.is_empty() {
            sanitized.identity.anon_key = "[REDACTED]".into();
        }
        format!("{sanitized:?}")
    }
}

/// 配置错误类型
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),
    #[error("invalid configuration: {0}")]
    Invalid(#[from] validator::ValidationErrors),
}
