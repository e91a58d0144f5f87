use std::path::PathBuf;
use std::sync::Arc;

use application::{
    AuditLogGateway, DepartmentGateway, DomainGateway, IdentityError, IdentityProvider,
    SessionStorage, TransportError, UserGateway,
};
use domain::{AccountId, SESSION_STORAGE_KEY};
use thiserror::Error;

use crate::{
    directory_client::HttpDirectoryClient, identity_provider::HttpIdentityProvider,
    memory::InMemoryDirectory, session_storage::FileSessionStorage,
};

/// 资源接口的实现来源
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// 真实后端
    Live,
    /// 进程内数据，可为某个账户预置示例数据
    Memory { seed_account: Option<AccountId> },
}

#[derive(Debug, Clone)]
pub struct InfrastructureConfig {
    pub api_base_url: String,
    pub identity_url: String,
    pub anon_key: String,
    pub storage_key: String,
    pub session_dir: PathBuf,
    pub data_source: DataSource,
}

impl Default for InfrastructureConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8000/api".to_string(),
            identity_url: "http://127.0.0.1:54321".to_string(),
            anon_key: String::new(),
            storage_key: SESSION_STORAGE_KEY.to_string(),
            session_dir: PathBuf::from(".odie"),
            data_source: DataSource::Live,
        }
    }
}

#[derive(Debug, Error)]
pub enum InfrastructureError {
    #[error("directory client error: {0}")]
    Directory(#[from] TransportError),
    #[error("identity provider error: {0}")]
    Identity(#[from] IdentityError),
}

/// 组装好的适配器集合
#[derive(Clone)]
pub struct Infrastructure {
    pub domain_gateway: Arc<dyn DomainGateway>,
    pub department_gateway: Arc<dyn DepartmentGateway>,
    pub user_gateway: Arc<dyn UserGateway>,
    pub audit_log_gateway: Arc<dyn AuditLogGateway>,
    pub identity_provider: Arc<dyn IdentityProvider>,
    pub session_storage: Arc<dyn SessionStorage>,
    pub storage_key: String,
}

impl Infrastructure {
    pub fn build(config: InfrastructureConfig) -> Result<Self, InfrastructureError> {
        let session_storage: Arc<dyn SessionStorage> =
            Arc::new(FileSessionStorage::new(config.session_dir.clone()));
        let identity_provider = Arc::new(HttpIdentityProvider::new(
            &config.identity_url,
            config.anon_key.clone(),
            Arc::clone(&session_storage),
            config.storage_key.clone(),
        )?);

        let infrastructure = match &config.data_source {
            DataSource::Live => {
                let client = Arc::new(HttpDirectoryClient::new(&config.api_base_url)?);
                tracing::info!(base_url = %client.base_url(), "使用后端数据源");
                Self::assemble(client, identity_provider, session_storage, &config)
            }
            DataSource::Memory { seed_account } => {
                let directory = Arc::new(match seed_account {
                    Some(account) => InMemoryDirectory::with_sample_data(*account),
                    None => InMemoryDirectory::new(),
                });
                tracing::info!(seeded = seed_account.is_some(), "使用内存数据源");
                Self::assemble(directory, identity_provider, session_storage, &config)
            }
        };

        Ok(infrastructure)
    }

    fn assemble<G>(
        gateways: Arc<G>,
        identity_provider: Arc<HttpIdentityProvider>,
        session_storage: Arc<dyn SessionStorage>,
        config: &InfrastructureConfig,
    ) -> Self
    where
        G: DomainGateway + DepartmentGateway + UserGateway + AuditLogGateway + 'static,
    {
        Self {
            domain_gateway: gateways.clone(),
            department_gateway: gateways.clone(),
            user_gateway: gateways.clone(),
            audit_log_gateway: gateways,
            identity_provider,
            session_storage,
            storage_key: config.storage_key.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[tokio::test]
    async fn memory_source_is_seeded_for_account() {
        let dir = tempfile::tempdir().unwrap();
        let account = AccountId(Uuid::new_v4());
        let infrastructure = Infrastructure::build(InfrastructureConfig {
            session_dir: dir.path().to_path_buf(),
            data_source: DataSource::Memory {
                seed_account: Some(account),
            },
            ..InfrastructureConfig::default()
        })
        .unwrap();

        let body = infrastructure
            .domain_gateway
            .list_domains(account)
            .await
            .unwrap();
        assert_eq!(body["domains"][0]["domain_name"], "Merkez");
    }

    #[test]
    fn invalid_api_url_is_reported() {
        let result = Infrastructure::build(InfrastructureConfig {
            api_base_url: "::".into(),
            ..InfrastructureConfig::default()
        });
        assert!(matches!(result, Err(InfrastructureError::Directory(_))));
    }
}
