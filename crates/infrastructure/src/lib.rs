//! 基础设施层实现。
//!
//! 提供后端 HTTP 客户端、身份服务客户端、会话存储以及内存数据源，
//! 实现应用层定义的接口。

pub mod builder;
pub mod directory_client;
pub mod identity_provider;
pub mod memory;
pub mod session_storage;

pub use builder::{DataSource, Infrastructure, InfrastructureConfig, InfrastructureError};
pub use directory_client::HttpDirectoryClient;
pub use identity_provider::HttpIdentityProvider;
pub use memory::InMemoryDirectory;
pub use session_storage::{FileSessionStorage, MemorySessionStorage};
