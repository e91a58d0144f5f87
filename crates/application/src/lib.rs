//! 应用层实现。
//!
//! 这里提供围绕目录管理领域模型的用例服务：解释后端响应、
//! 跨域汇总、以及认证状态的维护。后端和身份服务通过接口抽象，
//! 由基础设施层提供实现。

pub mod aggregate;
pub mod auth_state;
pub mod error;
pub mod gateway;
pub mod response;
pub mod services;
pub mod session;

pub use aggregate::{roll_up, DomainRollup};
pub use auth_state::{AuthSnapshot, AuthState};
pub use error::{ApplicationError, IdentityError, StorageError, TransportError};
pub use gateway::{AuditLogGateway, DepartmentGateway, DomainGateway, GatewayResult, UserGateway};
pub use services::{
    AuditLogPage, AuditLogService, AuthService, DepartmentMatch, DepartmentService,
    DepartmentServiceDependencies, DomainService, UserService, UserServiceDependencies,
};
pub use session::{Credentials, IdentityProvider, SessionStorage};
