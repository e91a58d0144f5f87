mod audit_log_service;
mod auth_service;
mod department_service;
mod domain_service;
mod user_service;

pub use audit_log_service::{AuditLogPage, AuditLogService};
pub use auth_service::AuthService;
pub use department_service::{
    DepartmentMatch, DepartmentService, DepartmentServiceDependencies,
};
pub use domain_service::DomainService;
pub use user_service::{UserService, UserServiceDependencies};
