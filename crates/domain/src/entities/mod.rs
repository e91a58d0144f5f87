//! 领域实体定义

pub mod audit_log;
pub mod department;
pub mod directory_domain;
pub mod user;

pub use audit_log::*;
pub use department::*;
pub use directory_domain::*;
pub use user::*;
