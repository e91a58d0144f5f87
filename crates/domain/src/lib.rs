//! Odie 目录管理核心领域模型
//!
//! 包含域、部门、目录用户等实体，目录身份格式化规则，以及认证会话模型。

pub mod entities;
pub mod errors;
pub mod identity;
pub mod session;
pub mod value_objects;

// 重新导出常用类型
pub use entities::*;
pub use errors::*;
pub use identity::*;
pub use session::*;
pub use value_objects::*;
