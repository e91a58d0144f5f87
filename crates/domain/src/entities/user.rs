//! 目录用户实体定义
//!
//! 用户由 (域ID, 用户名) 寻址，后端不为变更操作暴露数字ID。
//! 启用/停用只能通过专门的状态转换接口完成，普通更新不携带状态字段。

use serde::{Deserialize, Serialize};

use crate::errors::{DomainError, DomainResult};
use crate::value_objects::{department_ref, AccountId, DepartmentId, DomainId, Username};

/// 用户角色，后端用小整数表示
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum UserRole {
    Admin,
    #[default]
    User,
    Guest,
}

impl UserRole {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::User => "User",
            Self::Guest => "Guest",
        }
    }
}

impl From<UserRole> for u8 {
    fn from(role: UserRole) -> Self {
        match role {
            UserRole::Admin => 1,
            UserRole::User => 2,
            UserRole::Guest => 3,
        }
    }
}

impl TryFrom<u8> for UserRole {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Admin),
            2 => Ok(Self::User),
            3 => Ok(Self::Guest),
            other => Err(DomainError::UnknownRole(other)),
        }
    }
}

/// 用户状态
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserStatus {
    #[default]
    #[serde(rename = "devrede")]
    Enabled,
    #[serde(rename = "devre dışı")]
    Disabled,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Enabled => "devrede",
            Self::Disabled => "devre dışı",
        }
    }
}

/// 目录用户
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryUser {
    #[serde(default)]
    pub id: Option<i64>,
    pub username: Username,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub role_id: UserRole,
    #[serde(default, with = "department_ref")]
    pub department_id: Option<DepartmentId>,
    #[serde(default)]
    pub status: UserStatus,
    #[serde(default)]
    pub domain_id: Option<DomainId>,
}

impl DirectoryUser {
    pub fn is_enabled(&self) -> bool {
        self.status == UserStatus::Enabled
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// 添加用户表单输入
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDraft {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub role: UserRole,
    pub department_id: Option<DepartmentId>,
    pub domain_id: DomainId,
}

impl UserDraft {
    pub fn into_new_user(self, created_by: AccountId) -> DomainResult<NewUser> {
        let username = Username::parse(self.username)?;
        if self.password.is_empty() {
            return Err(DomainError::validation_error("password", "密码不能为空"));
        }

        Ok(NewUser {
            username,
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            password: self.password,
            role_id: self.role,
            department_id: self.department_id,
            domain_id: self.domain_id,
            created_by,
        })
    }
}

/// 添加用户请求体
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewUser {
    pub username: Username,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub role_id: UserRole,
    #[serde(with = "department_ref")]
    pub department_id: Option<DepartmentId>,
    pub domain_id: DomainId,
    pub created_by: AccountId,
}

/// 更新用户请求体。没有状态字段。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserUpdate {
    pub first_name: String,
    pub last_name: String,
    /// 为空时保留原密码
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub role_id: UserRole,
    #[serde(with = "department_ref")]
    pub department_id: Option<DepartmentId>,
}

impl UserUpdate {
    /// 以现有用户为基础的编辑表单
    pub fn from_user(user: &DirectoryUser) -> Self {
        Self {
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            password: None,
            role_id: user.role_id,
            department_id: user.department_id,
        }
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        let password = password.into();
        self.password = (!password.is_empty()).then_some(password);
        self
    }
}

/// 删除、启用、停用接口使用的用户键，放在请求体中
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserKey {
    pub username: Username,
    pub domain_id: DomainId,
    /// 执行操作的账户
    pub user_id: AccountId,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use uuid::Uuid;

    fn listed_user() -> DirectoryUser {
        serde_json::from_value(json!({
            "id": 12,
            "username": "ayse",
            "first_name": "Ayşe",
            "password": "pw",
            "last_name": "Yılmaz",
            "role_id": 1,
            "department_id": 0,
            "status": "devre dışı"
        }))
        .unwrap()
    }

    #[test]
    fn test_list_entry_decoding() {
        let user = listed_user();
        assert_eq!(user.username.as_str(), "ayse");
        assert_eq!(user.role_id, UserRole::Admin);
        assert_eq!(user.department_id, None);
        assert!(!user.is_enabled());
        assert_eq!(user.full_name(), "Ayşe Yılmaz");
    }

    #[test]
    fn test_role_codes() {
        assert_eq!(u8::from(UserRole::Guest), 3);
        assert_eq!(UserRole::try_from(2u8).unwrap(), UserRole::User);
        assert_eq!(UserRole::try_from(9u8), Err(DomainError::UnknownRole(9)));
        assert!(serde_json::from_value::<UserRole>(json!(4)).is_err());
    }

    #[test]
    fn test_null_department_is_unassigned() {
        let user: DirectoryUser = serde_json::from_value(json!({
            "username": "mehmet",
            "department_id": null
        }))
        .unwrap();
        assert_eq!(user.department_id, None);
        assert_eq!(user.status, UserStatus::Enabled);
        assert_eq!(user.role_id, UserRole::User);
    }

    #[test]
    fn test_update_body_has_no_status() {
        let mut user = listed_user();
        user.department_id = Some(DepartmentId(5));
        let update = UserUpdate::from_user(&user).with_password("");
        let body = serde_json::to_value(&update).unwrap();

        assert!(body.get("status").is_none());
        assert!(body.get("password").is_none());
        assert_eq!(body["department_id"], 5);
        assert_eq!(body["role_id"], 1);

        let body = serde_json::to_value(update.with_password("new-secret")).unwrap();
        assert_eq!(body["password"], "new-secret");
    }

    #[test]
    fn test_draft_into_new_user() {
        let account = AccountId(Uuid::new_v4());
        let draft = UserDraft {
            username: " ali ".into(),
            first_name: "Ali".into(),
            last_name: "Kaya".into(),
            password: "Passw0rd".into(),
            role: UserRole::Guest,
            department_id: None,
            domain_id: DomainId(2),
        };

        let new_user = draft.clone().into_new_user(account).unwrap();
        let body = serde_json::to_value(&new_user).unwrap();
        assert_eq!(body["username"], "ali");
        assert_eq!(body["department_id"], 0);
        assert_eq!(body["role_id"], 3);
        assert_eq!(body["domain_id"], 2);
        assert_eq!(body["created_by"], account.to_string());

        let mut no_password = draft;
        no_password.password.clear();
        assert!(no_password.into_new_user(account).is_err());
    }
}
