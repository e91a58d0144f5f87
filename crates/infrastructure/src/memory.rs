//! 内存数据源
//!
//! 以后端相同的 JSON 结构和归属规则实现全部资源接口。域归创建者所有，
//! 越权访问返回 `{"success": false, "message": ...}`，与后端一致。

use std::collections::{BTreeMap, VecDeque};

use application::{AuditLogGateway, DepartmentGateway, DomainGateway, GatewayResult, UserGateway};
use async_trait::async_trait;
use chrono::Utc;
use domain::{
    AccountId, AuditLogEntry, AuditLogQuery, Department, DepartmentId, DepartmentUpdate,
    DirectoryDomain, DirectoryFlavor, DirectoryUser, DomainDraft, DomainId, DomainPayload,
    DomainStatus, NewDepartment, NewUser, OperationType, UserKey, UserRole, UserStatus,
    UserUpdate, Username,
};
use serde::Serialize;
use serde_json::{json, Value};
use tokio::sync::RwLock;

const NOT_OWNED: &str = "Bu domain sizin hesabınıza ait değil veya bulunamadı.";
const DEPARTMENT_NOT_FOUND: &str = "Departman bulunamadı.";
const USER_NOT_FOUND: &str = "Kullanıcı bulunamadı.";
/// 日志条数上限，超出时丢弃最旧的记录
const MAX_LOG_ENTRIES: usize = 1000;

fn accepted(message: &str) -> Value {
    json!({ "success": true, "message": message })
}

fn rejected(message: impl Into<String>) -> Value {
    json!({ "success": false, "message": message.into() })
}

fn to_value<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

#[derive(Debug, Default)]
struct DirectoryData {
    next_domain_id: i64,
    next_department_id: i64,
    next_user_id: i64,
    next_log_id: i64,
    domains: BTreeMap<DomainId, DirectoryDomain>,
    departments: BTreeMap<DepartmentId, Department>,
    users: Vec<DirectoryUser>,
    logs: VecDeque<AuditLogEntry>,
}

impl DirectoryData {
    fn owned_domain(&self, id: DomainId, account: &AccountId) -> Option<&DirectoryDomain> {
        self.domains
            .get(&id)
            .filter(|domain| domain.is_owned_by(account))
    }

    fn owns(&self, id: DomainId, account: &AccountId) -> bool {
        self.owned_domain(id, account).is_some()
    }

    fn department_in(&self, domain_id: DomainId, department_id: DepartmentId) -> bool {
        self.departments
            .get(&department_id)
            .is_some_and(|department| department.domain_id == Some(domain_id))
    }

    fn user_index(&self, domain_id: DomainId, username: &Username) -> Option<usize> {
        self.users
            .iter()
            .position(|user| user.domain_id == Some(domain_id) && &user.username == username)
    }

    fn insert_domain(&mut self, payload: &DomainPayload, created_by: AccountId) -> DomainId {
        self.next_domain_id += 1;
        let id = DomainId(self.next_domain_id);
        self.domains.insert(
            id,
            DirectoryDomain {
                id,
                domain_name: payload.domain_name.clone(),
                domain_ip: payload.domain_ip.clone(),
                domain_port: payload.domain_port,
                domain_component: Some(payload.domain_component.clone()),
                ldap_user: payload.ldap_user.clone(),
                ldap_password: payload.ldap_password.clone(),
                domain_type: payload.domain_type,
                status: payload.status.unwrap_or_default(),
                created_by: Some(created_by),
            },
        );
        id
    }

    fn insert_department(
        &mut self,
        name: &str,
        domain_id: DomainId,
        created_by: AccountId,
    ) -> Department {
        self.next_department_id += 1;
        let department = Department {
            id: DepartmentId(self.next_department_id),
            name: name.to_string(),
            domain_id: Some(domain_id),
            created_by: Some(created_by),
        };
        self.departments.insert(department.id, department.clone());
        department
    }

    fn insert_user(&mut self, user: &NewUser) {
        self.next_user_id += 1;
        self.users.push(DirectoryUser {
            id: Some(self.next_user_id),
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            password: user.password.clone(),
            role_id: user.role_id,
            department_id: user.department_id,
            status: UserStatus::Enabled,
            domain_id: Some(user.domain_id),
        });
    }

    #[allow(clippy::too_many_arguments)]
    fn record(
        &mut self,
        endpoint: &str,
        method: &str,
        operation_type: OperationType,
        account: &AccountId,
        domain_id: Option<DomainId>,
        request: Value,
        response: &Value,
    ) {
        self.next_log_id += 1;
        let success = response.get("success").and_then(Value::as_bool) != Some(false);
        let error_message = (!success)
            .then(|| response.get("message").and_then(Value::as_str).map(str::to_owned))
            .flatten();

        if self.logs.len() >= MAX_LOG_ENTRIES {
            self.logs.pop_front();
        }
        self.logs.push_back(AuditLogEntry {
            id: self.next_log_id,
            endpoint: endpoint.to_string(),
            method: method.to_string(),
            operation_type,
            user_id: Some(account.to_string()),
            domain_id: domain_id.map(|id| id.0),
            request_data: Some(request),
            response_data: Some(response.clone()),
            success,
            error_message,
            created_at: Some(Utc::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string()),
        });
    }
}

/// 内存中的目录后端
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    data: RwLock<DirectoryData>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// 为账户预置一个域、两个部门和两个用户
    pub fn with_sample_data(account: AccountId) -> Self {
        let mut data = DirectoryData::default();

        let draft = DomainDraft {
            domain_name: "Merkez".into(),
            domain_ip: "10.0.0.5".into(),
            custom_port: None,
            domain_component: "odieproje.local".into(),
            ldap_username: "Administrator".into(),
            ldap_password: "Passw0rd".into(),
            flavor: DirectoryFlavor::Microsoft,
            status: DomainStatus::Online,
        };
        let domain_id = data.insert_domain(&draft.to_payload(), account);
        let it_department = data.insert_department("Bilgi İşlem", domain_id, account);
        data.insert_department("Muhasebe", domain_id, account);

        for (username, first_name, last_name, role, department_id) in [
            ("ayse", "Ayşe", "Yılmaz", UserRole::Admin, Some(it_department.id)),
            ("mehmet", "Mehmet", "Demir", UserRole::User, None),
        ] {
            if let Ok(username) = Username::parse(username) {
                data.insert_user(&NewUser {
                    username,
                    first_name: first_name.into(),
                    last_name: last_name.into(),
                    password: "Passw0rd".into(),
                    role_id: role,
                    department_id,
                    domain_id,
                    created_by: account,
                });
            }
        }

        Self {
            data: RwLock::new(data),
        }
    }
}

#[async_trait]
impl DomainGateway for InMemoryDirectory {
    async fn list_domains(&self, account: AccountId) -> GatewayResult {
        let data = self.data.read().await;
        let domains: Vec<&DirectoryDomain> = data
            .domains
            .values()
            .filter(|domain| domain.is_owned_by(&account))
            .collect();
        Ok(json!({ "success": true, "domains": domains }))
    }

    async fn add_domain(&self, payload: &DomainPayload) -> GatewayResult {
        let mut data = self.data.write().await;
        let Some(account) = payload.created_by else {
            return Ok(rejected("created_by is required"));
        };

        let duplicate = data
            .domains
            .values()
            .any(|domain| domain.is_owned_by(&account) && domain.domain_ip == payload.domain_ip);
        let response = if duplicate {
            rejected(format!(
                "Bu IP adresi ({}) ile zaten bir domain'iniz bulunmaktadır.",
                payload.domain_ip
            ))
        } else {
            let id = data.insert_domain(payload, account);
            tracing::info!(domain_id = %id, "域已添加");
            accepted("Domain başarıyla eklendi")
        };

        data.record(
            "/add_domain",
            "POST",
            OperationType::Domain,
            &account,
            None,
            to_value(payload),
            &response,
        );
        Ok(response)
    }

    async fn update_domain(
        &self,
        id: DomainId,
        payload: &DomainPayload,
        account: AccountId,
    ) -> GatewayResult {
        let mut data = self.data.write().await;
        let response = match data.domains.get_mut(&id) {
            Some(domain) if domain.is_owned_by(&account) => {
                domain.domain_name = payload.domain_name.clone();
                domain.domain_ip = payload.domain_ip.clone();
                domain.domain_port = payload.domain_port;
                domain.domain_component = Some(payload.domain_component.clone());
                domain.ldap_user = payload.ldap_user.clone();
                domain.ldap_password = payload.ldap_password.clone();
                domain.domain_type = payload.domain_type;
                if let Some(status) = payload.status {
                    domain.status = status;
                }
                accepted("Domain güncellendi")
            }
            _ => rejected(NOT_OWNED),
        };

        data.record(
            &format!("/update_domain/{id}"),
            "PUT",
            OperationType::Domain,
            &account,
            Some(id),
            to_value(payload),
            &response,
        );
        Ok(response)
    }

    async fn delete_domain(&self, id: DomainId, account: AccountId) -> GatewayResult {
        let mut data = self.data.write().await;
        let response = if data.owns(id, &account) {
            data.domains.remove(&id);
            data.departments
                .retain(|_, department| department.domain_id != Some(id));
            data.users.retain(|user| user.domain_id != Some(id));
            accepted("Domain silindi")
        } else {
            rejected(NOT_OWNED)
        };

        data.record(
            &format!("/delete_domain/{id}"),
            "DELETE",
            OperationType::Domain,
            &account,
            Some(id),
            Value::Null,
            &response,
        );
        Ok(response)
    }
}

#[async_trait]
impl DepartmentGateway for InMemoryDirectory {
    async fn list_departments(&self) -> GatewayResult {
        let data = self.data.read().await;
        let departments: Vec<Value> = data
            .departments
            .values()
            .map(|department| json!({ "id": department.id, "name": department.name }))
            .collect();
        Ok(json!({ "success": true, "departments": departments }))
    }

    async fn list_departments_by_domain(
        &self,
        domain_id: DomainId,
        account: AccountId,
    ) -> GatewayResult {
        let data = self.data.read().await;
        if !data.owns(domain_id, &account) {
            return Ok(rejected(NOT_OWNED));
        }
        let departments: Vec<Value> = data
            .departments
            .values()
            .filter(|department| department.domain_id == Some(domain_id))
            .map(|department| json!({ "id": department.id, "name": department.name }))
            .collect();
        Ok(json!({ "success": true, "departments": departments }))
    }

    async fn add_department(&self, department: &NewDepartment) -> GatewayResult {
        let mut data = self.data.write().await;
        let account = department.created_by;
        let domain_id = department.domain_id;

        let response = if !data.owns(domain_id, &account) {
            rejected("Bu domain'e erişim yetkiniz yok veya domain bulunamadı.")
        } else if data.departments.values().any(|existing| {
            existing.domain_id == Some(domain_id) && existing.name == department.department_name
        }) {
            rejected(format!(
                "'{}' adlı departman bu domain'de zaten mevcut.",
                department.department_name
            ))
        } else {
            let created = data.insert_department(&department.department_name, domain_id, account);
            json!({
                "success": true,
                "message": "Departman başarıyla eklendi",
                "department": {
                    "id": created.id,
                    "name": created.name,
                    "domain_id": domain_id
                }
            })
        };

        data.record(
            "/add_department",
            "POST",
            OperationType::Department,
            &account,
            Some(domain_id),
            to_value(department),
            &response,
        );
        Ok(response)
    }

    async fn update_department(
        &self,
        domain_id: DomainId,
        department_id: DepartmentId,
        update: &DepartmentUpdate,
        account: AccountId,
    ) -> GatewayResult {
        let mut data = self.data.write().await;
        let response = if !data.owns(domain_id, &account) {
            rejected(NOT_OWNED)
        } else if !data.department_in(domain_id, department_id) {
            rejected(DEPARTMENT_NOT_FOUND)
        } else {
            if let Some(department) = data.departments.get_mut(&department_id) {
                department.name = update.department_name.clone();
            }
            accepted("Departman güncellendi")
        };

        data.record(
            &format!("/update_department/{domain_id}/{department_id}"),
            "PUT",
            OperationType::Department,
            &account,
            Some(domain_id),
            to_value(update),
            &response,
        );
        Ok(response)
    }

    async fn delete_department(
        &self,
        domain_id: DomainId,
        department_id: DepartmentId,
        account: AccountId,
    ) -> GatewayResult {
        let mut data = self.data.write().await;
        let response = if !data.owns(domain_id, &account) {
            rejected(NOT_OWNED)
        } else if !data.department_in(domain_id, department_id) {
            rejected(DEPARTMENT_NOT_FOUND)
        } else {
            data.departments.remove(&department_id);
            for user in data.users.iter_mut() {
                if user.department_id == Some(department_id) {
                    user.department_id = None;
                }
            }
            accepted("Departman silindi")
        };

        data.record(
            &format!("/delete_department/{domain_id}/{department_id}"),
            "DELETE",
            OperationType::Department,
            &account,
            Some(domain_id),
            Value::Null,
            &response,
        );
        Ok(response)
    }
}

#[async_trait]
impl UserGateway for InMemoryDirectory {
    async fn list_users_by_domain(
        &self,
        domain_id: DomainId,
        status: Option<UserStatus>,
    ) -> GatewayResult {
        let data = self.data.read().await;
        if !data.domains.contains_key(&domain_id) {
            return Ok(rejected("Domain bulunamadı."));
        }
        let users: Vec<&DirectoryUser> = data
            .users
            .iter()
            .filter(|user| user.domain_id == Some(domain_id))
            .filter(|user| status.map_or(true, |status| user.status == status))
            .collect();
        Ok(json!({ "success": true, "users": users }))
    }

    async fn add_user(&self, user: &NewUser) -> GatewayResult {
        let mut data = self.data.write().await;
        let account = user.created_by;

        let response = if !data.owns(user.domain_id, &account) {
            rejected(NOT_OWNED)
        } else if data.user_index(user.domain_id, &user.username).is_some() {
            rejected(format!("'{}' kullanıcısı zaten mevcut.", user.username))
        } else if user
            .department_id
            .is_some_and(|department_id| !data.department_in(user.domain_id, department_id))
        {
            rejected(DEPARTMENT_NOT_FOUND)
        } else {
            data.insert_user(user);
            accepted("Kullanıcı eklendi")
        };

        data.record(
            "/add_user",
            "POST",
            OperationType::User,
            &account,
            Some(user.domain_id),
            to_value(user),
            &response,
        );
        Ok(response)
    }

    async fn update_user(
        &self,
        domain_id: DomainId,
        username: &Username,
        update: &UserUpdate,
        account: AccountId,
    ) -> GatewayResult {
        let mut data = self.data.write().await;
        let index = data.user_index(domain_id, username);

        let response = if !data.owns(domain_id, &account) {
            rejected(NOT_OWNED)
        } else if update
            .department_id
            .is_some_and(|department_id| !data.department_in(domain_id, department_id))
        {
            rejected(DEPARTMENT_NOT_FOUND)
        } else if let Some(index) = index {
            let user = &mut data.users[index];
            user.first_name = update.first_name.clone();
            user.last_name = update.last_name.clone();
            user.role_id = update.role_id;
            user.department_id = update.department_id;
            if let Some(password) = &update.password {
                user.password = password.clone();
            }
            accepted("Kullanıcı güncellendi")
        } else {
            rejected(USER_NOT_FOUND)
        };

        data.record(
            &format!("/update_user/{domain_id}/{username}"),
            "PUT",
            OperationType::User,
            &account,
            Some(domain_id),
            to_value(update),
            &response,
        );
        Ok(response)
    }

    async fn delete_user(&self, key: &UserKey) -> GatewayResult {
        let mut data = self.data.write().await;
        let response = match locate(&data, key) {
            Ok(index) => {
                data.users.remove(index);
                accepted("Kullanıcı silindi")
            }
            Err(response) => response,
        };

        data.record(
            "/delete_user",
            "DELETE",
            OperationType::User,
            &key.user_id,
            Some(key.domain_id),
            to_value(key),
            &response,
        );
        Ok(response)
    }

    async fn enable_user(&self, key: &UserKey) -> GatewayResult {
        let response = self.set_status(key, UserStatus::Enabled).await;
        Ok(response)
    }

    async fn disable_user(&self, key: &UserKey) -> GatewayResult {
        let response = self.set_status(key, UserStatus::Disabled).await;
        Ok(response)
    }
}

/// 按用户键查找用户，并检查操作者是否拥有该域
fn locate(data: &DirectoryData, key: &UserKey) -> Result<usize, Value> {
    if !data.owns(key.domain_id, &key.user_id) {
        return Err(rejected(NOT_OWNED));
    }
    data.user_index(key.domain_id, &key.username)
        .ok_or_else(|| rejected(USER_NOT_FOUND))
}

impl InMemoryDirectory {
    async fn set_status(&self, key: &UserKey, status: UserStatus) -> Value {
        let mut data = self.data.write().await;
        let response = match locate(&data, key) {
            Ok(index) => {
                data.users[index].status = status;
                match status {
                    UserStatus::Enabled => accepted("Kullanıcı etkinleştirildi"),
                    UserStatus::Disabled => accepted("Kullanıcı devre dışı bırakıldı"),
                }
            }
            Err(response) => response,
        };

        let endpoint = match status {
            UserStatus::Enabled => "/enable_user",
            UserStatus::Disabled => "/disable_user",
        };
        data.record(
            endpoint,
            "POST",
            OperationType::User,
            &key.user_id,
            Some(key.domain_id),
            to_value(key),
            &response,
        );
        response
    }
}

#[async_trait]
impl AuditLogGateway for InMemoryDirectory {
    async fn list_logs(&self, account: AccountId, query: &AuditLogQuery) -> GatewayResult {
        let data = self.data.read().await;
        let account = account.to_string();

        let matching: Vec<&AuditLogEntry> = data
            .logs
            .iter()
            .rev()
            .filter(|entry| entry.user_id.as_deref() == Some(account.as_str()))
            .filter(|entry| {
                query
                    .endpoint
                    .as_deref()
                    .map_or(true, |endpoint| entry.endpoint.contains(endpoint))
            })
            .filter(|entry| {
                query
                    .operation_type
                    .map_or(true, |operation_type| entry.operation_type == operation_type)
            })
            .collect();

        let page: Vec<&AuditLogEntry> = matching
            .iter()
            .skip(query.offset as usize)
            .take(query.limit as usize)
            .copied()
            .collect();

        Ok(json!({
            "success": true,
            "logs": page,
            "total_count": matching.len(),
            "limit": query.limit,
            "offset": query.offset
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn account() -> AccountId {
        AccountId(Uuid::new_v4())
    }

    fn payload(ip: &str) -> DomainPayload {
        DomainDraft {
            domain_name: "Şube".into(),
            domain_ip: ip.into(),
            domain_component: "sube.local".into(),
            ldap_username: "admin".into(),
            ldap_password: "secret".into(),
            flavor: DirectoryFlavor::Samba,
            ..DomainDraft::default()
        }
        .to_payload()
    }

    #[tokio::test]
    async fn domains_are_scoped_to_owner() {
        let owner = account();
        let stranger = account();
        let directory = InMemoryDirectory::new();

        let body = directory
            .add_domain(&payload("10.0.1.5").created_by(owner))
            .await
            .unwrap();
        assert_eq!(body["success"], true);

        let listed = directory.list_domains(owner).await.unwrap();
        assert_eq!(listed["domains"].as_array().unwrap().len(), 1);
        assert_eq!(listed["domains"][0]["ldap_user"], "admin@SUBE.LOCAL");

        let foreign = directory.list_domains(stranger).await.unwrap();
        assert!(foreign["domains"].as_array().unwrap().is_empty());

        let denied = directory.delete_domain(DomainId(1), stranger).await.unwrap();
        assert_eq!(denied["success"], false);
        assert_eq!(denied["message"], NOT_OWNED);
    }

    #[tokio::test]
    async fn duplicate_ip_is_rejected_per_owner() {
        let owner = account();
        let directory = InMemoryDirectory::new();
        directory
            .add_domain(&payload("10.0.1.5").created_by(owner))
            .await
            .unwrap();

        let again = directory
            .add_domain(&payload("10.0.1.5").created_by(owner))
            .await
            .unwrap();
        assert_eq!(again["success"], false);

        let other_owner = directory
            .add_domain(&payload("10.0.1.5").created_by(account()))
            .await
            .unwrap();
        assert_eq!(other_owner["success"], true);
    }

    #[tokio::test]
    async fn deleting_domain_cascades() {
        let owner = account();
        let directory = InMemoryDirectory::with_sample_data(owner);

        let users = directory.list_users_by_domain(DomainId(1), None).await.unwrap();
        assert_eq!(users["users"].as_array().unwrap().len(), 2);

        directory.delete_domain(DomainId(1), owner).await.unwrap();

        let departments = directory.list_departments().await.unwrap();
        assert!(departments["departments"].as_array().unwrap().is_empty());
        let users = directory.list_users_by_domain(DomainId(1), None).await.unwrap();
        assert_eq!(users["success"], false);
    }

    #[tokio::test]
    async fn user_state_transitions_and_filter() {
        let owner = account();
        let directory = InMemoryDirectory::with_sample_data(owner);
        let key = UserKey {
            username: Username::parse("mehmet").unwrap(),
            domain_id: DomainId(1),
            user_id: owner,
        };

        let body = directory.disable_user(&key).await.unwrap();
        assert_eq!(body["success"], true);

        let disabled = directory
            .list_users_by_domain(DomainId(1), Some(UserStatus::Disabled))
            .await
            .unwrap();
        assert_eq!(disabled["users"].as_array().unwrap().len(), 1);
        assert_eq!(disabled["users"][0]["username"], "mehmet");
        assert_eq!(disabled["users"][0]["status"], "devre dışı");

        let stranger_key = UserKey {
            user_id: account(),
            ..key.clone()
        };
        let denied = directory.enable_user(&stranger_key).await.unwrap();
        assert_eq!(denied["success"], false);
    }

    #[tokio::test]
    async fn deleting_department_unassigns_users() {
        let owner = account();
        let directory = InMemoryDirectory::with_sample_data(owner);

        let body = directory
            .delete_department(DomainId(1), DepartmentId(1), owner)
            .await
            .unwrap();
        assert_eq!(body["success"], true);

        let users = directory.list_users_by_domain(DomainId(1), None).await.unwrap();
        let ayse = &users["users"][0];
        assert_eq!(ayse["username"], "ayse");
        assert_eq!(ayse["department_id"], 0);

        let missing = directory
            .delete_department(DomainId(1), DepartmentId(1), owner)
            .await
            .unwrap();
        assert_eq!(missing["message"], DEPARTMENT_NOT_FOUND);
    }

    #[tokio::test]
    async fn mutations_are_logged_for_the_account() {
        let owner = account();
        let directory = InMemoryDirectory::with_sample_data(owner);
        directory
            .add_department(&NewDepartment {
                department_name: "Satış".into(),
                domain_id: DomainId(1),
                created_by: owner,
            })
            .await
            .unwrap();
        directory.delete_domain(DomainId(1), account()).await.unwrap();

        let logs = directory
            .list_logs(owner, &AuditLogQuery::default())
            .await
            .unwrap();
        assert_eq!(logs["total_count"], 1);
        assert_eq!(logs["logs"][0]["endpoint"], "/add_department");
        assert_eq!(logs["logs"][0]["operation_type"], "department");

        let filtered = directory
            .list_logs(
                owner,
                &AuditLogQuery {
                    operation_type: Some(OperationType::User),
                    ..AuditLogQuery::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(filtered["total_count"], 0);
    }

    #[tokio::test]
    async fn updating_disabled_user_keeps_status() {
        let owner = account();
        let directory = InMemoryDirectory::with_sample_data(owner);
        let username = Username::parse("mehmet").unwrap();
        let key = UserKey {
            username: username.clone(),
            domain_id: DomainId(1),
            user_id: owner,
        };
        directory.disable_user(&key).await.unwrap();

        let update = UserUpdate {
            first_name: "Mehmet Can".into(),
            last_name: "Yılmaz".into(),
            password: None,
            role_id: UserRole::User,
            department_id: None,
        };
        let body = directory
            .update_user(DomainId(1), &username, &update, owner)
            .await
            .unwrap();
        assert_eq!(body["success"], true);

        let users = directory.list_users_by_domain(DomainId(1), None).await.unwrap();
        let mehmet = users["users"]
            .as_array()
            .unwrap()
            .iter()
            .find(|user| user["username"] == "mehmet")
            .unwrap();
        assert_eq!(mehmet["first_name"], "Mehmet Can");
        assert_eq!(mehmet["status"], "devre dışı");
    }

    #[test]
    fn log_keeps_only_newest_entries() {
        let owner = account();
        let mut data = DirectoryData::default();
        for _ in 0..MAX_LOG_ENTRIES + 5 {
            data.record(
                "/add_domain",
                "POST",
                OperationType::Domain,
                &owner,
                None,
                Value::Null,
                &accepted("ok"),
            );
        }

        assert_eq!(data.logs.len(), MAX_LOG_ENTRIES);
        assert_eq!(data.logs.front().map(|entry| entry.id), Some(6));
        assert_eq!(
            data.logs.back().map(|entry| entry.id),
            Some((MAX_LOG_ENTRIES + 5) as i64)
        );
    }
}
